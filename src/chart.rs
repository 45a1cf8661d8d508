//! Minimal bar chart rasteriser for the weekly report.

use crate::models::DailySummary;
use image::{Rgb, RgbImage};

pub const DEFAULT_WIDTH: u32 = 500;
pub const DEFAULT_HEIGHT: u32 = 300;

const MARGIN: u32 = 30;
const GRID_LINES: u32 = 5;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const AXIS: Rgb<u8> = Rgb([90, 90, 90]);
const BAR: Rgb<u8> = Rgb([83, 140, 209]);

/// One bar per day, heights relative to the largest total.
pub fn render_bar_chart(summaries: &[DailySummary], width: u32, height: u32) -> RgbImage {
    let mut image = RgbImage::from_pixel(width, height, BACKGROUND);
    if width <= MARGIN * 2 || height <= MARGIN * 2 {
        return image;
    }

    let left = MARGIN;
    let right = width - MARGIN;
    let top = MARGIN;
    let bottom = height - MARGIN;
    let plot_height = bottom - top;

    for line in 0..=GRID_LINES {
        let y = top + plot_height * line / GRID_LINES;
        fill(&mut image, left, y, right, y + 1, GRID);
    }
    fill(&mut image, left, top, left + 1, bottom + 1, AXIS);
    fill(&mut image, left, bottom, right, bottom + 1, AXIS);

    let max = summaries
        .iter()
        .map(|summary| summary.total_amount)
        .max()
        .unwrap_or_default();
    if summaries.is_empty() || max <= 0 {
        return image;
    }

    let slot = (right - left) / summaries.len() as u32;
    if slot == 0 {
        return image;
    }
    let bar_width = (slot * 3 / 5).max(1);
    for (index, summary) in summaries.iter().enumerate() {
        let amount = summary.total_amount.max(0) as u64;
        let bar_height = (amount * u64::from(plot_height) / max as u64) as u32;
        if bar_height == 0 {
            continue;
        }
        let x0 = left + slot * index as u32 + (slot - bar_width) / 2;
        fill(&mut image, x0, bottom - bar_height, x0 + bar_width, bottom, BAR);
    }

    image
}

fn fill(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    for y in y0..y1.min(image.height()) {
        for x in x0..x1.min(image.width()) {
            image.put_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(day: &str, total_amount: i64) -> DailySummary {
        DailySummary {
            day: day.to_string(),
            total_amount,
        }
    }

    #[test]
    fn tallest_bar_reaches_top_of_plot() {
        let image = render_bar_chart(&[day("1", 500), day("2", 1000)], 500, 300);
        // second slot centre, just under the top grid line
        let slot = (500 - 2 * MARGIN) / 2;
        let x = MARGIN + slot + slot / 2;
        assert_eq!(*image.get_pixel(x, MARGIN + 1), BAR);
        // first bar is half as tall
        let x = MARGIN + slot / 2;
        assert_eq!(*image.get_pixel(x, MARGIN + 1), BACKGROUND);
        assert_eq!(*image.get_pixel(x, 300 - MARGIN - 1), BAR);
    }

    #[test]
    fn more_days_than_pixels_renders_without_bars() {
        let days: Vec<_> = (0..50).map(|index| day(&index.to_string(), 100)).collect();
        let image = render_bar_chart(&days, 2 * MARGIN + 10, DEFAULT_HEIGHT);
        assert!(image.pixels().all(|pixel| *pixel != BAR));
    }

    #[test]
    fn empty_series_renders_only_grid() {
        let image = render_bar_chart(&[], DEFAULT_WIDTH, DEFAULT_HEIGHT);
        assert_eq!(image.dimensions(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert!(image.pixels().all(|pixel| *pixel != BAR));

        let zeros = render_bar_chart(&[day("3", 0)], DEFAULT_WIDTH, DEFAULT_HEIGHT);
        assert!(zeros.pixels().all(|pixel| *pixel != BAR));
    }
}
