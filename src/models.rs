use chrono::{DateTime, Local};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Hydration {
    pub id: i64,
    pub username: String,
    pub drink: String,
    /// Millilitres.
    pub amount: i64,
    pub modified: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHydration {
    pub username: String,
    pub drink: String,
    pub amount: i64,
    pub modified: DateTime<Local>,
}

impl NewHydration {
    pub fn now(username: impl Into<String>, drink: impl Into<String>, amount: i64) -> Self {
        Self {
            username: username.into(),
            drink: drink.into(),
            amount,
            modified: Local::now(),
        }
    }

    pub fn with_id(self, id: i64) -> Hydration {
        Hydration {
            id,
            username: self.username,
            drink: self.drink,
            amount: self.amount,
            modified: self.modified,
        }
    }
}

/// Total drunk by one user on one day of the trailing week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub day: String,
    pub total_amount: i64,
}

/// Message location and record id carried through an edit modal's
/// `private_metadata` as `channel-ts-id`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrivateMetadata {
    pub channel: String,
    pub message_ts: String,
    pub hydration_id: i64,
}

impl PrivateMetadata {
    pub fn new(channel: impl Into<String>, message_ts: impl Into<String>, hydration_id: i64) -> Self {
        Self {
            channel: channel.into(),
            message_ts: message_ts.into(),
            hydration_id,
        }
    }

    /// Missing parts degrade to empty strings and an unparsable id to 0.
    pub fn parse(packed: &str) -> Self {
        let mut parts = packed.splitn(3, '-');
        let channel = parts.next().unwrap_or_default().to_string();
        let message_ts = parts.next().unwrap_or_default().to_string();
        let hydration_id = parts
            .next()
            .and_then(|id| id.parse().ok())
            .unwrap_or_default();
        Self {
            channel,
            message_ts,
            hydration_id,
        }
    }
}

impl fmt::Display for PrivateMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.channel, self.message_ts, self.hydration_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_packs_and_parses() {
        let metadata = PrivateMetadata::new("C1", "T1", 42);
        let packed = metadata.to_string();
        assert_eq!(packed, "C1-T1-42");
        assert_eq!(PrivateMetadata::parse(&packed), metadata);
    }

    #[test]
    fn metadata_keeps_dotted_timestamps() {
        let parsed = PrivateMetadata::parse("C024BE91L-1608771022.000200-7");
        assert_eq!(parsed.channel, "C024BE91L");
        assert_eq!(parsed.message_ts, "1608771022.000200");
        assert_eq!(parsed.hydration_id, 7);
    }

    #[test]
    fn metadata_degrades_to_zero_values() {
        assert_eq!(PrivateMetadata::parse(""), PrivateMetadata::default());
        let parsed = PrivateMetadata::parse("C1-T1-abc");
        assert_eq!(parsed.channel, "C1");
        assert_eq!(parsed.message_ts, "T1");
        assert_eq!(parsed.hydration_id, 0);
    }
}
