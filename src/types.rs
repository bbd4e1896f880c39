use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::ALL_TIME_LABEL;
use crate::error::FieldError;

// ---------------------------------------------------------------------------
// Periods and windows
// ---------------------------------------------------------------------------

/// A named academic period. `start < end`; catalogs order periods by `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub order: i64,
}

/// Half-open `[start_unix, end_unix)` range in unix seconds.
/// `{0, 0}` is the unbounded (all time) window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimeWindow {
    pub start_unix: i64,
    pub end_unix: i64,
}

impl TimeWindow {
    pub const ALL_TIME: TimeWindow = TimeWindow { start_unix: 0, end_unix: 0 };

    pub fn is_unbounded(&self) -> bool {
        *self == Self::ALL_TIME
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unbounded() {
            write!(f, "[unbounded)")
        } else {
            write!(f, "[{}, {})", self.start_unix, self.end_unix)
        }
    }
}

/// What the timeframe menu has selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    AllTime,
    Period(String),
}

impl Selection {
    /// Menu labels map back onto selections; `"All Time"` is the only reserved label.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_TIME_LABEL {
            Selection::AllTime
        } else {
            Selection::Period(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::AllTime => ALL_TIME_LABEL,
            Selection::Period(name) => name,
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Ranking data
// ---------------------------------------------------------------------------

/// One row as returned by the leaderboard API. `points` and `rank` stay textual
/// until partitioning; the API has shipped them both as strings and as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedUser {
    pub uuid: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, alias = "picture")]
    pub profile_picture: String,
    #[serde(deserialize_with = "string_or_number")]
    pub points: String,
    #[serde(deserialize_with = "string_or_number")]
    pub rank: String,
}

impl RankedUser {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// A ranked user ready for rendering. `placement` is the 1-based position in the
/// displayed list and is independent of the server-reported `rank`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub uuid: String,
    pub display_name: String,
    pub image: String,
    pub points: u64,
    pub rank: u32,
    pub placement: usize,
    pub is_self: bool,
}

/// One position in the rendered list. A malformed row still occupies its
/// placement so neighbours keep their numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Ranked(DisplayEntry),
    Invalid {
        placement: usize,
        uuid: String,
        display_name: String,
        error: FieldError,
    },
}

impl Slot {
    pub fn placement(&self) -> usize {
        match self {
            Slot::Ranked(entry) => entry.placement,
            Slot::Invalid { placement, .. } => *placement,
        }
    }

    pub fn uuid(&self) -> &str {
        match self {
            Slot::Ranked(entry) => &entry.uuid,
            Slot::Invalid { uuid, .. } => uuid,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub podium: Vec<Slot>,
    pub rest: Vec<Slot>,
}

impl Partition {
    pub fn is_empty(&self) -> bool {
        self.podium.is_empty() && self.rest.is_empty()
    }

    pub fn len(&self) -> usize {
        self.podium.len() + self.rest.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.podium
            .iter()
            .chain(self.rest.iter())
            .filter(|s| matches!(s, Slot::Invalid { .. }))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Fetch requests
// ---------------------------------------------------------------------------

/// Arguments handed to the ranking source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchQuery {
    pub offset: u32,
    pub limit: u32,
    pub window: TimeWindow,
}
