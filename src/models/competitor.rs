//! Competitor data structure and entry-boundary normalization.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competitor (used in matches, played pairs and lookups).
pub type CompetitorId = Uuid;

/// Rating given to competitors whose rating is missing or not a number.
pub const DEFAULT_RATING: i32 = 1200;

/// A competitor on the tournament roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    /// `None` means "no team": compatible with every other competitor.
    pub team: Option<String>,
    /// Only used to order the pairing search and to break standings ties.
    pub rating: i32,
    /// Withdrawn competitors keep their history but are no longer paired.
    pub active: bool,
}

impl Competitor {
    /// Create an active competitor. Blank team labels become "no team".
    pub fn new(name: impl Into<String>, team: Option<&str>, rating: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team: team.and_then(|t| normalize_team(t, &[])),
            rating,
            active: true,
        }
    }

    /// True if both competitors carry the same real team label.
    pub fn shares_team_with(&self, other: &Competitor) -> bool {
        match (&self.team, &other.team) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Take this competitor out of future pairings.
    pub fn withdraw(&mut self) {
        self.active = false;
    }
}

/// Parse a rating as entered by a user; anything unparseable falls back to [`DEFAULT_RATING`].
pub fn parse_rating(raw: Option<&str>) -> i32 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(DEFAULT_RATING)
}

/// Normalize a team label.
///
/// Blank input is "no team". With a non-empty `known_teams` list, a label must match one
/// of them (case-insensitive) and takes the known spelling; unrecognized labels become
/// "no team" rather than an error.
pub fn normalize_team(raw: &str, known_teams: &[String]) -> Option<String> {
    let label = raw.trim();
    if label.is_empty() {
        return None;
    }
    if known_teams.is_empty() {
        return Some(label.to_string());
    }
    known_teams
        .iter()
        .find(|k| k.eq_ignore_ascii_case(label))
        .cloned()
}
