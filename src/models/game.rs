//! Match records: pairings and byes, with their reporting state.

use crate::models::competitor::CompetitorId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match record.
pub type MatchId = Uuid;

/// Score credited to the competitor receiving a bye.
pub const BYE_SCORE: f64 = 1.0;

/// One slot of a computed round: two competitors paired, or one competitor on a bye.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    Pairing(CompetitorId, CompetitorId),
    Bye(CompetitorId),
}

impl Assignment {
    /// Competitors taking part in this slot.
    pub fn competitors(&self) -> Vec<CompetitorId> {
        match *self {
            Assignment::Pairing(a, b) => vec![a, b],
            Assignment::Bye(a) => vec![a],
        }
    }
}

/// Scores recorded for a finished pairing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub first_score: f64,
    pub second_score: f64,
}

/// What happened in a match slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Pairing {
        first: CompetitorId,
        second: CompetitorId,
        /// None until the result is reported.
        result: Option<GameResult>,
    },
    Bye { competitor: CompetitorId },
}

/// Reporting state of a match. `Reported` is terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    Unreported,
    Reported,
}

/// A stored match: which round it belongs to and its outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub round: u32,
    pub outcome: Outcome,
}

impl MatchRecord {
    /// Record for a computed assignment. Pairings start unreported; byes are reported at once.
    pub fn from_assignment(round: u32, assignment: Assignment) -> Self {
        let outcome = match assignment {
            Assignment::Pairing(first, second) => Outcome::Pairing {
                first,
                second,
                result: None,
            },
            Assignment::Bye(competitor) => Outcome::Bye { competitor },
        };
        Self {
            id: Uuid::new_v4(),
            round,
            outcome,
        }
    }

    pub fn state(&self) -> MatchState {
        match &self.outcome {
            Outcome::Pairing { result: None, .. } => MatchState::Unreported,
            Outcome::Pairing { result: Some(_), .. } | Outcome::Bye { .. } => MatchState::Reported,
        }
    }

    /// Score contributions as (competitor, points). Unreported pairings contribute nothing.
    pub fn score_contributions(&self) -> Vec<(CompetitorId, f64)> {
        match &self.outcome {
            Outcome::Pairing {
                first,
                second,
                result: Some(r),
            } => vec![(*first, r.first_score), (*second, r.second_score)],
            Outcome::Pairing { result: None, .. } => Vec::new(),
            Outcome::Bye { competitor } => vec![(*competitor, BYE_SCORE)],
        }
    }

    /// The two opponents, if this is a pairing.
    pub fn opponents(&self) -> Option<(CompetitorId, CompetitorId)> {
        match &self.outcome {
            Outcome::Pairing { first, second, .. } => Some((*first, *second)),
            Outcome::Bye { .. } => None,
        }
    }

    pub fn involves(&self, id: CompetitorId) -> bool {
        match &self.outcome {
            Outcome::Pairing { first, second, .. } => *first == id || *second == id,
            Outcome::Bye { competitor } => *competitor == id,
        }
    }
}
