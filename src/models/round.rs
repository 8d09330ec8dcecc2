//! Round records and their Pending -> Committed lifecycle.

use crate::models::game::Assignment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a round.
pub type RoundId = Uuid;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// Pairings computed but not yet stored.
    Pending,
    /// Stored; its matches are part of the history.
    Committed,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    /// 1-based round number.
    pub number: u32,
    pub started_at: DateTime<Utc>,
    pub status: RoundStatus,
}

/// A round whose pairings have been found but which nothing has stored yet.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingRound {
    pub round: Round,
    pub assignments: Vec<Assignment>,
}

impl PendingRound {
    pub fn new(number: u32, assignments: Vec<Assignment>) -> Self {
        Self {
            round: Round {
                id: Uuid::new_v4(),
                number,
                started_at: Utc::now(),
                status: RoundStatus::Pending,
            },
            assignments,
        }
    }

    /// Mark the round as stored. Returns the committed round and its assignments.
    pub fn commit(self) -> (Round, Vec<Assignment>) {
        let mut round = self.round;
        round.status = RoundStatus::Committed;
        (round, self.assignments)
    }
}
