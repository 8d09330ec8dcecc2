//! Starting a round: snapshot the roster and history, pair, and commit.

use crate::logic::limits::SearchLimits;
use crate::logic::pairing::{find_pairings, PairingError, PlayedPairs};
use crate::logic::scores::compute_scores;
use crate::models::{Competitor, MatchRecord, PendingRound, Round};

/// Source of the roster.
pub trait RosterProvider {
    fn competitors(&self) -> Vec<Competitor>;
}

/// Source of every recorded round and match.
pub trait HistoryProvider {
    fn matches(&self) -> Vec<MatchRecord>;
    fn rounds(&self) -> Vec<Round>;
}

/// Stores a computed round: one round record plus one record per assignment.
pub trait RoundSink {
    fn commit_round(&mut self, pending: PendingRound) -> Round;
}

/// Errors that can occur when starting a round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoundError {
    Pairing(PairingError),
}

impl std::fmt::Display for RoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundError::Pairing(e) => write!(f, "{}", e),
        }
    }
}

impl From<PairingError> for RoundError {
    fn from(e: PairingError) -> Self {
        RoundError::Pairing(e)
    }
}

/// Pair the active roster and commit the next round.
///
/// Taking `store` by `&mut` makes the read-search-write sequence one critical section:
/// callers sharing a store must hold its lock for the whole call. On any error
/// nothing is written.
pub fn start_round<S>(store: &mut S, limits: &SearchLimits) -> Result<Round, RoundError>
where
    S: RosterProvider + HistoryProvider + RoundSink,
{
    let roster: Vec<Competitor> = store.competitors().into_iter().filter(|c| c.active).collect();
    let history = store.matches();
    let scores = compute_scores(&history);
    let played = PlayedPairs::from_matches(&history);
    let number = store.rounds().iter().map(|r| r.number).max().unwrap_or(0) + 1;

    let pairings = match find_pairings(&roster, &scores, &played, limits) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Round {} not started: {}", number, e);
            return Err(e.into());
        }
    };

    let round = store.commit_round(PendingRound::new(number, pairings.assignments));
    log::info!(
        "Round {} committed: {} competitors paired",
        round.number,
        roster.len()
    );
    Ok(round)
}
