//! Tournament business logic: scoring, pairing, rounds, standings, roster import.

mod import;
mod limits;
mod pairing;
mod rounds;
mod scores;
mod standings;

pub use import::{import_roster, ImportError};
pub use limits::{
    AbortReason, CancelToken, SearchLimits, CLOCK_CHECK_INTERVAL, DEFAULT_MAX_STEPS,
    DEFAULT_TIME_LIMIT,
};
pub use pairing::{find_pairings, priority_order, PairingError, Pairings, PlayedPairs};
pub use rounds::{start_round, HistoryProvider, RoundError, RosterProvider, RoundSink};
pub use scores::{compute_scores, compute_tiebreaks, score_of, ScoreMap};
pub use standings::{standings, Standing};
