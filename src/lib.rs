//! Swiss tournament pairing web app: library with models and business logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    compute_scores, compute_tiebreaks, find_pairings, import_roster, priority_order, score_of,
    standings, start_round, AbortReason, CancelToken, HistoryProvider, ImportError, PairingError,
    Pairings, PlayedPairs, RosterProvider, RoundError, RoundSink, ScoreMap, SearchLimits, Standing,
};
pub use models::{
    Assignment, Competitor, CompetitorId, GameResult, MatchId, MatchRecord, MatchState, Outcome,
    PendingRound, Round, RoundStatus, Tournament, TournamentError, TournamentId, BYE_SCORE,
    DEFAULT_RATING,
};
pub use store::{
    SearchRegistry, SharedEntry, StartRoundError, StoreError, TournamentEntry, TournamentStore,
};
