//! Data structures for the Swiss tournament: competitors, matches, rounds, tournament state.

mod competitor;
mod game;
mod round;
mod tournament;

pub use competitor::{normalize_team, parse_rating, Competitor, CompetitorId, DEFAULT_RATING};
pub use game::{Assignment, GameResult, MatchId, MatchRecord, MatchState, Outcome, BYE_SCORE};
pub use round::{PendingRound, Round, RoundId, RoundStatus};
pub use tournament::{Tournament, TournamentError, TournamentId};
