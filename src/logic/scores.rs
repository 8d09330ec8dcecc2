//! Score aggregation and the Buchholz-style tie-break.

use crate::models::{CompetitorId, MatchRecord, Outcome};
use std::collections::{HashMap, HashSet};

/// Cumulative score per competitor. Competitors without matches have no entry.
pub type ScoreMap = HashMap<CompetitorId, f64>;

/// Score for `id`, treating a missing entry as zero.
pub fn score_of(scores: &ScoreMap, id: CompetitorId) -> f64 {
    scores.get(&id).copied().unwrap_or(0.0)
}

/// Sum every recorded result into a per-competitor total.
///
/// Reported pairings credit both players; byes credit [`crate::models::BYE_SCORE`];
/// unreported pairings credit nothing. The result does not depend on match order.
pub fn compute_scores(matches: &[MatchRecord]) -> ScoreMap {
    let mut scores = ScoreMap::new();
    for (id, points) in matches.iter().flat_map(MatchRecord::score_contributions) {
        *scores.entry(id).or_insert(0.0) += points;
    }
    scores
}

/// Sum of each competitor's distinct opponents' scores.
///
/// Every competitor appearing in `matches` gets an entry; one who only had byes gets zero.
pub fn compute_tiebreaks(matches: &[MatchRecord], scores: &ScoreMap) -> HashMap<CompetitorId, f64> {
    let mut opponents: HashMap<CompetitorId, HashSet<CompetitorId>> = HashMap::new();
    for m in matches {
        match &m.outcome {
            Outcome::Pairing { first, second, .. } => {
                opponents.entry(*first).or_default().insert(*second);
                opponents.entry(*second).or_default().insert(*first);
            }
            Outcome::Bye { competitor } => {
                opponents.entry(*competitor).or_default();
            }
        }
    }

    opponents
        .into_iter()
        .map(|(id, opps)| (id, opps.iter().map(|o| score_of(scores, *o)).sum()))
        .collect()
}
