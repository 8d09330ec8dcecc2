//! Standings table: score, then tie-break, then rating.

use crate::logic::scores::{score_of, ScoreMap};
use crate::models::{Competitor, CompetitorId};
use serde::Serialize;
use std::collections::HashMap;

/// One row of the standings table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based position.
    pub rank: usize,
    pub competitor_id: CompetitorId,
    pub name: String,
    pub team: Option<String>,
    pub rating: i32,
    pub score: f64,
    pub tiebreak: f64,
    pub active: bool,
}

/// Rank every competitor by (score desc, tiebreak desc, rating desc). Full ties keep roster order.
pub fn standings(
    competitors: &[Competitor],
    scores: &ScoreMap,
    tiebreaks: &HashMap<CompetitorId, f64>,
) -> Vec<Standing> {
    let mut rows: Vec<Standing> = competitors
        .iter()
        .map(|c| Standing {
            rank: 0,
            competitor_id: c.id,
            name: c.name.clone(),
            team: c.team.clone(),
            rating: c.rating,
            score: score_of(scores, c.id),
            tiebreak: score_of(tiebreaks, c.id),
            active: c.active,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.tiebreak.total_cmp(&a.tiebreak))
            .then_with(|| b.rating.cmp(&a.rating))
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}
