//! Integration tests for score aggregation and tie-breaks.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use swiss_pairing_web::{
    compute_scores, compute_tiebreaks, score_of, Assignment, Competitor, CompetitorId, GameResult,
    MatchRecord, MatchState, Outcome, BYE_SCORE,
};

fn ids(n: usize) -> Vec<CompetitorId> {
    (0..n)
        .map(|i| Competitor::new(format!("P{i}"), None, 1500).id)
        .collect()
}

fn game(round: u32, first: CompetitorId, second: CompetitorId, s1: f64, s2: f64) -> MatchRecord {
    let mut m = MatchRecord::from_assignment(round, Assignment::Pairing(first, second));
    m.outcome = Outcome::Pairing {
        first,
        second,
        result: Some(GameResult {
            first_score: s1,
            second_score: s2,
        }),
    };
    m
}

fn bye(round: u32, id: CompetitorId) -> MatchRecord {
    MatchRecord::from_assignment(round, Assignment::Bye(id))
}

fn history(p: &[CompetitorId]) -> Vec<MatchRecord> {
    vec![
        game(1, p[0], p[1], 1.0, 0.0),
        game(1, p[2], p[3], 0.5, 0.5),
        bye(1, p[4]),
        game(2, p[0], p[2], 0.0, 1.0),
        game(2, p[4], p[1], 1.0, 0.0),
        bye(2, p[3]),
        game(3, p[2], p[4], 0.5, 0.5),
        game(3, p[0], p[3], 1.0, 0.0),
        bye(3, p[1]),
    ]
}

#[test]
fn scores_add_results_and_byes() {
    let p = ids(5);
    let scores = compute_scores(&history(&p));
    assert_eq!(score_of(&scores, p[0]), 2.0);
    assert_eq!(score_of(&scores, p[1]), 1.0);
    assert_eq!(score_of(&scores, p[2]), 2.0);
    assert_eq!(score_of(&scores, p[3]), 1.5);
    assert_eq!(score_of(&scores, p[4]), 2.5);
}

#[test]
fn bye_is_created_reported_with_fixed_score() {
    let p = ids(1);
    let m = bye(1, p[0]);
    assert_eq!(m.state(), MatchState::Reported);
    assert_eq!(compute_scores(&[m])[&p[0]], BYE_SCORE);
}

#[test]
fn unreported_pairing_scores_nothing() {
    let p = ids(2);
    let m = MatchRecord::from_assignment(1, Assignment::Pairing(p[0], p[1]));
    assert_eq!(m.state(), MatchState::Unreported);
    let scores = compute_scores(&[m]);
    assert!(scores.is_empty());
    assert_eq!(score_of(&scores, p[0]), 0.0);
}

#[test]
fn scores_do_not_depend_on_match_order() {
    let p = ids(5);
    let matches = history(&p);
    let expected = compute_scores(&matches);
    assert_eq!(compute_scores(&matches), expected);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let mut shuffled = matches.clone();
        shuffled.shuffle(&mut rng);
        assert_eq!(compute_scores(&shuffled), expected);
    }
}

#[test]
fn tiebreak_sums_distinct_opponents() {
    let p = ids(3);
    let matches = vec![
        game(1, p[0], p[1], 1.0, 0.0),
        game(2, p[1], p[0], 1.0, 0.0),
        game(3, p[0], p[2], 0.0, 1.0),
    ];
    let scores = compute_scores(&matches);
    let tb = compute_tiebreaks(&matches, &scores);
    // p0 met p1 twice: p1 counted once.
    assert_eq!(tb[&p[0]], scores[&p[1]] + scores[&p[2]]);
    assert_eq!(tb[&p[1]], scores[&p[0]]);
    assert_eq!(tb[&p[2]], scores[&p[0]]);
}

#[test]
fn competitor_without_opponents_has_zero_tiebreak() {
    let p = ids(4);
    let matches = vec![game(1, p[0], p[1], 1.0, 0.0), bye(1, p[2])];
    let scores = compute_scores(&matches);
    let tb = compute_tiebreaks(&matches, &scores);
    assert_eq!(tb[&p[2]], 0.0);
    assert!(!tb.contains_key(&p[3]));
    assert_eq!(score_of(&tb, p[3]), 0.0);
}
