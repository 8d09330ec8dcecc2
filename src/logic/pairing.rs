//! Round pairing: backtracking search for a full pairing of the roster.
//!
//! The roster is ordered by (score desc, rating desc), with ties kept in roster order.
//! The highest-priority competitor is paired with the first compatible competitor after it
//! whose remaining pool can still be completed. If it can't be paired and the pool is odd,
//! it takes the bye instead. Sub-pools are memoized by their ordered membership. The first
//! feasible pairing found is returned. It is not a globally optimal matching.

use crate::logic::limits::{AbortReason, Budget, SearchLimits};
use crate::logic::scores::{score_of, ScoreMap};
use crate::models::{Assignment, Competitor, CompetitorId, MatchRecord};
use std::collections::{HashMap, HashSet};

/// Unordered pairs of competitors who have already been paired against each other.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PlayedPairs {
    pairs: HashSet<(CompetitorId, CompetitorId)>,
}

impl PlayedPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pairing in the history counts, reported or not. Byes never do.
    pub fn from_matches(matches: &[MatchRecord]) -> Self {
        matches.iter().filter_map(MatchRecord::opponents).collect()
    }

    pub fn insert(&mut self, a: CompetitorId, b: CompetitorId) {
        self.pairs.insert(Self::key(a, b));
    }

    pub fn contains(&self, a: CompetitorId, b: CompetitorId) -> bool {
        self.pairs.contains(&Self::key(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn key(a: CompetitorId, b: CompetitorId) -> (CompetitorId, CompetitorId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl FromIterator<(CompetitorId, CompetitorId)> for PlayedPairs {
    fn from_iter<I: IntoIterator<Item = (CompetitorId, CompetitorId)>>(iter: I) -> Self {
        let mut played = PlayedPairs::new();
        for (a, b) in iter {
            played.insert(a, b);
        }
        played
    }
}

/// A feasible pairing for one round: pairs in priority order, plus at most one bye.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pairings {
    pub assignments: Vec<Assignment>,
}

impl Pairings {
    pub fn pairs(&self) -> impl Iterator<Item = (CompetitorId, CompetitorId)> + '_ {
        self.assignments.iter().filter_map(|a| match *a {
            Assignment::Pairing(x, y) => Some((x, y)),
            Assignment::Bye(_) => None,
        })
    }

    pub fn bye(&self) -> Option<CompetitorId> {
        self.assignments.iter().find_map(|a| match *a {
            Assignment::Bye(x) => Some(x),
            Assignment::Pairing(..) => None,
        })
    }
}

/// Why no pairing was produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PairingError {
    /// Every branch was searched: no valid pairing exists.
    Infeasible,
    /// The search was cut off before it could finish; a retry with larger limits may succeed.
    Aborted { reason: AbortReason, steps: u64 },
    /// The roster lists the same competitor twice.
    DuplicateCompetitor(CompetitorId),
}

impl std::fmt::Display for PairingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingError::Infeasible => write!(
                f,
                "Unable to find valid pairings without team clashes or repeat matches"
            ),
            PairingError::Aborted { reason, steps } => {
                write!(f, "Pairing search aborted after {} steps ({})", steps, reason)
            }
            PairingError::DuplicateCompetitor(id) => {
                write!(f, "Competitor {} appears more than once in the roster", id)
            }
        }
    }
}

/// Roster sorted by pairing priority: score desc, then rating desc, then roster order.
pub fn priority_order<'a>(roster: &'a [Competitor], scores: &ScoreMap) -> Vec<&'a Competitor> {
    let mut ordered: Vec<&Competitor> = roster.iter().collect();
    ordered.sort_by(|a, b| {
        score_of(scores, b.id)
            .total_cmp(&score_of(scores, a.id))
            .then_with(|| b.rating.cmp(&a.rating))
    });
    ordered
}

/// Find pairings for the whole `roster`.
///
/// `roster` should already be filtered to the competitors taking part in the round.
/// The inputs are a read-only snapshot; nothing is written.
pub fn find_pairings(
    roster: &[Competitor],
    scores: &ScoreMap,
    played: &PlayedPairs,
    limits: &SearchLimits,
) -> Result<Pairings, PairingError> {
    let mut seen = HashSet::with_capacity(roster.len());
    for c in roster {
        if !seen.insert(c.id) {
            return Err(PairingError::DuplicateCompetitor(c.id));
        }
    }

    let order = priority_order(roster, scores);
    let mut search = Search {
        order: &order,
        played,
        memo: HashMap::new(),
        budget: limits.start(),
    };
    let pool: Vec<usize> = (0..order.len()).collect();
    let outcome = search.solve(&pool);

    log::debug!(
        "pairing search over {} competitors ({} played pairs): {} steps, {} memoized pools, {:?}",
        order.len(),
        played.len(),
        search.budget.steps(),
        search.memo.len(),
        search.budget.elapsed()
    );

    match outcome {
        Ok(Some(slots)) => Ok(Pairings {
            assignments: slots
                .into_iter()
                .map(|slot| match slot {
                    Slot::Pair(a, b) => Assignment::Pairing(order[a].id, order[b].id),
                    Slot::Bye(a) => Assignment::Bye(order[a].id),
                })
                .collect(),
        }),
        Ok(None) => Err(PairingError::Infeasible),
        Err(reason) => Err(PairingError::Aborted {
            reason,
            steps: search.budget.steps(),
        }),
    }
}

/// Assignment by position in the priority order.
#[derive(Clone, Copy, Debug)]
enum Slot {
    Pair(usize, usize),
    Bye(usize),
}

/// `None` = proven infeasible.
type SubResult = Option<Vec<Slot>>;

struct Search<'a> {
    order: &'a [&'a Competitor],
    played: &'a PlayedPairs,
    /// Keyed by the remaining pool; pools are always subsequences of the priority order.
    memo: HashMap<Vec<usize>, SubResult>,
    budget: Budget<'a>,
}

impl Search<'_> {
    fn compatible(&self, a: usize, b: usize) -> bool {
        let (x, y) = (self.order[a], self.order[b]);
        !x.shares_team_with(y) && !self.played.contains(x.id, y.id)
    }

    fn solve(&mut self, pool: &[usize]) -> Result<SubResult, AbortReason> {
        self.budget.step()?;

        match pool {
            [] => return Ok(Some(Vec::new())),
            [only] => return Ok(Some(vec![Slot::Bye(*only)])),
            _ => {}
        }
        if let Some(cached) = self.memo.get(pool) {
            return Ok(cached.clone());
        }

        let p1 = pool[0];
        let mut found = None;
        for (i, &p2) in pool.iter().enumerate().skip(1) {
            if !self.compatible(p1, p2) {
                continue;
            }
            let rest: Vec<usize> = pool[1..i].iter().chain(&pool[i + 1..]).copied().collect();
            if let Some(sub) = self.solve(&rest)? {
                found = Some(prepend(Slot::Pair(p1, p2), sub));
                break;
            }
        }

        if found.is_none() && pool.len() % 2 == 1 {
            if let Some(sub) = self.solve(&pool[1..])? {
                found = Some(prepend(Slot::Bye(p1), sub));
            }
        }

        self.memo.insert(pool.to_vec(), found.clone());
        Ok(found)
    }
}

fn prepend(head: Slot, tail: Vec<Slot>) -> Vec<Slot> {
    let mut out = Vec::with_capacity(tail.len() + 1);
    out.push(head);
    out.extend(tail);
    out
}
