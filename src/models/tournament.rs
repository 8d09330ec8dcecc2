//! Tournament: roster, rounds and match history.

use crate::logic::{
    compute_scores, compute_tiebreaks, import_roster, standings, HistoryProvider, RosterProvider,
    RoundSink, ScoreMap, Standing,
};
use crate::models::competitor::{normalize_team, Competitor, CompetitorId};
use crate::models::game::{GameResult, MatchId, MatchRecord, Outcome};
use crate::models::round::{PendingRound, Round};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Competitor name is blank.
    EmptyName,
    /// A competitor with this name already exists (names are unique, case-insensitive).
    DuplicateCompetitorName,
    CompetitorNotFound(CompetitorId),
    MatchNotFound(MatchId),
    /// The match already has a result (byes are reported when created).
    AlreadyReported(MatchId),
    /// Scores must be finite and non-negative.
    InvalidScore,
    /// Roster file could not be read.
    Import(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::EmptyName => write!(f, "Competitor name must not be empty"),
            TournamentError::DuplicateCompetitorName => {
                write!(f, "A competitor with this name already exists")
            }
            TournamentError::CompetitorNotFound(_) => write!(f, "Competitor not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::AlreadyReported(_) => write!(f, "Match result already reported"),
            TournamentError::InvalidScore => {
                write!(f, "Scores must be non-negative numbers")
            }
            TournamentError::Import(msg) => write!(f, "{}", msg),
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Full tournament state: competitors, rounds and every match played so far.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    /// Recognized team labels. Empty means any label is accepted.
    pub teams: Vec<String>,
    pub competitors: Vec<Competitor>,
    pub rounds: Vec<Round>,
    pub matches: Vec<MatchRecord>,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new()
    }
}

impl Tournament {
    /// Create an empty tournament that accepts any team label.
    pub fn new() -> Self {
        Self::with_teams(Vec::new())
    }

    /// Create an empty tournament restricted to the given team labels.
    pub fn with_teams(teams: Vec<String>) -> Self {
        let teams = teams
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            id: Uuid::new_v4(),
            teams,
            competitors: Vec::new(),
            rounds: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn get_competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    /// Add a competitor. Names must be unique (case-insensitive); unknown teams become "no team".
    pub fn add_competitor(
        &mut self,
        name: impl Into<String>,
        team: Option<&str>,
        rating: i32,
    ) -> Result<CompetitorId, TournamentError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        if self.name_taken(name_trimmed) {
            return Err(TournamentError::DuplicateCompetitorName);
        }
        let mut competitor = Competitor::new(name_trimmed, None, rating);
        competitor.team = team.and_then(|t| normalize_team(t, &self.teams));
        let id = competitor.id;
        self.competitors.push(competitor);
        Ok(id)
    }

    /// Add every competitor from a roster CSV. Rows whose name is already taken are skipped.
    /// Returns the number added.
    pub fn import_competitors<R: std::io::Read>(&mut self, reader: R) -> Result<usize, TournamentError> {
        let imported =
            import_roster(reader, &self.teams).map_err(|e| TournamentError::Import(e.to_string()))?;
        let mut added = 0;
        for competitor in imported {
            if self.name_taken(&competitor.name) {
                log::warn!("Skipping imported competitor {:?}: name already taken", competitor.name);
                continue;
            }
            self.competitors.push(competitor);
            added += 1;
        }
        Ok(added)
    }

    /// Exclude a competitor from future rounds. Their results still count.
    pub fn withdraw_competitor(&mut self, id: CompetitorId) -> Result<(), TournamentError> {
        self.competitors
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(TournamentError::CompetitorNotFound(id))?
            .withdraw();
        Ok(())
    }

    /// Record the result of an unreported pairing.
    pub fn report_result(
        &mut self,
        match_id: MatchId,
        first_score: f64,
        second_score: f64,
    ) -> Result<(), TournamentError> {
        if !valid_score(first_score) || !valid_score(second_score) {
            return Err(TournamentError::InvalidScore);
        }
        let record = self
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        match &mut record.outcome {
            Outcome::Pairing { result, .. } if result.is_none() => {
                *result = Some(GameResult {
                    first_score,
                    second_score,
                });
                Ok(())
            }
            Outcome::Pairing { .. } | Outcome::Bye { .. } => {
                Err(TournamentError::AlreadyReported(match_id))
            }
        }
    }

    /// Matches belonging to round `number`.
    pub fn round_matches(&self, number: u32) -> Vec<&MatchRecord> {
        self.matches.iter().filter(|m| m.round == number).collect()
    }

    pub fn scores(&self) -> ScoreMap {
        compute_scores(&self.matches)
    }

    pub fn tiebreaks(&self) -> HashMap<CompetitorId, f64> {
        compute_tiebreaks(&self.matches, &self.scores())
    }

    pub fn standings(&self) -> Vec<Standing> {
        let scores = self.scores();
        let tiebreaks = compute_tiebreaks(&self.matches, &scores);
        standings(&self.competitors, &scores, &tiebreaks)
    }

    /// Drop every competitor, round and match. Keeps the id and team list.
    pub fn reset(&mut self) {
        self.competitors.clear();
        self.rounds.clear();
        self.matches.clear();
    }

    fn name_taken(&self, name: &str) -> bool {
        self.competitors
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name))
    }
}

fn valid_score(score: f64) -> bool {
    score.is_finite() && score >= 0.0
}

impl RosterProvider for Tournament {
    fn competitors(&self) -> Vec<Competitor> {
        self.competitors.clone()
    }
}

impl HistoryProvider for Tournament {
    fn matches(&self) -> Vec<MatchRecord> {
        self.matches.clone()
    }

    fn rounds(&self) -> Vec<Round> {
        self.rounds.clone()
    }
}

impl RoundSink for Tournament {
    fn commit_round(&mut self, pending: PendingRound) -> Round {
        let (round, assignments) = pending.commit();
        self.matches.extend(
            assignments
                .into_iter()
                .map(|a| MatchRecord::from_assignment(round.number, a)),
        );
        self.rounds.push(round.clone());
        round
    }
}
