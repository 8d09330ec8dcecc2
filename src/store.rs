//! In-memory tournament store shared by request handlers.
//!
//! Each tournament sits behind its own mutex. The outer map lock is only held long enough to
//! look up or insert an entry, so a long pairing search blocks its own tournament and nothing
//! else.

use crate::logic::{start_round, CancelToken, RoundError, SearchLimits};
use crate::models::{MatchRecord, Round, Tournament, TournamentId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, TryLockError};
use std::time::{Duration, Instant};

/// Tournament data + last activity time (for auto-cleanup).
#[derive(Debug)]
pub struct TournamentEntry {
    pub tournament: Tournament,
    pub last_activity: Instant,
}

impl TournamentEntry {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            last_activity: Instant::now(),
        }
    }

    /// Refresh `last_activity` and hand out the tournament.
    pub fn touch(&mut self) -> &mut Tournament {
        self.last_activity = Instant::now();
        &mut self.tournament
    }
}

pub type SharedEntry = Arc<Mutex<TournamentEntry>>;

/// Errors from the store itself, as opposed to tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// A lock was poisoned by a panicking holder.
    Lock,
    NotFound(TournamentId),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Lock => write!(f, "lock error"),
            StoreError::NotFound(_) => write!(f, "No tournament"),
        }
    }
}

/// Why a round start did not produce a round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StartRoundError {
    Store(StoreError),
    Round(RoundError),
}

impl From<StoreError> for StartRoundError {
    fn from(e: StoreError) -> Self {
        StartRoundError::Store(e)
    }
}

impl std::fmt::Display for StartRoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartRoundError::Store(e) => write!(f, "{}", e),
            StartRoundError::Round(e) => write!(f, "{}", e),
        }
    }
}

/// Tournaments by id.
#[derive(Debug, Default)]
pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, SharedEntry>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new tournament and return its entry.
    pub fn insert(&self, tournament: Tournament) -> Result<SharedEntry, StoreError> {
        let id = tournament.id;
        let entry = Arc::new(Mutex::new(TournamentEntry::new(tournament)));
        let mut g = self.tournaments.write().map_err(|_| StoreError::Lock)?;
        g.insert(id, entry.clone());
        Ok(entry)
    }

    /// Look up an entry. Only the map's read lock is taken, and only for the lookup.
    pub fn get(&self, id: TournamentId) -> Result<SharedEntry, StoreError> {
        let g = self.tournaments.read().map_err(|_| StoreError::Lock)?;
        g.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Run `f` on one tournament while holding that tournament's lock. Counts as activity.
    pub fn with_tournament<T>(
        &self,
        id: TournamentId,
        f: impl FnOnce(&mut Tournament) -> T,
    ) -> Result<T, StoreError> {
        let entry = self.get(id)?;
        let mut guard = entry.lock().map_err(|_| StoreError::Lock)?;
        Ok(f(guard.touch()))
    }

    /// Pair and commit the next round of one tournament.
    ///
    /// The tournament's lock is held for the whole read-search-commit sequence. The search's
    /// cancel token is registered in `searches` only once that lock is held, and is
    /// unregistered when the search ends.
    pub fn start_round(
        &self,
        id: TournamentId,
        searches: &SearchRegistry,
        limits: &SearchLimits,
    ) -> Result<(Round, Vec<MatchRecord>), StartRoundError> {
        let entry = self.get(id)?;
        let mut guard = entry.lock().map_err(|_| StoreError::Lock)?;
        let t = guard.touch();

        searches.register(id, limits.cancel.clone())?;
        let outcome = start_round(t, limits);
        searches.finish(id, &limits.cancel)?;

        let round = outcome.map_err(StartRoundError::Round)?;
        let matches = t.round_matches(round.number).into_iter().cloned().collect();
        Ok((round, matches))
    }

    /// Remove tournaments idle for at least `timeout`. Entries locked right now are in use
    /// and are kept. Returns how many were removed.
    pub fn remove_inactive(&self, timeout: Duration) -> Result<usize, StoreError> {
        let mut g = self.tournaments.write().map_err(|_| StoreError::Lock)?;
        let before = g.len();
        g.retain(|_, entry| match entry.try_lock() {
            Ok(e) => e.last_activity.elapsed() < timeout,
            Err(TryLockError::WouldBlock) => true,
            Err(TryLockError::Poisoned(_)) => false,
        });
        Ok(before - g.len())
    }

    pub fn len(&self) -> usize {
        self.tournaments.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cancel tokens of the pairing searches in progress, one per tournament.
#[derive(Debug, Default)]
pub struct SearchRegistry {
    searches: Mutex<HashMap<TournamentId, CancelToken>>,
}

impl SearchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: TournamentId, cancel: CancelToken) -> Result<(), StoreError> {
        let mut g = self.searches.lock().map_err(|_| StoreError::Lock)?;
        g.insert(id, cancel);
        Ok(())
    }

    /// Unregister `cancel`. A different token registered since is left alone.
    pub fn finish(&self, id: TournamentId, cancel: &CancelToken) -> Result<(), StoreError> {
        let mut g = self.searches.lock().map_err(|_| StoreError::Lock)?;
        if g.get(&id).is_some_and(|current| current.same_flag(cancel)) {
            g.remove(&id);
        }
        Ok(())
    }

    /// Cancel the search running for `id`. Returns false when there is none.
    pub fn cancel(&self, id: TournamentId) -> Result<bool, StoreError> {
        let g = self.searches.lock().map_err(|_| StoreError::Lock)?;
        match g.get(&id) {
            Some(cancel) => {
                cancel.cancel();
                log::info!("Cancelled pairing search for tournament {}", id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
