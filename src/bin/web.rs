//! Single binary web server: JSON API for running a Swiss tournament.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, PAIRING_MAX_STEPS (0 = unbounded), PAIRING_TIMEOUT_MS (0 = none).

use actix_web::{
    get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use swiss_pairing_web::logic::{DEFAULT_MAX_STEPS, DEFAULT_TIME_LIMIT};
use swiss_pairing_web::models::parse_rating;
use swiss_pairing_web::{
    CompetitorId, MatchId, MatchRecord, PairingError, Round, RoundError, SearchLimits,
    SearchRegistry, StartRoundError, StoreError, Tournament, TournamentId, TournamentStore,
    DEFAULT_RATING,
};

/// Server configuration read from the environment at startup.
#[derive(Clone, Debug)]
struct ServerConfig {
    host: String,
    port: u16,
    max_steps: Option<u64>,
    time_limit: Option<Duration>,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
        let port = env_parse("PORT").unwrap_or_else(default_port);
        let max_steps = match env_parse::<u64>("PAIRING_MAX_STEPS") {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(DEFAULT_MAX_STEPS),
        };
        let time_limit = match env_parse::<u64>("PAIRING_TIMEOUT_MS") {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => Some(DEFAULT_TIME_LIMIT),
        };
        Self {
            host,
            port,
            max_steps,
            time_limit,
        }
    }

    /// Fresh limits (with a fresh cancel token) for one search.
    fn search_limits(&self) -> SearchLimits {
        SearchLimits::new(self.max_steps, self.time_limit)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Shared server state: tournaments by id, plus cancel tokens of searches in progress.
struct AppData {
    store: TournamentStore,
    searches: SearchRegistry,
    config: ServerConfig,
}

type AppState = Data<AppData>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize, Default)]
struct CreateTournamentBody {
    #[serde(default)]
    teams: Vec<String>,
}

#[derive(Deserialize)]
struct AddCompetitorBody {
    name: String,
    #[serde(default)]
    team: Option<String>,
    /// Number or string; anything unusable falls back to the default rating.
    #[serde(default)]
    rating: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ReportResultBody {
    first_score: f64,
    second_score: f64,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and competitor id.
#[derive(Deserialize)]
struct TournamentCompetitorPath {
    id: TournamentId,
    competitor_id: CompetitorId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

/// A round with its matches, for API responses.
#[derive(Serialize)]
struct RoundView<'a> {
    #[serde(flatten)]
    round: &'a Round,
    matches: Vec<&'a MatchRecord>,
}

fn round_views(t: &Tournament) -> Vec<RoundView<'_>> {
    t.rounds
        .iter()
        .map(|round| RoundView {
            round,
            matches: t.round_matches(round.number),
        })
        .collect()
}

fn rating_from_json(value: Option<&serde_json::Value>) -> i32 {
    match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|r| i32::try_from(r).ok())
            .unwrap_or(DEFAULT_RATING),
        Some(serde_json::Value::String(s)) => parse_rating(Some(s.as_str())),
        _ => DEFAULT_RATING,
    }
}

fn error_json(msg: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": msg.to_string() })
}

fn store_error(e: StoreError) -> HttpResponse {
    match e {
        StoreError::Lock => HttpResponse::InternalServerError().body("lock error"),
        StoreError::NotFound(_) => HttpResponse::NotFound().json(error_json(e)),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-pairing-web",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Option<Json<CreateTournamentBody>>) -> HttpResponse {
    let teams = body.map(|b| b.into_inner().teams).unwrap_or_default();
    let tournament = Tournament::with_teams(teams);
    let id = tournament.id;
    let response = HttpResponse::Ok().json(&tournament);
    if let Err(e) = state.store.insert(tournament) {
        return store_error(e);
    }
    log::info!("Created tournament {}", id);
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    state
        .store
        .with_tournament(path.id, |t| HttpResponse::Ok().json(&*t))
        .unwrap_or_else(store_error)
}

/// Add one competitor. Unknown teams become "no team"; a bad rating becomes the default.
#[post("/api/tournaments/{id}/competitors")]
async fn api_add_competitor(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddCompetitorBody>,
) -> HttpResponse {
    let rating = rating_from_json(body.rating.as_ref());
    state
        .store
        .with_tournament(path.id, |t| {
            match t.add_competitor(body.name.as_str(), body.team.as_deref(), rating) {
                Ok(_) => HttpResponse::Ok().json(&*t),
                Err(e) => HttpResponse::BadRequest().json(error_json(e)),
            }
        })
        .unwrap_or_else(store_error)
}

/// Bulk import from a CSV body with a `name,team,rating` header.
#[post("/api/tournaments/{id}/competitors/import")]
async fn api_import_competitors(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    state
        .store
        .with_tournament(path.id, |t| match t.import_competitors(body.as_bytes()) {
            Ok(added) => HttpResponse::Ok().json(serde_json::json!({ "added": added, "tournament": &*t })),
            Err(e) => HttpResponse::BadRequest().json(error_json(e)),
        })
        .unwrap_or_else(store_error)
}

/// Withdraw a competitor from future rounds.
#[post("/api/tournaments/{id}/competitors/{competitor_id}/withdraw")]
async fn api_withdraw_competitor(state: AppState, path: Path<TournamentCompetitorPath>) -> HttpResponse {
    state
        .store
        .with_tournament(path.id, |t| match t.withdraw_competitor(path.competitor_id) {
            Ok(()) => HttpResponse::Ok().json(&*t),
            Err(e) => HttpResponse::BadRequest().json(error_json(e)),
        })
        .unwrap_or_else(store_error)
}

/// Pair and commit the next round.
///
/// Runs on the blocking pool while holding this tournament's lock, so round starts for the
/// same tournament never interleave. Other tournaments are unaffected.
#[post("/api/tournaments/{id}/rounds")]
async fn api_start_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    let limits = state.config.search_limits();
    let shared = state.clone();
    let outcome = web::block(move || shared.store.start_round(id, &shared.searches, &limits)).await;

    match outcome {
        Ok(Ok((round, matches))) => HttpResponse::Ok().json(RoundView {
            round: &round,
            matches: matches.iter().collect(),
        }),
        Ok(Err(StartRoundError::Store(e))) => store_error(e),
        Ok(Err(StartRoundError::Round(RoundError::Pairing(e)))) => match e {
            PairingError::Infeasible => HttpResponse::Conflict().json(error_json(e)),
            PairingError::Aborted { .. } => HttpResponse::ServiceUnavailable().json(error_json(e)),
            PairingError::DuplicateCompetitor(_) => HttpResponse::InternalServerError().json(error_json(e)),
        },
        Err(_) => HttpResponse::InternalServerError().body("blocking task failed"),
    }
}

/// Abort the pairing search currently running for this tournament, if any.
#[post("/api/tournaments/{id}/rounds/cancel")]
async fn api_cancel_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.searches.cancel(path.id) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "cancelled": true })),
        Ok(false) => HttpResponse::NotFound().json(error_json("No pairing search in progress")),
        Err(e) => store_error(e),
    }
}

/// All rounds with their matches.
#[get("/api/tournaments/{id}/rounds")]
async fn api_list_rounds(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    state
        .store
        .with_tournament(path.id, |t| HttpResponse::Ok().json(round_views(t)))
        .unwrap_or_else(store_error)
}

/// Report the result of one pairing.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_report_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ReportResultBody>,
) -> HttpResponse {
    state
        .store
        .with_tournament(path.id, |t| {
            match t.report_result(path.match_id, body.first_score, body.second_score) {
                Ok(()) => HttpResponse::Ok().json(round_views(t)),
                Err(e) => HttpResponse::BadRequest().json(error_json(e)),
            }
        })
        .unwrap_or_else(store_error)
}

/// Standings ordered by score, tie-break, rating.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    state
        .store
        .with_tournament(path.id, |t| HttpResponse::Ok().json(t.standings()))
        .unwrap_or_else(store_error)
}

/// Remove every competitor, round and match.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    state
        .store
        .with_tournament(path.id, |t| {
            t.reset();
            log::info!("Reset tournament {}", path.id);
            HttpResponse::Ok().json(&*t)
        })
        .unwrap_or_else(store_error)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!(
        "Starting server at http://{}:{} (pairing step limit {:?}, time limit {:?})",
        config.host,
        config.port,
        config.max_steps,
        config.time_limit
    );
    let bind = (config.host.clone(), config.port);

    let state = Data::new(AppData {
        store: TournamentStore::new(),
        searches: SearchRegistry::new(),
        config,
    });

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            match state_cleanup.store.remove_inactive(INACTIVITY_TIMEOUT) {
                Ok(0) => {}
                Ok(removed) => {
                    log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed)
                }
                Err(e) => log::warn!("Tournament cleanup skipped: {}", e),
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_competitor)
            .service(api_import_competitors)
            .service(api_withdraw_competitor)
            .service(api_start_round)
            .service(api_cancel_round)
            .service(api_list_rounds)
            .service(api_report_result)
            .service(api_standings)
            .service(api_reset)
    })
    .bind(bind)?
    .run()
    .await
}
