use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use actix_web::cookie::Key;
use actix_files::Files;
use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::division::{allocate, drift, AllocationResult, Participant, ResourceDrift, ResourcePool};
use crate::form::{export_results_to_csv, results_to_csv_string, DivisionRequest, PirateEdit, TreasureForm};
use crate::session::{CrewSession, SessionError};

pub const SESSION_COOKIE: &str = "treasure-split";
const SESSION_ID_KEY: &str = "crew_id";

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

struct StoredCrew {
    crew: CrewSession,
    last_active: Instant,
}

// Crew sessions live in memory, keyed by the id in the browser's cookie.
// Only the id travels in the cookie, so crew size is not bounded by it.
pub struct AppState {
    pub config: Config,
    sessions: Mutex<HashMap<String, StoredCrew>>,
    session_ttl: Duration,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_ttl(config, DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(config: Config, ttl: Duration) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
            session_ttl: ttl,
        }
    }

    /// Runs `f` on the crew session with this id, creating an empty one on
    /// first use. Sessions idle for longer than the TTL are dropped.
    fn with_crew<T>(&self, id: &str, f: impl FnOnce(&mut CrewSession) -> T) -> Result<T> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("Session store is unavailable"))?;

        let ttl = self.session_ttl;
        let before = sessions.len();
        sessions.retain(|_, stored| stored.last_active.elapsed() < ttl);
        if sessions.len() < before {
            debug!(expired = before - sessions.len(), "idle crew sessions dropped");
        }

        let stored = sessions.entry(id.to_string()).or_insert_with(|| StoredCrew {
            crew: CrewSession::default(),
            last_active: Instant::now(),
        });
        stored.last_active = Instant::now();
        Ok(f(&mut stored.crew))
    }
}

/// What the page needs to redraw itself
#[derive(Serialize)]
pub struct SessionView<'a> {
    treasure: &'a ResourcePool,
    crew: &'a [Participant],
    results: &'a [AllocationResult],
}

impl<'a> From<&'a CrewSession> for SessionView<'a> {
    fn from(s: &'a CrewSession) -> Self {
        Self {
            treasure: &s.treasure,
            crew: &s.crew,
            results: &s.results,
        }
    }
}

#[derive(Serialize)]
pub struct DivisionResponse<'a> {
    results: &'a [AllocationResult],
    drift: ResourceDrift,
}

/// The browser's crew session id, issued on its first request
fn crew_id(session: &Session) -> Result<String> {
    if let Some(id) = session.get::<String>(SESSION_ID_KEY)? {
        return Ok(id);
    }
    let id = Uuid::new_v4().to_string();
    session.insert(SESSION_ID_KEY, &id)?;
    debug!(id = %id, "crew session opened");
    Ok(id)
}

fn not_found(err: SessionError) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({"success": false, "error": err.to_string()}))
}

// Session snapshot endpoint
async fn get_session(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let id = crew_id(&session)?;
    state.with_crew(&id, |crew| HttpResponse::Ok().json(SessionView::from(&*crew)))
}

// Treasure vault edit endpoint: only the inputs present are replaced
async fn update_treasure(
    form: web::Json<TreasureForm>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = crew_id(&session)?;
    state.with_crew(&id, |crew| {
        if let Some(ref gems) = form.gems {
            crew.set_gems(gems);
        }
        if let Some(ref gold) = form.gold {
            crew.set_gold(gold);
        }
        if let Some(ref diamonds) = form.diamonds {
            crew.set_diamonds(diamonds);
        }
        HttpResponse::Ok().json(SessionView::from(&*crew))
    })
}

// Crew append endpoint
async fn add_pirate(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let id = crew_id(&session)?;
    state.with_crew(&id, |crew| {
        crew.add_pirate();
        HttpResponse::Created().json(SessionView::from(&*crew))
    })
}

// Crew card edit endpoint
async fn edit_pirate(
    index: web::Path<usize>,
    edit: web::Json<PirateEdit>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let index = index.into_inner();
    let id = crew_id(&session)?;
    state.with_crew(&id, |crew| {
        if let Some(ref name) = edit.name {
            if let Err(e) = crew.rename_pirate(index, name) {
                return not_found(e);
            }
        }
        if let Some(ref priority) = edit.priority {
            if let Err(e) = crew.set_priority(index, priority) {
                return not_found(e);
            }
        }
        HttpResponse::Ok().json(SessionView::from(&*crew))
    })
}

// Crew removal endpoint
async fn remove_pirate(
    index: web::Path<usize>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = crew_id(&session)?;
    state.with_crew(&id, |crew| match crew.remove_pirate(index.into_inner()) {
        Ok(_) => HttpResponse::Ok().json(SessionView::from(&*crew)),
        Err(e) => not_found(e),
    })
}

// Division endpoint: divides the session's vault across its crew
async fn divide_treasure(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = crew_id(&session)?;

    // Lets the loading pulse play; the division itself is instant.
    // The crew is read after the pause so edits made meanwhile count.
    if state.config.division_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.config.division_delay_ms)).await;
    }

    let (response, results) = state.with_crew(&id, |crew| {
        crew.divide();
        let d = drift(&crew.treasure, &crew.results);
        info!(
            crew = crew.crew.len(),
            shares = crew.results.len(),
            gems_drift = d.gems,
            gold_drift = d.gold,
            diamonds_drift = d.diamonds,
            "treasure divided"
        );
        let response = HttpResponse::Ok().json(DivisionResponse {
            results: &crew.results,
            drift: d,
        });
        (response, crew.results.clone())
    })?;

    if let Some(ref path) = state.config.results_csv {
        if let Err(e) = export_results_to_csv(path, &results) {
            warn!(path = %path.display(), error = %e, "failed to mirror distribution to CSV");
        }
    }

    Ok(response)
}

// Stateless division endpoint
async fn allocate_once(req: web::Json<DivisionRequest>) -> Result<HttpResponse> {
    let (pool, crew) = req.sanitize();
    let results = allocate(&pool, &crew);
    Ok(HttpResponse::Ok().json(DivisionResponse {
        results: &results,
        drift: drift(&pool, &results),
    }))
}

// Last distribution as a CSV download
async fn results_csv(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let id = crew_id(&session)?;
    let csv = state
        .with_crew(&id, |crew| results_to_csv_string(&crew.results).map_err(|e| e.to_string()))?
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to render CSV: {}", e)))?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(("Content-Disposition", "attachment; filename=\"distribution.csv\""))
        .body(csv))
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_secure(false)
        .build()
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/session", web::get().to(get_session))
        .route("/api/treasure", web::put().to(update_treasure))
        .route("/api/crew", web::post().to(add_pirate))
        .service(
            web::resource("/api/crew/{index}")
                .route(web::put().to(edit_pirate))
                .route(web::delete().to(remove_pirate)),
        )
        .route("/api/divide", web::post().to(divide_treasure))
        .route("/api/allocate", web::post().to(allocate_once))
        .route("/api/results.csv", web::get().to(results_csv));
}

pub async fn start_server(config: Config) -> std::io::Result<()> {
    let bind = (config.bind_address.clone(), config.port);
    // Sessions are ephemeral: a restart invalidates every cookie
    let key = Key::generate();
    let app_state = web::Data::new(AppState::new(config));

    info!(address = %bind.0, port = bind.1, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(key.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .configure(routes)
    })
    .bind(bind)?
    .run()
    .await
}
