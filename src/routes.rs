use actix_web::{web, HttpResponse, Responder};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::commands::{run_command, CommandContext};
use crate::domain::solver::Solver;
use crate::models::CommandRequest;
use crate::session::SessionRegistry;

/// Shared by all workers.
pub struct AppState {
    pub sessions: SessionRegistry,
    pub solver: Box<dyn Solver>,
    pub scratch_dir: PathBuf,
}

impl AppState {
    pub fn new(solver: Box<dyn Solver>, scratch_dir: PathBuf, session_capacity: NonZeroUsize) -> Self {
        AppState {
            sessions: SessionRegistry::new(session_capacity),
            solver,
            scratch_dir,
        }
    }
}

// ---------- Route handlers ----------

/// POST /sessions/{session}/commands
pub async fn command(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<CommandRequest>,
) -> actix_web::Result<HttpResponse> {
    let session_id = path.into_inner();
    let CommandRequest { line, cell } = req.into_inner();

    // Solves block for their whole duration, and so does waiting on a
    // session another command holds.
    let response = web::block(move || {
        let shared = state.sessions.get_or_create(&session_id);
        let mut session = shared.lock();
        let ctx = CommandContext {
            solver: state.solver.as_ref(),
            scratch_root: &state.scratch_dir,
        };
        run_command(&ctx, &mut session, &line, cell.as_deref())
    })
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /sessions/{session}/results/{name}
pub async fn result(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<HttpResponse> {
    let (session_id, name) = path.into_inner();
    let lookup_name = name.clone();

    let found = web::block(move || {
        state
            .sessions
            .get(&session_id)
            .and_then(|shared| {
                let session = shared.lock();
                session.result(&lookup_name).cloned()
            })
    })
    .await?;

    Ok(match found {
        Some(result) => HttpResponse::Ok().json(result),
        None => HttpResponse::NotFound()
            .json(serde_json::json!({ "error": format!("Result '{}' does not exist.", name) })),
    })
}

/// DELETE /sessions/{session}
pub async fn delete_session(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let session_id = path.into_inner();
    if state.sessions.remove(&session_id) {
        log::info!("Removed session '{}'", session_id);
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().finish()
    }
}

/// GET /health
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/sessions/{session}/commands", web::post().to(command))
        .route("/sessions/{session}/results/{name}", web::get().to(result))
        .route("/sessions/{session}", web::delete().to(delete_session));
}

/// JSON extractor config: payload limit, and `400 {"error": ...}` on bad bodies.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _| {
            let err_string = err.to_string();
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(serde_json::json!({ "error": err_string })),
            )
            .into()
        })
}
