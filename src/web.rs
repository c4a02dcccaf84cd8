use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use std::sync::Mutex;
use tracing::{error, info, warn};
use crate::config::SolverConfig;
use crate::error::RosterError;
use crate::export::TimetableExport;
use crate::parser::parse_request;
use crate::service::solve_request;

// Latest result only; nothing is persisted
pub struct AppState {
    pub config: SolverConfig,
    pub latest: Mutex<Option<TimetableExport>>,
}

impl AppState {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            latest: Mutex::new(None),
        }
    }
}

/// Maps a roster error onto a JSON error response
fn error_response(err: &RosterError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    match err {
        RosterError::InvalidInput(_) | RosterError::InvalidProblemDefinition(_) | RosterError::Json(_) => {
            HttpResponse::BadRequest().json(body)
        }
        RosterError::ConstructionExhausted { .. } | RosterError::NoValidSwap { .. } => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        RosterError::Csv(_) | RosterError::Io(_) => HttpResponse::InternalServerError().json(body),
    }
}

// Schedule generation endpoint
async fn create_schedule(body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    let text = match std::str::from_utf8(&body) {
        Ok(text) => text,
        Err(_) => {
            return Ok(HttpResponse::BadRequest()
                .json(serde_json::json!({"success": false, "error": "Request body is not UTF-8"})))
        }
    };
    let request = match parse_request(text) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected schedule request");
            return Ok(error_response(&e));
        }
    };

    let config = state.config.clone();
    let outcome = web::block(move || solve_request(&request, &config)).await?;

    match outcome {
        Ok(export) => {
            info!(score = export.score, evaluations = export.evaluations, "Schedule generated");
            if let Ok(mut latest) = state.latest.lock() {
                *latest = Some(export.clone());
            }
            Ok(HttpResponse::Ok().json(export))
        }
        Err(e) => {
            error!(error = %e, "Schedule generation failed");
            Ok(error_response(&e))
        }
    }
}

// Most recent schedule
async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let latest = state
        .latest
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Schedule state is poisoned"))?;

    if let Some(ref export) = *latest {
        Ok(HttpResponse::Ok().json(export))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Schedule not available"})))
    }
}

async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

/// Registers the API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/schedule", web::post().to(create_schedule))
        .route("/api/schedule", web::get().to(get_schedule))
        .route("/api/health", web::get().to(health));
}

pub async fn start_server(port: u16, config: SolverConfig) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
