//! HTTP front door for the advisor.
//!
//! Each form submission is one POST; the JSON envelope carries either the
//! roadmap text or the user-facing error message.

use actix_cors::Cors;
use actix_web::{error, web, App, HttpResponse, HttpServer, Responder};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AdvisorError;
use crate::pipeline::advisor::Advisor;
use crate::pipeline::collector::{ProfessionalForm, StudentForm, SubmissionForm};
use crate::profile::{DegreeType, ExperienceLevel, MAX_EXPERIENCE_YEARS, SKILL_CATALOG};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct LevelOption {
    label: &'static str,
    min_years: u8,
}

#[derive(Debug, Serialize)]
struct Catalog {
    skills: &'static [&'static str],
    degree_types: Vec<&'static str>,
    experience_levels: Vec<LevelOption>,
    max_experience_years: u8,
}

fn catalog() -> Catalog {
    let min_years = |level: ExperienceLevel| {
        (0..=MAX_EXPERIENCE_YEARS)
            .find(|y| ExperienceLevel::from_years(*y) == level)
            .unwrap_or(0)
    };
    Catalog {
        skills: SKILL_CATALOG,
        degree_types: DegreeType::ALL.iter().map(|d| d.label()).collect(),
        experience_levels: ExperienceLevel::ALL
            .iter()
            .map(|level| LevelOption {
                label: level.label(),
                min_years: min_years(*level),
            })
            .collect(),
        max_experience_years: MAX_EXPERIENCE_YEARS,
    }
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "pathfinder",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn get_catalog() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(catalog()))
}

async fn handle_submission(advisor: &Advisor, form: SubmissionForm) -> HttpResponse {
    match advisor.submit(form).await {
        Ok(response) => HttpResponse::Ok().json(ApiResponse::success(response)),
        Err(err @ AdvisorError::Validation(_)) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::error(err.user_message()))
        }
        Err(err @ AdvisorError::ExternalService(_)) => {
            HttpResponse::BadGateway().json(ApiResponse::<()>::error(err.user_message()))
        }
    }
}

async fn submit_professional(
    advisor: web::Data<Advisor>,
    form: web::Json<ProfessionalForm>,
) -> impl Responder {
    handle_submission(&advisor, SubmissionForm::Professional(form.into_inner())).await
}

async fn submit_student(
    advisor: web::Data<Advisor>,
    form: web::Json<StudentForm>,
) -> impl Responder {
    handle_submission(&advisor, SubmissionForm::Student(form.into_inner())).await
}

/// Malformed bodies get the same envelope as validation failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!("Rejected request body: {}", err);
        let response = HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error(format!("Invalid request body: {}", err)));
        error::InternalError::from_response(err, response).into()
    })
}

/// Register all routes. Shared by the server and endpoint tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health_check))
        .route("/api/catalog", web::get().to(get_catalog))
        .route(
            "/api/roadmap/professional",
            web::post().to(submit_professional),
        )
        .route("/api/roadmap/student", web::post().to(submit_student));
}

/// Bind and run until shutdown.
pub async fn run_server(advisor: Advisor, host: &str, port: u16) -> std::io::Result<()> {
    info!(
        "PathFinder listening on http://{}:{} (model: {})",
        host,
        port,
        advisor.model()
    );
    info!("  GET  /health");
    info!("  GET  /api/catalog");
    info!("  POST /api/roadmap/professional");
    info!("  POST /api/roadmap/student");

    let advisor = web::Data::new(advisor);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(advisor.clone())
            .app_data(json_config())
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await
}
