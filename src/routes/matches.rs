use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    decode_student, decode_tutors, AssignedTutor, ErrorResponse, FindMatchesRequest, FindMatchesResponse,
    HealthResponse, HistoryQuery, HistoryResponse, PreviewRequest, PreviewResponse, StudentRecord, TutorRecord,
};
use crate::services::{CacheManager, DocumentStore, PostgresClient, StoreError};
use crate::core::Matcher;
use std::sync::Arc;

/// The matcher plus the result-size policy applied to every request
#[derive(Debug, Clone)]
pub struct MatchingContext {
    pub matcher: Matcher,
    pub default_limit: u16,
    pub max_limit: u16,
}

impl MatchingContext {
    /// Resolve a requested limit against the configured default and cap
    pub fn limit(&self, requested: Option<u16>) -> usize {
        requested.unwrap_or(self.default_limit).clamp(1, self.max_limit.max(1)) as usize
    }
}

impl Default for MatchingContext {
    fn default() -> Self {
        Self {
            matcher: Matcher::default(),
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// Application state shared across the storage-backed handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/preview", web::post().to(preview_matches))
        .route("/matches/history", web::get().to(get_history));
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn store_error_response(error: &str, err: &StoreError) -> HttpResponse {
    use actix_web::http::StatusCode;

    let status = match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error, err.to_string())
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    error_response(
        actix_web::http::StatusCode::BAD_REQUEST,
        "Validation failed",
        errors.to_string(),
    )
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Read a student through the cache
async fn load_student(state: &AppState, student_id: &str) -> Result<Arc<StudentRecord>, StoreError> {
    match state.cache.get_student(student_id).await {
        Ok(Some(student)) => return Ok(student),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache read failed for student {}: {}", student_id, e),
    }

    let student = Arc::new(state.store.get_student(student_id).await?);
    if let Err(e) = state.cache.set_student(student_id, Arc::clone(&student)).await {
        tracing::warn!("Failed to cache student {}: {}", student_id, e);
    }
    Ok(student)
}

/// Read the tutor roster through the cache
async fn load_tutors(state: &AppState) -> Result<Arc<Vec<TutorRecord>>, StoreError> {
    match state.cache.get_roster().await {
        Ok(Some(tutors)) => return Ok(tutors),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache read failed for tutor roster: {}", e),
    }

    let tutors = Arc::new(state.store.list_tutors().await?);
    if let Err(e) = state.cache.set_roster(Arc::clone(&tutors)).await {
        tracing::warn!("Failed to cache tutor roster: {}", e);
    }
    Ok(tutors)
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "studentId": "string",
///   "limit": 10
/// }
/// ```
///
/// The top match is written back onto the student record and appended to
/// the match history.
async fn find_matches(
    state: web::Data<AppState>,
    matching: web::Data<MatchingContext>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return validation_error(errors);
    }

    let student_id = &req.student_id;
    let limit = matching.limit(req.limit);

    tracing::info!("Finding tutors for student: {}, limit: {}", student_id, limit);

    let student = match load_student(&state, student_id).await {
        Ok(student) => student,
        Err(e) => {
            tracing::error!("Failed to fetch student {}: {}", student_id, e);
            return store_error_response("Failed to fetch student", &e);
        }
    };

    let tutors = match load_tutors(&state).await {
        Ok(tutors) => tutors,
        Err(e) => {
            tracing::error!("Failed to fetch tutors for {}: {}", student_id, e);
            return store_error_response("Failed to fetch tutors", &e);
        }
    };

    tracing::debug!("Scoring {} tutors for {}", tutors.len(), student_id);

    let result = matching
        .matcher
        .find_matches(&student, tutors.as_ref().clone(), Some(limit));

    let assigned = match result.matches.first() {
        Some(top) => {
            let tutor = &top.tutor;
            if let Err(e) = state
                .store
                .assign_tutor(student_id, &tutor.tutor_id, &tutor.display_name)
                .await
            {
                tracing::error!("Failed to assign tutor {} to {}: {}", tutor.tutor_id, student_id, e);
                return store_error_response("Failed to save match", &e);
            }

            if let Err(e) = state.cache.invalidate_student(student_id).await {
                tracing::warn!("Failed to invalidate cached student {}: {}", student_id, e);
            }

            if let Err(e) = state
                .postgres
                .record_assignment(student_id, &tutor.tutor_id, &tutor.display_name, top.compatibility_score)
                .await
            {
                tracing::warn!("Match saved but history recording failed for {}: {}", student_id, e);
            }

            Some(AssignedTutor {
                tutor_id: tutor.tutor_id.clone(),
                display_name: tutor.display_name.clone(),
                compatibility_score: top.compatibility_score,
            })
        }
        None => {
            tracing::info!("No viable tutor for student {}", student_id);
            None
        }
    };

    tracing::info!(
        "Returning {} matches for student {} (from {} candidates)",
        result.matches.len(),
        student_id,
        result.total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        student_id: student_id.clone(),
        matches: result.matches,
        assigned,
        total_candidates: result.total_candidates,
    })
}

/// Preview endpoint
///
/// POST /api/v1/matches/preview
///
/// Ranks the supplied student and tutors (plain or tagged encoding) without
/// reading or writing storage.
async fn preview_matches(
    matching: web::Data<MatchingContext>,
    req: web::Json<PreviewRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let student = decode_student(&req.student);
    let tutors = decode_tutors(&req.tutors);
    let limit = matching.limit(req.limit);

    let result = matching.matcher.find_matches(&student, tutors, Some(limit));

    tracing::debug!(
        "Preview ranked {} of {} tutors",
        result.matches.len(),
        result.total_candidates
    );

    HttpResponse::Ok().json(PreviewResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
    })
}

/// Match history endpoint
///
/// GET /api/v1/matches/history?studentId={studentId}&limit={limit}
async fn get_history(
    state: web::Data<AppState>,
    matching: web::Data<MatchingContext>,
    query: web::Query<HistoryQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let limit = matching.limit(query.limit);

    match state.postgres.get_history(&query.student_id, limit).await {
        Ok(assignments) => HttpResponse::Ok().json(HistoryResponse {
            student_id: query.student_id.clone(),
            assignments,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch history for {}: {}", query.student_id, e);
            error_response(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch match history",
                e.to_string(),
            )
        }
    }
}
