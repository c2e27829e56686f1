use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;
use tutor_match::config::{LoggingSettings, Settings};
use tutor_match::core::Matcher;
use tutor_match::models::{ErrorResponse, ScoringWeights};
use tutor_match::routes::{self, AppState, MatchingContext};
use tutor_match::services::{CacheManager, DocumentStore, PostgresClient, StoreCollections};

/// JSON error response for payload errors
#[derive(Debug)]
struct JsonError(ErrorResponse);

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(&self.0)
    }
}

fn bad_request(error: &str, message: String) -> actix_web::Error {
    JsonError(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
    .into()
}

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    bad_request("invalid_json", format!("Invalid JSON: {}", err))
}

/// Handle query payload errors
fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    bad_request("invalid_query", format!("Invalid query: {}", err))
}

/// Initialize logging; `RUST_LOG` takes precedence over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging);

    info!("Starting Tutor Match service...");

    let settings = settings.map_err(|e| startup_error("Failed to load configuration", e))?;

    info!("Configuration loaded successfully");

    let collections = StoreCollections {
        students: settings.collection.students.clone(),
        tutors: settings.collection.tutors.clone(),
    };

    let store = DocumentStore::new(
        settings.store.endpoint.clone(),
        settings.store.api_key.clone(),
        settings.store.project_id.clone(),
        settings.store.database_id.clone(),
        collections,
    )
    .map_err(|e| startup_error("Failed to create document store client", e))?;

    let store = Arc::new(match settings.store.max_pages {
        Some(max_pages) => store.with_max_pages(max_pages),
        None => store,
    });

    info!("Document store client initialized");

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let student_ttl = settings.cache.student_ttl_secs.unwrap_or(30);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = Arc::new(
        CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl, student_ttl)
            .await
            .map_err(|e| startup_error("Failed to connect to Redis", e))?,
    );

    info!(
        "Cache manager initialized (L1: {} students, TTL: {}s, student L1 TTL: {}s)",
        l1_cache_size, cache_ttl, student_ttl
    );

    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?,
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let weights = ScoringWeights::from(&settings.scoring.weights);
    let matching = MatchingContext {
        matcher: Matcher::new(weights),
        default_limit: settings.matching.default_limit,
        max_limit: settings.matching.max_limit,
    };

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState {
        store,
        cache,
        postgres,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(matching.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
