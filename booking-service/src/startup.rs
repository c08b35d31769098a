use crate::config::BookingConfig;
use crate::handlers;
use crate::middleware::credential_gate;
use crate::services::{
    BookingService, CatalogService, MongoBookingStore, MongoCatalogStore, MongoDb, TokenService,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, request_id::request_id_middleware,
    security_headers::security_headers_middleware,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: BookingConfig,
    pub catalog: CatalogService,
    pub bookings: BookingService,
    pub tokens: TokenService,
}

impl AppState {
    /// Wires the MongoDB-backed stores around one shared client.
    pub fn with_mongo(config: BookingConfig, db: MongoDb) -> Self {
        let tokens = TokenService::new(&config.auth);
        Self {
            catalog: CatalogService::new(Arc::new(MongoCatalogStore::new(db.clone()))),
            bookings: BookingService::new(Arc::new(MongoBookingStore::new(db))),
            tokens,
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/api/v1/services", get(handlers::list_services))
        .route("/api/v1/user/bookings", get(handlers::list_bookings))
        .layer(from_fn_with_state(state.clone(), credential_gate));

    let public = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api/v1/services/:serviceId", get(handlers::get_service))
        .route("/api/v1/user/create-booking", post(handlers::create_booking))
        .route(
            "/api/v1/user/cancel-booking/:bookingId",
            delete(handlers::cancel_booking),
        )
        .route("/api/v1/auth/access-token", post(handlers::issue_access_token));

    let cors = cors_layer(&state.config.security.allowed_origins);

    Router::new()
        .merge(gated)
        .merge(public)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

/// Credentialed CORS: explicit origins only, never a wildcard.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: BookingConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;

        db.health_check().await?;
        tracing::info!("Pinged deployment, MongoDB connection is live");

        db.initialize_indexes().await?;

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let state = AppState::with_mongo(config, db);
        let app = build_router(state);

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port, "Clean Co Server is running");

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
