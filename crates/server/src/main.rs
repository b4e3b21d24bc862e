use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::sync::RwLock;

use grievance_common::config::ClassifierConfig;
use grievance_engine::{config, Classifier, RemoteAnalyzer};

mod backend;
mod routes;
mod store;

use backend::AnalysisBackend;
use store::ComplaintStore;

/// Shared application state.
pub struct AppState {
    /// Serves /analyze and its variants.
    pub classifier: Classifier,
    /// Serves complaint intake; may point at a remote analysis service.
    pub backend: AnalysisBackend,
    pub store: RwLock<ComplaintStore>,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Grievance server starting");

    // Refuse to start on a bad configuration file.
    let classifier_config = match std::env::var("GRIEVANCE_CONFIG").map(PathBuf::from) {
        Ok(path) => match config::load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration, refusing to start");
                std::process::exit(1);
            }
        },
        Err(_) => {
            tracing::info!("GRIEVANCE_CONFIG not set, using built-in rule table");
            ClassifierConfig::default()
        }
    };

    // Install Prometheus metrics recorder.
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    let classifier = Classifier::from_config(&classifier_config);

    let backend = match std::env::var("ANALYZER_BACKEND_URL") {
        Ok(url) if !url.trim().is_empty() => {
            match RemoteAnalyzer::new(&url, &classifier_config.remote) {
                Ok(client) => {
                    tracing::info!(endpoint = %client.endpoint(), "Using remote analysis backend");
                    AnalysisBackend::Remote(client)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build remote analysis client");
                    std::process::exit(1);
                }
            }
        }
        _ => AnalysisBackend::Local(classifier.clone()),
    };

    tracing::info!(
        rules = classifier.rules().rules().len(),
        urgency_markers = classifier.rules().urgency_markers().len(),
        backend = backend.kind(),
        "Classifier ready"
    );

    let state = Arc::new(AppState {
        classifier,
        backend,
        store: RwLock::new(ComplaintStore::new()),
        metrics_handle,
    });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/analyze", post(routes::analyze_handler))
        .route("/analyze/explain", post(routes::explain_handler))
        .route("/analyze/legacy", post(routes::legacy_handler))
        .route(
            "/complaints",
            post(routes::submit_complaint_handler).get(routes::list_complaints_handler),
        )
        .route("/complaints/{docket}", get(routes::get_complaint_handler))
        .route(
            "/complaints/{docket}/resolve",
            post(routes::resolve_complaint_handler),
        )
        .with_state(state);

    let port: u16 = std::env::var("GRIEVANCE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8090);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind TCP listener");

    tracing::info!(port = port, "Grievance server listening");

    axum::serve(listener, app).await.expect("HTTP server error");
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "backend": state.backend.kind(),
            "complaints": state.store.read().await.len(),
        })),
    )
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}
