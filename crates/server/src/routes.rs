use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use grievance_common::api::analyze::AnalyzeRequest;
use grievance_common::api::complaints::{
    ComplaintQuery, ResolveComplaintRequest, SubmitComplaintRequest, SubmitComplaintResponse,
};
use grievance_common::types::{AnalysisResult, Assessment, Complaint, LegacyAnalysis};
use grievance_common::GrievanceError;

use crate::AppState;

type ApiError = (StatusCode, String);

/// Map an error onto an HTTP status. Callers only branch on success vs failure.
fn error_response(e: GrievanceError) -> ApiError {
    let status = match &e {
        GrievanceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        GrievanceError::NotFound(_) => StatusCode::NOT_FOUND,
        GrievanceError::UnreachableRemote(_) | GrievanceError::RemoteRejected { .. } => {
            StatusCode::BAD_GATEWAY
        }
        GrievanceError::CircuitOpen(_) => StatusCode::SERVICE_UNAVAILABLE,
        GrievanceError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        GrievanceError::Config(_)
        | GrievanceError::Serialization(_)
        | GrievanceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

/// Run the in-process classifier with request metrics.
fn assess(state: &AppState, text: &str) -> Result<Assessment, ApiError> {
    let start = std::time::Instant::now();

    let assessment = state.classifier.assess(text).map_err(|e| {
        metrics::counter!("grievance.analyze.rejected").increment(1);
        error_response(e)
    })?;

    metrics::counter!(
        "grievance.analyze.total",
        "department" => assessment.analysis.department.as_str()
    )
    .increment(1);
    metrics::histogram!("grievance.analyze.latency").record(start.elapsed().as_secs_f64());

    Ok(assessment)
}

/// POST /analyze: classify complaint text.
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    assess(&state, &request.complaint).map(|a| Json(a.analysis))
}

/// POST /analyze/explain: classification plus score breakdown.
pub async fn explain_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Assessment>, ApiError> {
    assess(&state, &request.complaint).map(Json)
}

/// POST /analyze/legacy: classification in the flat legacy field names.
pub async fn legacy_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<LegacyAnalysis>, ApiError> {
    assess(&state, &request.complaint).map(|a| Json(LegacyAnalysis::from(&a.analysis)))
}

/// POST /complaints: analyze and store a citizen submission.
///
/// Nothing is stored unless the analysis succeeded.
pub async fn submit_complaint_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitComplaintRequest>,
) -> Result<(StatusCode, Json<SubmitComplaintResponse>), ApiError> {
    if request.citizen_id.trim().is_empty() {
        return Err(error_response(GrievanceError::InvalidInput(
            "citizen_id must not be empty".into(),
        )));
    }
    if request.description.trim().is_empty() {
        return Err(error_response(GrievanceError::InvalidInput(
            "description must not be empty".into(),
        )));
    }

    let analysis = state
        .backend
        .analyze(&request.description)
        .await
        .map_err(|e| {
            if e.is_caller_fault() {
                tracing::warn!(
                    backend = state.backend.kind(),
                    error = %e,
                    "Complaint rejected by analysis, submission not stored"
                );
            } else {
                tracing::error!(
                    backend = state.backend.kind(),
                    error = %e,
                    transient = e.is_transient(),
                    "Complaint analysis failed, submission not stored"
                );
            }
            metrics::counter!("grievance.complaints.failed").increment(1);
            error_response(e)
        })?;

    let mut complaint = Complaint::new(request.citizen_id, request.description, analysis.clone());
    complaint.location = request.location;
    complaint.photo_url = request.photo_url;
    let docket_id = complaint.docket_id.clone();

    state.store.write().await.insert(complaint);

    metrics::counter!(
        "grievance.complaints.submitted",
        "department" => analysis.department.as_str(),
        "priority" => analysis.risk_level.as_db_str()
    )
    .increment(1);
    tracing::info!(
        docket = %docket_id,
        department = %analysis.department,
        risk_level = %analysis.risk_level,
        escalation_score = analysis.escalation_score,
        "Complaint submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitComplaintResponse {
            docket_id,
            analysis,
        }),
    ))
}

/// GET /complaints: citizen history or department queue.
pub async fn list_complaints_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ComplaintQuery>,
) -> Json<Vec<Complaint>> {
    Json(state.store.read().await.list(&query))
}

/// GET /complaints/{docket}: track a single complaint.
pub async fn get_complaint_handler(
    State(state): State<Arc<AppState>>,
    Path(docket): Path<String>,
) -> Result<Json<Complaint>, ApiError> {
    state
        .store
        .read()
        .await
        .get_by_docket(&docket)
        .cloned()
        .map(Json)
        .ok_or_else(|| error_response(GrievanceError::NotFound(format!("complaint {}", docket))))
}

/// POST /complaints/{docket}/resolve: close a complaint with notes.
pub async fn resolve_complaint_handler(
    State(state): State<Arc<AppState>>,
    Path(docket): Path<String>,
    Json(request): Json<ResolveComplaintRequest>,
) -> Result<Json<Complaint>, ApiError> {
    let resolved = state
        .store
        .write()
        .await
        .resolve(&docket, &request.notes)
        .map_err(error_response)?;

    metrics::counter!("grievance.complaints.resolved").increment(1);
    tracing::info!(docket = %resolved.docket_id, "Complaint resolved");

    Ok(Json(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grievance_common::api::complaints::ComplaintSort;
    use grievance_common::config::{RemoteConfig, RetryConfig};
    use grievance_common::types::{ComplaintStatus, Department, GeoPoint, RiskLevel};
    use grievance_engine::{Classifier, RemoteAnalyzer};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tokio::sync::RwLock;

    use crate::backend::AnalysisBackend;
    use crate::store::ComplaintStore;

    fn state_with(backend: AnalysisBackend) -> Arc<AppState> {
        Arc::new(AppState {
            classifier: Classifier::default(),
            backend,
            store: RwLock::new(ComplaintStore::new()),
            metrics_handle: PrometheusBuilder::new().build_recorder().handle(),
        })
    }

    fn local_state() -> Arc<AppState> {
        state_with(AnalysisBackend::Local(Classifier::default()))
    }

    fn submission(citizen: &str, description: &str) -> SubmitComplaintRequest {
        SubmitComplaintRequest {
            citizen_id: citizen.into(),
            description: description.into(),
            location: None,
            photo_url: None,
        }
    }

    async fn submit(state: &Arc<AppState>, citizen: &str, description: &str) -> String {
        let (status, Json(response)) =
            submit_complaint_handler(State(Arc::clone(state)), Json(submission(citizen, description)))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        response.docket_id
    }

    #[tokio::test]
    async fn test_analyze_endpoint() {
        let Json(result) = analyze_handler(
            State(local_state()),
            Json(AnalyzeRequest {
                complaint: "pothole".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(result.department, Department::Roads);
        assert_eq!(result.escalation_score, 35);
    }

    #[tokio::test]
    async fn test_analyze_rejects_blank() {
        let (status, _) = analyze_handler(
            State(local_state()),
            Json(AnalyzeRequest {
                complaint: "   ".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_explain_and_legacy_endpoints() {
        let state = local_state();
        let request = || {
            Json(AnalyzeRequest {
                complaint: "Sewage overflow, health hazard".into(),
            })
        };

        let Json(assessment) = explain_handler(State(Arc::clone(&state)), request())
            .await
            .unwrap();
        assert_eq!(assessment.breakdown.total_before_clamp, 90);
        assert_eq!(assessment.analysis.risk_level, RiskLevel::Critical);

        let Json(legacy) = legacy_handler(State(state), request()).await.unwrap();
        assert_eq!(legacy.category, "Sanitation");
        assert_eq!(legacy.keywords, vec!["sewage", "hazard"]);
    }

    #[tokio::test]
    async fn test_submit_list_resolve_flow() {
        let state = local_state();
        let pothole = submit(&state, "user_1", "Massive pothole near the BRTS corridor").await;
        let wire = submit(&state, "user_2", "Live wire on the sidewalk, urgent").await;
        assert_eq!(pothole.len(), 8);

        let Json(queue) = list_complaints_handler(
            State(Arc::clone(&state)),
            Query(ComplaintQuery {
                resolved: Some(false),
                sort: ComplaintSort::Priority,
                ..ComplaintQuery::default()
            }),
        )
        .await;
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].docket_id, wire);

        let Json(resolved) = resolve_complaint_handler(
            State(Arc::clone(&state)),
            Path(wire.clone()),
            Json(ResolveComplaintRequest {
                notes: "Line de-energised and re-strung".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(resolved.status, ComplaintStatus::Resolved);
        // Analysis is carried over untouched.
        assert_eq!(resolved.analysis.escalation_score, 100);

        let Json(tracked) = get_complaint_handler(State(Arc::clone(&state)), Path(wire))
            .await
            .unwrap();
        assert_eq!(tracked.status, ComplaintStatus::Resolved);

        let Json(history) = list_complaints_handler(
            State(state),
            Query(ComplaintQuery {
                citizen_id: Some("user_1".into()),
                ..ComplaintQuery::default()
            }),
        )
        .await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].docket_id, pothole);
    }

    #[tokio::test]
    async fn test_department_queue_from_query_string() {
        let state = local_state();
        submit(&state, "user_1", "Garbage dumped behind the market").await;
        let pothole = submit(&state, "user_2", "Deep pothole outside the school").await;

        let uri: axum::http::Uri = "/complaints?department=roads&resolved=false&sort=priority"
            .parse()
            .unwrap();
        let query = Query::<ComplaintQuery>::try_from_uri(&uri).unwrap();
        let Json(queue) = list_complaints_handler(State(state), query).await;

        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].docket_id, pothole);
        assert_eq!(queue[0].analysis.department, Department::Roads);
    }

    #[tokio::test]
    async fn test_submit_keeps_caller_location() {
        let state = local_state();
        let mut request = submission("user_3", "Garbage dumped behind the market");
        request.location = Some(GeoPoint {
            lat: 22.7244,
            lng: 75.8839,
            address: Some("Old Palasia".into()),
        });
        let (_, Json(response)) = submit_complaint_handler(State(Arc::clone(&state)), Json(request))
            .await
            .unwrap();

        let store = state.store.read().await;
        let stored = store.get_by_docket(&response.docket_id).unwrap();
        assert_eq!(stored.location.as_ref().map(|l| l.lat), Some(22.7244));
        assert_eq!(stored.analysis, response.analysis);
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let state = local_state();
        for request in [submission("", "pothole"), submission("user_1", "  ")] {
            let (status, _) = submit_complaint_handler(State(Arc::clone(&state)), Json(request))
                .await
                .unwrap_err();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        assert_eq!(state.store.read().await.len(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_backend_stores_nothing() {
        let config = RemoteConfig {
            timeout_ms: 1_000,
            circuit_failure_threshold: 5,
            circuit_cooldown_seconds: 60,
            retry: RetryConfig {
                max_attempts: 1,
                initial_backoff_ms: 1,
                max_backoff_ms: 1,
                backoff_multiplier: 1.0,
                jitter: false,
            },
        };
        // Nothing listens on port 1.
        let client = RemoteAnalyzer::new("http://127.0.0.1:1", &config).unwrap();
        let state = state_with(AnalysisBackend::Remote(client));

        let (status, _) =
            submit_complaint_handler(State(Arc::clone(&state)), Json(submission("user_1", "pothole")))
                .await
                .unwrap_err();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(state.store.read().await.len(), 0);
    }

    #[tokio::test]
    async fn test_unknown_docket() {
        let state = local_state();
        let (status, _) = get_complaint_handler(State(Arc::clone(&state)), Path("ABCDEF12".into()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = resolve_complaint_handler(
            State(state),
            Path("ABCDEF12".into()),
            Json(ResolveComplaintRequest {
                notes: "done".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
