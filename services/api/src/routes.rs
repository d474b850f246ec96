use crate::infra::AppState;
use crate::report::{build_report, ParticipationReport, ReportSelection};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use school_outreach::error::AppError;
use school_outreach::outreach::import::Dataset;
use school_outreach::outreach::participation::{
    Contact, ParticipationDraft, Program, ProgramCatalog, ProgramFilter, School, StatusFilter,
    YearFilter,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::Ordering;
use tracing::info;

/// Everything needed to compute statistics in one request; nothing is stored.
#[derive(Debug, Deserialize)]
pub(crate) struct ParticipationReportRequest {
    pub(crate) schools: Vec<School>,
    /// Replaces the configured catalog when present.
    #[serde(default)]
    pub(crate) programs: Option<Vec<Program>>,
    #[serde(default)]
    pub(crate) contacts: Vec<Contact>,
    #[serde(default)]
    pub(crate) participations: Vec<ParticipationDraft>,
    #[serde(default)]
    pub(crate) school_year: YearFilter,
    #[serde(default)]
    pub(crate) program: ProgramFilter,
    #[serde(default)]
    pub(crate) status: StatusFilter,
    #[serde(default)]
    pub(crate) school: Option<String>,
    #[serde(default)]
    pub(crate) search: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ParticipationReportResponse {
    pub(crate) catalog_source: CatalogSource,
    #[serde(flatten)]
    pub(crate) report: ParticipationReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CatalogSource {
    Request,
    Configured,
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/participation/report",
            post(participation_report_endpoint),
        )
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn participation_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ParticipationReportRequest>,
) -> Result<Json<ParticipationReportResponse>, AppError> {
    let ParticipationReportRequest {
        schools,
        programs,
        contacts,
        participations,
        school_year,
        program,
        status,
        school,
        search,
    } = payload;

    let (catalog, catalog_source) = match programs {
        Some(programs) => (ProgramCatalog::from_programs(programs), CatalogSource::Request),
        None => (state.catalog.as_ref().clone(), CatalogSource::Configured),
    };

    let participations = participations
        .into_iter()
        .map(|draft| state.validator.validate(draft))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        schools = schools.len(),
        programs = catalog.len(),
        participations = participations.len(),
        %school_year,
        "computing participation report"
    );

    let dataset = Dataset {
        schools,
        catalog,
        contacts,
        participations,
    };
    let selection = ReportSelection {
        year: school_year,
        program,
        status,
        school,
        search,
    };

    Ok(Json(ParticipationReportResponse {
        catalog_source,
        report: build_report(&dataset, &selection),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use school_outreach::outreach::participation::ParticipationValidator;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            catalog: Arc::new(ProgramCatalog::standard()),
            validator: ParticipationValidator::default(),
        }
    }

    fn request_body() -> Value {
        json!({
            "schools": [
                { "id": "s1", "name": "SP 1", "school_types": ["primary"], "city": "Kraków" },
                { "id": "s2", "name": "II LO", "school_types": ["lyceum"], "city": "Gdańsk" },
                { "id": "s3", "name": "SP 3", "school_types": ["primary"], "city": "Poznań" }
            ],
            "programs": [
                { "id": "p1", "name": "Reading Club", "school_types": ["primary"] },
                { "id": "p2", "name": "Healthy Breakfast", "school_types": ["primary", "lyceum"] },
                { "id": "p3", "name": "Career Day", "school_types": ["lyceum"] }
            ],
            "participations": [
                { "school_id": "s1", "program_id": "p1", "school_year": "2024/2025", "coordinator_id": "c1", "student_count": 20 },
                { "school_id": "s1", "program_id": "p2", "school_year": "2024/2025", "coordinator_id": "c1", "student_count": 25 },
                { "school_id": "s2", "program_id": "p2", "school_year": "2023/2024", "coordinator_id": "c1", "student_count": 30 }
            ]
        })
    }

    fn post_json(body: &Value) -> Request<Body> {
        Request::post("/api/v1/participation/report")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
            .expect("request builds")
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn report_endpoint_uses_request_catalog() {
        let request: ParticipationReportRequest =
            serde_json::from_value(request_body()).expect("request parses");

        let Json(body) = participation_report_endpoint(Extension(state(true)), Json(request))
            .await
            .expect("report builds");

        assert_eq!(body.catalog_source, CatalogSource::Request);
        assert_eq!(body.report.general.total_schools, 3);
        assert_eq!(body.report.general.total_participations, 3);
        assert_eq!(body.report.programs.len(), 3);
        assert_eq!(body.report.available_school_years.len(), 2);
    }

    #[tokio::test]
    async fn report_route_filters_by_school_year() {
        let mut body = request_body();
        body["school_year"] = json!("2024/2025");
        body["status"] = json!("notParticipating");

        let response = router(state(true))
            .oneshot(post_json(&body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["school_year"], "2024/2025");
        assert_eq!(payload["catalog_source"], "request");
        assert_eq!(payload["general"]["total_participations"], 2);
        let schools: Vec<&str> = payload["schools"]
            .as_array()
            .expect("schools array")
            .iter()
            .filter_map(|school| school["school_id"].as_str())
            .collect();
        assert_eq!(schools, vec!["s2", "s3"]);
    }

    #[tokio::test]
    async fn report_route_falls_back_to_configured_catalog() {
        let mut body = request_body();
        body.as_object_mut().expect("object").remove("programs");
        body["participations"] = json!([]);

        let response = router(state(true))
            .oneshot(post_json(&body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["catalog_source"], "configured");
        assert_eq!(payload["general"]["total_participations"], 0);
    }

    #[tokio::test]
    async fn invalid_participation_is_a_bad_request() {
        let mut body = request_body();
        body["participations"][0]["student_count"] = json!(-1);

        let response = router(state(true))
            .oneshot(post_json(&body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert!(payload["error"]
            .as_str()
            .expect("error message")
            .contains("student count"));
    }

    #[tokio::test]
    async fn readiness_reflects_startup_state() {
        let response = router(state(false))
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = router(state(true))
            .oneshot(Request::get("/health").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json_body(response).await["status"], "ok");
    }
}
