//! Thin presentation layer: two read-only GET endpoints over the analytics
//! core. Every failure is caught here, logged, and mapped onto the generic
//! `{"status": "ERROR", "data": <message>}` envelope.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::analytics::{self, DepartmentTeams, DepartmentsOverview};
use crate::storage::Database;

/// Response envelope shared by both endpoints: `{"status": "OK", "data": …}`
/// on success, `{"status": "ERROR", "data": <message>}` otherwise.
#[derive(Debug, Serialize)]
#[serde(tag = "status", content = "data")]
pub enum Envelope<T> {
    #[serde(rename = "OK")]
    Ok(T),
    #[serde(rename = "ERROR")]
    Error(String),
}

pub fn router(db: Database) -> Router {
    Router::new()
        .route("/departments", get(get_departments))
        .route("/teams", get(get_teams))
        .with_state(db)
}

#[derive(Debug, Deserialize)]
pub struct DepartmentsParams {
    pub on_track_filter: Option<String>,
    pub recently_upd_filter: Option<String>,
}

async fn get_departments(
    State(db): State<Database>,
    Query(params): Query<DepartmentsParams>,
) -> impl IntoResponse {
    log::info!(
        "GET /departments on_track_filter={:?} recently_upd_filter={:?}",
        params.on_track_filter,
        params.recently_upd_filter
    );
    match analytics::departments_overview(
        &db,
        params.on_track_filter.as_deref(),
        params.recently_upd_filter.as_deref(),
    )
    .await
    {
        Ok(payload) => (StatusCode::OK, Json(Envelope::Ok(payload))),
        Err(e) => {
            log::error!("departments overview failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Envelope::<DepartmentsOverview>::Error(e.to_string())),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TeamsParams {
    pub department_name: Option<String>,
}

async fn get_teams(
    State(db): State<Database>,
    Query(params): Query<TeamsParams>,
) -> impl IntoResponse {
    let name = params.department_name.unwrap_or_default();
    log::info!("GET /teams department_name={name:?}");
    match analytics::teams_for_department(&db, &name).await {
        Ok(payload) => (StatusCode::OK, Json(Envelope::Ok(payload))),
        Err(e) => {
            log::error!("teams lookup for department {name:?} failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Envelope::<DepartmentTeams>::Error(e.to_string())),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::SeedData;
    use crate::storage::repository;
    use axum_test::TestServer;
    use serde_json::Value;

    async fn server_with_fixture() -> TestServer {
        let db = Database::open_memory().await.unwrap();
        let data: SeedData = serde_json::from_str(
            r#"{
                "departments": [
                    {"department_id": "d1", "name": "Product"},
                    {"department_id": "d2", "name": "Marketing"}
                ],
                "teams": [{"team_id": "t1", "department_id": "d1", "team_lead_id": "u1"}],
                "users": [
                    {"user_id": "u1", "first_name": "Kai", "last_name": "Larsen", "team_id": "t1"},
                    {"user_id": "u2", "first_name": "Noor", "last_name": "Haddad", "team_id": "t1"}
                ],
                "objectives": [{"objective_id": "o1", "user_id": "u1"}],
                "key_results": [
                    {"keyresult_id": "k1", "objective_id": "o1", "status": "Complete",
                     "updated_on": "2025-08-01"}
                ]
            }"#,
        )
        .unwrap();
        db.writer()
            .call(move |conn| repository::seed(conn, &data))
            .await
            .unwrap();
        TestServer::new(router(db)).unwrap()
    }

    #[tokio::test]
    async fn test_departments_endpoint_returns_ok_envelope() {
        let server = server_with_fixture().await;

        let response = server.get("/departments").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "OK");
        assert_eq!(body["data"]["objectives_on_track"]["total"], 1);
        let departments = body["data"]["departments"].as_array().unwrap();
        assert_eq!(departments.len(), 2);
        assert_eq!(departments[0]["name"], "Product");
        // Marketing has no teams: sentinel ratio.
        assert_eq!(departments[1]["objectives_on_track_ratio"], "--");
    }

    #[tokio::test]
    async fn test_departments_endpoint_accepts_window_filters() {
        let server = server_with_fixture().await;

        let response = server
            .get("/departments")
            .add_query_param("on_track_filter", "2 weeks")
            .add_query_param("recently_upd_filter", "4 weeks")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "OK");
        assert_eq!(
            body["data"]["objectives_updated_recently"]["date_since"],
            "4 weeks"
        );
    }

    #[tokio::test]
    async fn test_malformed_filter_maps_to_error_envelope() {
        let server = server_with_fixture().await;

        let response = server
            .get("/departments")
            .add_query_param("on_track_filter", "whenever")
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(body["status"], "ERROR");
        assert!(body["data"].as_str().unwrap().contains("whenever"));
    }

    #[tokio::test]
    async fn test_teams_endpoint_returns_roster() {
        let server = server_with_fixture().await;

        let response = server
            .get("/teams")
            .add_query_param("department_name", "product")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "OK");
        assert_eq!(body["data"]["department"], "product");
        let teams = body["data"]["teams"].as_array().unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0]["team_leader"], "Kai Larsen");
        assert_eq!(teams[0]["members"], serde_json::json!(["Noor Haddad"]));
    }

    #[tokio::test]
    async fn test_teams_endpoint_tolerates_unknown_department() {
        let server = server_with_fixture().await;

        let response = server
            .get("/teams")
            .add_query_param("department_name", "Finance")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "OK");
        assert_eq!(body["data"]["department"], "Finance");
        assert_eq!(body["data"]["teams"], serde_json::json!([]));
    }
}
