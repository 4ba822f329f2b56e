pub mod health;
pub mod pagination;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::state::AppState;
use crate::{admin, ai, applications, billing, jobs, profiles};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route(
            "/api/v1/profile",
            get(profiles::handlers::handle_get_profile).put(profiles::handlers::handle_upsert_profile),
        )
        // Jobs API
        .route("/api/v1/jobs", get(jobs::handlers::handle_list_jobs))
        .route(
            "/api/v1/jobs/recommendations",
            get(jobs::handlers::handle_recommendations),
        )
        .route("/api/v1/jobs/:id", get(jobs::handlers::handle_get_job))
        // Applications API
        .route(
            "/api/v1/applications",
            get(applications::handlers::handle_list_applications)
                .post(applications::handlers::handle_create_application),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handlers::handle_get_application)
                .patch(applications::handlers::handle_update_application)
                .delete(applications::handlers::handle_delete_application),
        )
        // AI API (pro tier, rate limited)
        .route("/api/v1/ai/cover-letter", post(ai::handlers::handle_cover_letter))
        .route(
            "/api/v1/ai/interview-prep",
            post(ai::handlers::handle_interview_prep),
        )
        .route(
            "/api/v1/ai/optimize-resume",
            post(ai::handlers::handle_optimize_resume),
        )
        // Billing
        .route("/api/v1/billing/webhook", post(billing::handlers::handle_webhook))
        // Admin API
        .route("/api/v1/admin/stats", get(admin::handlers::handle_stats))
        .route("/api/v1/admin/users", get(admin::handlers::handle_list_users))
        .route(
            "/api/v1/admin/users/:id/role",
            patch(admin::handlers::handle_update_role),
        )
        .route("/api/v1/admin/jobs", post(admin::handlers::handle_create_job))
        .route(
            "/api/v1/admin/jobs/:id",
            put(admin::handlers::handle_replace_job).delete(admin::handlers::handle_deactivate_job),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::test_support::{make_token, TEST_SECRET};
    use crate::auth::Role;
    use crate::billing::webhook::test_support::sign;
    use crate::state::test_support::{test_state, TEST_WEBHOOK_SECRET};

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn webhook_request(signature: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/billing/webhook")
            .header("stripe-signature", signature)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn user_token(role: Role) -> String {
        make_token(Uuid::new_v4(), role, TEST_SECRET, 3600)
    }

    #[tokio::test]
    async fn test_health_reports_version() {
        let app = build_router(test_state());
        let response = app.oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_user_routes_require_token() {
        let app = build_router(test_state());
        for uri in [
            "/api/v1/profile",
            "/api/v1/applications",
            "/api/v1/jobs/recommendations",
        ] {
            let response = app.clone().oneshot(get_request(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }

        let expired = make_token(Uuid::new_v4(), Role::User, TEST_SECRET, -3600);
        let response = app
            .oneshot(get_request("/api/v1/profile", Some(&expired)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_admin_routes_reject_regular_users() {
        let app = build_router(test_state());
        let token = user_token(Role::User);
        let response = app
            .oneshot(get_request("/api/v1/admin/stats", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_ai_routes_require_token() {
        let app = build_router(test_state());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/ai/cover-letter")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!(r#"{{"job_id": "{}"}}"#, Uuid::new_v4())))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_out_of_range_pagination_rejected() {
        let app = build_router(test_state());
        let response = app
            .oneshot(get_request("/api/v1/jobs?per_page=500", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_enum_query_values_get_json_errors() {
        let app = build_router(test_state());
        let token = user_token(Role::User);
        for (uri, token) in [
            ("/api/v1/jobs?remote_type=Remote", None),
            ("/api/v1/jobs?sort=salary", None),
            ("/api/v1/applications?status=ghosted", Some(token.as_str())),
        ] {
            let response = app.clone().oneshot(get_request(uri, token)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body = json_body(response).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_recommendation_limit_validated() {
        let app = build_router(test_state());
        let token = user_token(Role::User);
        let response = app
            .oneshot(get_request(
                "/api/v1/jobs/recommendations?limit=51",
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_webhook_rejects_bad_signature() {
        let app = build_router(test_state());
        let body = r#"{"id":"evt_1","type":"invoice.paid","data":{"object":{}}}"#;
        let now = chrono::Utc::now().timestamp();
        let forged = sign(body.as_bytes(), "whsec_wrong", now);

        let response = app
            .oneshot(webhook_request(&forged, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "INVALID_SIGNATURE");
    }

    #[tokio::test]
    async fn test_webhook_acknowledges_ignored_event() {
        let app = build_router(test_state());
        let body = r#"{"id":"evt_2","type":"invoice.paid","data":{"object":{}}}"#;
        let now = chrono::Utc::now().timestamp();
        let signature = sign(body.as_bytes(), TEST_WEBHOOK_SECRET, now);

        let response = app
            .oneshot(webhook_request(&signature, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["received"], true);
    }
}
