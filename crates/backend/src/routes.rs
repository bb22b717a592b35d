use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Extension, Router,
};
use contracts::domain::approvals::ApplicantKind;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::handlers::{admin, batches, catchment, crops, demographics, registration};
use crate::shared::config::CorsConfig;
use crate::shared::state::AppState;
use crate::system;
use crate::system::auth::middleware::{require_admin, require_auth};

/// Registration uploads carry up to three documents.
const UPLOAD_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// CORS for the portal frontend. No configured origins means any origin.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Registration and availability endpoints of one applicant kind, nested
/// under `/api/{kind}`.
fn registration_routes(kind: ApplicantKind) -> Router<AppState> {
    Router::new()
        .route("/register", post(registration::register))
        .route("/check-email/:email", get(registration::check_email))
        .route("/check-username/:username", get(registration::check_username))
        .layer(Extension(kind))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
}

/// All routes of the portal API
pub fn configure_routes(state: AppState, cors: CorsLayer) -> Router {
    // ========================================
    // ADMIN (admin token required)
    // ========================================
    let admin_routes = Router::new()
        .route("/admin/pending_aggregators", get(admin::pending_aggregators))
        .route("/admin/pending_buyers", get(admin::pending_buyers))
        .route("/admin/application_history", get(admin::application_history))
        .route("/admin/:review/:user_id", put(admin::review))
        .route("/admin/crops", get(crops::list).post(crops::add))
        .route("/admin/crops/:crop_id", delete(crops::remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // ========================================
    // AGGREGATOR PORTAL (any valid token)
    // ========================================
    let portal_routes = Router::new()
        .route("/api/catchment/request", post(catchment::submit_request))
        .route(
            "/api/catchment/my-requests/:aggregator_id",
            get(catchment::my_requests),
        )
        .route(
            "/api/catchment/farmers/:aggregator_id",
            get(catchment::farmers),
        )
        .route(
            "/api/catchment/dashboard/summary/:aggregator_id",
            get(catchment::dashboard_summary),
        )
        // aggregator id for GET, batch id for DELETE
        .route(
            "/api/batches/:id",
            get(batches::list_for_aggregator).delete(batches::cancel),
        )
        .route("/api/traceability/:batch_id", get(batches::traceability))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // ========================================
    // PUBLIC
    // ========================================
    let demographics_routes = Router::new()
        .route("/api/demographics/districts", get(demographics::districts))
        .route("/api/demographics/mandals/:district_id", get(demographics::mandals))
        .route(
            "/api/demographics/panchayats/:mandal_id",
            get(demographics::panchayats),
        )
        .route(
            "/api/demographics/villages/:panchayat_id",
            get(demographics::villages),
        )
        .route("/api/demographics/vo/:village_id", get(demographics::vos))
        .route("/api/demographics/shg/:village_id", get(demographics::shgs))
        .route("/api/demographics/crops", get(demographics::crops))
        .route("/api/demographics/seasons", get(demographics::seasons));

    let mut app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/auth/login", post(system::handlers::auth::login))
        .merge(admin_routes)
        .merge(portal_routes)
        .merge(demographics_routes);

    for kind in [ApplicantKind::Aggregator, ApplicantKind::Buyer] {
        app = app.nest(&format!("/api/{}", kind.slug()), registration_routes(kind));
    }

    let uploads = ServeDir::new(state.uploads_dir.as_ref().clone());
    app.nest_service("/uploads", uploads)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::default_config;
    use crate::store::seed;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let mut config = default_config().unwrap();
        config.uploads.dir = std::env::temp_dir()
            .join("agriportal-test-uploads")
            .to_string_lossy()
            .into_owned();
        let state = AppState::new(&config, seed::seeded().unwrap());
        configure_routes(state, cors_layer(&config.cors))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn authorized(method: Method, uri: &str, token: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_post(uri: &str, token: &str, fields: &[(&str, &str)]) -> Request<Body> {
        let boundary = "portal-test-boundary";
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            ));
        }
        body.push_str(&format!("--{}--\r\n", boundary));
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(body))
            .unwrap()
    }

    async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
        send(
            app,
            form_post(
                "/auth/login",
                &format!("username={}&password={}", username, password),
            ),
        )
        .await
    }

    async fn token(app: &Router, username: &str, password: &str) -> String {
        let (status, body) = login(app, username, password).await;
        assert_eq!(status, StatusCode::OK, "login of {} failed: {}", username, body);
        body["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = app.oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_location_lookups() {
        let app = test_app();
        let (status, body) = send(&app, get("/api/demographics/mandals/D001", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["mandals"].as_array().unwrap().len(), 3);

        let (status, body) = send(&app, get("/api/demographics/mandals/D999", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);

        let (status, _) = send(&app, get("/api/demographics/vo/V002", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, get("/api/demographics/shg/V001?vo_id=NA", None)).await;
        assert_eq!(body["shgs"].as_array().unwrap().len(), 3);
        let (_, body) = send(&app, get("/api/demographics/shg/V001?vo_id=VO002", None)).await;
        assert_eq!(body["shgs"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_failures() {
        let app = test_app();
        let (status, body) = login(&app, "nobody", "password123").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "username_not_found");

        let (status, body) = login(&app, "greenearth", "wrong-password").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "incorrect_password");

        let (status, body) = login(&app, "sunrisefpo", seed::MEMBER_PASSWORD).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "account_pending");

        let (status, body) = login(&app, "rejectedfpo", seed::MEMBER_PASSWORD).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "account_rejected");

        let (status, body) = login(&app, "", "").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation");
    }

    #[tokio::test]
    async fn test_buyer_login_carries_notice() {
        let app = test_app();
        let (status, body) = login(&app, "approvedretail", seed::MEMBER_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["user_role"], 3);
        assert!(body["role_message"].as_str().unwrap().contains("under development"));
    }

    #[tokio::test]
    async fn test_admin_review_flow() {
        let app = test_app();
        let (status, _) = send(&app, get("/admin/pending_aggregators", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let member = token(&app, "greenearth", seed::MEMBER_PASSWORD).await;
        let (status, _) = send(&app, get("/admin/pending_buyers", Some(member.as_str()))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = token(&app, "admin", seed::ADMIN_PASSWORD).await;
        let (_, body) = send(&app, get("/admin/pending_aggregators", Some(admin.as_str()))).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["aggregators"][0]["type"], "FPO");

        let approve = |token: &str| {
            Request::builder()
                .method(Method::PUT)
                .uri("/admin/approve_aggregator/AGG-2619284")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap()
        };
        let (status, body) = send(&app, approve(admin.as_str())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("approved"));

        let (status, _) = send(&app, approve(admin.as_str())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = send(&app, get("/admin/pending_aggregators", Some(admin.as_str()))).await;
        assert_eq!(body["count"], 1);
        let (_, body) = send(&app, get("/admin/application_history", Some(admin.as_str()))).await;
        assert_eq!(body["history"][0]["user_id"], "AGG-2619284");
        assert_eq!(body["history"][0]["type"], "Aggregator");

        // approved accounts can log in
        let (status, _) = login(&app, "sunrisefpo", seed::MEMBER_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_catchment_submission() {
        let app = test_app();
        let member = token(&app, "greenearth", seed::MEMBER_PASSWORD).await;
        let fields = [
            ("district_id", "D001"),
            ("district_name", "Anantapur"),
            ("mandal_id", "M001"),
            ("mandal_name", "Hindupur"),
            ("panchayat_id", "P002"),
            ("panchayat_name", "Bukkapatnam"),
            ("village_id", "V002"),
            ("village_name", "Bukkapatnam Village"),
            ("vo_id", "NA"),
            ("vo_name", "NA"),
            ("shg_id", "NA"),
            ("shg_name", "NA"),
            ("crop_id", "C001"),
            ("crop_name", "Groundnut"),
            ("season", "Rabi"),
            ("period", "2025-26"),
        ];

        let (status, body) =
            send(&app, multipart_post("/api/catchment/request", &member, &fields)).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["success"], true);
        assert_eq!(body["catchment_id"], "ACM-1004");

        let (status, body) =
            send(&app, multipart_post("/api/catchment/request", &member, &fields)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "duplicate");

        let (_, body) = send(
            &app,
            get("/api/catchment/my-requests/AGG-2619283", Some(member.as_str())),
        )
        .await;
        assert_eq!(body["count"], 4);
        assert_eq!(body["requests"][0]["id"], "ACM-1004");

        let (status, _) = send(
            &app,
            get("/api/catchment/my-requests/AGG-2619285", Some(member.as_str())),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_catchment_requires_token() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/catchment/request")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_registration_and_availability() {
        let app = test_app();
        let (_, body) = send(
            &app,
            get("/api/aggregator/check-email/contact@greenearthfpo.org", None),
        )
        .await;
        assert_eq!(body["available"], false);
        // emails are checked per flow
        let (_, body) = send(
            &app,
            get("/api/buyer/check-email/contact@greenearthfpo.org", None),
        )
        .await;
        assert_eq!(body["available"], true);

        let form = "org_name=Harvest+Hub&org_type=FPO&email=hub%40harvest.in\
                    &mobile=9876543210&address=Anantapur&spoc_name=Ravi\
                    &spoc_mobile=9876500001&user_id=harvesthub&password=harvest123";
        let (status, body) = send(&app, form_post("/api/aggregator/register", form)).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["aggregator_id"], "AGG-2619286");
        assert_eq!(body["status"], "Pending Approval");

        let (_, body) = send(&app, get("/api/buyer/check-username/harvesthub", None)).await;
        assert_eq!(body["available"], false);

        let (status, body) = send(&app, form_post("/api/aggregator/register", form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Email already registered");

        let (status, _) = send(
            &app,
            form_post("/api/buyer/register", "buyer_org_name=Shop&buyer_org_user_id=shop"),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_traceability_lookup() {
        let app = test_app();
        let member = token(&app, "greenearth", seed::MEMBER_PASSWORD).await;
        let (_, body) = send(&app, get("/api/batches/AGG-2619283", Some(member.as_str()))).await;
        assert_eq!(body["count"], 2);

        let batch_id = body["batches"][0]["batchId"].as_str().unwrap().to_string();
        let (status, body) = send(
            &app,
            get(&format!("/api/traceability/{}", batch_id), Some(member.as_str())),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = send(&app, get("/api/traceability/B-NOPE", Some(member.as_str()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cancel_batch() {
        let app = test_app();
        let member = token(&app, "greenearth", seed::MEMBER_PASSWORD).await;
        let cancel = |token: &str, batch_id: &str| {
            authorized(Method::DELETE, &format!("/api/batches/{}", batch_id), token, "")
        };

        let (status, body) = send(&app, cancel(&member, "BATCH-2619283-001")).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["message"], "Batch B...83-001 has been cancelled.");

        let (_, body) = send(&app, get("/api/batches/AGG-2619283", Some(member.as_str()))).await;
        assert_eq!(body["count"], 1);
        let (status, _) = send(
            &app,
            get("/api/traceability/BATCH-2619283-001", Some(member.as_str())),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, cancel(&member, "BATCH-2619283-001")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let admin = token(&app, "admin", seed::ADMIN_PASSWORD).await;
        let (status, _) = send(&app, cancel(&admin, "BATCH-2619283-002")).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, get("/api/batches/AGG-2619283", Some(member.as_str()))).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_crop_master() {
        let app = test_app();
        let admin = token(&app, "admin", seed::ADMIN_PASSWORD).await;
        let member = token(&app, "greenearth", seed::MEMBER_PASSWORD).await;

        let (status, _) = send(&app, get("/admin/crops", Some(member.as_str()))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (_, body) = send(&app, get("/admin/crops", Some(admin.as_str()))).await;
        let seeded = body["crops"].as_array().unwrap().len();

        let sunflower = "crop_name=sunflower&crop_id=C006&variety_name=kbsh-44&variety_id=CV006";
        let (status, body) =
            send(&app, authorized(Method::POST, "/admin/crops", &admin, sunflower)).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["message"], "Crop SUNFLOWER added");
        assert_eq!(body["crops"].as_array().unwrap().len(), seeded + 1);

        // the catchment form offers it right away
        let (_, body) = send(&app, get("/api/demographics/crops", None)).await;
        let offered: Vec<&str> = body["crops"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|c| c["crop_name"].as_str())
            .collect();
        assert!(offered.contains(&"SUNFLOWER"));

        let (status, _) =
            send(&app, authorized(Method::POST, "/admin/crops", &admin, sunflower)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, body) =
            send(&app, authorized(Method::POST, "/admin/crops", &admin, "crop_name=Jowar")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "Crop ID is required");

        let (status, body) =
            send(&app, authorized(Method::DELETE, "/admin/crops/C006", &admin, "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["crops"].as_array().unwrap().len(), seeded);
        let (status, _) =
            send(&app, authorized(Method::DELETE, "/admin/crops/C006", &admin, "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
