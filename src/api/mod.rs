pub mod error;
pub mod plans;
pub mod profile;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::services::plan_generation::PlanGenerationService;
use crate::store::ProfileStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: ProfileStore,
    pub plan_generation_service: PlanGenerationService,
    pub generation_in_flight: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: ProfileStore,
        plan_generation_service: PlanGenerationService,
    ) -> Self {
        Self {
            config,
            store,
            plan_generation_service,
            generation_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-plan", post(plans::generate_plan))
        .route(
            "/api/plan",
            get(plans::get_plan)
                .post(plans::create_plan)
                .delete(plans::delete_plan),
        )
        .route(
            "/api/profile",
            get(profile::get_profile)
                .put(profile::replace_profile)
                .patch(profile::update_profile)
                .delete(profile::delete_profile),
        )
        .route("/api/data", delete(profile::reset_data))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::groq::GroqClient;
    use crate::models::plan::WorkoutPlan;
    use crate::services::plan_validator::validate_plan_shape;
    use crate::store::local::LocalStore;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MINIMAL_REPLY: &str =
        r#"{"workout_plan":{"weekly_schedule":[]},"recovery_protocols":{},"nutrition_guidance":{}}"#;

    struct TestApp {
        state: AppState,
        _dir: TempDir,
    }

    impl TestApp {
        fn new(server: &MockServer) -> Self {
            Self::with_config(server, |_| {})
        }

        fn with_config(server: &MockServer, adjust: impl FnOnce(&mut Config)) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let mut config = Config::for_tests(server.uri(), dir.path().to_path_buf());
            adjust(&mut config);

            let store = ProfileStore::new(LocalStore::new(&config.data_dir));
            let service = PlanGenerationService::new(GroqClient::new(&config).unwrap());

            Self {
                state: AppState::new(config, store, service),
                _dir: dir,
            }
        }

        async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            let body = match body {
                Some(json) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };

            let response = router(self.state.clone())
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap();

            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }
    }

    fn alex() -> Value {
        json!({
            "name": "Alex",
            "injuries": ["Sprained ankle"],
            "fitnessGoals": ["Build strength"],
            "fitnessLevel": "Beginner",
            "availableEquipment": ["Dumbbells"],
            "daysPerWeek": 3
        })
    }

    async fn mock_completion(server: &MockServer, content: &str) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            })))
            .mount(server)
            .await;
    }

    async fn mock_upstream_failure(server: &MockServer) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let app = TestApp::new(&server);

        let (status, body) = app.send(Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_generate_plan_fills_defaults() {
        let server = MockServer::start().await;
        mock_completion(&server, MINIMAL_REPLY).await;
        let app = TestApp::new(&server);

        let (status, body) = app
            .send(Method::POST, "/api/generate-plan", Some(alex()))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::to_value(WorkoutPlan::default()).unwrap());
        assert_eq!(validate_plan_shape(&body), Ok(()));
    }

    #[tokio::test]
    async fn test_generate_plan_upstream_failure() {
        let server = MockServer::start().await;
        mock_upstream_failure(&server).await;
        let app = TestApp::new(&server);

        let (status, body) = app
            .send(Method::POST, "/api/generate-plan", Some(alex()))
            .await;

        assert!(!status.is_success());
        assert_eq!(body["error"], "Failed to generate workout plan");
        assert!(body.get("raw_response").is_none());
    }

    #[tokio::test]
    async fn test_generate_plan_parse_failure_exposes_raw_reply_when_enabled() {
        let server = MockServer::start().await;
        mock_completion(&server, "Here you go: workout_plan = ...").await;
        let app = TestApp::with_config(&server, |config| config.expose_raw_responses = true);

        let (status, body) = app
            .send(Method::POST, "/api/generate-plan", Some(alex()))
            .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Failed to parse workout plan");
        assert_eq!(body["raw_response"], "Here you go: workout_plan = ...");
    }

    #[tokio::test]
    async fn test_generate_plan_rejects_bad_profiles() {
        let server = MockServer::start().await;
        let app = TestApp::new(&server);

        let mut profile = alex();
        profile["daysPerWeek"] = json!(9);
        let (status, body) = app
            .send(Method::POST, "/api/generate-plan", Some(profile))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("daysPerWeek"));

        let (status, body) = app
            .send(
                Method::POST,
                "/api/generate-plan",
                Some(json!({"fitnessLevel": "Elite"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_failed_regeneration_keeps_persisted_plan() {
        let server = MockServer::start().await;
        mock_upstream_failure(&server).await;
        let app = TestApp::new(&server);

        let mut previous = WorkoutPlan::default();
        previous.workout_plan.name = "Last week's plan".to_string();
        app.state.store.save_plan(&previous).await.unwrap();
        app.send(Method::PUT, "/api/profile", Some(alex())).await;

        let (status, body) = app.send(Method::POST, "/api/plan", None).await;
        assert!(!status.is_success());
        assert!(body["error"].is_string());

        let (status, body) = app.send(Method::GET, "/api/plan", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["workout_plan"]["name"], "Last week's plan");
    }

    #[tokio::test]
    async fn test_regeneration_persists_new_plan() {
        let server = MockServer::start().await;
        mock_completion(
            &server,
            r#"{"content": {"workout_plan": {"name": "Ankle-Safe Strength", "weekly_schedule": [{"day": "Monday"}]}}}"#,
        )
        .await;
        let app = TestApp::new(&server);
        app.send(Method::PUT, "/api/profile", Some(alex())).await;

        let (status, body) = app.send(Method::POST, "/api/plan", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["workout_plan"]["name"], "Ankle-Safe Strength");

        let (status, stored) = app.send(Method::GET, "/api/plan", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored, body);
        assert!(!app.state.generation_in_flight.load(std::sync::atomic::Ordering::Acquire));
    }

    #[tokio::test]
    async fn test_regeneration_keeps_days_with_messy_exercises() {
        let server = MockServer::start().await;
        mock_completion(
            &server,
            r#"{"workout_plan": {"weekly_schedule": [
                {"day": "Monday", "exercises": [{"name": "Seated Press", "rest_seconds": "as needed"}]},
                {"day": "Wednesday", "exercises": [{"name": "Goblet Squat", "sets": ""}]}
            ]}, "recovery_protocols": {}, "nutrition_guidance": {}}"#,
        )
        .await;
        let app = TestApp::new(&server);
        app.send(Method::PUT, "/api/profile", Some(alex())).await;

        let (status, _) = app.send(Method::POST, "/api/plan", None).await;
        assert_eq!(status, StatusCode::OK);

        let stored = app.state.store.load_plan().await.unwrap().unwrap();
        let days = &stored.workout_plan.weekly_schedule;
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].exercises[0].name, "Seated Press");
        assert_eq!(days[0].exercises[0].rest_seconds, 0);
        assert_eq!(days[1].exercises[0].sets, 0);
    }

    #[tokio::test]
    async fn test_regeneration_requires_onboarding() {
        let server = MockServer::start().await;
        let app = TestApp::new(&server);

        let (status, body) = app.send(Method::POST, "/api/plan", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Complete your profile before generating a workout plan"
        );
    }

    #[tokio::test]
    async fn test_regeneration_conflicts_while_in_flight() {
        let server = MockServer::start().await;
        let app = TestApp::new(&server);
        let _guard = plans::InFlightGuard::acquire(&app.state.generation_in_flight).unwrap();

        let (status, _) = app.send(Method::POST, "/api/plan", None).await;

        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_plan_not_found_then_cleared() {
        let server = MockServer::start().await;
        let app = TestApp::new(&server);

        let (status, body) = app.send(Method::GET, "/api/plan", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());

        app.state.store.save_plan(&WorkoutPlan::default()).await.unwrap();
        let (status, _) = app.send(Method::DELETE, "/api/plan", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.send(Method::GET, "/api/plan", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_lifecycle() {
        let server = MockServer::start().await;
        let app = TestApp::new(&server);

        let (status, body) = app.send(Method::GET, "/api/profile", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["onboarding_complete"], false);
        assert_eq!(body["profile"]["age"], 30);

        let (status, body) = app.send(Method::PUT, "/api/profile", Some(alex())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["onboarding_complete"], true);

        let (status, body) = app
            .send(
                Method::PATCH,
                "/api/profile",
                Some(json!({"daysPerWeek": 5, "fitnessLevel": "Intermediate"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"]["name"], "Alex");
        assert_eq!(body["profile"]["daysPerWeek"], 5);
        assert_eq!(body["profile"]["fitnessLevel"], "Intermediate");

        let (status, _) = app
            .send(Method::PATCH, "/api/profile", Some(json!({"daysPerWeek": 0})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = app.send(Method::GET, "/api/profile", None).await;
        assert_eq!(body["profile"]["daysPerWeek"], 5);

        let (status, _) = app.send(Method::DELETE, "/api/profile", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = app.send(Method::GET, "/api/profile", None).await;
        assert_eq!(body["profile"]["name"], "");
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let server = MockServer::start().await;
        let app = TestApp::new(&server);
        app.send(Method::PUT, "/api/profile", Some(alex())).await;
        app.state.store.save_plan(&WorkoutPlan::default()).await.unwrap();

        let (status, _) = app.send(Method::DELETE, "/api/data", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = app.send(Method::GET, "/api/profile", None).await;
        assert_eq!(body["onboarding_complete"], false);
        let (status, _) = app.send(Method::GET, "/api/plan", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
