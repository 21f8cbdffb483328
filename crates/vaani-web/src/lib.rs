//! Vaani Web Server
//!
//! Axum-based surfaces over the Vaani pipeline: the JSON query API, the
//! WhatsApp webhook, status endpoints and visualization snapshots.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod twiml;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use vaani_core::{ConversationStore, GraphStore};

pub use config::{AppConfig, ServerConfig};
use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let query_routes = Router::new()
        .route("/query", post(routes::query::ask))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/stats", get(routes::status::stats))
        .route("/explore/{category}", get(routes::explore::explore))
        .route("/space/iss", get(routes::space::iss))
        .route("/space/satellites", get(routes::space::satellites))
        .with_state(state.clone());

    Router::new()
        .merge(query_routes)
        .route("/whatsapp", post(routes::whatsapp::webhook))
        .route("/webhook/whatsapp", post(routes::whatsapp::webhook))
        .route("/whatsapp/status", get(routes::whatsapp::bot_status))
        .route("/health", get(routes::status::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Periodically evict expired and excess conversation contexts.
pub fn spawn_sweeper(conversations: ConversationStore, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            conversations.sweep();
        }
    })
}

/// Run the web server.
pub async fn run_server(store: Arc<dyn GraphStore>, config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::new(store, &config);
    let sweeper = spawn_sweeper(
        state.conversations().clone(),
        Duration::from_secs(config.server.sweep_interval_secs.max(1)),
    );
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(api_key = config.server.api_key.is_some(), "Web server listening on http://{}", addr);

    let served = axum::serve(listener, app).await;
    sweeper.abort();
    served?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use vaani_core::{BoundQuery, Row, StoreError};

    use super::*;

    /// Answers every query with the same rows, or fails when `down`.
    struct FakeStore {
        rows: Vec<Row>,
        down: bool,
        runs: AtomicUsize,
    }

    impl FakeStore {
        fn with(rows: Vec<Value>) -> Arc<Self> {
            let rows = rows
                .into_iter()
                .map(|v| serde_json::from_value(v).unwrap())
                .collect();
            Arc::new(Self { rows, down: false, runs: AtomicUsize::new(0) })
        }

        fn down() -> Arc<Self> {
            Arc::new(Self { rows: Vec::new(), down: true, runs: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl GraphStore for FakeStore {
        async fn run(&self, _query: &BoundQuery) -> Result<Vec<Row>, StoreError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.down {
                Err(StoreError::Unavailable("connection refused".into()))
            } else {
                Ok(self.rows.clone())
            }
        }

        async fn reconnect(&self) -> Result<(), StoreError> {
            if self.down {
                Err(StoreError::Unavailable("connection refused".into()))
            } else {
                Ok(())
            }
        }

        async fn ping(&self) -> bool {
            !self.down
        }
    }

    fn app(store: Arc<FakeStore>, api_key: Option<&str>) -> Router {
        let mut config = AppConfig::default();
        config.server.api_key = api_key.map(String::from);
        create_router(AppState::new(store, &config))
    }

    fn query_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_query_count() {
        let store = FakeStore::with(vec![json!({"count": 12})]);
        let response = app(store, None)
            .oneshot(query_request(json!({"text": "How many satellites did ISRO launch in 2023?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["answer_text"].as_str().unwrap().contains("12"));
        assert_eq!(body["structured_data"]["kind"], "count");
        assert!(body["confidence"].as_f64().unwrap() > 0.5);
    }

    #[tokio::test]
    async fn test_query_unknown_skips_store() {
        let store = FakeStore::with(Vec::new());
        let response = app(store.clone(), None)
            .oneshot(query_request(json!({"text": "asdkjasd"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["confidence"], 0.0);
        assert_eq!(store.runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_query_rejects_oversized_and_empty() {
        let store = FakeStore::with(Vec::new());
        let long = "x".repeat(1001);
        let response = app(store.clone(), None)
            .oneshot(query_request(json!({"text": long})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "malformed_input");

        let response = app(store, None).oneshot(query_request(json!({"text": ""}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_down_is_503_without_detail() {
        let response = app(FakeStore::down(), None)
            .oneshot(query_request(json!({"text": "List ISRO satellites"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert!(!body["message"].as_str().unwrap().contains("refused"));
    }

    #[tokio::test]
    async fn test_api_key_guard() {
        let store = FakeStore::with(vec![json!({"count": 3})]);
        let request = query_request(json!({"text": "How many missions?"}));
        let response = app(store.clone(), Some("s3cret")).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let mut request = query_request(json!({"text": "How many missions?"}));
        request.headers_mut().insert(auth::API_KEY_HEADER, "s3cret".parse().unwrap());
        let response = app(store, Some("s3cret")).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_whatsapp_webhook_replies_twiml() {
        let store = FakeStore::with(Vec::new());
        let request = Request::builder()
            .method("POST")
            .uri("/whatsapp")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("Body=hello&From=whatsapp%3A%2B919876543210&MessageSid=SM1"))
            .unwrap();
        let app = app(store, None);
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
        let xml = body_text(response).await;
        assert!(xml.contains("<Response><Message>🚀 *Vaani* - Space Knowledge AI"));
        assert!(xml.contains("Namaste"));

        let status = app
            .oneshot(Request::builder().uri("/whatsapp/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(status).await;
        assert_eq!(body["active_conversations"], 1);
        assert_eq!(body["bot_name"], "Vaani");
    }

    #[tokio::test]
    async fn test_whatsapp_store_failure_still_twiml() {
        let request = Request::builder()
            .method("POST")
            .uri("/webhook/whatsapp")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("Body=List+ISRO+satellites&From=whatsapp%3A%2B1555"))
            .unwrap();
        let response = app(FakeStore::down(), None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let xml = body_text(response).await;
        assert!(xml.contains("try again"));
        assert!(!xml.contains("refused"));
    }

    #[tokio::test]
    async fn test_health_reports_graph() {
        let response = app(FakeStore::down(), None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["graph"], false);
    }

    #[tokio::test]
    async fn test_stats_breakdown() {
        let store = FakeStore::with(vec![
            json!({"label": "Satellite", "count": 40}),
            json!({"label": "Mission", "count": 12}),
        ]);
        let response = app(store, None)
            .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["kind"], "breakdown");
        assert_eq!(body["total"], 52);
    }

    #[tokio::test]
    async fn test_explore_unknown_category_404() {
        let response = app(FakeStore::with(Vec::new()), None)
            .oneshot(Request::builder().uri("/api/explore/planets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_explore_missions() {
        let store = FakeStore::with(vec![json!({"name": "Chandrayaan-3", "label": "Mission", "date": "2023-07-14"})]);
        let response = app(store, None)
            .oneshot(Request::builder().uri("/api/explore/missions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "listing");
        assert_eq!(body["items"][0]["name"], "Chandrayaan-3");
    }

    #[tokio::test]
    async fn test_satellite_catalog() {
        let response = app(FakeStore::with(Vec::new()), None)
            .oneshot(Request::builder().uri("/api/space/satellites").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), vaani_space::CATALOG.len());
        assert_eq!(body[0]["norad_id"], 25544);
    }
}
