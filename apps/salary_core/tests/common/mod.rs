#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use salary_core::{ensure_schema, router, AppState, JwtCfg};
use salary_ml::{LinearModel, ModelInvoker};
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &[u8] = b"test-secret";

/// salary = 5000 + 100 * test + 200 * interview + 3000 * years
pub fn salary_model() -> ModelInvoker {
    ModelInvoker::new(LinearModel::new([100.0, 200.0, 3000.0], 5000.0).unwrap())
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn spawn_app(model: ModelInvoker) -> TestApp {
    // one pooled connection, or each would see its own empty in-memory db
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    ensure_schema(&db).await.unwrap();

    let state = AppState::new(db, SECRET, JwtCfg::default(), model);
    TestApp {
        app: router(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method(Method::GET).uri(path);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        self.send(req.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/register",
            serde_json::json!({ "username": username, "email": email, "password": password }),
            None,
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        let form = format!("username={username}&password={password}");
        let req = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        self.send(req).await
    }

    /// Register `username` and return a fresh access token for it.
    pub async fn signed_in(&self, username: &str) -> String {
        let created = self
            .register(username, &format!("{username}@example.com"), "secret1")
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);

        let resp = self.login(username, "secret1").await;
        assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
        resp.body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn predict(&self, token: &str, t: f64, i: f64, y: f64) -> TestResponse {
        self.post_json(
            "/predict",
            serde_json::json!({ "test_score": t, "interview_score": i, "years_experience": y }),
            Some(token),
        )
        .await
    }
}
