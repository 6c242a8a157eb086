#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use characters_backend::config::Config;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// 模拟上游的一次响应
#[derive(Clone)]
pub enum Reply {
    Page(Value),
    Status(u16),
    TooManyRequests(Option<&'static str>),
    Raw(&'static str),
    Hang(Duration),
}

type Script = Arc<dyn Fn(u32, usize) -> Reply + Send + Sync>;

#[derive(Clone)]
struct MockState {
    script: Script,
    hits: Arc<Mutex<Vec<u32>>>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// 本地 axum 服务模拟分页上游
///
/// 脚本参数为（页码，该页第几次被请求，从 1 开始）。
pub struct MockUpstream {
    pub url: String,
    hits: Arc<Mutex<Vec<u32>>>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl MockUpstream {
    pub async fn start<F>(script: F) -> Self
    where
        F: Fn(u32, usize) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let queries = Arc::new(Mutex::new(Vec::new()));

        let state = MockState {
            script: Arc::new(script),
            hits: hits.clone(),
            queries: queries.clone(),
        };
        let app = Router::new()
            .route("/api/character", get(handle))
            .with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/api/character", addr),
            hits,
            queries,
        }
    }

    /// 按请求顺序记录的页码
    pub fn hits(&self) -> Vec<u32> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self) -> usize {
        self.hits.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.queries.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let attempt = {
        let mut hits = state.hits.lock().unwrap();
        hits.push(page);
        hits.iter().filter(|p| **p == page).count()
    };
    state.queries.lock().unwrap().push(params);

    match (state.script)(page, attempt) {
        Reply::Page(body) => Json(body).into_response(),
        Reply::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
        Reply::TooManyRequests(Some(secs)) => {
            (StatusCode::TOO_MANY_REQUESTS, [(header::RETRY_AFTER, secs)]).into_response()
        }
        Reply::TooManyRequests(None) => StatusCode::TOO_MANY_REQUESTS.into_response(),
        Reply::Raw(body) => (StatusCode::OK, body).into_response(),
        Reply::Hang(delay) => {
            tokio::time::sleep(delay).await;
            StatusCode::OK.into_response()
        }
    }
}

pub fn character_json(id: i64, name: &str, origin: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": {"name": origin, "url": ""},
        "location": {"name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3"},
        "image": format!("https://rickandmortyapi.com/api/character/avatar/{}.jpeg", id),
        "episode": ["https://rickandmortyapi.com/api/episode/1"],
        "url": format!("https://rickandmortyapi.com/api/character/{}", id),
        "created": "2017-11-04T18:48:46.250Z"
    })
}

pub fn page_json(pages: u32, results: Vec<Value>) -> Value {
    json!({
        "info": {"count": results.len(), "pages": pages, "next": null, "prev": null},
        "results": results
    })
}

/// 指向模拟上游的配置：无退避、短超时、宽松的出站限流
pub fn test_config(upstream_url: &str) -> Config {
    Config {
        upstream_base_url: upstream_url.to_string(),
        request_timeout_secs: 5,
        retry_initial_backoff_secs: 0,
        retry_max_backoff_secs: 0,
        upstream_rate_limit: 100,
        ..Config::default()
    }
}

/// 一个已关闭的本地端口，连接会被立即拒绝
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/character", addr)
}
