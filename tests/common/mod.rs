//! Shared utilities for integration tests: stub upstreams and a running gateway.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use news_gateway::config::GatewayConfig;
use news_gateway::http::GatewayServer;
use news_gateway::lifecycle::Shutdown;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Calls seen by a stub upstream, as path-and-query strings.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }

    /// `request_id` values of every recorded call, in arrival order.
    pub fn request_ids(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| {
                let url = url::Url::parse(&format!("http://stub{}", call)).unwrap();
                url.query_pairs()
                    .find(|(k, _)| k == "request_id")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }
}

async fn record(State(recorder): State<Recorder>, req: Request, next: Next) -> Response {
    let call = req
        .uri()
        .path_and_query()
        .map(|pq| pq.to_string())
        .unwrap_or_default();
    recorder.0.lock().unwrap().push(call);
    next.run(req).await
}

/// Serve `router` on an ephemeral port, recording every call. Returns the base URL.
pub async fn start_stub(router: Router, recorder: Recorder) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router.layer(from_fn_with_state(recorder, record));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL of a port with nothing listening.
pub fn dead_upstream() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}", listener.local_addr().unwrap())
}

/// Config pointing at the given upstreams, with auditing off.
pub fn gateway_config(news: &str, comments: &str, moderation: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstreams.news = news.to_string();
    config.upstreams.comments = comments.to_string();
    config.upstreams.moderation = moderation.to_string();
    config.timeouts.upstream_ms = 2_000;
    config.audit.enabled = false;
    config
}

/// A gateway running on an ephemeral port.
pub struct Gateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Gateway {
    pub async fn start(config: GatewayConfig) -> Self {
        let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = GatewayServer::new(config).await.unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self { addr, shutdown }
    }

    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn news_item(id: i64) -> Value {
    json!({
        "ID": id,
        "Title": format!("Post {}", id),
        "Content": format!("Body of post {}", id),
        "PubTime": 1_700_000_000 + id,
        "Link": format!("https://news.example/{}", id),
    })
}

pub fn comment(id: i64, post: i64) -> Value {
    json!({
        "ID": id,
        "Author": "reader",
        "Content": format!("Comment {} on {}", id, post),
        "PubTime": 1_700_000_100 + id,
        "ParentPost": post,
        "ParentComment": 0,
    })
}
