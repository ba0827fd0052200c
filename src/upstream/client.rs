//! HTTP client for the backend services.
//!
//! # Responsibilities
//! - Build target URLs from the configured base address and path segments
//! - Forward the correlation ID as the `request_id` query parameter
//! - Enforce the per-call deadline
//! - Classify outcomes: transport failure, non-200 status, success
//!
//! The client never retries and never looks inside the body.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::config::{TimeoutConfig, UpstreamsConfig};
use crate::http::request::{CorrelationId, REQUEST_ID_PARAM};
use crate::observability::metrics;
use crate::resilience::with_deadline;
use crate::upstream::types::{ClientInitError, Payload, Service, UpstreamError, UpstreamResult};

/// Parsed base URLs of every backend.
#[derive(Debug, Clone)]
pub struct Endpoints {
    news: Url,
    comments: Url,
    moderation: Url,
}

impl Endpoints {
    /// Parse the configured base addresses.
    pub fn from_config(config: &UpstreamsConfig) -> Result<Self, ClientInitError> {
        let parse = |service: Service, raw: &str| {
            Url::parse(raw).map_err(|source| ClientInitError::InvalidUrl { service, source })
        };
        Ok(Self {
            news: parse(Service::News, &config.news)?,
            comments: parse(Service::Comments, &config.comments)?,
            moderation: parse(Service::Moderation, &config.moderation)?,
        })
    }

    fn base(&self, service: Service) -> &Url {
        match service {
            Service::News => &self.news,
            Service::Comments => &self.comments,
            Service::Moderation => &self.moderation,
        }
    }

    /// Target URL for `segments` on `service`, tagged with the correlation ID.
    ///
    /// Each segment is percent-encoded on its own, so a keyword containing `/`
    /// or spaces stays a single path segment.
    pub fn url_for(
        &self,
        service: Service,
        segments: &[&str],
        correlation: &CorrelationId,
    ) -> UpstreamResult<Url> {
        let mut url = self.base(service).clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Unreachable {
                service,
                reason: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair(REQUEST_ID_PARAM, correlation.as_str());
        Ok(url)
    }
}

/// Shared client for all upstream calls. Cheap to clone.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoints: Arc<Endpoints>,
    deadline: Duration,
}

impl UpstreamClient {
    /// Create a client from the upstream and timeout configuration.
    pub fn new(upstreams: &UpstreamsConfig, timeouts: &TimeoutConfig) -> Result<Self, ClientInitError> {
        let http = reqwest::Client::builder()
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            http,
            endpoints: Arc::new(Endpoints::from_config(upstreams)?),
            deadline: Duration::from_millis(timeouts.upstream_ms),
        })
    }

    /// Perform one call and return the body of a 200 response.
    pub async fn call(
        &self,
        method: Method,
        service: Service,
        segments: &[&str],
        correlation: &CorrelationId,
        payload: Option<Payload>,
    ) -> UpstreamResult<Bytes> {
        let url = self.endpoints.url_for(service, segments, correlation)?;
        let start = Instant::now();

        tracing::debug!(
            request_id = %correlation,
            service = %service,
            method = %method,
            url = %url,
            "Calling upstream"
        );

        let mut request = self.http.request(method, url);
        if let Some(payload) = payload {
            request = request
                .header(CONTENT_TYPE, payload.content_type)
                .body(payload.bytes);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let result = match with_deadline(self.deadline, exchange).await {
            Err(expired) => Err(UpstreamError::Unreachable {
                service,
                reason: expired.to_string(),
            }),
            Ok(Err(e)) => Err(UpstreamError::Unreachable {
                service,
                reason: e.to_string(),
            }),
            Ok(Ok((status, body))) if status == StatusCode::OK => Ok(body),
            Ok(Ok((status, body))) => Err(UpstreamError::Rejected {
                service,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(UpstreamError::Unreachable { .. }) => "unreachable",
            Err(UpstreamError::Rejected { .. }) => "rejected",
        };
        metrics::record_upstream_call(service, outcome, start);

        if let Err(e) = &result {
            tracing::warn!(
                request_id = %correlation,
                service = %service,
                elapsed_ms = start.elapsed().as_millis() as u64,
                error = %e,
                "Upstream call failed"
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(news: &str) -> Endpoints {
        Endpoints::from_config(&UpstreamsConfig {
            news: news.to_string(),
            ..UpstreamsConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_carries_segments_and_request_id() {
        let id = CorrelationId::from("abc123");
        let url = endpoints("http://127.0.0.1:8081")
            .url_for(Service::News, &["news", "2", "15"], &id)
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8081/news/2/15?request_id=abc123");
    }

    #[test]
    fn test_base_path_is_preserved() {
        let id = CorrelationId::from("x");
        let url = endpoints("http://news.internal/api/")
            .url_for(Service::News, &["detailed", "7"], &id)
            .unwrap();
        assert_eq!(url.as_str(), "http://news.internal/api/detailed/7?request_id=x");
    }

    #[test]
    fn test_keyword_is_one_encoded_segment() {
        let id = CorrelationId::from("x");
        let url = endpoints("http://127.0.0.1:8081")
            .url_for(Service::News, &["filter", "0", "15", "rust/go lang"], &id)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8081/filter/0/15/rust%2Fgo%20lang?request_id=x"
        );
    }

    #[test]
    fn test_routes_by_service() {
        let id = CorrelationId::from("x");
        let table = endpoints("http://127.0.0.1:8081");
        let url = table.url_for(Service::Moderation, &["cens"], &id).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8083/cens?request_id=x");
        let url = table.url_for(Service::Comments, &["comments", "3"], &id).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8082/comments/3?request_id=x");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Endpoints::from_config(&UpstreamsConfig {
            comments: "::not a url::".to_string(),
            ..UpstreamsConfig::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ClientInitError::InvalidUrl { service: Service::Comments, .. }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = UpstreamClient::new(
            &UpstreamsConfig {
                news: format!("http://127.0.0.1:{}", port),
                ..UpstreamsConfig::default()
            },
            &TimeoutConfig::default(),
        )
        .unwrap();

        let err = client
            .call(Method::GET, Service::News, &["detailed", "1"], &CorrelationId::from("x"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Unreachable { service: Service::News, .. }));
    }
}
