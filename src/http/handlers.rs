//! Public endpoint handlers.
//!
//! | Route                  | Upstream calls                                  |
//! |------------------------|-------------------------------------------------|
//! | `GET /news/latest`     | news `/news/{page}/{size}`                      |
//! | `GET /news/filter`     | news `/filter/{page}/{size}/{keyword}`          |
//! | `GET /news/detailed`   | news `/detailed/{id}` + comments `/comments/{id}` |
//! | `POST /comments/store` | moderation `/cens`, then comments `/comments`   |

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};
use reqwest::Method;

use crate::aggregate::{fetch_detailed, paginate};
use crate::http::request::{parse_index, CorrelationId};
use crate::http::response::GatewayError;
use crate::http::server::AppState;
use crate::models::{Comment, DetailedNewsResult, NewsPage, NewsShortDetailed};
use crate::upstream::{Payload, Service, UpstreamError};

type Params = Query<HashMap<String, String>>;

/// `GET /news/latest?page=N`
pub async fn latest(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Query(params): Params,
) -> Result<Json<NewsShortDetailed>, GatewayError> {
    let page: u32 = parse_index(&params, "page")?;
    let page_s = page.to_string();
    let size_s = state.page_size.to_string();

    news_page(&state, &["news", page_s.as_str(), size_s.as_str()], page, &correlation).await
}

/// `GET /news/filter?page=N&keyword=K`
pub async fn filter(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Query(params): Params,
) -> Result<Json<NewsShortDetailed>, GatewayError> {
    let page: u32 = parse_index(&params, "page")?;
    let keyword = params.get("keyword").map(String::as_str).unwrap_or_default();
    let page_s = page.to_string();
    let size_s = state.page_size.to_string();

    news_page(
        &state,
        &["filter", page_s.as_str(), size_s.as_str(), keyword],
        page,
        &correlation,
    )
    .await
}

async fn news_page(
    state: &AppState,
    segments: &[&str],
    page: u32,
    correlation: &CorrelationId,
) -> Result<Json<NewsShortDetailed>, GatewayError> {
    let body = state
        .upstream
        .call(Method::GET, Service::News, segments, correlation, None)
        .await?;
    let listing: NewsPage =
        serde_json::from_slice(&body).map_err(|e| GatewayError::decode(Service::News, e))?;

    Ok(Json(NewsShortDetailed {
        paginator: paginate(listing.count, state.page_size, page),
        posts: listing.posts,
    }))
}

/// `GET /news/detailed?id=N`
pub async fn detailed(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Query(params): Params,
) -> Result<Json<DetailedNewsResult>, GatewayError> {
    let id: u64 = parse_index(&params, "id")?;
    let result = fetch_detailed(&state.upstream, id, &correlation).await?;
    Ok(Json(result))
}

/// `POST /comments/store`
///
/// The comment text goes through moderation first; only accepted comments
/// reach the comment store, whose status code is passed back to the client.
pub async fn store_comment(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    body: Bytes,
) -> Result<StatusCode, GatewayError> {
    let comment: Comment = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::BadRequest(format!("invalid comment: {}", e)))?;

    state
        .upstream
        .call(
            Method::POST,
            Service::Moderation,
            &["cens"],
            &correlation,
            Some(Payload::text(comment.content)),
        )
        .await?;

    let stored = state
        .upstream
        .call(
            Method::POST,
            Service::Comments,
            &["comments"],
            &correlation,
            Some(Payload::json(body)),
        )
        .await;

    match stored {
        Ok(_) => {
            tracing::info!(
                request_id = %correlation,
                post = comment.parent_post,
                "Comment stored"
            );
            Ok(StatusCode::OK)
        }
        Err(UpstreamError::Rejected { status, .. }) => {
            Ok(StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY))
        }
        Err(e) => Err(e.into()),
    }
}
