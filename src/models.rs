//! Wire shapes exchanged with clients and backend services.
//!
//! Field names follow the JSON the backends already speak (`ID`, `PubTime`, ...).
//! The gateway never interprets these records beyond encode/decode.

use serde::{Deserialize, Deserializer, Serialize};

use crate::aggregate::pagination::PageDescriptor;

/// A single news publication.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Content")]
    pub content: String,
    /// Publication time, seconds since epoch.
    #[serde(rename = "PubTime")]
    pub pub_time: i64,
    #[serde(rename = "Link")]
    pub link: String,
}

/// A comment on a news item, optionally replying to another comment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "PubTime")]
    pub pub_time: i64,
    #[serde(rename = "ParentPost")]
    pub parent_post: i64,
    #[serde(rename = "ParentComment")]
    pub parent_comment: i64,
}

/// One page of posts as reported by the news service.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsPage {
    /// Total number of posts matching the query, across all pages.
    #[serde(rename = "Count")]
    pub count: u64,
    #[serde(rename = "Posts", default, deserialize_with = "null_as_empty")]
    pub posts: Vec<NewsItem>,
}

/// Client-facing list response (`/news/latest`, `/news/filter`).
#[derive(Debug, Clone, Serialize)]
pub struct NewsShortDetailed {
    #[serde(rename = "PostsArr")]
    pub posts: Vec<NewsItem>,
    #[serde(rename = "Paginator")]
    pub paginator: PageDescriptor,
}

/// Client-facing detailed response: one post merged with its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedNewsResult {
    #[serde(rename = "Post")]
    pub post: NewsItem,
    #[serde(rename = "CommentsArr")]
    pub comments: Vec<Comment>,
}

/// Decode a comment list, treating `null` as no comments.
pub fn decode_comments(bytes: &[u8]) -> Result<Vec<Comment>, serde_json::Error> {
    let comments: Option<Vec<Comment>> = serde_json::from_slice(bytes)?;
    Ok(comments.unwrap_or_default())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
