use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::serializable::*;

const ACCEPT: &str = "application/json";

/// Read-only access to users, posts, and comments.
///
/// A zero id is treated as "nothing selected": collection calls return an
/// empty list and [`Source::user`] returns `None`, without any request.
#[async_trait]
pub trait Source: Send + Sync {
    async fn users(&self) -> Result<Vec<User>>;
    async fn user(&self, id: u32) -> Result<Option<User>>;
    async fn user_posts(&self, user_id: u32) -> Result<Vec<Post>>;
    async fn post_comments(&self, post_id: u32) -> Result<Vec<Comment>>;
}

pub struct Client {
    http: reqwest::Client,
    base_url: String,
    delay: Duration,
}

impl Client {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| Error::Request {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            delay: Duration::from_millis(config.request_delay_ms),
        })
    }

    async fn make_request<T: DeserializeOwned>(&self, path: &str, filter: Option<(&str, u32)>) -> Result<T> {
        let url = match filter {
            Some((key, id)) => format!("{}/{}?{}={}", self.base_url, path, key, id),
            None => format!("{}/{}", self.base_url, path),
        };
        tracing::debug!(%url, "GET");

        let response = self.http.get(&url).send().await.map_err(|source| Error::Request {
            url: url.clone(),
            source,
        })?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status { url, status });
        }

        let body = response.bytes().await.map_err(|source| Error::Request {
            url: url.clone(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| Error::Decode { url, source })
    }
}

#[async_trait]
impl Source for Client {
    async fn users(&self) -> Result<Vec<User>> {
        self.make_request("users", None).await
    }

    async fn user(&self, id: u32) -> Result<Option<User>> {
        if id == 0 {
            tracing::debug!("no user id, skipping user request");
            return Ok(None);
        }
        self.make_request(&format!("users/{id}"), None).await.map(Some)
    }

    async fn user_posts(&self, user_id: u32) -> Result<Vec<Post>> {
        if user_id == 0 {
            tracing::debug!("no user id, skipping posts request");
            return Ok(Vec::new());
        }
        self.make_request("posts", Some(("userId", user_id))).await
    }

    async fn post_comments(&self, post_id: u32) -> Result<Vec<Comment>> {
        if post_id == 0 {
            tracing::debug!("no post id, skipping comments request");
            return Ok(Vec::new());
        }
        self.make_request("comments", Some(("postId", post_id))).await
    }
}
