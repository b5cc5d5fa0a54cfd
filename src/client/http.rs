use std::future::Future;

use reqwest::{Client, RequestBuilder, header::COOKIE};
use serde::de::DeserializeOwned;

use crate::{
    client::{Backend, ClientError},
    management::SESSION_COOKIE,
    types::{Track, UserProfile},
};

/// [`Backend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    session: Option<String>,
}

impl HttpBackend {
    /// Creates a backend client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Where the monthlywrap backend listens; a trailing `/` is dropped
    /// * `session` - Session id to send as the `monthlywrap_session` cookie, if known
    ///
    /// # Example
    ///
    /// ```
    /// let backend = HttpBackend::new("http://localhost:8080/", Some(session_id));
    /// assert_eq!(backend.login_url(), "http://localhost:8080/login");
    /// ```
    pub fn new(base_url: impl Into<String>, session: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_url(&self) -> String {
        format!("{}/login", self.base_url)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let req = self.client.get(format!("{}{}", self.base_url, path));
        match &self.session {
            Some(id) => req.header(COOKIE, format!("{SESSION_COOKIE}={id}")),
            None => req,
        }
    }

    async fn fetch<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ClientError> {
        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(res.json::<T>().await?)
    }
}

impl Backend for HttpBackend {
    fn user_info(&self) -> impl Future<Output = Result<UserProfile, ClientError>> + Send {
        Self::fetch(self.get("/user-info"))
    }

    fn top_tracks(
        &self,
        limit: u8,
    ) -> impl Future<Output = Result<Vec<Track>, ClientError>> + Send {
        Self::fetch(self.get("/top-tracks").query(&[("limit", limit)]))
    }
}
