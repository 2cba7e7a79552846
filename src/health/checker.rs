// src/health/checker.rs
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::fmt;
use tracing::debug;
use url::Url;

/// Basic auth credentials for outgoing check requests.
#[derive(Clone)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    /// `None` when `user` is empty: no auth header is sent in that case.
    pub fn new(user: &str, password: &str) -> Option<Self> {
        if user.is_empty() {
            return None;
        }
        Some(Self {
            user: user.to_string(),
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("check failed with status {status} for url {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// A single pass/fail probe.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self) -> Result<(), CheckError>;
}

/// Issues one GET per call and expects a 200.
pub struct HttpChecker {
    client: Client,
    url: Url,
    credentials: Option<Credentials>,
}

impl HttpChecker {
    pub fn new(client: Client, url: Url, credentials: Option<Credentials>) -> Self {
        Self {
            client,
            url,
            credentials,
        }
    }
}

#[async_trait]
impl Checker for HttpChecker {
    async fn check(&self) -> Result<(), CheckError> {
        check_http_ok(&self.client, &self.url, self.credentials.as_ref()).await
    }
}

pub async fn check_http_ok(
    client: &Client,
    url: &Url,
    credentials: Option<&Credentials>,
) -> Result<(), CheckError> {
    let mut request = client.get(url.clone());
    if let Some(creds) = credentials {
        request = request.basic_auth(&creds.user, Some(&creds.password));
    }

    let response = request.send().await?;
    let status = response.status();
    drain(response, url).await;

    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(CheckError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

/// Read the body to the end, chunk by chunk, so the connection goes back to
/// the pool without buffering the whole document.
async fn drain(mut response: Response, url: &Url) {
    loop {
        match response.chunk().await {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(err) => {
                debug!(%url, %err, "failed to drain check response body");
                break;
            }
        }
    }
}
