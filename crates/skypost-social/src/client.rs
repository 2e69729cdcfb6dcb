//! X (Twitter) API v2 client.

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use url::Url;

use crate::error::PostError;
use crate::oauth::{OAuthCredentials, OAuthSigner};

pub const X_API_URL: &str = "https://api.twitter.com/";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("skypost/", env!("CARGO_PKG_VERSION"));

/// Identifier of a published post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub id: String,
    pub text: String,
}

/// Something that can publish a single text post.
pub trait Publisher {
    fn publish(&self, text: &str) -> impl Future<Output = Result<PostReceipt, PostError>> + Send;
}

#[derive(Debug, Serialize)]
struct CreatePostRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: Option<PostReceipt>,
}

/// X API client authenticated as one user via OAuth 1.0a.
#[derive(Debug, Clone)]
pub struct XClient {
    base_url: Url,
    client: Arc<Client>,
    signer: OAuthSigner,
}

impl XClient {
    pub fn new(credentials: OAuthCredentials) -> Result<Self, PostError> {
        Self::with_base_url(X_API_URL, credentials)
    }

    pub fn with_base_url(base_url: &str, credentials: OAuthCredentials) -> Result<Self, PostError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        Ok(Self {
            base_url,
            client: Arc::new(client),
            signer: OAuthSigner::new(credentials),
        })
    }

    /// Check response status and extract error
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response, PostError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!("X API error ({}): {}", status, detail);
            return Err(PostError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response)
    }
}

impl Publisher for XClient {
    #[instrument(skip(self, text), fields(chars = text.chars().count()), level = "info")]
    async fn publish(&self, text: &str) -> Result<PostReceipt, PostError> {
        let url = self.base_url.join("2/tweets")?;
        // JSON bodies are not part of the OAuth 1.0a signature
        let authorization = self.signer.authorization_header("POST", &url, &[])?;

        let response = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, authorization)
            .json(&CreatePostRequest { text })
            .send()
            .await?;
        let response = self.check_response(response).await?;

        let body: CreatePostResponse = response
            .json()
            .await
            .map_err(|e| PostError::InvalidResponse(format!("JSON parse error: {}", e)))?;
        let receipt = body
            .data
            .ok_or_else(|| PostError::InvalidResponse("response carried no post data".to_string()))?;

        tracing::info!("Published post {}", receipt.id);
        Ok(receipt)
    }
}
