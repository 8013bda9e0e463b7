// API client module: a small blocking HTTP client that talks to a Your
// Snippets API. It knows two endpoints, the token endpoint used as a
// credential check and the image endpoint used for the upload itself.
// Neither call turns a non-success status into an error; the pipeline
// decides what each status means.

use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Serialize;

use crate::config::Configuration;

/// Timeout applied to each request unless the caller picks another one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// MIME type declared for every uploaded image, whatever its real format.
/// The images endpoint has always been sent this literal value.
pub const DECLARED_MIME: &str = "image/jpeg";

/// Transport settings for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Skip TLS certificate verification (self-signed API hosts).
    pub insecure: bool,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// What came back from one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiStatus {
    /// The server answered with this HTTP status code.
    Http(u16),
    /// No HTTP response at all: DNS, refused connection, TLS, timeout.
    NetworkFailure(String),
}

impl ApiStatus {
    fn is(&self, code: u16) -> bool {
        matches!(self, ApiStatus::Http(c) if *c == code)
    }
}

/// Result of the token call. Only a 200 authorizes the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub status: ApiStatus,
}

impl AuthResult {
    pub fn authorized(&self) -> bool {
        self.status.is(200)
    }
}

/// Result of the image call. Only a 201 counts as uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub status: ApiStatus,
}

impl UploadResult {
    pub fn succeeded(&self) -> bool {
        self.status.is(201)
    }
}

/// Body of `POST {base}/token/`.
#[derive(Serialize, Debug)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// One entry of the `images` list.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ImageRecord {
    pub image: String,
}

impl ImageRecord {
    /// `file_name:{slug},data:image/jpeg;base64,{payload}`
    pub fn new(slug: &str, encoded_payload: &str) -> Self {
        ImageRecord {
            image: format!("file_name:{slug},data:{DECLARED_MIME};base64,{encoded_payload}"),
        }
    }
}

/// Body of `POST {base}/add/images/`.
#[derive(Serialize, Debug)]
pub struct AddImagesRequest<'a> {
    pub url: &'a str,
    pub images: Vec<ImageRecord>,
}

/// The two calls the pipeline needs from a Your Snippets API.
#[cfg_attr(test, mockall::automock)]
pub trait SnippetsApi {
    /// Post the credentials to the token endpoint.
    fn authenticate(&self, config: &Configuration) -> AuthResult;

    /// Post one encoded image for `target_url`, using Basic Auth.
    fn submit(
        &self,
        config: &Configuration,
        target_url: &str,
        slug: &str,
        encoded_payload: &str,
    ) -> UploadResult;
}

/// Blocking reqwest client for the Your Snippets API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Build a client with the given transport options.
    pub fn new(options: &ClientOptions) -> Result<Self> {
        if options.insecure {
            warn!("TLS certificate verification is disabled for API calls");
        }
        let client = Client::builder()
            .default_headers(json_headers())
            .danger_accept_invalid_certs(options.insecure)
            .timeout(options.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client })
    }

    fn status_of(&self, what: &str, res: reqwest::Result<reqwest::blocking::Response>) -> ApiStatus {
        match res {
            Ok(res) => {
                let code = res.status().as_u16();
                debug!("{} request returned HTTP {}", what, code);
                ApiStatus::Http(code)
            }
            Err(e) => {
                info!("{} request failed: {}", what, e);
                ApiStatus::NetworkFailure(e.to_string())
            }
        }
    }
}

impl SnippetsApi for ApiClient {
    fn authenticate(&self, config: &Configuration) -> AuthResult {
        let url = config.token_url();
        debug!("POST {}", url);
        let body = TokenRequest {
            username: &config.username,
            password: &config.password,
        };
        let res = self.client.post(&url).json(&body).send();
        AuthResult {
            status: self.status_of("Token", res),
        }
    }

    fn submit(
        &self,
        config: &Configuration,
        target_url: &str,
        slug: &str,
        encoded_payload: &str,
    ) -> UploadResult {
        let url = config.images_url();
        debug!("POST {} ({} base64 chars)", url, encoded_payload.len());
        let body = AddImagesRequest {
            url: target_url,
            images: vec![ImageRecord::new(slug, encoded_payload)],
        };
        let res = self
            .client
            .post(&url)
            .basic_auth(&config.username, Some(&config.password))
            .json(&body)
            .send();
        UploadResult {
            status: self.status_of("Upload", res),
        }
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}
