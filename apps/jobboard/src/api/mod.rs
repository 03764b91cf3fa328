//! API client: the single point of entry for all job-board backend calls.
//!
//! Every request goes through `ApiClient::call`, which attaches the session token and a
//! request id, classifies failures into `ClientError`, and clears the session when an
//! authenticated call gets a 401.
//! Nothing here retries: a failed call is reported once and the user decides.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::dedup::InFlightRequests;
use crate::errors::{classify_response, ClientError};
use crate::models::InterviewPrepGuide;
use crate::store::Store;

pub mod applications;
pub mod auth;
pub mod hirer;
pub mod interview;
pub mod jobs;
pub mod resume;

pub use jobs::RecommendationsResponse;
pub use resume::RecalculateResponse;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// The backend calls the score-materialization and interview-prep flows depend on.
///
/// `ApiClient` is the production implementation; the flows take `&dyn JobBoardApi`
/// so they can run against scripted fakes.
#[async_trait]
pub trait JobBoardApi: Send + Sync {
    /// GET /api/recommendations: cached top matches for the current user.
    async fn recommendations(&self) -> Result<RecommendationsResponse, ClientError>;

    /// POST /api/resume/recalculate-scores: queue a rescoring of every job.
    async fn recalculate_scores(&self) -> Result<RecalculateResponse, ClientError>;

    /// GET /api/interview/prepare/:applicationId, a single long-running call.
    async fn interview_prep(&self, application_id: &str)
        -> Result<InterviewPrepGuide, ClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<Store>,
    in_flight: InFlightRequests,
    interview_prep_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &Config, store: Arc<Store>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            store,
            in_flight: InFlightRequests::new(),
            interview_prep_timeout: config.interview_prep_timeout,
        })
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Registry shared with the flows that guard their own requests.
    pub fn in_flight(&self) -> &InFlightRequests {
        &self.in_flight
    }

    /// Sends one request and decodes the JSON response body into `T`.
    ///
    /// `customize` adds the body, query or per-request timeout. An empty success body
    /// decodes as JSON `null`, so `T = ()` works for endpoints that return nothing.
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        customize: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<T, ClientError> {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        let credential_exchange = is_credential_exchange(path);
        let token = self.store.token();
        let authenticated = token.is_some() && !credential_exchange;
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let request = customize(request);

        debug!(%request_id, "{method} {path}");

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(%request_id, "{method} {path} failed: {e}");
                return Err(ClientError::from(e));
            }
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = match classify_response(status, &body) {
                ClientError::Unauthorized(message) if credential_exchange => {
                    warn!(%request_id, "{method} {path} rejected credentials");
                    ClientError::InvalidCredentials(message)
                }
                err @ ClientError::Unauthorized(_) if authenticated => {
                    warn!(%request_id, "{method} {path} returned 401, clearing session");
                    self.store.clear_session();
                    err
                }
                err => {
                    warn!(%request_id, "{method} {path} returned {status}: {err}");
                    err
                }
            };
            return Err(err);
        }

        debug!(%request_id, "{method} {path} -> {status} ({} bytes)", body.len());

        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.call(Method::GET, path, |r| r).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::POST, path, |r| r.json(body)).await
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::PATCH, path, |r| r.json(body)).await
    }
}

#[async_trait]
impl JobBoardApi for ApiClient {
    async fn recommendations(&self) -> Result<RecommendationsResponse, ClientError> {
        self.get("/api/recommendations").await
    }

    async fn recalculate_scores(&self) -> Result<RecalculateResponse, ClientError> {
        self.call(Method::POST, "/api/resume/recalculate-scores", |r| r)
            .await
    }

    async fn interview_prep(
        &self,
        application_id: &str,
    ) -> Result<InterviewPrepGuide, ClientError> {
        self.fetch_interview_prep(application_id).await
    }
}

/// Login and register trade credentials for a token; a 401 there says nothing about
/// the stored session.
fn is_credential_exchange(path: &str) -> bool {
    matches!(path, "/api/auth/login" | "/api/auth/register")
}

/// Everything but RFC 3986 unreserved characters gets escaped inside a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes an id for use as one path segment.
pub(crate) fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}
