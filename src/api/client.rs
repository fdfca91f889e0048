use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::api::schema::{
    CategoriesResponse, CheckRequest, CheckResponse, QuestionQuery, QuestionsResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::models::QaItem;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// The three calls the client makes against the study server.
#[async_trait]
pub trait StudyApi: Send + Sync {
    async fn categories(&self) -> ApiResult<Vec<String>>;

    async fn questions(&self, query: &QuestionQuery) -> ApiResult<Vec<QaItem>>;

    async fn check(&self, body: &CheckRequest) -> ApiResult<CheckResponse>;
}

/// HTTP transport for the study API.
#[derive(Debug, Clone)]
pub struct StudyClient {
    base_url: Url,
    client: reqwest::Client,
}

impl StudyClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_SERVER_URL
        } else {
            base_url
        };

        let mut base_url =
            Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base.to_string()));
        }
        // Endpoint paths are joined relative to the base, so it has to look like a directory.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder().build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Send `request` and decode a success body into `T`.
    ///
    /// Any non-2xx status is an [`ApiError::Status`]; the body of such a
    /// response is never decoded.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!(endpoint, bytes = body.len(), "response received");
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[async_trait]
impl StudyApi for StudyClient {
    #[instrument(skip(self))]
    async fn categories(&self) -> ApiResult<Vec<String>> {
        let url = self.endpoint("api/categories")?;
        let response: CategoriesResponse = self
            .request("/api/categories", self.client.get(url))
            .await?;
        Ok(response.categories)
    }

    #[instrument(skip(self, query), fields(category = %query.category, mode = query.mode.as_str(), limit = query.limit))]
    async fn questions(&self, query: &QuestionQuery) -> ApiResult<Vec<QaItem>> {
        let mut url = self.endpoint("api/questions")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("category", &query.category)
                .append_pair("mode", query.mode.as_str())
                .append_pair("limit", &query.limit.to_string());
            if let Some(offset) = query.offset {
                pairs.append_pair("offset", &offset.to_string());
            }
        }

        let response: QuestionsResponse = self
            .request("/api/questions", self.client.get(url))
            .await?;
        Ok(response.items)
    }

    #[instrument(skip(self, body), fields(category = %body.category))]
    async fn check(&self, body: &CheckRequest) -> ApiResult<CheckResponse> {
        let url = self.endpoint("api/check")?;
        self.request("/api/check", self.client.post(url).json(body))
            .await
    }
}
