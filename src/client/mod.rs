//! Blocking HTTP client for the Marqo vector-search service.
//!
//! The cache only needs three calls from the service: index creation,
//! document insertion and search. They are exposed through the
//! [`VectorSearch`] trait so the cache logic can run against any backend.


pub mod error;

pub use error::{ApiError, INDEX_ALREADY_EXISTS, ServiceError};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::cache::CacheEntry;
use crate::config::MarqoConfig;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Operations the semantic cache needs from a vector-search service
pub trait VectorSearch {
    /// Create an index. Fails with an `index_already_exists` API error when
    /// the index is already present.
    fn create_index(&self, index: &str) -> Result<(), ServiceError>;

    /// Insert documents, vectorizing only `tensor_fields`. With `refresh`
    /// set the documents are searchable as soon as the call returns.
    fn add_documents(
        &self,
        index: &str,
        documents: &[CacheEntry],
        tensor_fields: &[&str],
        refresh: bool,
    ) -> Result<(), ServiceError>;

    /// Run a similarity search, returning hits in the service's ranking order
    fn search(
        &self,
        index: &str,
        request: &SearchRequest<'_>,
    ) -> Result<Vec<SearchHit>, ServiceError>;
}

impl<T: VectorSearch + ?Sized> VectorSearch for &T {
    #[inline]
    fn create_index(&self, index: &str) -> Result<(), ServiceError> {
        (**self).create_index(index)
    }

    #[inline]
    fn add_documents(
        &self,
        index: &str,
        documents: &[CacheEntry],
        tensor_fields: &[&str],
        refresh: bool,
    ) -> Result<(), ServiceError> {
        (**self).add_documents(index, documents, tensor_fields, refresh)
    }

    #[inline]
    fn search(
        &self,
        index: &str,
        request: &SearchRequest<'_>,
    ) -> Result<Vec<SearchHit>, ServiceError> {
        (**self).search(index, request)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub q: &'a str,
    pub searchable_attributes: Vec<&'a str>,
    pub attributes_to_retrieve: Vec<&'a str>,
    pub limit: usize,
    pub offset: usize,
}

/// A single search candidate with its similarity score
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    pub answer: String,
    #[serde(rename = "_score")]
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct HealthInfo {
    #[serde(default)]
    pub message: String,
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddDocumentsRequest<'a> {
    documents: &'a [CacheEntry],
    tensor_fields: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct AddDocumentsResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<DocumentStatus>,
}

#[derive(Debug, Deserialize)]
struct DocumentStatus {
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(default)]
    status: u16,
    code: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Clone)]
pub struct MarqoClient {
    base_url: Url,
    model: Option<String>,
    agent: ureq::Agent,
}

impl MarqoClient {
    #[inline]
    pub fn new(config: &MarqoConfig) -> Result<Self, ServiceError> {
        if config.url.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl(config.url.to_string()));
        }

        Ok(Self {
            base_url: config.url.clone(),
            model: config.model.clone(),
            agent: build_agent(Duration::from_secs(config.timeout_seconds)),
        })
    }

    /// Connect to a service URL with default settings
    #[inline]
    pub fn from_url(url: &str) -> Result<Self, ServiceError> {
        let url = Url::parse(url).map_err(|e| ServiceError::InvalidUrl(format!("{url}: {e}")))?;
        Self::new(&MarqoConfig {
            url,
            ..MarqoConfig::default()
        })
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ping the service root, which reports the running Marqo version
    #[inline]
    pub fn health(&self) -> Result<HealthInfo, ServiceError> {
        debug!("Pinging Marqo at {}", self.base_url);

        let response = self.agent.get(self.base_url.as_str()).call()?;
        let body = read_body(response)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn post_json<T: Serialize>(&self, url: &Url, body: &T) -> Result<String, ServiceError> {
        let request_json = serde_json::to_string(body)?;

        debug!("POST {} ({} bytes)", url, request_json.len());

        let response = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .send(&request_json)?;

        read_body(response)
    }
}

impl VectorSearch for MarqoClient {
    #[inline]
    fn create_index(&self, index: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&["indexes", index])?;
        let request = CreateIndexRequest {
            model: self.model.as_deref(),
        };

        self.post_json(&url, &request)?;
        debug!("Created index {}", index);
        Ok(())
    }

    #[inline]
    fn add_documents(
        &self,
        index: &str,
        documents: &[CacheEntry],
        tensor_fields: &[&str],
        refresh: bool,
    ) -> Result<(), ServiceError> {
        let mut url = self.endpoint(&["indexes", index, "documents"])?;
        if refresh {
            url.query_pairs_mut().append_pair("refresh", "true");
        }

        let request = AddDocumentsRequest {
            documents,
            tensor_fields,
        };

        let response_text = self.post_json(&url, &request)?;
        let response: AddDocumentsResponse = serde_json::from_str(&response_text)?;

        if response.errors {
            if let Some(item) = response.items.into_iter().find(|item| item.status >= 400) {
                warn!("Marqo rejected document {}: status {}", item.id, item.status);
                return Err(ServiceError::DocumentRejected {
                    id: item.id,
                    code: item.code.unwrap_or_default(),
                    message: item.message.or(item.error).unwrap_or_default(),
                });
            }
        }

        debug!("Added {} documents to {}", documents.len(), index);
        Ok(())
    }

    #[inline]
    fn search(
        &self,
        index: &str,
        request: &SearchRequest<'_>,
    ) -> Result<Vec<SearchHit>, ServiceError> {
        let url = self.endpoint(&["indexes", index, "search"])?;

        let response_text = self.post_json(&url, request)?;
        let response: SearchResponse = serde_json::from_str(&response_text)?;

        debug!("Search on {} returned {} hits", index, response.hits.len());
        Ok(response.hits)
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    // Error statuses are read as responses so the JSON error body survives
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

fn read_body(mut response: ureq::http::Response<ureq::Body>) -> Result<String, ServiceError> {
    let status = response.status();
    let body = response.body_mut().read_to_string()?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(ServiceError::Api(ApiError::from_response(status.as_u16(), &body)))
    }
}
