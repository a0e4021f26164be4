
pub mod selection;

pub use selection::select_best_match;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::{MarqoClient, SearchRequest, ServiceError, VectorSearch};
use crate::config::{CacheConfig, Config};
use crate::{CacheError, Result};

/// Field holding the answer returned on a cache hit
pub const ANSWER_FIELD: &str = "answer";
/// The only field vectorized for similarity search
pub const REPHRASED_QUERY_FIELD: &str = "rephrased_query";

/// A question/answer pair as stored in the vector-search index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub question: String,
    pub answer: String,
    pub rephrased_query: String,
}

impl CacheEntry {
    #[inline]
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        rephrased_query: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            rephrased_query: rephrased_query.into(),
        }
    }
}

/// Semantic cache of LLM answers kept in a vector-search index.
///
/// Answers are matched on the similarity between an incoming question and the
/// rephrased query stored with each entry. The backing index is created when
/// the cache is constructed, and reused if another process created it first.
#[derive(Debug)]
pub struct SemanticCache<C = MarqoClient> {
    client: C,
    index_name: String,
    top_k: usize,
    score_threshold: f64,
}

impl SemanticCache<MarqoClient> {
    /// Connect to the Marqo instance described by `config` and ensure the
    /// cache index exists
    #[inline]
    pub fn connect(config: &Config) -> Result<Self> {
        let client = MarqoClient::new(&config.marqo)?;
        Self::with_client(client, &config.cache)
    }
}

impl<C: VectorSearch> SemanticCache<C> {
    #[inline]
    pub fn with_client(client: C, settings: &CacheConfig) -> Result<Self> {
        let cache = Self {
            client,
            index_name: settings.index_name.clone(),
            top_k: settings.top_k,
            score_threshold: settings.score_threshold,
        };
        cache.ensure_index_exists()?;
        Ok(cache)
    }

    fn ensure_index_exists(&self) -> Result<()> {
        match self.client.create_index(&self.index_name) {
            Ok(()) => {
                info!("Created cache index '{}'", self.index_name);
                Ok(())
            }
            Err(e) if e.is_index_already_exists() => {
                info!(
                    "Index '{}' already exists, reusing it for the cache",
                    self.index_name
                );
                Ok(())
            }
            Err(e @ ServiceError::Api(_)) => Err(CacheError::Initialization {
                index: self.index_name.clone(),
                source: e,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Store an answer under its rephrased query.
    ///
    /// Every call inserts a new document; identical questions are not
    /// deduplicated.
    #[inline]
    pub fn store(&self, question: &str, answer: &str, rephrased_query: &str) -> Result<()> {
        if rephrased_query.trim().is_empty() {
            warn!("Storing cache entry with an empty rephrased query; it will never match");
        }

        let entry = CacheEntry::new(question, answer, rephrased_query);
        self.client.add_documents(
            &self.index_name,
            std::slice::from_ref(&entry),
            &[REPHRASED_QUERY_FIELD],
            true,
        )?;

        debug!("Stored answer for question: {}", question);
        Ok(())
    }

    /// Find a cached answer for `question`.
    ///
    /// Up to `top_k` candidates are requested (`None` uses the cache default)
    /// and the best one scoring at least `score_threshold` is returned.
    #[inline]
    pub fn lookup(
        &self,
        question: &str,
        score_threshold: f64,
        top_k: Option<usize>,
    ) -> Result<Option<String>> {
        let limit = top_k.unwrap_or(self.top_k);

        let request = SearchRequest {
            q: question,
            searchable_attributes: vec![REPHRASED_QUERY_FIELD],
            attributes_to_retrieve: vec![ANSWER_FIELD],
            limit,
            offset: 0,
        };

        let hits = self.client.search(&self.index_name, &request)?;
        let candidates = hits.len();
        let answer = select_best_match(hits, score_threshold);

        debug!(
            "Lookup over {} candidates (threshold {}): {}",
            candidates,
            score_threshold,
            if answer.is_some() { "hit" } else { "miss" }
        );

        Ok(answer)
    }

    /// [`lookup`](Self::lookup) with the configured threshold and fan-out
    #[inline]
    pub fn lookup_with_defaults(&self, question: &str) -> Result<Option<String>> {
        self.lookup(question, self.score_threshold, None)
    }

    #[inline]
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    #[inline]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    #[inline]
    pub fn score_threshold(&self) -> f64 {
        self.score_threshold
    }

    #[inline]
    pub fn client(&self) -> &C {
        &self.client
    }
}
