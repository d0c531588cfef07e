//! The context-augmented query workflow's search collaborator.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::EndpointConfig;
use crate::error::{Error, Result};

/// Context substituted when the search collaborator fails or finds nothing.
pub const NO_RESULTS_CONTEXT: &str = "I couldn't find specific information about that.";

/// One retrieval hit from the search collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub url: String,
    pub content: String,
}

/// External search/retrieval collaborator.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
    error: Option<String>,
}

/// HTTP implementation of [`SearchProvider`].
#[derive(Debug, Clone)]
pub struct HttpSearchProvider {
    client: Client,
    search_url: String,
}

impl HttpSearchProvider {
    #[must_use]
    pub fn new(config: &EndpointConfig) -> Self {
        Self {
            client: Client::new(),
            search_url: config.search_url.clone(),
        }
    }
}

#[async_trait]
impl SearchProvider for HttpSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .post(&self.search_url)
            .json(&SearchRequest { query })
            .send()
            .await
            .map_err(|err| Error::Search(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Search(format!("search failed: {status}")));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|err| Error::Search(err.to_string()))?;
        if let Some(message) = body.error {
            return Err(Error::Search(message));
        }
        Ok(body.results)
    }
}

/// Join result entries as `"From {url}: {content}"` paragraphs.
pub(crate) fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| format!("From {}: {}", result.url, result.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Embed the question and retrieved context into the instruction template.
pub(crate) fn build_instructions(question: &str, context: &str) -> String {
    format!(
        "The user asked: \"{question}\"\n\n\
         Here's what I found online:\n{context}\n\n\
         Please provide a helpful answer based on this information. \
         If the information doesn't cover the question, say you couldn't \
         find specific details rather than guessing."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_joins_entries_with_blank_lines() {
        let results = vec![
            SearchResult {
                url: "a".to_string(),
                content: "x".to_string(),
            },
            SearchResult {
                url: "b".to_string(),
                content: "y".to_string(),
            },
        ];
        assert_eq!(build_context(&results), "From a: x\n\nFrom b: y");
    }

    #[test]
    fn instructions_embed_question_and_context() {
        let instructions = build_instructions("what is rust?", "From a: x");
        assert!(instructions.contains("what is rust?"));
        assert!(instructions.contains("From a: x"));
    }
}
