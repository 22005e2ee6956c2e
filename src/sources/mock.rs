//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::sources::{LiteratureSource, SourceError};

/// A mock source for testing that returns predefined responses.
#[derive(Debug, Default)]
pub struct MockSource {
    ids: Mutex<Vec<String>>,
    corpus: Mutex<String>,
    failure: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that answers every search with `ids` and every fetch with `corpus`.
    pub fn with_corpus(ids: &[&str], corpus: impl Into<String>) -> Self {
        let source = Self::new();
        source.set_ids(ids.iter().map(|id| id.to_string()).collect());
        source.set_corpus(corpus);
        source
    }

    /// Set the ids returned by `search`.
    pub fn set_ids(&self, ids: Vec<String>) {
        *self.ids.lock().unwrap() = ids;
    }

    /// Set the text returned by `fetch_records`.
    pub fn set_corpus(&self, corpus: impl Into<String>) {
        *self.corpus.lock().unwrap() = corpus.into();
    }

    /// Make every call fail with a network error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Calls received so far, formatted as `search:<query>:<limit>` or `fetch:<ids>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), SourceError> {
        match &*self.failure.lock().unwrap() {
            Some(message) => Err(SourceError::Network(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LiteratureSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        _identity: &str,
    ) -> Result<Vec<String>, SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("search:{}:{}", query, limit));
        self.check_failure()?;

        let ids = self.ids.lock().unwrap();
        Ok(ids.iter().take(limit).cloned().collect())
    }

    async fn fetch_records(&self, ids: &[String], _identity: &str) -> Result<String, SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("fetch:{}", ids.join(",")));
        self.check_failure()?;

        Ok(self.corpus.lock().unwrap().clone())
    }
}
