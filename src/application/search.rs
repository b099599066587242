//! Title search over published posts.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::ports::{Notice, Notifier, PostSearch};
use crate::domain::posts::PostCard;

const SOURCE: &str = "application::search";

/// Search input state plus the last result set.
pub struct SearchBox {
    search: Arc<dyn PostSearch>,
    notifier: Arc<dyn Notifier>,
    query: String,
    results: Vec<PostCard>,
}

impl SearchBox {
    pub fn new(search: Arc<dyn PostSearch>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            search,
            notifier,
            query: String::new(),
            results: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[PostCard] {
        &self.results
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Run the search. Blank queries are ignored and return `false`.
    pub async fn submit(&mut self) -> bool {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return false;
        }

        match self.search.search(&query).await {
            Ok(posts) => {
                debug!(target = SOURCE, query = %query, hits = posts.len(), "search finished");
                self.results = posts.iter().map(PostCard::from_post).collect();
            }
            Err(err) => {
                warn!(target = SOURCE, query = %query, error = %err, "search failed");
                self.notifier.notify(Notice::error(err.to_string()));
                self.results.clear();
            }
        }
        true
    }

    /// Escape clears the query but keeps the results on screen.
    pub fn escape(&mut self) {
        self.query.clear();
    }

    pub fn reset(&mut self) {
        self.query.clear();
        self.results.clear();
    }
}
