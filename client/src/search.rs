//! Search screen input state.

use pastus_core::types::PostSummary;
use pastus_core::SearchTerm;
use tracing::warn;

use crate::history::SearchHistory;
use crate::source::{ApiResult, Services};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Empty field: recent searches and suggestions are shown.
    Initial,
    /// Text entered but not submitted.
    Typing,
    /// A submitted query and its results.
    Results,
}

#[derive(Debug, Clone)]
pub struct SearchInput {
    text: String,
    mode: SearchMode,
    results: Vec<PostSummary>,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchInput {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            mode: SearchMode::Initial,
            results: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn results(&self) -> &[PostSummary] {
        &self.results
    }

    /// Any edit drops the previous results.
    pub fn edit(&mut self, text: &str) -> SearchMode {
        self.text = text.to_string();
        self.results.clear();
        self.mode = if text.trim().is_empty() {
            SearchMode::Initial
        } else {
            SearchMode::Typing
        };
        self.mode
    }

    /// Record the term and run the search. An empty field is rejected and
    /// leaves the mode unchanged.
    pub async fn submit(
        &mut self,
        services: &Services,
        history: &SearchHistory,
    ) -> ApiResult<&[PostSummary]> {
        let term = SearchTerm::parse(&self.text)?;
        if let Err(e) = history.record(term.as_str()) {
            warn!(error = %e, "search history not saved");
        }
        let envelope = services.posts.search_posts(&term.to_query()).await?;
        self.results = envelope.data.items;
        self.mode = SearchMode::Results;
        Ok(&self.results)
    }

    /// Re-run a term picked from the recent-search list.
    pub async fn submit_recent(
        &mut self,
        term: &str,
        services: &Services,
        history: &SearchHistory,
    ) -> ApiResult<&[PostSummary]> {
        self.edit(term);
        self.submit(services, history).await
    }

    pub fn clear(&mut self) {
        self.edit("");
    }
}
