//! Search-term normalization.
//!
//! Terms typed with a leading `#` are sent without it; bare terms get one
//! prepended. History entries keep the text exactly as the user typed it.

use std::fmt;

use crate::types::SearchQuery;
use crate::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Trim the input; empty input (or a lone `#`) is rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.trim_start_matches('#').trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The keyword as sent to the backend.
    pub fn dispatch_form(&self) -> String {
        match self.0.strip_prefix('#') {
            Some(rest) => rest.to_string(),
            None => format!("#{}", self.0),
        }
    }

    pub fn to_query(&self) -> SearchQuery {
        SearchQuery {
            keyword: Some(self.dispatch_form()),
            ..SearchQuery::default()
        }
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_hash_is_stripped() {
        let term = SearchTerm::parse("#군대").unwrap();
        assert_eq!(term.dispatch_form(), "군대");
    }

    #[test]
    fn bare_term_gets_hash() {
        let term = SearchTerm::parse("  휴학 ").unwrap();
        assert_eq!(term.as_str(), "휴학");
        assert_eq!(term.dispatch_form(), "#휴학");
    }

    #[test]
    fn only_first_hash_is_removed() {
        let term = SearchTerm::parse("##졸업").unwrap();
        assert_eq!(term.dispatch_form(), "#졸업");
    }

    #[test]
    fn blank_and_lone_hash_are_rejected() {
        assert_eq!(SearchTerm::parse("   "), Err(ValidationError::EmptyQuery));
        assert_eq!(SearchTerm::parse("#"), Err(ValidationError::EmptyQuery));
    }

    #[test]
    fn query_uses_dispatch_form_and_defaults() {
        let query = SearchTerm::parse("장학금").unwrap().to_query();
        assert_eq!(query.keyword.as_deref(), Some("#장학금"));
        assert_eq!(query.page, 0);
        assert_eq!(query.size, 20);
    }
}
