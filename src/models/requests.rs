//! Request DTOs for the feed API
//!
//! Record bodies are taken as-is ([`Record`](crate::record::Record)); only the
//! query strings need their own types.

use serde::Deserialize;

use crate::view::Window;

/// Query string for `GET /api/view`
///
/// `last=N` selects the tail of the newest-first feed (the N oldest entries);
/// `latest=N` selects its head. `latest` wins when both are given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub last: Option<usize>,
    #[serde(default)]
    pub latest: Option<usize>,
}

impl ViewQuery {
    /// Resolves the window, falling back to `Last(default_window)`.
    pub fn window(&self, default_window: usize) -> Window {
        match (self.latest, self.last) {
            (Some(n), _) => Window::Latest(n),
            (None, Some(n)) => Window::Last(n),
            (None, None) => Window::Last(default_window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_query_defaults_to_last() {
        let query = ViewQuery::default();
        assert_eq!(query.window(15), Window::Last(15));
    }

    #[test]
    fn test_view_query_deserialize() {
        let query: ViewQuery = serde_json::from_str(r#"{"last": 3}"#).unwrap();
        assert_eq!(query.window(15), Window::Last(3));

        let query: ViewQuery = serde_json::from_str(r#"{"last": 3, "latest": 2}"#).unwrap();
        assert_eq!(query.window(15), Window::Latest(2));
    }
}
