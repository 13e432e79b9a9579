// Query-string builder for list and export endpoints.
//
// Filters are optional on every list endpoint. An absent filter is never
// sent, not even as an empty value.

use std::fmt::Display;

/// Ordered list of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter unconditionally.
    pub fn push(mut self, key: &'static str, value: impl Display) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Append a parameter only when `value` is present and not an empty string.
    pub fn push_opt<V: Display>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(rendered) = value.map(|v| v.to_string()).filter(|v| !v.is_empty()) {
            self.pairs.push((key, rendered));
        }
        self
    }

    /// Convenience for `page`/`limit` pairs shared by every list endpoint.
    pub fn paged(page: u32, limit: u32) -> Self {
        Self::new().push("page", page).push("limit", limit)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_values_are_skipped() {
        let q = Query::paged(1, 10)
            .push_opt("search", Some(""))
            .push_opt::<&str>("role", None)
            .push_opt("status", Some("true"));

        assert_eq!(
            q.pairs(),
            &[
                ("page", "1".to_owned()),
                ("limit", "10".to_owned()),
                ("status", "true".to_owned()),
            ]
        );
        assert_eq!(q.get("search"), None);
    }

    #[test]
    fn numeric_values_are_string_coerced() {
        let q = Query::new().push_opt("minPrice", Some(0.0)).push_opt("maxPrice", Some(99.5));
        assert_eq!(q.get("minPrice"), Some("0"));
        assert_eq!(q.get("maxPrice"), Some("99.5"));
    }
}
