use serde::{Deserialize, Serialize};

/// Uniform response envelope returned by every endpoint.
///
/// `token` is only set by `/auth/login`; `meta` only by paginated lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in a 200 envelope.
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            message: String::new(),
            token: None,
            data: Some(data),
            meta: None,
        }
    }

    /// Total pages reported by the API; absent meta means a single page.
    pub fn total_pages(&self) -> u32 {
        self.meta.map_or(1, |m| m.total_pages.max(1))
    }

    /// Total record count, falling back to `fallback` when meta is absent.
    pub fn total(&self, fallback: usize) -> u64 {
        self.meta
            .map_or_else(|| u64::try_from(fallback).unwrap_or(u64::MAX), |m| m.total)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            code: self.code,
            message: self.message,
            token: self.token,
            data: self.data.map(f),
            meta: self.meta,
        }
    }
}

impl<T: Default> ApiResponse<T> {
    /// The payload, or its default when the API omitted `data`.
    pub fn data_or_default(self) -> T {
        self.data.unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_meta_counts_as_one_page() {
        let resp: ApiResponse<Vec<u32>> =
            serde_json::from_str(r#"{"code":200,"message":"ok","data":[1,2]}"#).unwrap();
        assert_eq!(resp.total_pages(), 1);
        assert_eq!(resp.total(2), 2);
        assert_eq!(resp.data_or_default(), vec![1, 2]);
    }

    #[test]
    fn meta_is_read_from_camel_case() {
        let resp: ApiResponse<Vec<u32>> = serde_json::from_str(
            r#"{"code":200,"message":"ok","data":[],"meta":{"page":2,"limit":10,"total":31,"totalPages":4}}"#,
        )
        .unwrap();
        assert_eq!(resp.total_pages(), 4);
        assert_eq!(resp.total(0), 31);
    }

    #[test]
    fn absent_data_defaults() {
        let resp: ApiResponse<Vec<u32>> =
            serde_json::from_str(r#"{"code":200,"message":"ok"}"#).unwrap();
        assert!(resp.data_or_default().is_empty());
    }
}
