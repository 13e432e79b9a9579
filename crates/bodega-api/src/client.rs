// Async HTTP client for the bodega back-office REST API.
//
// Every request goes to a single configured origin. Authenticated calls
// carry `Authorization: Bearer <token>`; all calls send JSON.

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::query::Query;
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the back-office API.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::from_reqwest(base_url, http)?;
        client.timeout_secs = transport.timeout.as_secs();
        Ok(client)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: TransportConfig::default().timeout.as_secs(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append an endpoint path verbatim to the origin, keeping any path
    /// prefix the origin carries (`https://host/api` + `/category`).
    fn url(&self, path: &str) -> Result<Url, Error> {
        let origin = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{origin}/{path}"))?)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<RequestBuilder, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let builder = self.request(Method::GET, path, token)?;
        self.execute(builder).await
    }

    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        debug!(params = ?query.pairs(), "query");
        let builder = self.request(Method::GET, path, token)?.query(query.pairs());
        self.execute(builder).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let builder = self.request(Method::POST, path, token)?.json(body);
        self.execute(builder).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let builder = self.request(Method::PUT, path, token)?.json(body);
        self.execute(builder).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let builder = self.request(Method::DELETE, path, token)?;
        self.execute(builder).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, Error> {
        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Connection(err)
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        let raw = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(raw).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        Error::Http {
            status: status.as_u16(),
            message: error_message(status, &raw),
        }
    }
}

/// Pick the message surfaced for a rejected request: the JSON `message`
/// field, then the raw body, then the reason phrase.
fn error_message(status: StatusCode, raw: &str) -> String {
    let from_json = serde_json::from_str::<ErrorResponse>(raw)
        .ok()
        .and_then(|err| err.message)
        .and_then(|msg| match msg {
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            serde_json::Value::Array(items) if !items.is_empty() => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_owned))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        });

    if let Some(message) = from_json {
        return message;
    }
    if !raw.trim().is_empty() {
        return raw.to_owned();
    }
    status
        .canonical_reason()
        .map_or_else(|| status.as_u16().to_string(), str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins() {
        let msg = error_message(StatusCode::FORBIDDEN, r#"{"message":"Forbidden","statusCode":403}"#);
        assert_eq!(msg, "Forbidden");
    }

    #[test]
    fn validation_message_arrays_are_joined() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"message":["name should not be empty","price must be a number"]}"#,
        );
        assert_eq!(msg, "name should not be empty, price must be a number");
    }

    #[test]
    fn raw_text_when_not_json() {
        let msg = error_message(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(msg, "upstream down");
    }

    #[test]
    fn json_without_message_falls_back_to_raw_body() {
        let msg = error_message(StatusCode::CONFLICT, r#"{"error":"dup"}"#);
        assert_eq!(msg, r#"{"error":"dup"}"#);
    }

    #[test]
    fn empty_body_uses_reason_phrase() {
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
    }

    #[test]
    fn path_prefix_on_origin_is_kept() {
        let client =
            ApiClient::from_reqwest("https://shop.example/api/", reqwest::Client::new()).unwrap();
        assert_eq!(
            client.url("/category/42").unwrap().as_str(),
            "https://shop.example/api/category/42"
        );
    }
}
