// ACU backend HTTP client
//
// Wraps `reqwest::Client` with URL construction and error-body unwrapping
// for the backend's `/api/*` endpoints. Endpoint groups (link management,
// frame exchange, antenna configuration) are implemented as inherent
// methods in sibling files to keep this module focused on transport
// mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// FastAPI reports handler failures as `{"detail": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Raw HTTP client for the ACU backend's command endpoint.
///
/// Issues exactly one HTTP request per method call. Retries against the
/// antenna link are the backend's job; this client never retries.
#[derive(Debug, Clone)]
pub struct AcuClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AcuClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON reply.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("POST {}", url);

        let resp = self.http.post(url).json(body).send().await?;
        parse_response(resp).await
    }
}

/// Turn a response into `T`, or into `Error::Backend` carrying the
/// backend's error detail for any non-success status.
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(Error::Backend {
            status: status.as_u16(),
            detail: error_detail(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}

/// Extract the human-readable part of an error body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_tolerates_trailing_slash() {
        let client = AcuClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:8000/").unwrap(),
        );
        assert_eq!(
            client.api_url("manual/dirx").unwrap().as_str(),
            "http://127.0.0.1:8000/api/manual/dirx"
        );
    }

    #[test]
    fn error_detail_prefers_fastapi_detail() {
        assert_eq!(error_detail(r#"{"detail":"Serial not connected"}"#), "Serial not connected");
        assert_eq!(error_detail("Internal Server Error"), "Internal Server Error");
        assert_eq!(
            error_detail(r#"{"detail":[{"loc":["body","port"]}]}"#),
            r#"[{"loc":["body","port"]}]"#
        );
    }
}
