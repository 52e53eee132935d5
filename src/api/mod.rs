pub mod handlers;
pub mod page;
pub mod routes;

use serde::Serialize;

/// Parameters of `/wav`, merged from a form body and the query string.
///
/// Missing fields read as empty strings.
#[derive(Debug, Default, PartialEq)]
pub struct WavParams {
    pub text: String,
    pub voice: String,
}

impl WavParams {
    /// Take the first value of each key, looking at `form` before `query`.
    pub fn from_pairs(form: &[(String, String)], query: &[(String, String)]) -> Self {
        let first = |key: &str| {
            form.iter()
                .chain(query)
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };

        Self {
            text: first("text"),
            voice: first("voice"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<String>,
    pub default: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
