//! Errors raised while talking to the CRM provider.

use thiserror::Error;

/// Failure of a single upstream call.
///
/// Carries enough context to reproduce the call: the endpoint, the query
/// parameters and, when a response arrived, its status code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("CRM request to `{endpoint}` failed{suffix}: {message}", suffix = status_suffix(.status))]
pub struct UpstreamError {
    pub status: Option<u16>,
    pub message: String,
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl UpstreamError {
    pub fn new(
        status: Option<u16>,
        message: impl Into<String>,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Self {
        Self {
            status,
            message: message.into(),
            endpoint: endpoint.to_string(),
            params: params
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {code}"),
        None => String::new(),
    }
}

pub type CrmResult<T> = Result<T, UpstreamError>;
