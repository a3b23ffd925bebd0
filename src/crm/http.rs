//! `reqwest` implementation of [`CrmApi`] for the Freshworks CRM.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::crm::{CrmApi, CrmResult, UpstreamError};
use crate::domain::catalog::{Owner, Pipeline, Stage};
use crate::domain::contact::ContactsPage;
use crate::domain::deal::DealsPage;
use crate::models::config::CrmConfig;

/// Side-loads requested with every deals page.
pub const DEAL_INCLUDES: &str = "owner,sales_account";

const STAGES_ENDPOINT: &str = "selector/deal_stages";
const PIPELINES_ENDPOINT: &str = "selector/deal_pipelines";
const PIPELINES_FALLBACK_ENDPOINT: &str = "deal_pipelines";
const OWNERS_ENDPOINT: &str = "selector/users";

/// Longest slice of a response body written to the log.
const LOG_PREVIEW_CHARS: usize = 500;

/// Authenticated client for the Freshworks sales API.
#[derive(Clone, Debug)]
pub struct FreshworksClient {
    http: reqwest::Client,
    config: CrmConfig,
}

impl FreshworksClient {
    pub fn new(config: &CrmConfig) -> CrmResult<Self> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&format!("Token token={}", config.api_key))
            .map_err(|e| UpstreamError::new(None, format!("invalid API key: {e}"), "", &[]))?;
        headers.insert(AUTHORIZATION, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                UpstreamError::new(None, format!("failed to build HTTP client: {e}"), "", &[])
            })?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url, endpoint)
    }

    /// Issues one GET against `endpoint` and returns the JSON body.
    pub async fn request(&self, endpoint: &str, params: &[(&str, String)]) -> CrmResult<Value> {
        let response = self
            .http
            .get(self.url(endpoint))
            .query(params)
            .send()
            .await
            .map_err(|e| log_failure(UpstreamError::new(None, e.to_string(), endpoint, params)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            log_failure(UpstreamError::new(
                Some(status.as_u16()),
                e.to_string(),
                endpoint,
                params,
            ))
        })?;

        if !status.is_success() {
            return Err(log_failure(UpstreamError::new(
                Some(status.as_u16()),
                provider_message(&body),
                endpoint,
                params,
            )));
        }

        log::debug!("[crm] {endpoint}: {}", preview(&body));

        serde_json::from_str(&body).map_err(|e| {
            log_failure(UpstreamError::new(
                Some(status.as_u16()),
                format!("response is not valid JSON: {e}"),
                endpoint,
                params,
            ))
        })
    }

    async fn request_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> CrmResult<T> {
        let body = self.request(endpoint, params).await?;
        decode(body, endpoint, params)
    }
}

#[async_trait]
impl CrmApi for FreshworksClient {
    async fn fetch_contacts_page(&self, page: u32, per_page: u32) -> CrmResult<ContactsPage> {
        let endpoint = format!("contacts/view/{}", self.config.contacts_view_id);
        let params = [("page", page.to_string()), ("per_page", per_page.to_string())];
        self.request_as(&endpoint, &params).await
    }

    async fn fetch_deals_page(&self, page: u32, per_page: u32) -> CrmResult<DealsPage> {
        let endpoint = format!("deals/view/{}", self.config.deals_view_id);
        let params = [
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
            ("include", DEAL_INCLUDES.to_string()),
        ];
        self.request_as(&endpoint, &params).await
    }

    async fn fetch_stages(&self) -> CrmResult<Vec<Stage>> {
        let body = self.request(STAGES_ENDPOINT, &[]).await?;
        decode_list(body, &["deal_stages"], STAGES_ENDPOINT)
    }

    async fn fetch_pipelines(&self) -> CrmResult<Vec<Pipeline>> {
        let body = self.request(PIPELINES_ENDPOINT, &[]).await?;
        let pipelines: Vec<Pipeline> =
            decode_list(body, &["deal_pipelines", "pipelines"], PIPELINES_ENDPOINT)?;
        if !pipelines.is_empty() {
            return Ok(pipelines);
        }

        log::warn!("No pipelines from {PIPELINES_ENDPOINT}, trying {PIPELINES_FALLBACK_ENDPOINT}");
        let body = self.request(PIPELINES_FALLBACK_ENDPOINT, &[]).await?;
        decode_list(
            body,
            &["deal_pipelines", "pipelines"],
            PIPELINES_FALLBACK_ENDPOINT,
        )
    }

    async fn fetch_owners(&self) -> CrmResult<Vec<Owner>> {
        let body = self.request(OWNERS_ENDPOINT, &[]).await?;
        decode_list(body, &["users"], OWNERS_ENDPOINT)
    }
}

fn decode<T: DeserializeOwned>(
    body: Value,
    endpoint: &str,
    params: &[(&str, String)],
) -> CrmResult<T> {
    serde_json::from_value(body).map_err(|e| {
        log_failure(UpstreamError::new(
            None,
            format!("unexpected response shape: {e}"),
            endpoint,
            params,
        ))
    })
}

/// Extracts a catalog from the first present key of `keys`, or from the body
/// itself when it is already an array. Anything else is an empty catalog.
pub(crate) fn decode_list<T: DeserializeOwned>(
    body: Value,
    keys: &[&str],
    endpoint: &str,
) -> CrmResult<Vec<T>> {
    let list = match body {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut object) => keys
            .iter()
            .find_map(|key| object.remove(*key).filter(|value| !value.is_null()))
            .unwrap_or_else(|| Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    };
    decode(list, endpoint, &[])
}

/// Best human-readable message out of an error body.
fn provider_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        value
            .pointer("/errors/message")
            .or_else(|| value.get("message"))
            .map(|message| match message {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
    });
    message.unwrap_or_else(|| preview(body))
}

fn preview(body: &str) -> String {
    body.chars().take(LOG_PREVIEW_CHARS).collect()
}

fn log_failure(err: UpstreamError) -> UpstreamError {
    log::error!(
        "CRM API error: endpoint={} params={:?} status={:?} error={}",
        err.endpoint,
        err.params,
        err.status,
        err.message
    );
    err
}
