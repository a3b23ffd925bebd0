//! Access to the third-party CRM REST API.
//!
//! [`CrmApi`] is the seam between the provider and the rest of the service:
//! the production implementation is [`http::FreshworksClient`], tests inject
//! scripted fakes or the `mockall` mock.

use async_trait::async_trait;

use crate::domain::catalog::{Owner, Pipeline, Stage};
use crate::domain::contact::ContactsPage;
use crate::domain::deal::DealsPage;

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use errors::{CrmResult, UpstreamError};

/// Upstream operations consumed by the dashboard.
///
/// Each call is a single attempt; retries are left to the caller.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// One page of the configured contacts view.
    async fn fetch_contacts_page(&self, page: u32, per_page: u32) -> CrmResult<ContactsPage>;

    /// One page of the configured deals view with owners side-loaded.
    async fn fetch_deals_page(&self, page: u32, per_page: u32) -> CrmResult<DealsPage>;

    /// Full stage catalog.
    async fn fetch_stages(&self) -> CrmResult<Vec<Stage>>;

    /// Full pipeline catalog.
    async fn fetch_pipelines(&self) -> CrmResult<Vec<Pipeline>>;

    /// Full owner (user) catalog.
    async fn fetch_owners(&self) -> CrmResult<Vec<Owner>>;
}
