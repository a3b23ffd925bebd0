//! Mock CRM client for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::crm::{CrmApi, CrmResult};
use crate::domain::catalog::{Owner, Pipeline, Stage};
use crate::domain::contact::ContactsPage;
use crate::domain::deal::DealsPage;

mock! {
    pub CrmClient {}

    #[async_trait]
    impl CrmApi for CrmClient {
        async fn fetch_contacts_page(&self, page: u32, per_page: u32) -> CrmResult<ContactsPage>;
        async fn fetch_deals_page(&self, page: u32, per_page: u32) -> CrmResult<DealsPage>;
        async fn fetch_stages(&self) -> CrmResult<Vec<Stage>>;
        async fn fetch_pipelines(&self) -> CrmResult<Vec<Pipeline>>;
        async fn fetch_owners(&self) -> CrmResult<Vec<Owner>>;
    }
}
