//! Scripted in-memory CRM used by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;

use crm_dashboard::crm::{CrmApi, CrmResult, UpstreamError};
use crm_dashboard::domain::catalog::{Owner, Pipeline, Stage};
use crm_dashboard::domain::contact::{Contact, ContactsPage};
use crm_dashboard::domain::deal::{Deal, DealsPage};
use crm_dashboard::pagination::PageMeta;

/// Serves fixed deal and contact pages and records every call.
#[derive(Default)]
pub struct ScriptedCrm {
    pub deal_pages: Vec<Vec<Deal>>,
    pub contact_pages: Vec<Vec<Contact>>,
    pub users: Vec<Owner>,
    pub owners: Vec<Owner>,
    pub stages: Vec<Stage>,
    pub pipelines: Vec<Pipeline>,
    /// Every endpoint fails when set.
    pub failing: bool,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedCrm {
    pub fn with_deals(deals: Vec<Deal>) -> Self {
        Self {
            deal_pages: vec![deals],
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) -> CrmResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            return Err(UpstreamError::new(
                Some(401),
                "Invalid token",
                "selector/users",
                &[],
            ));
        }
        Ok(())
    }
}

fn page_of<T: Clone>(pages: &[Vec<T>], page: u32) -> (Vec<T>, PageMeta) {
    let total = pages.len().max(1) as u32;
    let items = pages
        .get(page as usize - 1)
        .cloned()
        .unwrap_or_default();
    (items, PageMeta::new(page, total))
}

#[async_trait]
impl CrmApi for ScriptedCrm {
    async fn fetch_contacts_page(&self, page: u32, per_page: u32) -> CrmResult<ContactsPage> {
        self.record(format!("contacts:{page}:{per_page}"))?;
        let (contacts, meta) = page_of(&self.contact_pages, page);
        Ok(ContactsPage { contacts, meta })
    }

    async fn fetch_deals_page(&self, page: u32, per_page: u32) -> CrmResult<DealsPage> {
        self.record(format!("deals:{page}:{per_page}"))?;
        let (deals, meta) = page_of(&self.deal_pages, page);
        Ok(DealsPage {
            deals,
            users: self.users.clone(),
            meta,
        })
    }

    async fn fetch_stages(&self) -> CrmResult<Vec<Stage>> {
        self.record("stages".to_string())?;
        Ok(self.stages.clone())
    }

    async fn fetch_pipelines(&self) -> CrmResult<Vec<Pipeline>> {
        self.record("pipelines".to_string())?;
        Ok(self.pipelines.clone())
    }

    async fn fetch_owners(&self) -> CrmResult<Vec<Owner>> {
        self.record("owners".to_string())?;
        Ok(self.owners.clone())
    }
}

/// Wraps the fake the way the server shares its client.
pub fn client_data(crm: Arc<ScriptedCrm>) -> web::Data<dyn CrmApi> {
    let client: Arc<dyn CrmApi> = crm;
    web::Data::from(client)
}
