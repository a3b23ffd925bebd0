//! Request-level workflows: fetch from the CRM, aggregate, hand back DTOs.

use thiserror::Error;

use crate::crm::UpstreamError;

pub mod contacts;
pub mod deals;
pub mod opportunities;
pub mod pipelines;
pub mod summary;

/// Errors surfaced to the HTTP handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
