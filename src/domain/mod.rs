//! Read-only projections of CRM provider records.

pub mod catalog;
pub mod contact;
pub mod deal;
pub mod types;
