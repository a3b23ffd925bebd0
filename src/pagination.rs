//! Page bookkeeping shared by the CRM client, the walkers and the handlers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default page requested when the caller does not supply one.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size for pass-through listings.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 25;
/// Largest page size the provider accepts.
pub const MAX_ITEMS_PER_PAGE: u32 = 100;

/// Pagination block of a provider list response.
///
/// Unknown keys are retained so the block can be relayed to the dashboard
/// unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageMeta {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self {
            total_pages: Some(total_pages),
            current_page: Some(current_page),
            extra: Map::new(),
        }
    }

    /// Whether `page` is the last one according to this block.
    ///
    /// A block without `total_pages` describes a single page.
    pub fn is_last(&self, page: u32) -> bool {
        page >= self.total_pages.unwrap_or(1)
    }
}

/// Validated `page`/`per_page` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Builds a request from raw query values.
    ///
    /// Missing, non-numeric or zero values fall back to the defaults and
    /// `per_page` is capped at [`MAX_ITEMS_PER_PAGE`].
    pub fn from_raw(page: Option<&str>, per_page: Option<&str>) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
        let per_page = parse_positive(per_page)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
            .min(MAX_ITEMS_PER_PAGE);
        Self { page, per_page }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(PageRequest::from_raw(None, None), PageRequest::default());
    }

    #[test]
    fn invalid_values_use_defaults() {
        let request = PageRequest::from_raw(Some("abc"), Some("0"));
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 25);
    }

    #[test]
    fn per_page_is_capped() {
        let request = PageRequest::from_raw(Some("3"), Some("500"));
        assert_eq!(request.page, 3);
        assert_eq!(request.per_page, 100);
    }

    #[test]
    fn meta_without_total_is_single_page() {
        assert!(PageMeta::default().is_last(1));
        assert!(!PageMeta::new(1, 3).is_last(2));
        assert!(PageMeta::new(3, 3).is_last(3));
    }

    #[test]
    fn meta_keeps_unknown_keys() {
        let meta: PageMeta =
            serde_json::from_str(r#"{"total_pages": 4, "total": 310}"#).unwrap();
        assert_eq!(meta.total_pages, Some(4));
        assert_eq!(meta.extra.get("total"), Some(&Value::from(310)));
    }
}
