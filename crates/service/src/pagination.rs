//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

use serde::Deserialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }

    /// Row offset and limit for the normalized page.
    pub fn offset_limit(self) -> (u64, u64) {
        let (idx, per) = self.normalize();
        (idx * per, per)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn offset_limit_skips_previous_pages() {
        let (offset, limit) = Pagination { page: 3, per_page: 25 }.offset_limit();
        assert_eq!(offset, 50);
        assert_eq!(limit, 25);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let p: Pagination = serde_json::from_str(r#"{"page": 2}"#).unwrap();
        assert_eq!(p.page, 2);
        assert_eq!(p.per_page, 20);
    }
}
