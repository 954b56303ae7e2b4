//! Page-size validation and the paginated response envelope.

use serde::Serialize;
use thiserror::Error;

/// Rejected page-size input.
#[derive(Debug, Error)]
#[error("invalid page size: {0}")]
pub struct PageSizeError(pub String);

/// Page-size bounds.
///
/// Absent input gets the default; input above the ceiling is clamped to
/// the ceiling; non-numeric or non-positive input is rejected outright
/// rather than silently replaced.
#[derive(Debug, Clone, Copy)]
pub struct PagePolicy {
    pub default_size: u32,
    pub max_size: u32,
}

impl PagePolicy {
    pub fn new(default_size: u32, max_size: u32) -> Self {
        Self {
            default_size,
            max_size,
        }
    }

    /// Resolve a raw `page_size` parameter into an effective page size.
    pub fn resolve(&self, raw: Option<&str>) -> Result<u32, PageSizeError> {
        let Some(raw) = raw else {
            return Ok(self.default_size);
        };
        let trimmed = raw.trim();
        match trimmed.parse::<u128>() {
            Ok(n) if n >= 1 => Ok(u32::try_from(n.min(u128::from(self.max_size)))
                .unwrap_or(self.max_size)),
            // Digit strings too long even for u128 are still numeric input
            // above the ceiling, not garbage.
            Err(_) if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(self.max_size)
            }
            _ => Err(PageSizeError(raw.to_string())),
        }
    }
}

/// A page of results with paging metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Paged<T> {
    /// Create a page with paging calculations.
    pub fn new(items: Vec<T>, total: u64, page: u32, per_page: u32) -> Self {
        let total_pages = if per_page > 0 {
            ((total as f64) / (f64::from(per_page))).ceil() as u32
        } else {
            1
        };

        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Create an empty page.
    pub fn empty(page: u32, per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            per_page,
            total_pages: 0,
            has_next: false,
            has_prev: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn policy() -> PagePolicy {
        PagePolicy::new(10, 100)
    }

    #[test]
    fn absent_input_gets_default() {
        assert_eq!(policy().resolve(None).unwrap(), 10);
    }

    #[test]
    fn valid_input_passes_through() {
        assert_eq!(policy().resolve(Some("25")).unwrap(), 25);
        assert_eq!(policy().resolve(Some(" 1 ")).unwrap(), 1);
    }

    #[test]
    fn above_ceiling_is_clamped() {
        assert_eq!(policy().resolve(Some("101")).unwrap(), 100);
        assert_eq!(policy().resolve(Some("99999")).unwrap(), 100);
    }

    #[test]
    fn numeric_overflow_clamps_instead_of_rejecting() {
        assert_eq!(policy().resolve(Some("99999999999999999999")).unwrap(), 100);
        let way_past_u128 = "9".repeat(60);
        assert_eq!(policy().resolve(Some(&way_past_u128)).unwrap(), 100);
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert!(policy().resolve(Some("0")).is_err());
        assert!(policy().resolve(Some("-5")).is_err());
    }

    #[test]
    fn non_numeric_is_rejected_not_defaulted() {
        let err = policy().resolve(Some("ten")).unwrap_err();
        assert!(err.to_string().contains("ten"));
        assert!(policy().resolve(Some("10.5")).is_err());
        assert!(policy().resolve(Some("")).is_err());
    }

    #[test]
    fn paged_metadata() {
        let page = Paged::new(vec![1, 2, 3], 25, 2, 10);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_prev);

        let last = Paged::<i32>::new(vec![], 25, 3, 10);
        assert!(!last.has_next);
        assert!(last.has_prev);

        let single = Paged::<i32>::new(vec![], 5, 1, 10);
        assert!(!single.has_next);
        assert!(!single.has_prev);
        assert_eq!(single.total_pages, 1);
    }
}
