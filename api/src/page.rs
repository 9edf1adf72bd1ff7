//! Paginated list responses.

use serde::{Deserialize, Serialize};

/// Paginated wire shape: `{content, totalElements, totalPages, number}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Rows across all pages
    #[serde(default)]
    pub total_elements: u64,
    /// Number of pages
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based page index
    #[serde(default)]
    pub number: u32,
}

/// A page of items as the state containers see it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// Rows across all pages
    pub total_items: u64,
    /// Number of pages
    pub total_pages: u32,
    /// Zero-based page index
    pub current_page: u32,
}

impl<T> PageResult<T> {
    /// A single page holding every item, as search results are presented.
    #[must_use]
    pub fn single(items: Vec<T>) -> Self {
        let total_items = items.len() as u64;
        Self {
            items,
            total_items,
            total_pages: u32::from(total_items > 0),
            current_page: 0,
        }
    }
}

impl<T> From<Page<T>> for PageResult<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.content,
            total_items: page.total_elements,
            total_pages: page.total_pages,
            current_page: page.number,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wire_page_maps_to_result() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"content":[1,2],"totalElements":12,"totalPages":2,"number":1,"size":10}"#,
        )
        .unwrap();
        let result = PageResult::from(page);

        assert_eq!(result.items, vec![1, 2]);
        assert_eq!(result.total_items, 12);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.current_page, 1);
    }

    #[test]
    fn missing_keys_default() {
        let page: Page<u32> = serde_json::from_str("{}").unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn single_page_describes_its_items() {
        let result = PageResult::single(vec!["a", "b", "c"]);
        assert_eq!(result.total_items, 3);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.current_page, 0);

        let empty = PageResult::<u8>::single(Vec::new());
        assert_eq!(empty.total_pages, 0);
    }
}
