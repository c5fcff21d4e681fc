use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListQuery {
    /// Requested page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn effective_offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn from_all(all: Vec<T>, query: ListQuery) -> Self {
        let limit = query.effective_limit();
        let offset = query.effective_offset();
        let total = all.len();

        let items = all.into_iter().skip(offset).take(limit).collect();

        Self {
            items,
            total,
            limit,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(ListQuery::default().effective_limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(ListQuery { limit: Some(0), offset: None }.effective_limit(), 1);
        assert_eq!(
            ListQuery { limit: Some(10_000), offset: None }.effective_limit(),
            MAX_PAGE_SIZE
        );
    }

    #[test]
    fn test_page_window() {
        let page = Page::from_all((1..=5).collect(), ListQuery { limit: Some(2), offset: Some(3) });
        assert_eq!(page.items, vec![4, 5]);
        assert_eq!(page.total, 5);

        let past_end = Page::from_all(vec![1, 2], ListQuery { limit: None, offset: Some(9) });
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 2);
    }
}
