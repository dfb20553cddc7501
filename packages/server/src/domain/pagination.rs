//! History pagination.
//!
//! Pages are counted from the newest end of the log. Bounds are computed
//! against the log length at request time, so messages appended between two
//! requests shift page boundaries.

use std::ops::Range;

use super::value_object::{PageNumber, PageSize};

/// Index range of `page` within a log of `total` entries.
///
/// `start = max(0, total - page * size)`, `end = max(0, total - (page - 1) * size)`.
pub fn page_bounds(total: usize, page: PageNumber, page_size: PageSize) -> Range<usize> {
    let page = page.value() as usize;
    let size = page_size.value();
    let start = total.saturating_sub(page.saturating_mul(size));
    let end = total.saturating_sub((page - 1).saturating_mul(size));
    start..end
}

/// Reverse an oldest-first page into newest-first order
pub fn page_newest_first<T>(mut entries: Vec<T>) -> Vec<T> {
    entries.reverse();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> PageSize {
        PageSize::new(n).unwrap()
    }

    #[test]
    fn test_first_page_of_45_covers_newest_20() {
        // テスト項目: 45 件中 1 ページ目は index 25..45
        // when (操作):
        let range = page_bounds(45, PageNumber::FIRST, size(20));

        // then (期待する結果):
        assert_eq!(range, 25..45);
        assert_eq!(range.len(), 20);
    }

    #[test]
    fn test_last_partial_page() {
        assert_eq!(page_bounds(45, PageNumber::clamped(2), size(20)), 5..25);
        assert_eq!(page_bounds(45, PageNumber::clamped(3), size(20)), 0..5);
    }

    #[test]
    fn test_pages_past_the_end_are_empty() {
        let range = page_bounds(45, PageNumber::clamped(4), size(20));

        assert!(range.is_empty());
        assert_eq!(range, 0..0);
    }

    #[test]
    fn test_empty_log_yields_empty_page() {
        for page in 1..5 {
            assert!(page_bounds(0, PageNumber::clamped(page), size(20)).is_empty());
        }
    }

    #[test]
    fn test_page_length_matches_formula() {
        // テスト項目: ページ長は min(size, total - (p-1)*size) を [0, total] に丸めた値
        for total in [0usize, 1, 19, 20, 21, 45, 100] {
            for page in 1..8i64 {
                for page_size in [1usize, 7, 20] {
                    let range = page_bounds(total, PageNumber::clamped(page), size(page_size));
                    let skipped = (page as usize - 1) * page_size;
                    let expected = page_size.min(total.saturating_sub(skipped));

                    assert_eq!(range.len(), expected, "total={total} page={page}");
                    assert!(range.end <= total);
                }
            }
        }
    }

    #[test]
    fn test_huge_page_number_does_not_overflow() {
        let range = page_bounds(10, PageNumber::clamped(i64::MAX), size(usize::MAX));

        assert!(range.is_empty());
    }

    #[test]
    fn test_page_newest_first_reverses() {
        assert_eq!(page_newest_first(vec![1, 2, 3]), vec![3, 2, 1]);
    }
}
