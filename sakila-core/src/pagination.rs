//! Page bookkeeping and the page-number window shown under paginated lists.

use serde::{Deserialize, Serialize};

/// Number of page links shown at once once a list has more pages than this.
pub const WINDOW_SIZE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
}

impl PageState {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            page_size,
        }
    }

    /// Constrain a requested page to `[1, total_pages]`.
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages.max(1))
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn window(&self) -> Vec<u32> {
        page_window(self.current_page, self.total_pages)
    }

    /// Back to a single neutral page, as while a search is active.
    pub fn reset(&mut self) {
        self.current_page = 1;
        self.total_pages = 1;
    }
}

/// Page links to display: every page when there are at most
/// [`WINDOW_SIZE`], otherwise a window centred on `current` and pinned to
/// the first or last pages at the edges.
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    let total = total.max(1);
    if total <= WINDOW_SIZE {
        return (1..=total).collect();
    }
    let current = current.clamp(1, total);
    let start = current
        .saturating_sub(WINDOW_SIZE / 2)
        .clamp(1, total - WINDOW_SIZE + 1);
    let end = start.saturating_add(WINDOW_SIZE - 1).min(total);
    (start..=end).collect()
}

/// Pages needed for `total_records` at `page_size` per page (never zero).
pub fn total_pages(total_records: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total_records.div_ceil(u64::from(page_size)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_seven_customers_make_five_pages() {
        assert_eq!(total_pages(47, 10), 5);
        assert_eq!(page_window(3, 5), vec![2, 3, 4]);
    }

    #[test]
    fn window_pins_to_edges() {
        assert_eq!(page_window(1, 10), vec![1, 2, 3]);
        assert_eq!(page_window(10, 10), vec![8, 9, 10]);
        assert_eq!(page_window(2, 10), vec![1, 2, 3]);
        assert_eq!(page_window(9, 10), vec![8, 9, 10]);
    }

    #[test]
    fn small_lists_show_every_page() {
        assert_eq!(page_window(1, 1), vec![1]);
        assert_eq!(page_window(2, 3), vec![1, 2, 3]);
        assert_eq!(page_window(1, 0), vec![1]);
    }

    #[test]
    fn window_at_u32_max_does_not_overflow() {
        let last = u32::MAX;
        assert_eq!(page_window(last, last), vec![last - 2, last - 1, last]);
        let state = PageState {
            current_page: last,
            total_pages: last,
            page_size: 10,
        };
        assert_eq!(state.window(), vec![last - 2, last - 1, last]);
        assert!(!state.has_next());
    }

    #[test]
    fn total_pages_is_never_zero() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 1);
    }

    #[test]
    fn page_state_clamps_requests() {
        let state = PageState {
            current_page: 2,
            total_pages: 4,
            page_size: 10,
        };
        assert_eq!(state.clamp(0), 1);
        assert_eq!(state.clamp(9), 4);
        assert!(state.has_prev());
        assert!(state.has_next());
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Up to three pages the window is simply every page.
        #[test]
        fn prop_small_totals_list_all_pages(total in 1u32..=3, current in 1u32..=3) {
            let current = current.min(total);
            prop_assert_eq!(page_window(current, total), (1..=total).collect::<Vec<_>>());
        }

        /// Interior pages sit in the middle of the window.
        #[test]
        fn prop_interior_page_is_centred(total in 4u32..500, offset in 0u32..500) {
            let current = 2 + offset % (total - 2);
            prop_assert_eq!(page_window(current, total), vec![current - 1, current, current + 1]);
        }

        /// The window is always three consecutive in-range pages containing current.
        #[test]
        fn prop_window_is_contiguous_and_in_range(
            total in prop_oneof![4u32..500, (u32::MAX - 500)..=u32::MAX],
            current in prop_oneof![1u32..500, (u32::MAX - 500)..=u32::MAX],
        ) {
            let current = current.min(total);
            let window = page_window(current, total);
            prop_assert_eq!(window.len(), WINDOW_SIZE as usize);
            prop_assert!(window.contains(&current));
            prop_assert!(window[0] >= 1);
            prop_assert!(*window.last().unwrap() <= total);
            prop_assert!(window.windows(2).all(|w| w[1] == w[0] + 1));
        }
    }
}
