//! Page window placement.

use super::types::{PageButton, PageWindow};
use crate::error::{ListingError, ListingResult};

/// Compute the page window for a result set.
///
/// `offset` is the zero-based index of the first requested item. Offsets at or
/// past `total_items` are clamped to the start of the last page.
pub fn compute(
    total_items: u64,
    offset: u64,
    page_size: u64,
    max_buttons: u64,
) -> ListingResult<PageWindow> {
    if page_size == 0 {
        return Err(ListingError::InvalidPageSize);
    }
    if max_buttons == 0 {
        return Err(ListingError::InvalidButtonCount);
    }
    if total_items == 0 {
        return Ok(PageWindow::empty(page_size));
    }

    let max_page = total_items.div_ceil(page_size);
    let current_page = offset
        .div_ceil(page_size)
        .saturating_add(1)
        .clamp(1, max_page);
    let effective = max_buttons.min(max_page);
    let (first, last) = window_bounds(current_page, max_page, effective);

    let mut buttons = Vec::new();
    if first > 1 {
        buttons.push(PageButton::jump_to_first());
    }
    buttons.extend((first..=last).map(|page| PageButton::numbered(page, current_page)));
    if last < max_page {
        buttons.push(PageButton::jump_to_last(max_page));
    }

    let offset = if offset >= total_items {
        (max_page - 1) * page_size
    } else {
        offset
    };
    let offset_limit = offset.saturating_add(page_size).min(total_items);

    Ok(PageWindow {
        total_items,
        offset: offset + 1,
        offset_limit,
        current_page,
        max_page,
        page_size,
        buttons,
    })
}

/// First and last numbered page of the window, inclusive.
///
/// Halves are compared in doubled units so an odd window keeps its `.5`.
/// A centered window of even size holds one more page after the current page
/// than before it.
fn window_bounds(current: u64, max_page: u64, effective: u64) -> (u64, u64) {
    let doubled_current = u128::from(current) * 2;

    if doubled_current <= u128::from(effective) {
        (1, effective)
    } else if doubled_current > u128::from(max_page) * 2 - u128::from(effective) {
        (max_page - effective + 1, max_page)
    } else {
        (current + 1 - effective.div_ceil(2), current + effective / 2)
    }
}
