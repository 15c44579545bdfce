//! Page-number pagination
//!
//! Lenient the way listing pages expect: a page number that is not an
//! integer shows the first page, and one outside the valid range shows the
//! last page.

use serde::Serialize;

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually shown
    pub number: usize,
    pub num_pages: usize,
    /// Size of the whole collection
    pub total: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }

    /// Iterate over the items on this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Slice `items` into the page named by `page`.
///
/// `page_size` of 0 is treated as 1. An empty collection yields a single
/// empty page 1.
pub fn paginate<T>(items: Vec<T>, page: Option<&str>, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let num_pages = total.div_ceil(page_size).max(1);

    let number = match page.map(str::trim) {
        None => 1,
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 1 => usize::try_from(n).map_or(num_pages, |n| n.min(num_pages)),
            Ok(_) => num_pages,
            // Integers too wide for i64 are still integers, just out of range.
            Err(_) if is_integer(raw) => num_pages,
            Err(_) => 1,
        },
    };

    let items = items.into_iter().skip((number - 1) * page_size).take(page_size).collect();
    Page { items, number, num_pages, total, page_size }
}

fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
