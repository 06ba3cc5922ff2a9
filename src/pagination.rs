use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// One page of results together with the page strip rendered under tables.
///
/// `pages` holds page numbers with `None` marking a gap (`1 2 … 7 8 9 … 14`).
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let page = current_page.max(1);
        Self {
            items,
            pages: page_strip(page, total_pages),
            page,
        }
    }
}

/// Builds the page strip: the first and last two pages are always shown,
/// plus a window around the current page; runs in between collapse to `None`.
fn page_strip(current: usize, total: usize) -> Vec<Option<usize>> {
    const EDGE: usize = 2;
    const AROUND: usize = 2;

    if total == 0 {
        return Vec::new();
    }

    let mut strip = Vec::new();
    let mut last_shown = 0usize;
    for page in 1..=total {
        let near_edge = page <= EDGE || page > total - EDGE.min(total);
        let near_current = page + AROUND >= current && page <= current + AROUND;
        if near_edge || near_current {
            if last_shown != 0 && page != last_shown + 1 {
                strip.push(None);
            }
            strip.push(Some(page));
            last_shown = page;
        }
    }
    strip
}
