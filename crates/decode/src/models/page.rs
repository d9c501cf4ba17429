use serde::Serialize;

/// One page of a cursor-based listing.
///
/// An absent `next_page_id` is the *sole* termination signal: a page with
/// zero items but a present cursor still continues (the service emits sparse
/// pages).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_id: Option<String>,
}

impl<T> Page<T> {
    /// Split into the shape the paginated collector consumes.
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        (self.items, self.next_page_id)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new(), next_page_id: None }
    }
}

/// The main timeline page carries the timestamp of its last item in
/// addition to the regular page shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePage {
    pub page: Page<super::MediaItem>,
    pub last_item_timestamp: Option<i64>,
}
