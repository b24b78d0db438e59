use clashhub_api::Page;
use log::debug;

/// A stamped request for one more page of an accumulating list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub seq: u64,
}

/// Infinite-scroll accumulator. At most one request is in flight at a time,
/// and every request carries a sequence stamp; a response whose stamp does not
/// match the in-flight request (late arrival after a reset, or a duplicate) is
/// discarded instead of corrupting the list.
#[derive(Debug)]
pub struct PagedList<T> {
    items: Vec<T>,
    /// Count of successfully applied pages. Doubles as the next page index,
    /// so a failed page is re-requested rather than skipped.
    pages_loaded: u32,
    has_more: bool,
    loading: bool,
    error: Option<String>,
    next_seq: u64,
    expected_seq: Option<u64>,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pages_loaded: 0,
            has_more: true,
            loading: false,
            error: None,
            next_seq: 0,
            expected_seq: None,
        }
    }
}

impl<T> PagedList<T> {
    /// Stamp and return the next page request, or `None` when a request is
    /// already in flight or the listing is exhausted. Issuing a request
    /// clears any previous error.
    pub fn next_request(&mut self) -> Option<PageRequest> {
        if self.loading || !self.has_more {
            return None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.loading = true;
        self.expected_seq = Some(seq);
        self.error = None;
        Some(PageRequest { page: self.pages_loaded, seq })
    }

    /// Fold a fetched page in. Page zero replaces the accumulated items,
    /// later pages append.
    pub fn apply(&mut self, seq: u64, page: Page<T>) {
        if self.expected_seq != Some(seq) {
            debug!("discarding stale page response (seq {seq})");
            return;
        }
        self.loading = false;
        self.expected_seq = None;
        if page.number == 0 {
            self.items = page.items;
        } else {
            self.items.extend(page.items);
        }
        self.has_more = !page.last;
        self.pages_loaded += 1;
    }

    /// A fetch failed. The cursor stays where it was and nothing retries
    /// automatically; the next `next_request` asks for the same page again.
    pub fn fail(&mut self, seq: u64, message: String) {
        if self.expected_seq != Some(seq) {
            debug!("discarding stale page failure (seq {seq})");
            return;
        }
        self.loading = false;
        self.expected_seq = None;
        self.error = Some(message);
    }

    /// Filter change: drop everything and start over. The sequence counter
    /// keeps counting, so a response to a pre-reset request can never match
    /// again.
    pub fn reset(&mut self) {
        self.items.clear();
        self.pages_loaded = 0;
        self.has_more = true;
        self.loading = false;
        self.error = None;
        self.expected_seq = None;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, items: Vec<u32>, last: bool) -> Page<u32> {
        Page { items, number, last }
    }

    #[test]
    fn pages_append_in_order() {
        let mut list = PagedList::<u32>::default();

        let req = list.next_request().unwrap();
        assert_eq!(req.page, 0);
        list.apply(req.seq, page(0, vec![1, 2], false));

        let req = list.next_request().unwrap();
        assert_eq!(req.page, 1);
        list.apply(req.seq, page(1, vec![3, 4], false));

        assert_eq!(list.items(), &[1, 2, 3, 4]);
        assert_eq!(list.pages_loaded(), 2);
    }

    #[test]
    fn only_one_request_in_flight() {
        let mut list = PagedList::<u32>::default();
        assert!(list.next_request().is_some());
        assert!(list.next_request().is_none());
    }

    #[test]
    fn last_page_exhausts_the_listing() {
        let mut list = PagedList::<u32>::default();
        let req = list.next_request().unwrap();
        list.apply(req.seq, page(0, vec![1], true));

        assert!(!list.has_more());
        assert!(list.next_request().is_none());
    }

    #[test]
    fn failure_keeps_the_cursor_and_surfaces_the_message() {
        let mut list = PagedList::<u32>::default();
        let req = list.next_request().unwrap();
        list.apply(req.seq, page(0, vec![1], false));

        let req = list.next_request().unwrap();
        assert_eq!(req.page, 1);
        list.fail(req.seq, "timed out".into());

        assert_eq!(list.error(), Some("timed out"));
        assert_eq!(list.items(), &[1]);

        // Same page is asked for again; no skip, no auto-retry in between.
        let retry = list.next_request().unwrap();
        assert_eq!(retry.page, 1);
        assert!(list.error().is_none());
    }

    #[test]
    fn stale_response_after_reset_is_discarded() {
        let mut list = PagedList::<u32>::default();
        let req = list.next_request().unwrap();
        list.apply(req.seq, page(0, vec![1, 2], false));

        let stale = list.next_request().unwrap();
        list.reset();

        // The old filter's page arrives after the reset.
        list.apply(stale.seq, page(1, vec![3, 4], false));
        assert!(list.items().is_empty());
        assert_eq!(list.pages_loaded(), 0);

        // The fresh request starts over at page zero.
        let fresh = list.next_request().unwrap();
        assert_eq!(fresh.page, 0);
        assert_ne!(fresh.seq, stale.seq);
    }

    #[test]
    fn stale_failure_is_also_discarded() {
        let mut list = PagedList::<u32>::default();
        let stale = list.next_request().unwrap();
        list.reset();
        list.fail(stale.seq, "too late".into());
        assert!(list.error().is_none());
        assert!(!list.is_loading());
    }

    #[test]
    fn page_zero_replaces_accumulated_items() {
        let mut list = PagedList::<u32>::default();
        let req = list.next_request().unwrap();
        list.apply(req.seq, page(0, vec![1, 2], false));

        list.reset();
        let req = list.next_request().unwrap();
        list.apply(req.seq, page(0, vec![9], false));
        assert_eq!(list.items(), &[9]);
    }

    #[test]
    fn duplicate_apply_is_ignored() {
        let mut list = PagedList::<u32>::default();
        let req = list.next_request().unwrap();
        list.apply(req.seq, page(0, vec![1], false));
        list.apply(req.seq, page(0, vec![1], false));
        assert_eq!(list.items(), &[1]);
        assert_eq!(list.pages_loaded(), 1);
    }
}
