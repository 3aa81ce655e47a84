use std::collections::HashSet;
use std::hash::Hash;

use crate::error::Result;
use crate::source::LectureSource;
use crate::types::Lecture;

/// Something that can be accumulated by a [`Paginator`].
pub trait Listing {
    type Id: Eq + Hash + Clone + std::fmt::Debug;

    fn listing_id(&self) -> Self::Id;

    /// Whether the record should be shown at all.
    fn is_listed(&self) -> bool;
}

impl Listing for Lecture {
    type Id = u64;

    fn listing_id(&self) -> u64 {
        self.id
    }

    fn is_listed(&self) -> bool {
        self.visibility.is_public()
    }
}

/// A page the controller has committed to fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

/// What a finished (or refused) request did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Refused: a fetch was in flight or the list is exhausted.
    Skipped,
    /// Listed items arrived; `added` of them were new.
    Appended { added: usize },
    /// The page had no listed items. Terminal.
    Exhausted,
    /// The fetch failed. Nothing changed but the latch.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Exhausted,
}

/// Incremental pagination state for one mounted list.
///
/// Owns the page cursor, the accumulated collection and the `loading` and
/// `exhausted` latches. The collection is insertion-ordered and never holds
/// two items with the same id. Once exhausted, no request is ever issued again.
#[derive(Debug)]
pub struct Paginator<T: Listing> {
    cursor: u32,
    page_size: u32,
    items: Vec<T>,
    seen: HashSet<T::Id>,
    loading: bool,
    exhausted: bool,
}

impl<T: Listing> Paginator<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            cursor: 1,
            page_size: page_size.max(1),
            items: Vec::new(),
            seen: HashSet::new(),
            loading: false,
            exhausted: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn state(&self) -> LoadState {
        if self.exhausted {
            LoadState::Exhausted
        } else if self.loading {
            LoadState::Loading
        } else {
            LoadState::Idle
        }
    }

    /// Move the cursor to the next page. Refused unless idle.
    pub fn advance(&mut self) -> bool {
        if self.state() != LoadState::Idle {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Take the `loading` latch for the page under the cursor.
    ///
    /// Returns `None` without touching any state when a fetch is already in
    /// flight or the list is exhausted.
    pub fn begin(&mut self) -> Option<PageRequest> {
        if self.loading || self.exhausted {
            return None;
        }
        self.loading = true;
        Some(PageRequest {
            page: self.cursor,
            page_size: self.page_size,
        })
    }

    /// Settle a request started by [`begin`](Self::begin). Always releases
    /// the `loading` latch.
    pub fn complete(&mut self, request: PageRequest, result: Result<Vec<T>>) -> PageOutcome {
        self.loading = false;

        match result {
            Ok(page) => self.merge(request, page),
            Err(e) => {
                tracing::error!(page = request.page, error = %e, "failed to load lectures");
                PageOutcome::Failed
            }
        }
    }

    fn merge(&mut self, request: PageRequest, page: Vec<T>) -> PageOutcome {
        let listed: Vec<T> = page.into_iter().filter(|item| item.is_listed()).collect();

        if listed.is_empty() {
            tracing::debug!(page = request.page, "no listed items, list exhausted");
            self.exhausted = true;
            return PageOutcome::Exhausted;
        }

        let before = self.items.len();
        for item in listed {
            if self.seen.insert(item.listing_id()) {
                self.items.push(item);
            }
        }
        let added = self.items.len() - before;

        tracing::debug!(page = request.page, added, total = self.items.len(), "merged page");
        PageOutcome::Appended { added }
    }
}

/// Holds the `loading` latch across an await; releases it even if the
/// future is dropped before the fetch settles.
struct InFlight<'a, T: Listing> {
    paginator: &'a mut Paginator<T>,
}

impl<T: Listing> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        self.paginator.loading = false;
    }
}

impl Paginator<Lecture> {
    /// Fetch the page under the cursor and merge it, in one call.
    pub async fn request_next_page(&mut self, source: &dyn LectureSource) -> PageOutcome {
        let Some(request) = self.begin() else {
            return PageOutcome::Skipped;
        };

        let mut guard = InFlight { paginator: self };
        let result = source
            .fetch_lectures(request.page, request.page_size)
            .await;
        guard.paginator.complete(request, result)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::LecternError;
    use crate::testing::{lecture, lectures, ScriptedSource};

    fn ids(p: &Paginator<Lecture>) -> Vec<u64> {
        p.items().iter().map(|l| l.id).collect()
    }

    #[tokio::test]
    async fn first_page_all_public() {
        let source = ScriptedSource::new().page(1, lectures(1..=30, |_| true));
        let mut p = Paginator::new(30);

        let outcome = p.request_next_page(&source).await;

        assert_eq!(outcome, PageOutcome::Appended { added: 30 });
        assert_eq!(ids(&p), (1..=30).collect::<Vec<_>>());
        assert!(!p.is_exhausted());
        assert!(!p.is_loading());
        assert_eq!(source.calls(), vec![(1, 30)]);
    }

    #[tokio::test]
    async fn private_items_are_dropped() {
        // every third lecture is private: 10 of 30
        let source = ScriptedSource::new().page(1, lectures(1..=30, |id| id % 3 != 0));
        let mut p = Paginator::new(30);

        p.request_next_page(&source).await;

        assert_eq!(p.len(), 20);
        assert!(p.items().iter().all(|l| l.visibility.is_public()));
        assert!(p.items().iter().all(|l| l.id % 3 != 0));
    }

    #[tokio::test]
    async fn overlapping_pages_are_deduplicated() {
        let source = ScriptedSource::new()
            .page(1, lectures(1..=30, |_| true))
            .page(2, lectures(25..=40, |_| true));
        let mut p = Paginator::new(30);

        p.request_next_page(&source).await;
        assert!(p.advance());
        let outcome = p.request_next_page(&source).await;

        assert_eq!(outcome, PageOutcome::Appended { added: 10 });
        assert_eq!(ids(&p), (1..=40).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn duplicates_within_one_page_keep_first() {
        let mut first = lecture(5, true);
        first.title = "first".to_string();
        let mut second = lecture(5, true);
        second.title = "second".to_string();
        let source = ScriptedSource::new().page(1, vec![first, lecture(6, true), second]);
        let mut p = Paginator::new(30);

        p.request_next_page(&source).await;

        assert_eq!(ids(&p), vec![5, 6]);
        assert_eq!(p.items()[0].title, "first");
    }

    #[tokio::test]
    async fn empty_visible_page_exhausts_for_good() {
        let source = ScriptedSource::new()
            .page(1, lectures(1..=3, |_| true))
            .page(2, lectures(4..=6, |_| false))
            .page(3, lectures(7..=9, |_| true));
        let mut p = Paginator::new(30);

        p.request_next_page(&source).await;
        p.advance();
        let outcome = p.request_next_page(&source).await;
        assert_eq!(outcome, PageOutcome::Exhausted);
        assert!(p.is_exhausted());
        assert_eq!(p.state(), LoadState::Exhausted);

        assert!(!p.advance());
        assert_eq!(p.request_next_page(&source).await, PageOutcome::Skipped);
        assert_eq!(source.calls().len(), 2);
        assert_eq!(ids(&p), vec![1, 2, 3]);
    }

    #[test]
    fn begin_while_loading_is_a_no_op() {
        let mut p: Paginator<Lecture> = Paginator::new(30);
        let request = p.begin().unwrap();
        assert_eq!(request, PageRequest { page: 1, page_size: 30 });

        assert_eq!(p.begin(), None);
        assert!(!p.advance());
        assert_eq!(p.cursor(), 1);
        assert!(p.is_empty());
        assert!(p.is_loading());
    }

    #[tokio::test]
    async fn request_while_loading_does_not_fetch() {
        let source = ScriptedSource::new().page(1, lectures(1..=3, |_| true));
        let mut p = Paginator::new(30);
        let _held = p.begin().unwrap();

        assert_eq!(p.request_next_page(&source).await, PageOutcome::Skipped);
        assert!(source.calls().is_empty());
        assert!(p.is_empty());
    }

    #[tokio::test]
    async fn failure_releases_latch_and_keeps_collection() {
        let source = ScriptedSource::new()
            .page(1, lectures(1..=3, |_| true))
            .fail(2, "connection reset");
        let mut p = Paginator::new(30);

        p.request_next_page(&source).await;
        p.advance();
        let outcome = p.request_next_page(&source).await;

        assert_eq!(outcome, PageOutcome::Failed);
        assert_eq!(ids(&p), vec![1, 2, 3]);
        assert!(!p.is_loading());
        assert!(!p.is_exhausted());
        assert!(p.advance());
        assert_eq!(p.cursor(), 3);
    }

    #[test]
    fn complete_releases_latch_on_every_path() {
        let mut p: Paginator<Lecture> = Paginator::new(30);

        let r = p.begin().unwrap();
        p.complete(r, Ok(vec![lecture(1, true)]));
        assert!(!p.is_loading());

        p.advance();
        let r = p.begin().unwrap();
        p.complete(r, Err(LecternError::Fetch("boom".into())));
        assert!(!p.is_loading());

        p.advance();
        let r = p.begin().unwrap();
        p.complete(r, Ok(vec![]));
        assert!(!p.is_loading());
        assert!(p.is_exhausted());
    }

    #[tokio::test]
    async fn dropped_request_releases_latch() {
        let source = ScriptedSource::new().pending(1);
        let mut p = Paginator::new(30);

        {
            let fut = p.request_next_page(&source);
            let timed = tokio::time::timeout(std::time::Duration::from_millis(10), fut).await;
            assert!(timed.is_err());
        }

        assert!(!p.is_loading());
        assert!(p.is_empty());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failure_is_logged_once() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .with_writer(move || writer.clone())
            .finish();
        let _default = tracing::subscriber::set_default(subscriber);

        let source = ScriptedSource::new().fail(1, "503 Service Unavailable");
        let mut p = Paginator::new(30);
        p.request_next_page(&source).await;

        let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(log.matches("failed to load lectures").count(), 1);
        assert!(log.contains("503 Service Unavailable"));
        assert!(p.is_empty());
        assert!(!p.is_loading());
    }

    #[test]
    fn page_size_floor_is_one() {
        let mut p: Paginator<Lecture> = Paginator::new(0);
        assert_eq!(p.begin().map(|r| r.page_size), Some(1));
    }
}
