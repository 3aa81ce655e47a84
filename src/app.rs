use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::config::UiConfig;
use crate::error::{LecternError, Result};
use crate::event::{Event, Wheel};
use crate::layout::GridLayout;
use crate::paginator::{PageOutcome, PageRequest, Paginator};
use crate::sentinel::{Sentinel, SentinelTarget};
use crate::source::LectureSource;
use crate::types::Lecture;

/// Reports a fetch back to the UI task exactly once. If the task is dropped
/// before settling, the report is a failure, so the `loading` latch is
/// always released.
struct FetchTicket {
    tx: mpsc::UnboundedSender<Action>,
    request: PageRequest,
    load_id: u64,
    result: Option<Result<Vec<Lecture>>>,
}

impl FetchTicket {
    fn new(tx: mpsc::UnboundedSender<Action>, request: PageRequest, load_id: u64) -> Self {
        Self {
            tx,
            request,
            load_id,
            result: None,
        }
    }

    fn settle(mut self, result: Result<Vec<Lecture>>) {
        self.result = Some(result);
    }
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        let result = self.result.take().unwrap_or_else(|| {
            Err(LecternError::Fetch(
                "fetch task ended without a result".to_string(),
            ))
        });
        self.tx
            .send(Action::PageLoaded {
                request: self.request,
                result,
                load_id: self.load_id,
            })
            .ok();
    }
}

pub struct App {
    pub ui: UiConfig,
    pub paginator: Paginator<Lecture>,
    pub layout: GridLayout,
    pub selected: usize,
    pub scroll_row: usize,
    pub status: Option<String>,
    pub error: Option<String>,
    pub should_quit: bool,
    load_id: u64,
    page_size: u32,
    sentinel: Sentinel,
    source: Arc<dyn LectureSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        source: Arc<dyn LectureSource>,
        ui: UiConfig,
        page_size: u32,
        size: (u16, u16),
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let layout = GridLayout::for_terminal(size.0, size.1, &ui);
        let sentinel = Sentinel::new(ui.sentinel_threshold);
        Self {
            ui,
            paginator: Paginator::new(page_size),
            layout,
            selected: 0,
            scroll_row: 0,
            status: None,
            error: None,
            should_quit: false,
            load_id: 0,
            page_size,
            sentinel,
            source,
            action_tx,
        }
    }

    pub fn lectures(&self) -> &[Lecture] {
        self.paginator.items()
    }

    pub fn selected_lecture(&self) -> Option<&Lecture> {
        self.lectures().get(self.selected)
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Mount,
            Event::Key(key) => self.handle_key(key),
            Event::Wheel(Wheel::Down) => Action::ScrollDown,
            Event::Wheel(Wheel::Up) => Action::ScrollUp,
            Event::Resize(width, height) => Action::Resize(width, height),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('d') => Action::PageDown,
                KeyCode::Char('u') => Action::PageUp,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('h') | KeyCode::Left => Action::ScrollLeft,
            KeyCode::Char('l') | KeyCode::Right => Action::ScrollRight,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Enter => Action::OpenLecture,
            KeyCode::Char('o') => Action::OpenHome,
            KeyCode::Char('y') => Action::YankUrl,
            KeyCode::Char('r') => Action::Refresh,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if !matches!(action, Action::Quit | Action::None) {
            self.error = None;
            if !matches!(action, Action::PageLoaded { .. }) {
                self.status = None;
            }
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }

            Action::Mount => {
                self.start_fetch();
            }
            Action::Refresh => {
                self.remount();
            }
            Action::PageLoaded {
                request,
                result,
                load_id,
            } => {
                if load_id != self.load_id {
                    tracing::debug!(page = request.page, load_id, "discarding page from old mount");
                    return;
                }
                match self.paginator.complete(request, result) {
                    PageOutcome::Appended { added } if added > 0 => {}
                    // The sentinel did not move. A fresh watch reports it
                    // again so a failed or empty-handed page is not the
                    // end of the scroll.
                    _ => self.sentinel.disconnect(),
                }
            }

            Action::ScrollUp => {
                self.select(self.selected.saturating_sub(self.layout.columns));
            }
            Action::ScrollDown => {
                if self.selected + self.layout.columns < self.paginator.len() {
                    self.select(self.selected + self.layout.columns);
                }
            }
            Action::ScrollLeft => {
                self.select(self.selected.saturating_sub(1));
            }
            Action::ScrollRight => {
                self.select(self.selected + 1);
            }
            Action::PageUp => {
                let step = self.page_step();
                self.select(self.selected.saturating_sub(step));
            }
            Action::PageDown => {
                let step = self.page_step();
                self.select(self.selected + step);
            }
            Action::GoToTop => {
                self.select(0);
            }
            Action::GoToBottom => {
                self.select(usize::MAX);
            }
            Action::Resize(width, height) => {
                self.layout = GridLayout::for_terminal(width, height, &self.ui);
                self.select(self.selected);
            }

            Action::OpenHome => {
                let url = self.ui.home_url.clone();
                self.open_url(&url);
            }
            Action::OpenLecture => {
                if let Some(url) = self.selected_url() {
                    self.open_url(&url);
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.selected_url() {
                    match copy_to_clipboard(&url) {
                        Ok(()) => self.status = Some(format!("Copied {}", url)),
                        Err(e) => self.error = Some(e.to_string()),
                    }
                }
            }

            Action::None => {}
        }

        self.poll_sentinel();
    }

    /// Move the selection, clamped to the list, and scroll it into view.
    fn select(&mut self, index: usize) {
        let len = self.paginator.len();
        self.selected = index.min(len.saturating_sub(1));
        self.scroll_row = self.layout.scroll_for(self.selected, len, self.scroll_row);
    }

    fn page_step(&self) -> usize {
        (self.layout.visible_rows() / 2).max(1) * self.layout.columns
    }

    fn selected_url(&self) -> Option<String> {
        self.selected_lecture()
            .map(|lecture| lecture.link(&self.ui.lecture_url))
    }

    fn open_url(&mut self, url: &str) {
        if let Err(e) = open::that(url) {
            tracing::warn!(%url, error = %e, "could not open browser");
            self.error = Some(LecternError::Browser(e.to_string()).to_string());
        }
    }

    /// Drop the current list and start over from page 1.
    fn remount(&mut self) {
        self.load_id += 1;
        self.sentinel.disconnect();
        self.paginator = Paginator::new(self.page_size);
        self.selected = 0;
        self.scroll_row = 0;
        self.start_fetch();
    }

    /// Check the sentinel against the current scroll position and fetch the
    /// next page when it has come into view.
    fn poll_sentinel(&mut self) {
        if self.paginator.is_exhausted() {
            self.sentinel.disconnect();
            return;
        }

        let len = self.paginator.len();
        self.sentinel.watch(SentinelTarget {
            top: self.layout.sentinel_top(len),
            items: len,
        });

        let visible = self.layout.sentinel_visibility(len, self.scroll_row);
        if self.sentinel.report(visible) && self.paginator.advance() {
            self.start_fetch();
        }
    }

    fn start_fetch(&mut self) {
        let Some(request) = self.paginator.begin() else {
            return;
        };

        let ticket = FetchTicket::new(self.action_tx.clone(), request, self.load_id);
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let result = source
                .fetch_lectures(request.page, request.page_size)
                .await;
            ticket.settle(result);
        });
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| LecternError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| LecternError::Clipboard(e.to_string()))
}
