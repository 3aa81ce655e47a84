use crate::error::Result;
use crate::paginator::PageRequest;
use crate::types::Lecture;

#[derive(Debug)]
pub enum Action {
    Quit,

    // List lifecycle
    Mount,
    Refresh,
    PageLoaded {
        request: PageRequest,
        result: Result<Vec<Lecture>>,
        load_id: u64,
    },

    // Navigation
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Resize(u16, u16),

    // Links
    OpenLecture,
    OpenHome,
    YankUrl,

    None,
}

