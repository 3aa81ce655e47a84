//! Test doubles shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{LecternError, Result};
use crate::source::LectureSource;
use crate::types::{Lecture, Visibility};

pub fn lecture(id: u64, public: bool) -> Lecture {
    Lecture {
        id,
        title: format!("Lecture {}", id),
        instructor: Some(format!("Instructor {}", id % 7)),
        description: None,
        category: None,
        url: None,
        visibility: if public {
            Visibility::Public
        } else {
            Visibility::Private
        },
        created_at: None,
    }
}

pub fn lectures(
    ids: impl IntoIterator<Item = u64>,
    public: impl Fn(u64) -> bool,
) -> Vec<Lecture> {
    ids.into_iter().map(|id| lecture(id, public(id))).collect()
}

#[derive(Debug)]
enum Reply {
    Page(Vec<Lecture>),
    Fail(String),
    Pending,
}

/// A source answering from a per-page script. Unscripted pages are empty.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    replies: HashMap<u32, Reply>,
    calls: Mutex<Vec<(u32, u32)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, lectures: Vec<Lecture>) -> Self {
        self.replies.insert(page, Reply::Page(lectures));
        self
    }

    pub fn fail(mut self, page: u32, message: &str) -> Self {
        self.replies.insert(page, Reply::Fail(message.to_string()));
        self
    }

    /// The fetch for `page` never resolves.
    pub fn pending(mut self, page: u32) -> Self {
        self.replies.insert(page, Reply::Pending);
        self
    }

    /// `(page, page_size)` of every fetch issued so far.
    pub fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LectureSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_lectures(&self, page: u32, page_size: u32) -> Result<Vec<Lecture>> {
        self.calls.lock().unwrap().push((page, page_size));
        match self.replies.get(&page) {
            Some(Reply::Page(lectures)) => Ok(lectures.clone()),
            Some(Reply::Fail(message)) => Err(LecternError::Fetch(message.clone())),
            Some(Reply::Pending) => futures::future::pending().await,
            None => Ok(Vec::new()),
        }
    }
}
