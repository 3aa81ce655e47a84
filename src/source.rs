use async_trait::async_trait;

use crate::error::Result;
use crate::types::Lecture;

/// Where pages of lectures come from.
#[async_trait]
pub trait LectureSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Fetch one page. `page` starts at 1.
    async fn fetch_lectures(&self, page: u32, page_size: u32) -> Result<Vec<Lecture>>;
}
