//! In-memory remote source for reconciliation tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{RemoteBookmark, RemoteBookmarkSource, SyncError};

/// Remote source serving fixed pages and repeating the last one forever
pub struct FakeRemote {
    pages: Vec<Vec<RemoteBookmark>>,
    online: bool,
    delay: Option<Duration>,
    fail_on_page: Option<u32>,
    calls: AtomicUsize,
}

impl FakeRemote {
    pub fn new(records: Vec<RemoteBookmark>) -> Self {
        Self::paged(vec![records])
    }

    pub fn paged(pages: Vec<Vec<RemoteBookmark>>) -> Self {
        Self {
            pages,
            online: true,
            delay: None,
            fail_on_page: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn offline() -> Self {
        Self {
            online: false,
            ..Self::paged(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_on(mut self, page: u32) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteBookmarkSource for FakeRemote {
    fn has_credentials(&self) -> bool {
        self.online
    }

    async fn fetch_page(&self, page: u32, _limit: u32) -> Result<Vec<RemoteBookmark>, SyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on_page == Some(page.max(1)) {
            return Err(SyncError::Server {
                status: 500,
                message: "boom".to_string(),
            });
        }

        let index = (page.max(1) as usize - 1).min(self.pages.len().saturating_sub(1));
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}

pub fn remote(id: &str, title: &str, list: &str) -> RemoteBookmark {
    RemoteBookmark {
        id: id.to_string(),
        url: format!("https://example.com/{id}"),
        title: title.to_string(),
        note: String::new(),
        date: "2017-03-02 13:08:41".to_string(),
        list: list.to_string(),
    }
}
