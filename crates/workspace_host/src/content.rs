//! File-content service used by hover previews.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`ContentService`].
pub type ContentFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service returning a file's textual content.
pub trait ContentService {
    /// Fetches the full text of `file_id`.
    fn fetch_content<'a>(&'a self, file_id: &'a str) -> ContentFuture<'a, Result<String, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Content service for hosts that cannot read file bodies.
pub struct NoopContentService;

impl ContentService for NoopContentService {
    fn fetch_content<'a>(&'a self, file_id: &'a str) -> ContentFuture<'a, Result<String, String>> {
        Box::pin(async move { Err(format!("preview unavailable for {file_id}")) })
    }
}

#[derive(Debug, Default)]
struct MemoryContentState {
    bodies: HashMap<String, Result<String, String>>,
    served: HashMap<String, usize>,
}

#[derive(Debug, Clone, Default)]
/// In-memory content keyed by file id. Unknown ids fail.
pub struct MemoryContentService {
    inner: Rc<RefCell<MemoryContentState>>,
}

impl MemoryContentService {
    /// Registers the text returned for `file_id`.
    pub fn insert(&self, file_id: impl Into<String>, text: impl Into<String>) {
        self.inner
            .borrow_mut()
            .bodies
            .insert(file_id.into(), Ok(text.into()));
    }

    /// Registers a failure returned for `file_id`.
    pub fn insert_failure(&self, file_id: impl Into<String>, message: impl Into<String>) {
        self.inner
            .borrow_mut()
            .bodies
            .insert(file_id.into(), Err(message.into()));
    }

    /// Number of fetches served for `file_id`, failures included.
    pub fn fetch_count(&self, file_id: &str) -> usize {
        self.inner.borrow().served.get(file_id).copied().unwrap_or(0)
    }

    /// Number of fetches served across all ids.
    pub fn total_fetch_count(&self) -> usize {
        self.inner.borrow().served.values().sum()
    }
}

impl ContentService for MemoryContentService {
    fn fetch_content<'a>(&'a self, file_id: &'a str) -> ContentFuture<'a, Result<String, String>> {
        Box::pin(async move {
            let mut state = self.inner.borrow_mut();
            *state.served.entry(file_id.to_string()).or_default() += 1;
            let body = state.bodies.get(file_id).cloned();
            body.unwrap_or_else(|| Err(format!("file not found: {file_id}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn memory_content_serves_text_failures_and_counts() {
        let content = MemoryContentService::default();
        content.insert("f-1", "fn main() {}");
        content.insert_failure("f-2", "permission denied");
        let content_obj: &dyn ContentService = &content;

        assert_eq!(
            block_on(content_obj.fetch_content("f-1")).expect("fetch"),
            "fn main() {}"
        );
        assert_eq!(
            block_on(content_obj.fetch_content("f-2")).expect_err("failure"),
            "permission denied"
        );
        assert!(block_on(content_obj.fetch_content("missing")).is_err());
        assert_eq!(content.fetch_count("f-1"), 1);
        assert_eq!(content.total_fetch_count(), 3);
    }
}
