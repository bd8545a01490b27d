//! Pagination types and traits
//!
//! Defines the row sink abstraction, the driver's state and its outcome.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What the driver does when a page fails to fetch or decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Return the error; nothing from the failed page is emitted
    #[default]
    Abort,
    /// Log the error and treat the page as empty, which ends the scan
    Tolerate,
}

/// Why a scan stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The service returned an empty next cursor
    Exhausted,
    /// The sink's row budget reached zero
    RowBudget,
    /// The caller pinned a page size, so only one page was requested
    SinglePage,
    /// A page failed under [`ErrorPolicy::Tolerate`]
    ToleratedError,
}

/// Driver state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// About to request the page at `cursor`; the first page uses `""`
    Fetching { cursor: String },
    /// Finished
    Done(StopReason),
}

impl PageState {
    pub fn initial() -> Self {
        Self::Fetching {
            cursor: String::new(),
        }
    }

    /// Check if the scan has finished
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Summary of a completed scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListOutcome {
    /// Pages requested, including a failed one
    pub pages: u32,
    /// Items handed to the sink
    pub items: u64,
    pub stop: StopReason,
}

/// Receives items as they are decoded
pub trait RowSink<T>: Send {
    /// Accept one item
    fn emit(&mut self, item: T);

    /// Rows the consumer still wants; `None` means unbounded. The driver
    /// stops as soon as this returns `Some(0)`.
    fn rows_remaining(&self) -> Option<u64>;
}

/// Shared cancellation flag checked through the sink's row budget
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn remaining(limit: Option<u64>, emitted: u64, cancel: Option<&CancelFlag>) -> Option<u64> {
    if cancel.is_some_and(CancelFlag::is_cancelled) {
        return Some(0);
    }
    limit.map(|limit| limit.saturating_sub(emitted))
}

/// Collects items into a vector
#[derive(Debug)]
pub struct CollectSink<T> {
    items: Vec<T>,
    limit: Option<u64>,
    cancel: Option<CancelFlag>,
}

impl<T> CollectSink<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            limit: None,
            cancel: None,
        }
    }

    /// Stop after `limit` items
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for CollectSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> RowSink<T> for CollectSink<T> {
    fn emit(&mut self, item: T) {
        self.items.push(item);
    }

    fn rows_remaining(&self) -> Option<u64> {
        remaining(self.limit, self.items.len() as u64, self.cancel.as_ref())
    }
}

/// Hands each item to a closure
pub struct CallbackSink<F> {
    callback: F,
    emitted: u64,
    limit: Option<u64>,
    cancel: Option<CancelFlag>,
}

impl<F> CallbackSink<F> {
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            emitted: 0,
            limit: None,
            cancel: None,
        }
    }

    /// Stop after `limit` items
    #[must_use]
    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

impl<T, F: FnMut(T) + Send> RowSink<T> for CallbackSink<F> {
    fn emit(&mut self, item: T) {
        (self.callback)(item);
        self.emitted += 1;
    }

    fn rows_remaining(&self) -> Option<u64> {
        remaining(self.limit, self.emitted, self.cancel.as_ref())
    }
}

impl<F> std::fmt::Debug for CallbackSink<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackSink")
            .field("emitted", &self.emitted)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}
