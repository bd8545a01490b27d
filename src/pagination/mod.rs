//! Pagination module
//!
//! Drives a list query page by page with an opaque cursor.
//!
//! # Overview
//!
//! The driver starts with an empty cursor, sends the filter and cursor as query
//! variables, streams every item of each page into a [`RowSink`] and follows
//! `paging.next` until it is empty. The sink's remaining row budget is checked
//! after every emission so a satisfied or cancelled consumer stops the scan
//! mid-page. Listings that join across entities which may have been deleted
//! can opt into [`ErrorPolicy::Tolerate`].

mod driver;
mod types;

pub use driver::PaginationDriver;
pub use types::{
    CallbackSink, CancelFlag, CollectSink, ErrorPolicy, ListOutcome, PageState, RowSink,
    StopReason,
};
