//! Cursor pagination driver

use super::types::{ErrorPolicy, ListOutcome, PageState, RowSink, StopReason};
use crate::decode::{decode_connection, Connection};
use crate::error::{Error, Result};
use crate::filter::FilterExpression;
use crate::http::GraphqlTransport;
use crate::query::ListQuery;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

/// Runs a [`ListQuery`] to completion against a transport
pub struct PaginationDriver<'a> {
    transport: &'a dyn GraphqlTransport,
    policy: ErrorPolicy,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(transport: &'a dyn GraphqlTransport) -> Self {
        Self {
            transport,
            policy: ErrorPolicy::Abort,
        }
    }

    #[must_use]
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stream every item matching `filter` into `sink`.
    ///
    /// Pages are requested one at a time. A failed page under
    /// [`ErrorPolicy::Abort`] returns [`Error::PageFetch`] carrying the page
    /// number; items from earlier pages stay emitted.
    pub async fn run<T, S>(
        &self,
        query: &ListQuery,
        filter: &FilterExpression,
        sink: &mut S,
    ) -> Result<ListOutcome>
    where
        T: DeserializeOwned,
        S: RowSink<T> + ?Sized,
    {
        let mut state = PageState::initial();
        let mut pages = 0u32;
        let mut items = 0u64;

        let stop = loop {
            let cursor = match state {
                PageState::Fetching { cursor } => cursor,
                PageState::Done(stop) => break stop,
            };
            pages += 1;

            state = match self.fetch_page::<T>(query, filter, &cursor).await {
                Ok(page) => emit_page(page, filter, sink, &mut items),
                Err(e) => match self.policy {
                    ErrorPolicy::Abort => {
                        error!("{} page {} failed: {}", query.name, pages, e);
                        return Err(Error::page_fetch(pages, e));
                    }
                    ErrorPolicy::Tolerate => {
                        warn!("{} page {} failed, continuing: {}", query.name, pages, e);
                        PageState::Done(StopReason::ToleratedError)
                    }
                },
            };
        };

        debug!(
            "{} finished after {} page(s), {} item(s): {:?}",
            query.name, pages, items, stop
        );
        Ok(ListOutcome { pages, items, stop })
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        query: &ListQuery,
        filter: &FilterExpression,
        cursor: &str,
    ) -> Result<Connection<T>> {
        let variables = query.variables(filter, cursor);
        let data = self
            .transport
            .execute_raw(&query.document, Some(variables))
            .await?;
        decode_connection(&data, &query.root_field)
    }
}

/// Emit one page and compute the next state
fn emit_page<T, S>(
    page: Connection<T>,
    filter: &FilterExpression,
    sink: &mut S,
    items: &mut u64,
) -> PageState
where
    S: RowSink<T> + ?Sized,
{
    let next = page.paging.next;
    for item in page.items {
        sink.emit(item);
        *items += 1;
        if sink.rows_remaining() == Some(0) {
            return PageState::Done(StopReason::RowBudget);
        }
    }

    if !filter.paginate() {
        PageState::Done(StopReason::SinglePage)
    } else if next.is_empty() {
        PageState::Done(StopReason::Exhausted)
    } else {
        PageState::Fetching { cursor: next }
    }
}

impl std::fmt::Debug for PaginationDriver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationDriver")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
