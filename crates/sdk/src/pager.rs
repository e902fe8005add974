//! Cursor pager over the paginated list operations.

use crate::api::{
    ListReportEvaluationsOptions, ListReportResourcesOptions, ListReportsOptions,
    OperationOptions,
};
use crate::client::ResultsClient;
use crate::context::RequestContext;
use crate::error::{ResultsError, ResultsResult};
use compliance_results_core::Paginated;
use futures_util::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Option bundle of a list operation that can be paged.
///
/// Implemented by the list operations' option types.
pub trait PagedOptions: OperationOptions + Clone + Send + Sync {
    /// Page returned by the operation.
    type Page: Paginated + DeserializeOwned + Send;

    /// Page cursor of this bundle.
    fn start(&self) -> Option<&str>;

    /// Replace the page cursor.
    fn set_start(&mut self, start: Option<String>);
}

/// Item type produced by a pager.
pub type PageItem<O> = <<O as PagedOptions>::Page as Paginated>::Item;

/// Pager over [`ListReportsOptions`].
pub type ReportsPager = Pager<ListReportsOptions>;
/// Pager over [`ListReportEvaluationsOptions`].
pub type ReportEvaluationsPager = Pager<ListReportEvaluationsOptions>;
/// Pager over [`ListReportResourcesOptions`].
pub type ReportResourcesPager = Pager<ListReportResourcesOptions>;

/// Walks a cursor-paginated list operation page by page.
///
/// The pager keeps its own copy of the options and only rewrites `start` on
/// that copy. Each [`Pager::get_next`] issues exactly one request. Calls must
/// not overlap; after an error the pager should be discarded.
#[derive(Debug)]
pub struct Pager<O: PagedOptions> {
    client: ResultsClient,
    options: O,
    cursor: Option<String>,
    has_next: bool,
}

impl<O: PagedOptions> Pager<O> {
    /// Create a pager. Fails if `options` already has a `start` cursor.
    pub fn new(client: &ResultsClient, options: &O) -> ResultsResult<Self> {
        if options.start().is_some() {
            return Err(ResultsError::State(
                "start must not be pre-set on a pager".to_string(),
            ));
        }

        Ok(Self {
            client: client.clone(),
            options: options.clone(),
            cursor: None,
            has_next: true,
        })
    }

    /// Whether another page may be fetched.
    pub fn has_next(&self) -> bool {
        self.has_next
    }

    /// Fetch the next page and return its items.
    pub async fn get_next(&mut self) -> ResultsResult<Vec<PageItem<O>>> {
        self.get_next_with_context(&RequestContext::default()).await
    }

    pub async fn get_next_with_context(
        &mut self,
        ctx: &RequestContext,
    ) -> ResultsResult<Vec<PageItem<O>>> {
        if !self.has_next {
            return Err(ResultsError::State("no more results".to_string()));
        }

        let mut options = self.options.clone();
        options.set_start(self.cursor.clone());

        let response = self
            .client
            .invoke_json::<O::Page>(options.call(), ctx)
            .await?;

        let Some(page) = response.into_result() else {
            debug!("Empty page body, pager exhausted");
            self.cursor = None;
            self.has_next = false;
            return Ok(Vec::new());
        };

        self.cursor = page.next_start();
        self.has_next = self.cursor.is_some();
        debug!(
            next_start = self.cursor.as_deref(),
            has_next = self.has_next,
            "Fetched page"
        );

        Ok(page.into_items())
    }

    /// Fetch every remaining page and concatenate the items.
    pub async fn get_all(&mut self) -> ResultsResult<Vec<PageItem<O>>> {
        self.get_all_with_context(&RequestContext::default()).await
    }

    pub async fn get_all_with_context(
        &mut self,
        ctx: &RequestContext,
    ) -> ResultsResult<Vec<PageItem<O>>> {
        let mut items = Vec::new();
        while self.has_next {
            items.extend(self.get_next_with_context(ctx).await?);
        }
        Ok(items)
    }

    /// Turn the pager into a stream of items, fetching pages lazily.
    pub fn into_stream(self) -> impl Stream<Item = ResultsResult<PageItem<O>>> {
        stream::try_unfold(self, |mut pager| async move {
            if !pager.has_next {
                return Ok::<_, ResultsError>(None);
            }
            let items = pager.get_next().await?;
            Ok(Some((stream::iter(items.into_iter().map(Ok)), pager)))
        })
        .try_flatten()
    }
}
