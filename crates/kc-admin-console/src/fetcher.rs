//! Page retrieval for group listings.

use std::sync::Arc;

use kc_admin_client::dto::GroupRepresentation;
use kc_admin_client::query::{CountQuery, GroupQuery};
use kc_admin_client::{ClientError, ClientResult};

use crate::backend::GroupBackend;

/// Result of a page fetch. The listing and the count are independent
/// requests, so each side keeps its own outcome.
#[derive(Debug)]
pub struct PageFetch {
    /// Groups of the requested window.
    pub items: ClientResult<Vec<GroupRepresentation>>,
    /// Total number of matching top-level groups.
    pub count: ClientResult<u64>,
}

impl PageFetch {
    /// Combines both sides, failing with the first error.
    pub fn into_result(self) -> Result<(Vec<GroupRepresentation>, u64), ClientError> {
        Ok((self.items?, self.count?))
    }
}

/// Issues listing and count requests against a [`GroupBackend`].
#[derive(Clone)]
pub struct PaginatedFetcher {
    backend: Arc<dyn GroupBackend>,
}

impl std::fmt::Debug for PaginatedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedFetcher").finish_non_exhaustive()
    }
}

impl PaginatedFetcher {
    /// Creates a fetcher.
    #[must_use]
    pub fn new(backend: Arc<dyn GroupBackend>) -> Self {
        Self { backend }
    }

    /// Fetches one window of top-level groups together with the total.
    ///
    /// Both requests carry the same filter and run concurrently.
    pub async fn fetch_page(&self, first: u32, max: u32, search: Option<&str>) -> PageFetch {
        let list = GroupQuery::top_level(first, max, search);
        let total = CountQuery::top_level(search);
        tracing::debug!(first, max, search = ?list.search, "fetching group page");

        let (items, count) = futures::join!(
            self.backend.list_groups(&list),
            self.backend.count_groups(&total)
        );
        PageFetch { items, count }
    }

    /// Fetches the first `max` children of a group, in backend order.
    pub async fn fetch_children(
        &self,
        parent_id: &str,
        max: u32,
    ) -> ClientResult<Vec<GroupRepresentation>> {
        tracing::debug!(parent_id, max, "fetching sub-groups");
        self.backend
            .list_groups(&GroupQuery::children(parent_id, 0, max))
            .await
    }
}
