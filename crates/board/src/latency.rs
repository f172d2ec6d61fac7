//! Fixed-delay wrapper around a search service.
//!
//! Used by demos and the benchmark to make in-memory searches behave like a
//! remote call, so concurrent controller operations actually overlap.

use std::time::Duration;

use async_trait::async_trait;
use listing::{FilterSet, Page, SearchError, SearchService};

/// Sleeps for `delay` before delegating every search to the inner service.
#[derive(Debug, Clone)]
pub struct SimulatedLatency<S> {
    inner: S,
    delay: Duration,
}

impl<S> SimulatedLatency<S> {
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl<F, S> SearchService<F> for SimulatedLatency<S>
where
    F: FilterSet,
    S: SearchService<F>,
{
    type Entity = S::Entity;

    async fn search(&self, filters: &F) -> Result<Page<S::Entity>, SearchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.search(filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobFilters, JobSearch};
    use catalog::CatalogIndex;
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_delays_then_delegates() {
        let service = SimulatedLatency::new(
            JobSearch::new(Arc::new(CatalogIndex::new())),
            Duration::from_millis(250),
        );

        let start = Instant::now();
        let page = service.search(&JobFilters::default()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(250));
        assert!(page.is_empty());
        assert_eq!(page.pagination.total_items, 0);
    }
}
