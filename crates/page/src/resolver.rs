//! Page-level progress resolution.

use std::time::Duration;

use evtrack_core::{percent_value, PageKind, ProgressSource, Resolution, SubJobId};
use evtrack_progress::{fallback, ProgressResolver};
use evtrack_storage::ProgressCache;
use tracing::{debug, info, warn};

use crate::config::PageDefaults;
use crate::html::{first_sub_job_id, PageDocument};
use crate::ready::ReadySignal;

/// Resolves the percentage shown on one of the progress pages.
///
/// Reads the page's table, consults the cache for values other pages left
/// behind, and on sub-job pages leaves its own computed value for the
/// project page.
#[derive(Clone)]
pub struct PageResolver {
    resolver: ProgressResolver,
    cache: ProgressCache,
    defaults: PageDefaults,
}

impl PageResolver {
    /// Create a page resolver over a cache.
    pub fn new(cache: ProgressCache) -> Self {
        Self {
            resolver: ProgressResolver::new(),
            cache,
            defaults: PageDefaults::default(),
        }
    }

    /// Use custom per-page defaults.
    pub fn with_defaults(mut self, defaults: PageDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// The cache in use.
    pub fn cache(&self) -> &ProgressCache {
        &self.cache
    }

    /// Resolve from rendered HTML.
    ///
    /// `sub_job` names the sub job a sub-job page shows; on the project page
    /// it is read from the sub-jobs table when not given.
    pub async fn resolve(
        &self,
        kind: PageKind,
        html: &str,
        sub_job: Option<&SubJobId>,
    ) -> Resolution {
        let document = PageDocument::parse(html);
        self.resolve_document(kind, &document, sub_job).await
    }

    /// Resolve from an already parsed page.
    ///
    /// The page's table is tried first, then the hours metric cards, then a
    /// cached value, then the page default.
    pub async fn resolve_document(
        &self,
        kind: PageKind,
        document: &PageDocument,
        sub_job: Option<&SubJobId>,
    ) -> Resolution {
        let table = document.find_table(kind.table_kind());
        if table.is_none() {
            debug!(page = %kind, "no matching table on page");
        }

        let sub_job = sub_job.cloned().or_else(|| match kind {
            PageKind::ProjectOverview => table.and_then(first_sub_job_id),
            _ => None,
        });

        let resolution = match table.and_then(|t| self.resolver.resolve_table(t)) {
            Some(resolution) => resolution,
            None => match document.cards.hours().and_then(|hours| hours.percent()) {
                Some(percent) => Resolution::new(percent, ProgressSource::HoursCards),
                None => {
                    let cached = self.cached_signal(kind, document, sub_job.as_ref()).await;
                    fallback(cached.as_deref(), self.defaults.for_page(kind))
                }
            },
        };

        if kind == PageKind::SubJobOverview && resolution.is_computed() {
            if let Some(id) = &sub_job {
                self.cache.store_sub_job_progress(id, resolution.percent).await;
            }
        }

        info!(
            page = %kind,
            percent = resolution.percent,
            source = %resolution.source,
            "page progress resolved"
        );
        resolution
    }

    /// Wait for the page to signal readiness, then resolve it. If the page
    /// never becomes ready the page default is returned.
    pub async fn resolve_when_ready(
        &self,
        kind: PageKind,
        signal: ReadySignal,
        timeout: Duration,
        sub_job: Option<&SubJobId>,
    ) -> Resolution {
        match signal.wait(timeout).await {
            Some(html) => self.resolve(kind, &html, sub_job).await,
            None => {
                warn!(page = %kind, "page data never arrived, using default");
                Resolution::defaulted(self.defaults.for_page(kind))
            }
        }
    }

    /// Value carried over from elsewhere: the sub-job cache on the project
    /// page, else the page's "Overall Progress" card.
    async fn cached_signal(
        &self,
        kind: PageKind,
        document: &PageDocument,
        sub_job: Option<&SubJobId>,
    ) -> Option<String> {
        if kind == PageKind::ProjectOverview {
            if let Some(value) = self.cached_sub_job_progress(sub_job).await {
                return Some(value);
            }
        }
        document.cards.overall_progress().map(|p| p.to_string())
    }

    // The shown sub job's own entry counts only when it is positive;
    // otherwise the first cached sub-job entry is used as is.
    async fn cached_sub_job_progress(&self, sub_job: Option<&SubJobId>) -> Option<String> {
        if let Some(id) = sub_job {
            if let Some(value) = self.cache.sub_job_progress(id).await {
                if percent_value(&value).is_some_and(|p| p > 0.0) {
                    return Some(value);
                }
                debug!(sub_job = %id, value = %value, "cached progress is not positive");
            }
        }
        self.cache
            .any_sub_job_progress()
            .await
            .map(|(id, value)| {
                debug!(sub_job = %id, "using first cached sub job progress");
                value
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ready::ready_channel;
    use evtrack_storage::MemoryCache;

    const WORK_ITEMS: &str = r#"
        <table>
          <thead><tr><th>Work Item</th><th>Budgeted Quantity</th><th>Earned Quantity</th></tr></thead>
          <tbody>
            <tr><td>Excavate</td><td>100 CYD</td><td>25 CYD</td></tr>
            <tr><td>Backfill</td><td>50 CYD</td><td>25 CYD</td></tr>
          </tbody>
        </table>"#;

    const PROJECT_WITHOUT_PROGRESS: &str = r#"
        <table>
          <thead><tr><th>Sub Job</th><th>Name</th></tr></thead>
          <tbody><tr><td>SJ-4</td><td>Paving</td></tr></tbody>
        </table>"#;

    fn page_resolver() -> PageResolver {
        PageResolver::new(ProgressCache::new(MemoryCache::new()))
    }

    #[tokio::test]
    async fn test_sub_job_page_caches_computed_value() {
        let pages = page_resolver();
        let id = SubJobId::new("SJ-4").unwrap();

        let r = pages.resolve(PageKind::SubJobOverview, WORK_ITEMS, Some(&id)).await;
        assert_eq!(r.source, ProgressSource::Quantities);
        assert!((r.percent - 100.0 / 3.0).abs() < 1e-9);

        let cached = pages.cache().sub_job_progress(&id).await.unwrap();
        assert!((cached.parse::<f64>().unwrap() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_project_page_reads_sub_job_cache() {
        let pages = page_resolver();
        pages
            .cache()
            .store_sub_job_progress(&SubJobId::new("SJ-4").unwrap(), 61.0)
            .await;

        let r = pages.resolve(PageKind::ProjectOverview, PROJECT_WITHOUT_PROGRESS, None).await;
        assert_eq!(r, Resolution::new(61.0, ProgressSource::Cached));
    }

    #[tokio::test]
    async fn test_project_page_uses_any_cached_sub_job() {
        let pages = page_resolver();
        pages
            .cache()
            .store_sub_job_progress(&SubJobId::new("SJ-9").unwrap(), 12.0)
            .await;

        let r = pages.resolve(PageKind::ProjectOverview, PROJECT_WITHOUT_PROGRESS, None).await;
        assert_eq!(r, Resolution::new(12.0, ProgressSource::Cached));
    }

    #[tokio::test]
    async fn test_zero_entry_for_shown_sub_job_yields_to_first_entry() {
        let pages = page_resolver();
        let cache = pages.cache();
        cache.store_sub_job_progress(&SubJobId::new("SJ-9").unwrap(), 12.0).await;
        cache.store_sub_job_progress(&SubJobId::new("SJ-4").unwrap(), 0.0).await;

        let r = pages.resolve(PageKind::ProjectOverview, PROJECT_WITHOUT_PROGRESS, None).await;
        assert_eq!(r, Resolution::new(12.0, ProgressSource::Cached));

        cache.set("subJobProgress_SJ-4", "abc").await;
        let r = pages.resolve(PageKind::ProjectOverview, PROJECT_WITHOUT_PROGRESS, None).await;
        assert_eq!(r, Resolution::new(12.0, ProgressSource::Cached));
    }

    #[tokio::test]
    async fn test_hours_cards_before_overall_card() {
        let html = r#"
            <div class="metrics-grid">
              <div class="metric-card"><div class="title">Overall Progress</div><div class="value">90%</div></div>
              <div class="metric-card"><div class="title">Budgeted Hours</div><div class="value">80.0</div></div>
              <div class="metric-card"><div class="title">Earned Hours</div><div class="value">20.0</div></div>
            </div>"#;
        let pages = page_resolver();
        let id = SubJobId::new("SJ-2").unwrap();

        let r = pages.resolve(PageKind::SubJobOverview, html, Some(&id)).await;
        assert_eq!(r, Resolution::new(25.0, ProgressSource::HoursCards));
        assert_eq!(pages.cache().sub_job_progress(&id).await, Some("25".to_string()));
    }

    #[tokio::test]
    async fn test_table_outranks_hours_cards() {
        let html = format!(
            r#"<div class="metric-card"><div class="title">Budgeted Hours</div><div class="value">10</div></div>
               <div class="metric-card"><div class="title">Earned Hours</div><div class="value">10</div></div>
               {WORK_ITEMS}"#
        );
        let r = page_resolver().resolve(PageKind::Dashboard, &html, None).await;
        assert_eq!(r.source, ProgressSource::Quantities);
    }

    #[tokio::test]
    async fn test_zero_budgeted_hours_cards_are_skipped() {
        let html = r#"
            <div class="metric-card"><div class="title">Budgeted Hours</div><div class="value">0</div></div>
            <div class="metric-card"><div class="title">Earned Hours</div><div class="value">4</div></div>"#;
        let r = page_resolver().resolve(PageKind::Dashboard, html, None).await;
        assert_eq!(r, Resolution::defaulted(0.0));
    }

    #[tokio::test]
    async fn test_project_page_default() {
        let r = page_resolver()
            .resolve(PageKind::ProjectOverview, "<p>nothing here</p>", None)
            .await;
        assert_eq!(r, Resolution::defaulted(48.0));
    }

    #[tokio::test]
    async fn test_displayed_card_stands_in_for_cache() {
        let html = r#"<div class="metric-card"><span class="title">Overall Progress</span><span class="value">27%</span></div>"#;
        let r = page_resolver().resolve(PageKind::Dashboard, html, None).await;
        assert_eq!(r, Resolution::new(27.0, ProgressSource::Cached));
    }

    #[tokio::test]
    async fn test_failing_cache_never_fails_resolution() {
        let pages = PageResolver::new(ProgressCache::new(MemoryCache::disabled()));
        let id = SubJobId::new("1").unwrap();
        let r = pages.resolve(PageKind::SubJobOverview, WORK_ITEMS, Some(&id)).await;
        assert_eq!(r.source, ProgressSource::Quantities);

        let r = pages.resolve(PageKind::ProjectOverview, "", None).await;
        assert_eq!(r, Resolution::defaulted(48.0));
    }

    #[tokio::test]
    async fn test_custom_defaults() {
        let pages = page_resolver().with_defaults(PageDefaults {
            dashboard: 5.0,
            ..PageDefaults::default()
        });
        let r = pages.resolve(PageKind::Dashboard, "", None).await;
        assert_eq!(r, Resolution::defaulted(5.0));
    }

    #[tokio::test]
    async fn test_resolve_when_ready() {
        let pages = page_resolver();
        let (notifier, signal) = ready_channel();
        notifier.deliver(WORK_ITEMS);
        let r = pages
            .resolve_when_ready(PageKind::Dashboard, signal, Duration::from_secs(1), None)
            .await;
        assert_eq!(r.source, ProgressSource::Quantities);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_ready_uses_default() {
        let pages = page_resolver();
        let (_notifier, signal) = ready_channel();
        let r = pages
            .resolve_when_ready(PageKind::SubJobOverview, signal, Duration::from_secs(2), None)
            .await;
        assert_eq!(r, Resolution::defaulted(32.0));
    }
}
