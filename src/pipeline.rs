use crate::api::ApiSession;
use crate::categories::resolve_categories;
use crate::checkins::fetch_checkins;
use crate::config::ExportOptions;
use crate::date::TimeWindow;
use crate::document::{build_document, Document};
use crate::error::FetchError;
use crate::output::{write_document_file, ExportFormat};
use crate::progress::ProgressCallback;
use crate::stats::ExportStats;
use crate::transport::{HttpTransport, Transport};
use crate::venues::fetch_venues;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

/// Result of a successful run: the complete tree and its counters.
#[derive(Clone, Debug)]
pub struct ExportOutput {
    pub document: Document,
    pub stats: ExportStats,
}

/// Builder-style entry point for one or more export runs. Holds no per-run state;
/// every `run` fetches from scratch.
#[derive(Clone)]
pub struct Exporter {
    pub(crate) opts: ExportOptions,
    transport: Arc<dyn Transport>,
}

impl Exporter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { opts: ExportOptions::default(), transport }
    }

    /// Production transport built from `opts.request_timeout`.
    pub fn with_http(opts: ExportOptions) -> Self {
        let transport = Arc::new(HttpTransport::new(opts.request_timeout));
        Self { opts, transport }
    }

    // -------- Builder methods --------
    pub fn with_options(mut self, opts: ExportOptions) -> Self { self.opts = opts; self }
    pub fn window(mut self, window: TimeWindow) -> Self { self.opts = self.opts.with_window(window); self }
    pub fn after(mut self, t: OffsetDateTime) -> Self { self.opts.window.after = Some(t); self }
    pub fn before(mut self, t: OffsetDateTime) -> Self { self.opts.window.before = Some(t); self }
    pub fn api_base(mut self, base: impl Into<String>) -> Self { self.opts = self.opts.with_api_base(base); self }
    pub fn page_sizes(mut self, venues: usize, checkins: usize) -> Self { self.opts = self.opts.with_page_sizes(venues, checkins); self }
    pub fn max_pages(mut self, venues: usize, checkins: usize) -> Self { self.opts = self.opts.with_max_pages(venues, checkins); self }
    pub fn request_timeout(mut self, t: Duration) -> Self { self.opts = self.opts.with_request_timeout(t); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }

    pub fn opts(&self) -> &ExportOptions {
        &self.opts
    }

    /// Resolve categories alongside the venue -> check-in fetch sequence, then build.
    /// The first upstream error aborts the run; no partial document is returned.
    pub fn run(&self, token: &str, mut progress: Option<&mut ProgressCallback<'_>>) -> Result<ExportOutput, FetchError> {
        let session = ApiSession::new(self.transport.as_ref(), &self.opts, token);
        tracing::info!(window = %self.opts.window, "starting export");

        let (categories, fetched) = rayon::join(
            || resolve_categories(&session),
            || -> Result<_, FetchError> {
                let venues = fetch_venues(&session, progress.as_deref_mut())?;
                let checkins = fetch_checkins(&session, progress.as_deref_mut())?;
                Ok((venues, checkins))
            },
        );
        let (venues, checkins) = fetched?;
        let categories = categories?;

        let (document, mut stats) = build_document(venues, &checkins.by_venue, &categories);
        stats.record_checkin_fetch(&checkins.stats);
        stats.log_summary();
        Ok(ExportOutput { document, stats })
    }

    /// `run`, then write the document to `out_path` in `format`.
    pub fn run_to_file(
        &self,
        token: &str,
        out_path: &Path,
        format: ExportFormat,
        progress: Option<&mut ProgressCallback<'_>>,
    ) -> Result<ExportStats> {
        let out = self.run(token, progress).context("export failed")?;
        write_document_file(&out.document, format, out_path)?;
        tracing::info!(path = %out_path.display(), placemarks = out.document.placemark_count(), "export written");
        Ok(out.stats)
    }
}
