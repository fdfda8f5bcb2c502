use crate::date::{Day, TimeWindow};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.foursquare.com/v2";
pub const DEFAULT_OAUTH_BASE: &str = "https://foursquare.com/oauth2";
pub const DEFAULT_API_VERSION: &str = "20130116";

pub const VENUES_PAGE_LIMIT: usize = 250;
pub const MAX_VENUE_PAGES: usize = 1000;
pub const CHECKINS_PAGE_LIMIT: usize = 250;
pub const MAX_CHECKIN_PAGES: usize = 1000;

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub api_base: String,
    pub oauth_base: String,
    pub api_version: String,         // value of the `v` query parameter
    pub window: TimeWindow,
    pub venue_page_size: usize,
    pub checkin_page_size: usize,
    pub max_venue_pages: usize,      // hard ceiling regardless of declared totals
    pub max_checkin_pages: usize,
    pub request_timeout: Duration,   // per request; zero disables
    pub progress: bool,              // show terminal progress bars
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            oauth_base: DEFAULT_OAUTH_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            window: TimeWindow::all(),
            venue_page_size: VENUES_PAGE_LIMIT,
            checkin_page_size: CHECKINS_PAGE_LIMIT,
            max_venue_pages: MAX_VENUE_PAGES,
            max_checkin_pages: MAX_CHECKIN_PAGES,
            request_timeout: Duration::from_secs(15),
            progress: true,
        }
    }
}

impl ExportOptions {
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = trim_base(base.into());
        self
    }
    pub fn with_oauth_base(mut self, base: impl Into<String>) -> Self {
        self.oauth_base = trim_base(base.into());
        self
    }
    pub fn with_api_version(mut self, v: impl Into<String>) -> Self {
        self.api_version = v.into();
        self
    }
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }
    pub fn with_page_sizes(mut self, venues: usize, checkins: usize) -> Self {
        self.venue_page_size = venues.max(1);
        self.checkin_page_size = checkins.max(1);
        self
    }
    pub fn with_max_pages(mut self, venues: usize, checkins: usize) -> Self {
        self.max_venue_pages = venues;
        self.max_checkin_pages = checkins;
        self
    }
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    /// Overlay settings from the environment:
    /// - VISITMAP_API_BASE / VISITMAP_OAUTH_BASE: endpoint roots
    /// - VISITMAP_API_VERSION: value of the `v` parameter
    /// - VISITMAP_TIMEOUT_SECS: per-request deadline
    /// - VISITMAP_FROM / VISITMAP_TO: YYYY-MM-DD window bounds
    /// - VISITMAP_PROGRESS: `0`/`false` disables progress bars
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env(mut self) -> Self {
        if let Some(v) = env_nonempty("VISITMAP_API_BASE") {
            self = self.with_api_base(v);
        }
        if let Some(v) = env_nonempty("VISITMAP_OAUTH_BASE") {
            self = self.with_oauth_base(v);
        }
        if let Some(v) = env_nonempty("VISITMAP_API_VERSION") {
            self = self.with_api_version(v);
        }
        if let Some(v) = env_nonempty("VISITMAP_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(secs) => self.request_timeout = Duration::from_secs(secs),
                Err(_) => tracing::warn!("VISITMAP_TIMEOUT_SECS is not a number: {}", v),
            }
        }
        if let Some(v) = env_nonempty("VISITMAP_FROM") {
            match v.parse::<Day>() {
                Ok(d) => self.window.after = Some(d.start_utc()),
                Err(e) => tracing::warn!("ignoring VISITMAP_FROM: {}", e),
            }
        }
        if let Some(v) = env_nonempty("VISITMAP_TO") {
            match v.parse::<Day>() {
                Ok(d) => self.window.before = Some(d.start_utc()),
                Err(e) => tracing::warn!("ignoring VISITMAP_TO: {}", e),
            }
        }
        if let Some(v) = env_nonempty("VISITMAP_PROGRESS") {
            self.progress = !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off");
        }
        self
    }
}

fn trim_base(s: String) -> String {
    s.trim().trim_end_matches('/').to_string()
}

pub(crate) fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
