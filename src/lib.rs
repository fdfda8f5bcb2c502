mod config;
mod date;
mod error;
mod util;

mod api;
mod transport;
mod progress;

mod categories;
mod venues;
mod checkins;

mod stats;
mod document;
mod kml;
mod output;

mod auth;
mod pipeline;

pub use crate::config::{
    ExportOptions, CHECKINS_PAGE_LIMIT, DEFAULT_API_BASE, DEFAULT_API_VERSION, DEFAULT_OAUTH_BASE,
    MAX_CHECKIN_PAGES, MAX_VENUE_PAGES, VENUES_PAGE_LIMIT,
};
pub use crate::date::{format_unix_utc, Day, TimeWindow};
pub use crate::error::FetchError;
pub use crate::pipeline::{ExportOutput, Exporter};

// Transport seam: inject your own for tests or alternate backends.
pub use crate::transport::{HttpTransport, Transport};
pub use crate::api::{
    get_json, ApiSession, CategoryRef, GlobalCategory, Location, Venue, CATEGORIES_PATH, CHECKINS_PATH,
    VENUE_HISTORY_PATH,
};

// Progress callback surface and the terminal renderer used by the binary.
pub use crate::progress::{ProgressCallback, Stage, TerminalProgress};

// Individual pipeline stages.
pub use crate::categories::{flatten_categories, resolve_categories, CategoryMaps, UNKNOWN_FOLDER};
pub use crate::venues::fetch_venues;
pub use crate::checkins::{fetch_checkins, CheckinFetchStats, CheckinsByVenue, FetchedCheckins};

// Document tree, stats and renderers.
pub use crate::document::{
    build_document, placemark_for, visit_description, visit_metadata, visit_schema, Document, Folder, Placemark,
    Point, Schema, SimpleField, VisitMetadata, VISIT_SCHEMA_ID, VISIT_SCHEMA_NAME,
};
pub use crate::stats::ExportStats;
pub use crate::kml::{escape as xml_escape, render_kml, write_kml};
pub use crate::output::{write_document, write_document_file, ExportFormat};

// OAuth boundary.
pub use crate::auth::{authorize_url, Authenticator, ClientCredentials, OAuthAuthenticator};

pub use crate::util::{init_tracing_once, redact_secrets};
