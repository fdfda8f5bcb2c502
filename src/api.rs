//! Wire models for the check-in service and the per-run `ApiSession` that binds the
//! injected transport, options and bearer token together.

use crate::config::ExportOptions;
use crate::error::FetchError;
use crate::transport::Transport;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub const VENUE_HISTORY_PATH: &str = "/users/self/venuehistory";
pub const CHECKINS_PATH: &str = "/users/self/checkins";
pub const CATEGORIES_PATH: &str = "/venues/categories";

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lat: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lng: f64,
}

/// Category reference as carried on a venue.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: Location,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<CategoryRef>,
    /// Filled by the document builder from the check-in map; newest first.
    #[serde(skip)]
    pub visit_timestamps: Vec<i64>,
}

impl Venue {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: Location { lat, lng },
            ..Default::default()
        }
    }

    pub fn with_category(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.categories.push(CategoryRef { id: id.into(), name: name.into() });
        self
    }
}

/// Node of the remote category forest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GlobalCategory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "categories")]
    pub children: Vec<GlobalCategory>,
}

/// Upstream sends explicit `null` for absent values; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// -------- response envelopes --------

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub response: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Paged<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VenueHistoryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub venues: Paged<VenueItem>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VenueItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue: Venue,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CheckinsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub checkins: Paged<CheckinItem>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CheckinItem {
    #[serde(default, deserialize_with = "null_as_default", rename = "createdAt")]
    pub created_at: i64,
    #[serde(default)]
    pub venue: Option<VenueIdRef>,
}

impl CheckinItem {
    pub fn venue_id(&self) -> &str {
        self.venue.as_ref().map(|v| v.id.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VenueIdRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CategoriesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<GlobalCategory>,
}

/// GET `url` through `transport` and decode the body as `T`.
pub fn get_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, FetchError> {
    let body = transport.get(url, query)?;
    serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url: url.to_string(), source })
}

/// Everything a fetcher needs for one export run. Cheap to copy; shares nothing
/// mutable, so the category side and the fetch side can run on different threads.
#[derive(Clone, Copy)]
pub struct ApiSession<'a> {
    transport: &'a dyn Transport,
    opts: &'a ExportOptions,
    token: &'a str,
}

impl<'a> ApiSession<'a> {
    pub fn new(transport: &'a dyn Transport, opts: &'a ExportOptions, token: &'a str) -> Self {
        Self { transport, opts, token }
    }

    pub fn options(&self) -> &'a ExportOptions {
        self.opts
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.opts.api_base, path)
    }

    /// `oauth_token` and `v`, present on every call.
    pub fn common_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("oauth_token", self.token.to_string()),
            ("v", self.opts.api_version.clone()),
        ]
    }

    /// Common query plus optional `limit`/`offset` plus the export window.
    pub fn windowed_query(&self, page: Option<(usize, usize)>) -> Vec<(&'static str, String)> {
        let mut q = self.common_query();
        if let Some((limit, offset)) = page {
            q.push(("limit", limit.to_string()));
            q.push(("offset", offset.to_string()));
        }
        q.extend(self.opts.window.query_params());
        q
    }

    pub(crate) fn get<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let env: Envelope<T> = get_json(self.transport, &self.url(path), query)?;
        Ok(env.response.unwrap_or_default())
    }
}
