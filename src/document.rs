//! Document assembly: venues + their check-ins + category groupings into a
//! folder/placemark tree, with provenance counters. Never fails.

use crate::api::Venue;
use crate::categories::{CategoryMaps, UNKNOWN_FOLDER};
use crate::checkins::CheckinsByVenue;
use crate::date::format_unix_utc;
use crate::stats::ExportStats;
use ahash::AHashSet;
use serde::Serialize;
use std::collections::BTreeMap;

pub const VISIT_SCHEMA_ID: &str = "visit-metadata";
pub const VISIT_SCHEMA_NAME: &str = "VisitMetadata";
const RECENT_VISITS_SHOWN: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Document {
    pub schema: Schema,
    pub folders: Vec<Folder>,
}

impl Document {
    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.name == name)
    }

    pub fn placemark_count(&self) -> usize {
        self.folders.iter().map(|f| f.placemarks.len()).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub id: String,
    pub name: String,
    pub fields: Vec<SimpleField>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimpleField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The extended-metadata schema every placemark refers to.
pub fn visit_schema() -> Schema {
    let field = |name: &str, kind: &str| SimpleField { name: name.to_string(), kind: kind.to_string() };
    Schema {
        id: VISIT_SCHEMA_ID.to_string(),
        name: VISIT_SCHEMA_NAME.to_string(),
        fields: vec![
            field("visit_count", "int"),
            field("last_visit_unix", "int"),
            field("visit_timestamps_unix", "string"),
        ],
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Folder {
    pub name: String,
    pub placemarks: Vec<Placemark>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Placemark {
    pub venue_id: String,
    pub name: String,
    pub description: String,
    pub point: Point,
    pub metadata: VisitMetadata,
}

/// Point geometry, longitude first as in KML coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisitMetadata {
    pub visit_count: usize,
    pub last_visit_unix: i64,
    pub visit_timestamps_unix: String,
}

/// Build the folder tree. `checkins` values must already be newest-first.
pub fn build_document(
    mut venues: Vec<Venue>,
    checkins: &CheckinsByVenue,
    categories: &CategoryMaps,
) -> (Document, ExportStats) {
    let mut stats = ExportStats { venues_fetched: venues.len(), ..Default::default() };

    for v in venues.iter_mut() {
        v.visit_timestamps = checkins.get(&v.id).cloned().unwrap_or_default();
    }

    let known: AHashSet<&str> = venues.iter().map(|v| v.id.as_str()).collect();
    for (venue_id, ts) in checkins.iter() {
        if known.contains(venue_id.as_str()) {
            stats.checkins_matched_to_venues += ts.len();
        } else {
            stats.unmatched_venue_ids += 1;
            stats.checkins_unmatched_to_venues += ts.len();
        }
    }

    let mut folders: BTreeMap<String, Vec<Placemark>> = BTreeMap::new();
    for venue in &venues {
        let place = placemark_for(venue);
        if venue.categories.is_empty() {
            stats.unknown_category_venues += 1;
            folders.entry(UNKNOWN_FOLDER.to_string()).or_default().push(place);
        } else {
            // One placemark per category, even when several land in the same folder.
            for c in &venue.categories {
                let label = categories.folder_label_or_unknown(&c.id);
                folders.entry(label.to_string()).or_default().push(place.clone());
            }
        }
        stats.venues_exported += 1;
    }

    let folders = folders
        .into_iter()
        .map(|(name, placemarks)| Folder { name, placemarks })
        .collect();
    (Document { schema: visit_schema(), folders }, stats)
}

pub fn placemark_for(venue: &Venue) -> Placemark {
    Placemark {
        venue_id: venue.id.clone(),
        name: venue.name.clone(),
        description: visit_description(&venue.visit_timestamps),
        point: Point { lon: venue.location.lng, lat: venue.location.lat },
        metadata: visit_metadata(&venue.visit_timestamps),
    }
}

/// Human-readable visit summary; `timestamps` newest first.
pub fn visit_description(timestamps: &[i64]) -> String {
    let Some(&last) = timestamps.first() else {
        return "Visit count: 0".to_string();
    };
    let mut lines = vec![
        format!("Visit count: {}", timestamps.len()),
        format!("Last visit (UTC): {}", format_unix_utc(last)),
        "Recent visits (UTC):".to_string(),
    ];
    lines.extend(timestamps.iter().take(RECENT_VISITS_SHOWN).map(|&ts| format_unix_utc(ts)));
    lines.join("\n")
}

pub fn visit_metadata(timestamps: &[i64]) -> VisitMetadata {
    VisitMetadata {
        visit_count: timestamps.len(),
        last_visit_unix: timestamps.first().copied().unwrap_or(0),
        visit_timestamps_unix: serde_json::to_string(timestamps).unwrap_or_else(|_| "[]".to_string()),
    }
}
