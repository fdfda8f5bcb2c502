//! Check-in pagination into a per-venue, deduplicated, newest-first timestamp map.

use crate::api::{ApiSession, CheckinsResponse, CHECKINS_PATH};
use crate::error::FetchError;
use crate::progress::{report_progress, ProgressCallback, Stage};
use ahash::{AHashMap, AHashSet};
use serde::Serialize;

/// venue id -> check-in timestamps (epoch seconds), newest first.
pub type CheckinsByVenue = AHashMap<String, Vec<i64>>;

/// Per-record accounting for one check-in fetch.
/// `raw_checkins_fetched == unique_checkins_retained + missing_venue_or_timestamp
///  + deduplicated_by_venue_and_time` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CheckinFetchStats {
    pub raw_checkins_fetched: usize,
    pub unique_checkins_retained: usize,
    pub missing_venue_or_timestamp: usize,
    pub deduplicated_by_venue_and_time: usize,
}

impl CheckinFetchStats {
    pub fn is_balanced(&self) -> bool {
        self.raw_checkins_fetched
            == self.unique_checkins_retained + self.missing_venue_or_timestamp + self.deduplicated_by_venue_and_time
    }
}

#[derive(Clone, Debug, Default)]
pub struct FetchedCheckins {
    pub by_venue: CheckinsByVenue,
    pub stats: CheckinFetchStats,
}

#[derive(Default)]
struct CheckinAccumulator {
    by_venue: CheckinsByVenue,
    seen: AHashMap<String, AHashSet<i64>>,
    stats: CheckinFetchStats,
}

impl CheckinAccumulator {
    fn ingest(&mut self, venue_id: &str, created_at: i64) {
        self.stats.raw_checkins_fetched += 1;
        if venue_id.is_empty() || created_at == 0 {
            self.stats.missing_venue_or_timestamp += 1;
            return;
        }
        let seen = self.seen.entry(venue_id.to_string()).or_default();
        if !seen.insert(created_at) {
            self.stats.deduplicated_by_venue_and_time += 1;
            return;
        }
        self.by_venue.entry(venue_id.to_string()).or_default().push(created_at);
        self.stats.unique_checkins_retained += 1;
    }

    fn finish(mut self) -> FetchedCheckins {
        for ts in self.by_venue.values_mut() {
            ts.sort_unstable_by(|a, b| b.cmp(a));
        }
        FetchedCheckins { by_venue: self.by_venue, stats: self.stats }
    }
}

/// Fetch every check-in in the session window, offset-paged at the configured page
/// size and bounded by the page ceiling.
pub fn fetch_checkins(
    session: &ApiSession<'_>,
    mut progress: Option<&mut ProgressCallback<'_>>,
) -> Result<FetchedCheckins, FetchError> {
    let opts = session.options();
    let page_size = opts.checkin_page_size.max(1);

    let mut acc = CheckinAccumulator::default();
    let mut offset = 0usize;
    let mut declared = 0usize;
    let mut pages = 0usize;
    let mut done = false;

    while pages < opts.max_checkin_pages {
        pages += 1;
        let resp: CheckinsResponse =
            session.get(CHECKINS_PATH, &session.windowed_query(Some((page_size, offset))))?;
        let items = resp.checkins.items;
        if items.is_empty() {
            done = true;
            break;
        }
        declared = resp.checkins.count;

        for item in &items {
            acc.ingest(item.venue_id(), item.created_at);
        }
        offset += items.len();

        tracing::debug!(page = pages, offset, declared, "checkins: page");
        report_progress(&mut progress, Stage::Checkins, offset, declared);
        if offset >= declared {
            done = true;
            break;
        }
    }
    if !done {
        tracing::warn!(pages, offset, declared, "checkins: page ceiling reached");
    }

    let fetched = acc.finish();
    report_progress(&mut progress, Stage::Checkins, offset, offset);
    tracing::info!(
        raw = fetched.stats.raw_checkins_fetched,
        retained = fetched.stats.unique_checkins_retained,
        missing = fetched.stats.missing_venue_or_timestamp,
        deduplicated = fetched.stats.deduplicated_by_venue_and_time,
        venues = fetched.by_venue.len(),
        "checkins fetched"
    );
    Ok(fetched)
}
