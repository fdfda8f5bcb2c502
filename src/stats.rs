use crate::checkins::CheckinFetchStats;
use serde::Serialize;

/// Provenance counters for one export run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    pub venues_fetched: usize,
    pub venues_exported: usize,
    pub unknown_category_venues: usize,

    pub raw_checkins_fetched: usize,
    pub unique_checkins_retained: usize,
    pub checkins_missing_venue_or_timestamp: usize,
    pub checkins_deduplicated_by_venue_ts: usize,

    pub checkins_matched_to_venues: usize,
    pub checkins_unmatched_to_venues: usize,
    pub unmatched_venue_ids: usize,
}

impl ExportStats {
    /// Fold the fetch-time check-in counters into the run totals.
    pub fn record_checkin_fetch(&mut self, fetch: &CheckinFetchStats) {
        self.raw_checkins_fetched += fetch.raw_checkins_fetched;
        self.unique_checkins_retained += fetch.unique_checkins_retained;
        self.checkins_missing_venue_or_timestamp += fetch.missing_venue_or_timestamp;
        self.checkins_deduplicated_by_venue_ts += fetch.deduplicated_by_venue_and_time;
    }

    pub fn log_summary(&self) {
        tracing::info!(
            venues_fetched = self.venues_fetched,
            venues_exported = self.venues_exported,
            unknown_category_venues = self.unknown_category_venues,
            raw_checkins = self.raw_checkins_fetched,
            retained_checkins = self.unique_checkins_retained,
            missing_venue_or_timestamp = self.checkins_missing_venue_or_timestamp,
            deduplicated = self.checkins_deduplicated_by_venue_ts,
            matched = self.checkins_matched_to_venues,
            unmatched = self.checkins_unmatched_to_venues,
            unmatched_venue_ids = self.unmatched_venue_ids,
            "export finished"
        );
    }
}
