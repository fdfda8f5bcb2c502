//! Venue-history pagination into an ordered, id-unique venue list.

use crate::api::{ApiSession, Venue, VenueHistoryResponse, VENUE_HISTORY_PATH};
use crate::error::FetchError;
use crate::progress::{report_progress, ProgressCallback, Stage};
use ahash::AHashSet;

/// First-occurrence-wins accumulator; keeps insertion order.
#[derive(Default)]
struct UniqueVenues {
    seen: AHashSet<String>,
    venues: Vec<Venue>,
}

impl UniqueVenues {
    /// Returns how many venues from `batch` were new.
    fn extend(&mut self, batch: impl IntoIterator<Item = Venue>) -> usize {
        let mut added = 0;
        for v in batch {
            if v.id.is_empty() || self.seen.contains(&v.id) {
                continue;
            }
            self.seen.insert(v.id.clone());
            self.venues.push(v);
            added += 1;
        }
        added
    }

    fn len(&self) -> usize {
        self.venues.len()
    }
}

/// Fetch the user's venue history.
///
/// The first request carries no `limit`/`offset`: upstream returns more in that mode
/// than on the first explicit page. If the declared count exceeds what came back,
/// continue with offset paging until an empty or partial page, the declared count,
/// a page that adds nothing new, or the page ceiling. Any error discards everything.
pub fn fetch_venues(
    session: &ApiSession<'_>,
    mut progress: Option<&mut ProgressCallback<'_>>,
) -> Result<Vec<Venue>, FetchError> {
    let opts = session.options();
    let page_size = opts.venue_page_size.max(1);

    let first: VenueHistoryResponse = session.get(VENUE_HISTORY_PATH, &session.windowed_query(None))?;
    let declared = first.venues.count;
    let first_len = first.venues.items.len();

    let mut acc = UniqueVenues::default();
    acc.extend(first.venues.items.into_iter().map(|it| it.venue));
    tracing::debug!(declared, returned = first_len, unique = acc.len(), "venue history: unpaged request");
    report_progress(&mut progress, Stage::Venues, acc.len(), declared);

    if declared > first_len {
        let mut offset = first_len;
        let mut page = 0usize;
        loop {
            if page >= opts.max_venue_pages {
                tracing::warn!(pages = page, offset, declared, "venue history: page ceiling reached");
                break;
            }
            page += 1;

            let resp: VenueHistoryResponse =
                session.get(VENUE_HISTORY_PATH, &session.windowed_query(Some((page_size, offset))))?;
            let items = resp.venues.items;
            if items.is_empty() {
                break;
            }
            let returned = items.len();
            let added = acc.extend(items.into_iter().map(|it| it.venue));
            offset += returned;

            tracing::debug!(page, offset, returned, added, unique = acc.len(), "venue history: page");
            report_progress(&mut progress, Stage::Venues, acc.len(), declared);

            if declared > 0 && offset >= declared {
                break;
            }
            if returned < page_size {
                break;
            }
            if added == 0 {
                tracing::warn!(page, offset, declared, "venue history: page added no new venues, stopping");
                break;
            }
        }
    }

    // Declared counts may include entries never returned; mark completion on what we have.
    report_progress(&mut progress, Stage::Venues, acc.len(), acc.len());
    tracing::info!(venues = acc.len(), declared, "venue history fetched");
    Ok(acc.venues)
}
