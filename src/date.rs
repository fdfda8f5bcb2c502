use std::fmt;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Time};

const DAYS_PER_YEAR: i64 = 365;

/// Optional `(after, before)` export window. Either side may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub after: Option<OffsetDateTime>,
    pub before: Option<OffsetDateTime>,
}

impl TimeWindow {
    pub fn new(after: Option<OffsetDateTime>, before: Option<OffsetDateTime>) -> Self {
        Self { after, before }
    }

    /// Unbounded on both sides.
    pub fn all() -> Self {
        Self::default()
    }

    /// `[now - years * 365d, now]`, the default window of the binary.
    pub fn last_years(years: u32) -> Self {
        let before = OffsetDateTime::now_utc();
        let after = before - Duration::days(DAYS_PER_YEAR * i64::from(years));
        Self { after: Some(after), before: Some(before) }
    }

    pub fn after_unix(&self) -> Option<i64> {
        self.after.map(|t| t.unix_timestamp())
    }

    pub fn before_unix(&self) -> Option<i64> {
        self.before.map(|t| t.unix_timestamp())
    }

    /// Window bounds as upstream query parameters (epoch seconds).
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut q = Vec::with_capacity(2);
        if let Some(b) = self.before_unix() {
            q.push(("beforeTimestamp", b.to_string()));
        }
        if let Some(a) = self.after_unix() {
            q.push(("afterTimestamp", a.to_string()));
        }
        q
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |t: Option<OffsetDateTime>| match t {
            Some(t) => Day(t.date()).to_string(),
            None => "open".to_string(),
        };
        write!(f, "{}-{}", side(self.after), side(self.before))
    }
}

/// Calendar day in `YYYY-MM-DD` form, taken as midnight UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(pub Date);

impl Day {
    pub fn start_utc(self) -> OffsetDateTime {
        self.0.with_time(Time::MIDNIGHT).assume_utc()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.0.year(), u8::from(self.0.month()), self.0.day())
    }
}

impl FromStr for Day {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fmt = format_description!("[year]-[month]-[day]");
        Date::parse(s.trim(), &fmt)
            .map(Day)
            .map_err(|e| format!("expected YYYY-MM-DD, got {s:?}: {e}"))
    }
}

/// RFC 3339 UTC rendering of epoch seconds; out-of-range values fall back to the raw number.
pub fn format_unix_utc(ts: i64) -> String {
    OffsetDateTime::from_unix_timestamp(ts)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .unwrap_or_else(|| ts.to_string())
}
