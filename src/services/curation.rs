use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Release;
use crate::services::dedup::dedup_releases;

const DATE_FMT: &str = "%Y-%m-%d";

/// Size of the display slot the curated list feeds
pub const DISPLAY_LIMIT: usize = 10;

/// Hard cap on items drawn from the releasing-today bucket, primary and
/// fallback combined. Keeps an announcement-heavy single day from crowding
/// out the rest of the calendar.
const RELEASING_TODAY_DRAW_CAP: usize = 3;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Retention window boundaries, precomputed as `YYYY-MM-DD` strings.
///
/// Candidate dates are compared lexicographically against these strings
/// and are never parsed into date-times, so a record's placement cannot
/// shift with the server timezone.
pub struct CalendarWindow {
    start: String,
    today: String,
    week_end: String,
    month_end: String,
    end: String,
}

impl CalendarWindow {
    pub fn new(today: NaiveDate) -> Self {
        let fmt = |date: NaiveDate| date.format(DATE_FMT).to_string();
        Self {
            start: fmt(today - Duration::days(7)),
            today: fmt(today),
            week_end: fmt(today + Duration::days(7)),
            month_end: fmt(today + Duration::days(30)),
            end: fmt(today + Duration::days(90)),
        }
    }

    /// Inclusive on both ends
    fn contains(&self, date: &str) -> bool {
        self.start.as_str() <= date && date <= self.end.as_str()
    }
}

fn is_well_formed_date(date: &str) -> bool {
    ISO_DATE.is_match(date) && NaiveDate::parse_from_str(date, DATE_FMT).is_ok()
}

/// Drops releases dated outside the retention window, preserving order.
///
/// A malformed release date drops the record with a diagnostic rather
/// than failing the pipeline; data quality problems in single records are
/// never fatal.
pub fn filter_window(releases: Vec<Release>, window: &CalendarWindow) -> Vec<Release> {
    releases
        .into_iter()
        .filter(|release| {
            if !is_well_formed_date(&release.release_date) {
                tracing::warn!(
                    id = %release.id,
                    release_date = %release.release_date,
                    "Dropping release with malformed date"
                );
                return false;
            }
            window.contains(&release.release_date)
        })
        .collect()
}

/// Time-relative classification of a release against the reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    RecentlyReleased,
    ReleasingToday,
    NextSevenDays,
    NextThirtyDays,
    LaterReleasing,
}

impl Bucket {
    /// Buckets in the order the curated list presents them
    pub const DISPLAY_ORDER: [Bucket; 5] = [
        Bucket::RecentlyReleased,
        Bucket::ReleasingToday,
        Bucket::NextSevenDays,
        Bucket::NextThirtyDays,
        Bucket::LaterReleasing,
    ];

    /// Order in which bucket surplus back-fills a short primary draw
    const FILL_ORDER: [Bucket; 5] = [
        Bucket::NextSevenDays,
        Bucket::NextThirtyDays,
        Bucket::LaterReleasing,
        Bucket::RecentlyReleased,
        Bucket::ReleasingToday,
    ];

    /// Target item count per bucket before fallback redistribution
    fn quota(self) -> usize {
        match self {
            Bucket::RecentlyReleased => 2,
            Bucket::ReleasingToday => 1,
            Bucket::NextSevenDays => 4,
            Bucket::NextThirtyDays => 2,
            Bucket::LaterReleasing => 1,
        }
    }
}

/// Assigns a release date to exactly one bucket
fn classify(date: &str, window: &CalendarWindow) -> Bucket {
    if date < window.today.as_str() {
        Bucket::RecentlyReleased
    } else if date == window.today {
        Bucket::ReleasingToday
    } else if date <= window.week_end.as_str() {
        Bucket::NextSevenDays
    } else if date <= window.month_end.as_str() {
        Bucket::NextThirtyDays
    } else {
        Bucket::LaterReleasing
    }
}

/// Deduplicated releases partitioned into the five time buckets, each
/// bucket preserving the order produced by deduplication
#[derive(Debug, Default)]
pub struct ReleaseBuckets {
    pools: [Vec<Release>; 5],
}

impl ReleaseBuckets {
    pub fn collect(releases: Vec<Release>, window: &CalendarWindow) -> Self {
        let mut buckets = Self::default();
        for release in releases {
            let bucket = classify(&release.release_date, window);
            buckets.pools[bucket as usize].push(release);
        }
        buckets
    }

    fn pool(&self, bucket: Bucket) -> &Vec<Release> {
        &self.pools[bucket as usize]
    }

    pub fn len(&self) -> usize {
        self.pools.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(Vec::is_empty)
    }
}

/// Draws a bounded, temporally diversified selection from the buckets.
///
/// Each bucket first contributes up to its primary quota. If the draw is
/// still short of [`DISPLAY_LIMIT`], remaining slots are filled from
/// bucket surplus in fallback order, with the releasing-today bucket
/// capped at three items overall. A feed that
/// cannot fill the limit yields a shorter list, never padding.
///
/// The output concatenates the per-bucket selections in display order.
pub fn allocate(buckets: ReleaseBuckets) -> Vec<Release> {
    let mut take = [0usize; 5];
    for bucket in Bucket::DISPLAY_ORDER {
        take[bucket as usize] = bucket.quota().min(buckets.pool(bucket).len());
    }

    let mut remaining = DISPLAY_LIMIT.saturating_sub(take.iter().sum());
    for bucket in Bucket::FILL_ORDER {
        if remaining == 0 {
            break;
        }
        let drawn = take[bucket as usize];
        let mut surplus = buckets.pool(bucket).len() - drawn;
        if bucket == Bucket::ReleasingToday {
            surplus = surplus.min(RELEASING_TODAY_DRAW_CAP.saturating_sub(drawn));
        }
        let extra = surplus.min(remaining);
        take[bucket as usize] += extra;
        remaining -= extra;
    }

    let mut curated = Vec::with_capacity(DISPLAY_LIMIT.min(buckets.len()));
    for (pool, count) in buckets.pools.into_iter().zip(take) {
        curated.extend(pool.into_iter().take(count));
    }
    curated
}

/// Resolves a raw release feed into the curated calendar list.
///
/// Pure and stateless: the same feed and reference date always produce
/// the same list, and nothing is retained between calls. The reference
/// date is an explicit parameter so callers control "today" (and tests
/// can pin it).
pub fn curate_releases(releases: Vec<Release>, today: NaiveDate) -> Vec<Release> {
    let window = CalendarWindow::new(today);
    let in_window = filter_window(releases, &window);
    let deduped = dedup_releases(in_window);
    let buckets = ReleaseBuckets::collect(deduped, &window);
    allocate(buckets)
}
