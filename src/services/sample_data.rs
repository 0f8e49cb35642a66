//! Sample bookmarks for demos and first-run stores.

use uuid::Uuid;

use crate::types::bookmark::BookmarkDraft;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
/// Samples are spread across this many days before `now`.
const DAYS_BACK: i64 = 3;

/// Builds `count` drafts with URLs `https://example.com/bookmark-<n>`.
///
/// `created_at` values are distinct and spread over the last few days, with
/// bookmark 1 the oldest, so the newest-first order is deterministic.
pub fn sample_bookmarks(count: usize, now: i64) -> Vec<BookmarkDraft> {
    let span = DAYS_BACK * MILLIS_PER_DAY;
    let step = if count == 0 { 0 } else { (span / count as i64).max(1) };
    (0..count)
        .map(|index| {
            let number = index + 1;
            let created_at = now - span + step * index as i64;
            BookmarkDraft::new(Uuid::new_v4().to_string())
                .with_name(format!("Sample Bookmark {}", number))
                .with_url(format!("https://example.com/bookmark-{}", number))
                .with_created_at(created_at)
        })
        .collect()
}
