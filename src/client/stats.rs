use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::models::entry::WellnessEntry;

/// Upper bound on days examined when counting a streak.
pub const MAX_STREAK_DAYS: u32 = 365;

/// Consecutive days with an entry, counting back from `today` inclusive.
pub fn streak_ending_at(entries: &[WellnessEntry], today: NaiveDate) -> u32 {
    let dates: HashSet<NaiveDate> = entries.iter().map(|e| e.date).collect();

    let mut streak = 0;
    let mut day = today;
    while streak < MAX_STREAK_DAYS && dates.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Entries dated on or after `today - days`.
pub fn within_last_n_days(
    entries: Vec<WellnessEntry>,
    days: u32,
    today: NaiveDate,
) -> Vec<WellnessEntry> {
    let cutoff = today
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    entries.into_iter().filter(|e| e.date >= cutoff).collect()
}

pub fn find_by_date(entries: Vec<WellnessEntry>, date: NaiveDate) -> Option<WellnessEntry> {
    entries.into_iter().find(|e| e.date == date)
}
