//! Availability calculator: turns salon opening hours, professional working
//! days/hours and a target date into the ordered list of bookable slot times.
//!
//! Everything here is a pure function of its inputs. Callers are expected to
//! pre-filter past dates (today-or-later); day eligibility alone does not
//! check the calendar.

use chrono::{Datelike, FixedOffset, Utc};
use std::collections::HashSet;

use crate::models::SlotStatus;

/// Slot granularity in minutes.
pub const SLOT_INTERVAL_MIN: u32 = 30;

/// São Paulo timezone offset (UTC-3). Dates and times are stored as plain
/// strings, so "today" only matters for filtering past dates.
const BRT_OFFSET_SECS: i32 = 3 * 3600;

pub fn sao_paulo_now() -> chrono::DateTime<FixedOffset> {
    let brt = FixedOffset::west_opt(BRT_OFFSET_SECS).unwrap();
    Utc::now().with_timezone(&brt)
}

pub fn sao_paulo_today() -> String {
    sao_paulo_now().format("%Y-%m-%d").to_string()
}

/// Weekday of a "YYYY-MM-DD" date, 0 = Sunday .. 6 = Saturday.
pub fn weekday_of(date: &str) -> Option<u8> {
    let parsed = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(parsed.weekday().num_days_from_sunday() as u8)
}

/// Intersection of salon opening hours and professional available hours.
///
/// Inputs are zero-padded 24-hour "HH:MM" strings, so lexicographic
/// comparison is equivalent to numeric time comparison. Returns `None` when
/// the intersection is empty (start >= end).
pub fn effective_window<'a>(
    salon_hours: (&'a str, &'a str),
    professional_hours: (&'a str, &'a str),
) -> Option<(&'a str, &'a str)> {
    let start = salon_hours.0.max(professional_hours.0);
    let end = salon_hours.1.min(professional_hours.1);
    if start >= end {
        return None;
    }
    Some((start, end))
}

fn parse_hm(time: &str) -> Option<(u32, u32)> {
    let (h, m) = time.split_once(':')?;
    Some((h.parse().ok()?, m.parse().ok()?))
}

/// Emit "HH:MM" labels from `start` (inclusive) to `end` (exclusive) at the
/// given interval, carrying minutes into hours.
pub fn generate_time_slots(start: &str, end: &str, interval_min: u32) -> Vec<String> {
    let (Some((start_h, start_m)), Some((end_h, end_m))) = (parse_hm(start), parse_hm(end)) else {
        return Vec::new();
    };

    let mut slots = Vec::new();
    let (mut h, mut m) = (start_h, start_m);
    while h < end_h || (h == end_h && m < end_m) {
        slots.push(format!("{:02}:{:02}", h, m));
        m += interval_min;
        if m >= 60 {
            h += m / 60;
            m %= 60;
        }
    }
    slots
}

/// Candidate slots for a professional on a date, before conflict filtering.
///
/// The date is eligible only if its weekday is in BOTH the salon's working
/// days and the professional's available days; otherwise the result is empty
/// (a normal "closed" outcome, not an error).
pub fn available_slots(
    salon_days: &[u8],
    salon_hours: (&str, &str),
    professional_days: &[u8],
    professional_hours: (&str, &str),
    date: &str,
) -> Vec<String> {
    let Some(weekday) = weekday_of(date) else {
        return Vec::new();
    };
    if !salon_days.contains(&weekday) || !professional_days.contains(&weekday) {
        return Vec::new();
    }

    match effective_window(salon_hours, professional_hours) {
        Some((start, end)) => generate_time_slots(start, end, SLOT_INTERVAL_MIN),
        None => Vec::new(),
    }
}

/// Annotate candidate slots with a booked flag. A slot is booked iff a
/// non-cancelled appointment occupies that exact time.
pub fn mark_booked(slots: Vec<String>, occupied: &HashSet<String>) -> Vec<SlotStatus> {
    slots
        .into_iter()
        .map(|time| {
            let booked = occupied.contains(&time);
            SlotStatus { time, booked }
        })
        .collect()
}

// ── Tests ──
