//! Day-by-day itinerary engine.
//!
//! A trip's itinerary is an ordered sequence of [`DayPlan`]s, one per
//! calendar day of the trip, each holding an ordered sequence of
//! [`Activity`]s. Ordering is position-based, not identity-based: the
//! editing surface derives indices from its own rendered state, so an
//! out-of-range index is a programmer error and is rejected with
//! [`CoreError::IndexOutOfRange`] before any mutation.
//!
//! Stored itineraries may be partial or absent (the source of record
//! permits it). [`initialize`] derives the full contiguous day range only
//! when the stored sequence is empty; a non-empty sequence is returned
//! unchanged, gaps and all. Reconciling an existing itinerary against a
//! changed trip date range is deliberately not performed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fixed category set for itinerary activities.
///
/// Distinct from the expense categories in [`crate::budget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    #[default]
    Sightseeing,
    Food,
    Transport,
    Accommodation,
    Activity,
    Shopping,
    Other,
}

/// A single scheduled item within a [`DayPlan`].
///
/// Scheduled times are optional and `end_time >= start_time` is not
/// enforced; overlapping activities within a day are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Monetary cost of the activity. Defaults to 0.
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub category: ActivityCategory,
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The itinerary for a single calendar date within a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub notes: String,
}

impl DayPlan {
    /// An empty plan for the given date.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            activities: Vec::new(),
            notes: String::new(),
        }
    }
}

/// Produce the day-plan sequence for a trip.
///
/// If `existing` is empty, returns one empty [`DayPlan`] per calendar day
/// in `[start, end]` inclusive, ascending. An inverted range yields an
/// empty sequence. A non-empty `existing` is returned unchanged -- no
/// merge or gap repair is performed.
pub fn initialize(start: NaiveDate, end: NaiveDate, existing: Vec<DayPlan>) -> Vec<DayPlan> {
    if !existing.is_empty() {
        return existing;
    }
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(DayPlan::empty)
        .collect()
}

/// Append `activity` to the end of the day at `day_index`.
pub fn add_activity(
    days: &mut [DayPlan],
    day_index: usize,
    activity: Activity,
) -> Result<(), CoreError> {
    let day = day_mut(days, day_index)?;
    day.activities.push(activity);
    Ok(())
}

/// Replace the activity at the given position in place. Position and day
/// do not change.
pub fn edit_activity(
    days: &mut [DayPlan],
    day_index: usize,
    activity_index: usize,
    updated: Activity,
) -> Result<(), CoreError> {
    let day = day_mut(days, day_index)?;
    let len = day.activities.len();
    let slot = day
        .activities
        .get_mut(activity_index)
        .ok_or(CoreError::IndexOutOfRange {
            what: "activity",
            index: activity_index,
            len,
        })?;
    *slot = updated;
    Ok(())
}

/// Remove and return the activity at the given position. Subsequent
/// activities in that day shift down by one.
pub fn remove_activity(
    days: &mut [DayPlan],
    day_index: usize,
    activity_index: usize,
) -> Result<Activity, CoreError> {
    let day = day_mut(days, day_index)?;
    if activity_index >= day.activities.len() {
        return Err(CoreError::IndexOutOfRange {
            what: "activity",
            index: activity_index,
            len: day.activities.len(),
        });
    }
    Ok(day.activities.remove(activity_index))
}

/// Move the activity at `(source_day, source_index)` to
/// `(destination_day, destination_index)`, shifting intervening elements.
///
/// Implemented as an atomic remove-then-insert: all indices are validated
/// before any mutation, so the activity is never duplicated nor lost --
/// including when source and destination coincide. The destination index
/// may equal the destination day's length (append position), measured
/// after the removal when both positions are in the same day.
pub fn move_activity(
    days: &mut [DayPlan],
    source_day: usize,
    source_index: usize,
    destination_day: usize,
    destination_index: usize,
) -> Result<(), CoreError> {
    let day_count = days.len();
    let day_len = |idx: usize| -> Result<usize, CoreError> {
        days.get(idx)
            .map(|d| d.activities.len())
            .ok_or(CoreError::IndexOutOfRange {
                what: "day",
                index: idx,
                len: day_count,
            })
    };

    let source_len = day_len(source_day)?;
    if source_index >= source_len {
        return Err(CoreError::IndexOutOfRange {
            what: "activity",
            index: source_index,
            len: source_len,
        });
    }

    // The insertion point is bounded by the destination's length after the
    // removal has happened.
    let destination_len = if destination_day == source_day {
        source_len - 1
    } else {
        day_len(destination_day)?
    };
    if destination_index > destination_len {
        return Err(CoreError::IndexOutOfRange {
            what: "activity",
            index: destination_index,
            len: destination_len,
        });
    }

    let moved = days[source_day].activities.remove(source_index);
    days[destination_day]
        .activities
        .insert(destination_index, moved);
    Ok(())
}

/// Overwrite the notes field for the day at `day_index`.
pub fn set_day_notes(
    days: &mut [DayPlan],
    day_index: usize,
    notes: impl Into<String>,
) -> Result<(), CoreError> {
    let day = day_mut(days, day_index)?;
    day.notes = notes.into();
    Ok(())
}

fn day_mut(days: &mut [DayPlan], index: usize) -> Result<&mut DayPlan, CoreError> {
    let len = days.len();
    days.get_mut(index).ok_or(CoreError::IndexOutOfRange {
        what: "day",
        index,
        len,
    })
}
