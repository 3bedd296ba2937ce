use crate::error::TrainerResult;
use crate::scoring::calc_wpm;
use crate::session::LogEntry;

/// Typing speed at some point of the overall training time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    /// Minutes of training before this bucket started
    pub t: f64,
    pub wpm: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: f64, wpm: f64) -> Self {
        Self { t, wpm }
    }
}

/// Below this much total training there is no progress to show.
pub const MIN_PROGRESS_SECONDS: f64 = 10.0 * 60.0;

/// Bucket size in minutes for a progress chart over `total_seconds` of training.
pub fn progress_interval(total_seconds: f64) -> Option<u64> {
    if total_seconds < MIN_PROGRESS_SECONDS {
        None
    } else if total_seconds > 10.0 * 3600.0 {
        Some(60)
    } else if total_seconds > 2.0 * 3600.0 {
        Some(30)
    } else {
        Some(10)
    }
}

/// WPM per `interval_minutes` of accumulated typing time across the session
/// history. Buckets may span several sessions; the last bucket holds whatever
/// is left over.
pub fn wpm_progress<I>(entries: I, interval_minutes: u64) -> TrainerResult<Vec<TimeSeriesPoint>>
where
    I: IntoIterator<Item = TrainerResult<LogEntry>>,
{
    let interval = interval_minutes as f64 * 60.0;
    // Position of the current bucket start relative to the current session.
    // Goes negative once a session ends, carrying the unfinished bucket over.
    let mut counted_seconds = 0.0;
    let mut counted_chars: i64 = 0;
    let mut speeds = Vec::new();

    for entry in entries {
        let entry = entry?;
        let session_length = entry.duration()?;
        for (i, &t) in entry.timeline.iter().enumerate() {
            if t - counted_seconds >= interval {
                speeds.push(calc_wpm(i as i64 - counted_chars, t - counted_seconds));
                counted_seconds = t;
                counted_chars = i as i64;
            }
        }
        counted_seconds -= session_length;
        counted_chars -= entry.timeline.len() as i64;
    }
    if counted_seconds < 0.0 {
        speeds.push(calc_wpm(-counted_chars, -counted_seconds));
    }

    Ok(speeds
        .into_iter()
        .enumerate()
        .map(|(i, wpm)| TimeSeriesPoint::new((i as u64 * interval_minutes) as f64, wpm))
        .collect())
}
