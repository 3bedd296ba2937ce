use crate::error::{TrainerError, TrainerResult};
use crate::trigram::Trigram;
use crate::windowed_average::WindowedAverage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Sessions shorter than this are not worth updating statistics for.
pub const MIN_SESSION_LENGTH: usize = 5;

/// Per-trigram typing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrigramStat {
    /// How many times the trigram was seen outside of training sessions
    #[serde(rename = "c")]
    pub count: u64,
    /// Recent durations of typing the trigram, in seconds
    #[serde(rename = "d")]
    pub duration: WindowedAverage,
}

/// What `record_session` did with a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Recorded,
    TooShort,
}

/// Reject sessions whose timeline does not line up with the text, and flag
/// sessions too short to learn from.
pub fn check_session(text: &[char], timeline: &[f64]) -> TrainerResult<SessionOutcome> {
    if text.len() != timeline.len() {
        return Err(TrainerError::Validation(format!(
            "length of text ({}) does not match length of timeline ({})",
            text.len(),
            timeline.len()
        )));
    }
    if text.len() < MIN_SESSION_LENGTH {
        warn!(
            length = text.len(),
            "not updating stats for session only {} characters long",
            text.len()
        );
        return Ok(SessionOutcome::TooShort);
    }
    Ok(SessionOutcome::Recorded)
}

/// Aggregate typing statistics, persisted between runs.
///
/// Field names on disk match the statistics files already in users' data
/// directories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(rename = "TotalCharsTyped")]
    pub total_chars_typed: u64,
    #[serde(rename = "TotalSessionsDuration")]
    pub total_sessions_duration: f64,
    #[serde(rename = "SessionsCount")]
    pub sessions_count: u64,
    #[serde(rename = "Trigrams", default)]
    pub trigrams: HashMap<Trigram, TrigramStat>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Average seconds per typed character over all sessions
    pub fn average_char_duration(&self) -> Option<f64> {
        if self.total_chars_typed == 0 {
            None
        } else {
            Some(self.total_sessions_duration / self.total_chars_typed as f64)
        }
    }

    /// Fold one finished session into the statistics.
    ///
    /// `timeline[i]` is the number of seconds since the session start at which
    /// `text[i]` was typed. Training sessions (typing generated exercises)
    /// record durations but leave trigram counts alone, otherwise drilled
    /// trigrams would keep ranking high because of the drilling itself.
    pub fn record_session(
        &mut self,
        text: &[char],
        timeline: &[f64],
        is_training: bool,
    ) -> TrainerResult<SessionOutcome> {
        if check_session(text, timeline)? == SessionOutcome::TooShort {
            return Ok(SessionOutcome::TooShort);
        }

        for (i, window) in text.windows(3).take(text.len() - 3).enumerate() {
            let Some(trigram) = Trigram::from_chars(window) else {
                continue;
            };
            let stat = self.trigrams.entry(trigram).or_default();
            if !is_training {
                stat.count += 1;
            }
            stat.duration.append(timeline[i + 3] - timeline[i]);
        }

        self.total_chars_typed += text.len() as u64;
        self.total_sessions_duration += timeline.last().copied().unwrap_or_default();
        self.sessions_count += 1;

        debug!(
            chars = text.len(),
            trigrams = self.trigrams.len(),
            is_training,
            "session folded into statistics"
        );
        Ok(SessionOutcome::Recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn timeline(n: usize, step: f64) -> Vec<f64> {
        (1..=n).map(|i| i as f64 * step).collect()
    }

    fn key(s: &str) -> Trigram {
        s.parse().unwrap()
    }

    #[test]
    fn average_char_duration_needs_chars() {
        let mut stats = Statistics::new();
        assert_eq!(stats.average_char_duration(), None);

        stats.total_chars_typed = 4;
        stats.total_sessions_duration = 2.0;
        assert_eq!(stats.average_char_duration(), Some(0.5));
    }

    #[test]
    fn mismatched_timeline_is_rejected() {
        let mut stats = Statistics::new();
        let result = stats.record_session(&chars("hello"), &timeline(4, 0.1), false);
        assert_matches!(result, Err(TrainerError::Validation(_)));
        assert_eq!(stats, Statistics::new());
    }

    #[test]
    fn short_session_is_skipped() {
        let mut stats = Statistics::new();
        let result = stats.record_session(&chars("abcd"), &timeline(4, 0.1), false);
        assert_matches!(result, Ok(SessionOutcome::TooShort));
        assert_eq!(stats, Statistics::new());
    }

    #[test]
    fn records_every_full_trigram_window() {
        let mut stats = Statistics::new();
        let outcome = stats
            .record_session(&chars("abcabc"), &timeline(6, 0.2), false)
            .unwrap();

        assert_eq!(outcome, SessionOutcome::Recorded);
        let mut keys: Vec<String> = stats.trigrams.keys().map(|t| t.to_string()).collect();
        keys.sort();
        assert_eq!(keys, vec!["abc", "bca", "cab"]);

        for stat in stats.trigrams.values() {
            assert_eq!(stat.count, 1);
            assert_eq!(stat.duration.len(), 1);
            assert!((stat.duration.average(0.0) - 0.6).abs() < 1e-9);
        }

        assert_eq!(stats.total_chars_typed, 6);
        assert!((stats.total_sessions_duration - 1.2).abs() < 1e-9);
        assert_eq!(stats.sessions_count, 1);
    }

    #[test]
    fn training_sessions_do_not_count_frequency() {
        let mut stats = Statistics::new();
        stats
            .record_session(&chars("abcabc"), &timeline(6, 0.2), false)
            .unwrap();
        stats
            .record_session(&chars("abcabc"), &timeline(6, 0.4), true)
            .unwrap();

        let abc = &stats.trigrams[&key("abc")];
        assert_eq!(abc.count, 1);
        assert_eq!(abc.duration.len(), 2);
        assert_eq!(stats.sessions_count, 2);
    }

    #[test]
    fn repeated_trigram_in_one_session_counts_twice() {
        let mut stats = Statistics::new();
        stats
            .record_session(&chars("abcabcabc"), &timeline(9, 0.1), false)
            .unwrap();
        assert_eq!(stats.trigrams[&key("abc")].count, 2);
    }

    #[test]
    fn reads_legacy_json_layout() {
        let json = r#"{
            "TotalCharsTyped": 12,
            "TotalSessionsDuration": 3.5,
            "SessionsCount": 2,
            "Trigrams": {"the": {"c": 4, "d": {"l": 1, "i": 1, "v": [250,0,0,0,0,0,0,0,0,0]}}}
        }"#;
        let stats: Statistics = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_chars_typed, 12);
        assert_eq!(stats.trigrams[&key("the")].count, 4);
        assert_eq!(stats.trigrams[&key("the")].duration.average(0.0), 0.25);
    }
}
