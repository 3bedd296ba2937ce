//! Turns raw trigram statistics into a training priority.
//!
//! A trigram's score is its frequency multiplied by an effort factor in
//! `[0, 1]` derived from how fast it is typed, so frequent and slow trigrams
//! rank first.

use crate::stats::{Statistics, TrigramStat};
use crate::trigram::Trigram;
use itertools::Itertools;
use std::cmp::Ordering;

/// Typing speed we consider unreachable, in words per minute.
pub const SPEED_OF_LIGHT_WPM: f64 = 150.0;

/// WPM of typing a trigram in one second: 3 chars / 5 chars per word * 60.
pub const WPM_PER_1SEC_TRIGRAM: f64 = 3.0 / 5.0 * 60.0;

/// Words per minute for one character per second.
pub const WPM_IN_CPS: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrigramScore {
    pub trigram: Trigram,
    pub score: f64,
}

/// Words per minute equivalent of typing a trigram in `seconds`.
pub fn time_to_wpm(seconds: f64) -> f64 {
    WPM_PER_1SEC_TRIGRAM / seconds
}

/// Words per minute for `chars` typed in `seconds`.
pub fn calc_wpm(chars: i64, seconds: f64) -> f64 {
    chars as f64 / seconds * WPM_IN_CPS
}

/// How much effort typing a trigram in `seconds` takes, from 0 (as fast as
/// humanly possible) up to 1 (infinitely slow).
pub fn effort_score(seconds: f64) -> f64 {
    if !(seconds.is_finite() && seconds > 0.0) {
        return 0.0;
    }
    let q = time_to_wpm(seconds) / SPEED_OF_LIGHT_WPM;
    if q > 1.0 {
        return 0.0;
    }
    (1.0 - q * q).sqrt()
}

impl TrigramStat {
    /// Frequency times effort. Trigrams without duration samples are assumed
    /// to take `default_duration` seconds.
    pub fn score(&self, default_duration: f64) -> f64 {
        let duration = self.duration.average(default_duration);
        self.count as f64 * effort_score(duration)
    }
}

impl Statistics {
    /// Overall typing speed, or `None` before anything was typed.
    pub fn average_wpm(&self) -> Option<f64> {
        self.average_char_duration()
            .map(|char_duration| time_to_wpm(char_duration * 3.0))
    }
}

/// All known trigrams ordered from most to least in need of training.
pub fn trigrams_to_train(stats: &Statistics) -> Vec<TrigramScore> {
    let default_duration = stats.average_char_duration().unwrap_or_default() * 3.0;

    stats
        .trigrams
        .iter()
        .map(|(trigram, stat)| TrigramScore {
            trigram: *trigram,
            score: stat.score(default_duration),
        })
        .sorted_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Duration at which a trigram is typed at exactly the speed of light.
    const CEILING: f64 = WPM_PER_1SEC_TRIGRAM / SPEED_OF_LIGHT_WPM;

    fn stat(count: u64, durations: &[f64]) -> TrigramStat {
        let mut s = TrigramStat {
            count,
            ..Default::default()
        };
        for d in durations {
            s.duration.append(*d);
        }
        s
    }

    #[test]
    fn test_time_to_wpm() {
        assert_eq!(time_to_wpm(1.0), 36.0);
        assert_eq!(time_to_wpm(0.36), 100.0);
    }

    #[test]
    fn test_calc_wpm() {
        assert_eq!(calc_wpm(60, 60.0), 12.0);
        assert_eq!(calc_wpm(0, 10.0), 0.0);
    }

    #[test]
    fn effort_is_zero_beyond_speed_of_light() {
        assert_eq!(effort_score(0.1), 0.0);
        assert_eq!(effort_score(CEILING * 0.99), 0.0);
        assert_eq!(effort_score(CEILING), 0.0);
    }

    #[test]
    fn effort_for_degenerate_durations() {
        assert_eq!(effort_score(0.0), 0.0);
        assert_eq!(effort_score(-1.0), 0.0);
        assert_eq!(effort_score(f64::NAN), 0.0);
    }

    #[test]
    fn effort_at_half_speed_of_light() {
        // 75 wpm: q = 0.5
        let expected = (1.0f64 - 0.25).sqrt();
        assert!((effort_score(CEILING * 2.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn score_multiplies_count_and_effort() {
        let s = stat(4, &[CEILING * 2.0]);
        assert!((s.score(0.0) - 4.0 * effort_score(CEILING * 2.0)).abs() < 1e-9);
        assert_eq!(stat(0, &[5.0]).score(0.0), 0.0);
    }

    #[test]
    fn score_uses_default_without_samples() {
        let s = stat(2, &[]);
        assert_eq!(s.score(0.1), 0.0);
        assert!((s.score(2.0) - 2.0 * effort_score(2.0)).abs() < 1e-12);
    }

    #[test]
    fn trigrams_are_ranked_by_score() {
        let mut stats = Statistics::new();
        stats.total_chars_typed = 30;
        stats.total_sessions_duration = 10.0;
        stats
            .trigrams
            .insert("abc".parse().unwrap(), stat(10, &[2.0]));
        stats
            .trigrams
            .insert("bcd".parse().unwrap(), stat(10, &[0.5]));
        stats
            .trigrams
            .insert("cde".parse().unwrap(), stat(1, &[2.0]));
        stats
            .trigrams
            .insert("def".parse().unwrap(), stat(10, &[0.1]));

        let ranked = trigrams_to_train(&stats);
        let order: Vec<String> = ranked.iter().map(|t| t.trigram.to_string()).collect();
        assert_eq!(order, vec!["abc", "bcd", "cde", "def"]);
        assert_eq!(ranked[3].score, 0.0);
    }

    #[test]
    fn ranking_empty_statistics() {
        assert!(trigrams_to_train(&Statistics::new()).is_empty());
    }

    #[test]
    fn test_average_wpm() {
        let mut stats = Statistics::new();
        assert_eq!(stats.average_wpm(), None);
        stats.total_chars_typed = 100;
        stats.total_sessions_duration = 20.0;
        // 0.2s per char, 0.6s per trigram
        assert!((stats.average_wpm().unwrap() - 60.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn effort_is_bounded(seconds in 0.0001f64..1000.0) {
            let e = effort_score(seconds);
            prop_assert!((0.0..=1.0).contains(&e));
        }

        #[test]
        fn effort_grows_with_duration_above_ceiling(
            a in CEILING..100.0,
            b in CEILING..100.0,
        ) {
            prop_assume!((a - b).abs() > 1e-3);
            let (fast, slow) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(effort_score(fast) < effort_score(slow));
        }

        #[test]
        fn ranking_is_descending(
            entries in proptest::collection::vec((0u64..50, 0.05f64..3.0), 1..30)
        ) {
            let mut stats = Statistics::new();
            stats.total_chars_typed = 100;
            stats.total_sessions_duration = 30.0;
            for (i, (count, duration)) in entries.iter().enumerate() {
                let c = char::from_u32(0x4e00 + i as u32).unwrap();
                stats.trigrams.insert(Trigram([c, 'x', 'y']), stat(*count, &[*duration]));
            }
            let ranked = trigrams_to_train(&stats);
            prop_assert_eq!(ranked.len(), entries.len());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}
