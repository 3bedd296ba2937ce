use crate::error::TrainerResult;
use crate::scoring::{time_to_wpm, trigrams_to_train};
use crate::stats::Statistics;
use crate::storage::SessionLog;
use crate::time_series::{progress_interval, wpm_progress, TimeSeriesPoint};
use crate::trigram::Trigram;
use crate::util::{format_minutes, format_seconds};
use std::cmp::Ordering;
use std::fmt;

pub const DEFAULT_TOP_TRIGRAMS: usize = 20;

/// One row of the "needs training" table
#[derive(Debug, Clone, PartialEq)]
pub struct TrigramLine {
    pub trigram: Trigram,
    /// Score relative to total training time, in per mille
    pub score: f64,
    pub frequency: u64,
    /// Average typing time in seconds
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub interval_minutes: u64,
    pub points: Vec<TimeSeriesPoint>,
}

/// Summary of everything typed so far
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total_chars_typed: u64,
    pub total_duration: f64,
    pub sessions_count: u64,
    pub average_wpm: Option<f64>,
    pub slowest: Option<(Trigram, f64)>,
    pub fastest: Option<(Trigram, f64)>,
    pub top: Vec<TrigramLine>,
    /// `None` until enough training time has accumulated
    pub progress: Option<Progress>,
}

impl Report {
    pub fn build(stats: &Statistics, log: Option<SessionLog>, top_n: usize) -> TrainerResult<Self> {
        let timed: Vec<(Trigram, f64)> = stats
            .trigrams
            .iter()
            .filter(|(_, s)| !s.duration.is_empty())
            .map(|(t, s)| (*t, s.duration.average(0.0)))
            .collect();
        let by_duration = |a: &&(Trigram, f64), b: &&(Trigram, f64)| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.0.cmp(&a.0))
        };
        let slowest = timed.iter().max_by(by_duration).copied();
        let fastest = timed.iter().min_by(by_duration).copied();

        let top = trigrams_to_train(stats)
            .into_iter()
            .take(top_n)
            .map(|ts| {
                let stat = &stats.trigrams[&ts.trigram];
                let score = if stats.total_sessions_duration > 0.0 {
                    ts.score / stats.total_sessions_duration * 1000.0
                } else {
                    0.0
                };
                TrigramLine {
                    trigram: ts.trigram,
                    score,
                    frequency: stat.count,
                    duration: stat.duration.average(0.0),
                }
            })
            .collect();

        let progress = match (progress_interval(stats.total_sessions_duration), log) {
            (Some(interval_minutes), Some(log)) => Some(Progress {
                interval_minutes,
                points: wpm_progress(log, interval_minutes)?,
            }),
            _ => None,
        };

        Ok(Self {
            total_chars_typed: stats.total_chars_typed,
            total_duration: stats.total_sessions_duration,
            sessions_count: stats.sessions_count,
            average_wpm: stats.average_wpm(),
            slowest,
            fastest,
            top,
            progress,
        })
    }
}

fn write_extreme(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    extreme: Option<(Trigram, f64)>,
) -> fmt::Result {
    match extreme {
        Some((trigram, seconds)) => writeln!(
            f,
            "{label}: {:?} {:4.2}s ({:.1} wpm)",
            trigram.to_string(),
            seconds,
            time_to_wpm(seconds)
        ),
        None => writeln!(f, "{label}: -"),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total characters typed: {}", self.total_chars_typed)?;
        writeln!(f, "Total time in training: {}", format_seconds(self.total_duration))?;
        match self.average_wpm {
            Some(wpm) => writeln!(f, "Average typing speed: {wpm:.1} wpm")?,
            None => writeln!(f, "Average typing speed: -")?,
        }
        writeln!(f, "Training sessions: {}", self.sessions_count)?;

        writeln!(f, "\nTrigram stats:")?;
        write_extreme(f, "Slowest", self.slowest)?;
        write_extreme(f, "Fastest", self.fastest)?;

        if !self.top.is_empty() {
            writeln!(f, "\nNeed to be trained most:")?;
            writeln!(f, "Trigram |   Score | Frequency | Typing time")?;
            for line in &self.top {
                writeln!(
                    f,
                    "{:>7} | {:7.2} | {:9} | {:4.2}s ({:.1} wpm)",
                    format!("{:?}", line.trigram.to_string()),
                    line.score,
                    line.frequency,
                    line.duration,
                    time_to_wpm(line.duration)
                )?;
            }
        }

        match &self.progress {
            None => write!(f, "\nTrain more to get some progress!"),
            Some(progress) => {
                writeln!(f, "\nTraining progress:")?;
                writeln!(f, "   Time | WPM")?;
                for point in &progress.points {
                    writeln!(f, "{:>7} | {:.1}", format_minutes(point.t as u64), point.wpm)?;
                }
                Ok(())
            }
        }
    }
}
