use crate::error::{TrainerError, TrainerResult};
use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use serde::{Deserialize, Serialize};

/// A finished typing session as handed over by the capture front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub started_at: DateTime<FixedOffset>,
    pub text: String,
    /// Seconds since `started_at` at which each character of `text` was typed
    pub timeline: Vec<f64>,
    #[serde(default)]
    pub is_training: bool,
}

impl Session {
    pub fn new(text: impl Into<String>, timeline: Vec<f64>, is_training: bool) -> Self {
        Self {
            started_at: Local::now().fixed_offset(),
            text: text.into(),
            timeline,
            is_training,
        }
    }

    pub fn chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }

    /// Seconds from start to the last typed character
    pub fn duration(&self) -> f64 {
        self.timeline.last().copied().unwrap_or_default()
    }
}

/// One line of the append-only session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC3339 start time
    pub start: String,
    pub text: String,
    pub timeline: Vec<f64>,
}

impl LogEntry {
    pub fn started_at(&self) -> TrainerResult<DateTime<FixedOffset>> {
        Ok(DateTime::parse_from_rfc3339(&self.start)?)
    }

    pub fn duration(&self) -> TrainerResult<f64> {
        self.timeline.last().copied().ok_or_else(|| {
            TrainerError::Validation(format!("log entry started {} has an empty timeline", self.start))
        })
    }
}

impl From<&Session> for LogEntry {
    fn from(session: &Session) -> Self {
        Self {
            start: session
                .started_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            text: session.text.clone(),
            timeline: session.timeline.clone(),
        }
    }
}
