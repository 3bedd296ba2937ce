use crate::error::TrainerResult;
use crate::phrase::TextProgress;
use crate::session::LogEntry;
use crate::stats::Statistics;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const STATS_FILE: &str = "stats.json";
pub const SESSION_LOG_FILE: &str = "sessions_log.jsonl";
pub const PROGRESS_FILE: &str = "progress.json";

/// Where statistics and the session history live between runs
pub trait StatsStore {
    /// `Ok(None)` when nothing was saved yet.
    fn load(&self) -> TrainerResult<Option<Statistics>>;
    fn save(&self, stats: &Statistics) -> TrainerResult<()>;
    fn append_log(&self, entry: &LogEntry) -> TrainerResult<()>;
    /// Reader over the session history, `Ok(None)` when there is no history.
    fn open_log(&self) -> TrainerResult<Option<SessionLog>>;
}

/// JSON files in a single data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn stats_path(&self) -> PathBuf {
        self.dir.join(STATS_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(SESSION_LOG_FILE)
    }

    pub fn progress_path(&self) -> PathBuf {
        self.dir.join(PROGRESS_FILE)
    }

    /// Position in practice text files, empty before the first save.
    pub fn load_progress(&self) -> TrainerResult<TextProgress> {
        match fs::read(self.progress_path()) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.progress_path().display(), "no text progress saved yet");
                Ok(TextProgress::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_progress(&self, progress: &TextProgress) -> TrainerResult<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.progress_path(), serde_json::to_vec_pretty(progress)?)?;
        Ok(())
    }
}

impl StatsStore for FileStore {
    fn load(&self) -> TrainerResult<Option<Statistics>> {
        let bytes = match fs::read(self.stats_path()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, stats: &Statistics) -> TrainerResult<()> {
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_vec_pretty(stats)?;
        fs::write(self.stats_path(), data)?;
        Ok(())
    }

    fn append_log(&self, entry: &LogEntry) -> TrainerResult<()> {
        fs::create_dir_all(&self.dir)?;
        let mut log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.log_path())?;

        let line = serde_json::to_string(entry)?;
        writeln!(log_file, "{line}")?;
        Ok(())
    }

    fn open_log(&self) -> TrainerResult<Option<SessionLog>> {
        match File::open(self.log_path()) {
            Ok(file) => Ok(Some(SessionLog::new(BufReader::new(file)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lazy reader over JSON lines of [`LogEntry`]. Blank lines are skipped.
pub struct SessionLog {
    lines: io::Lines<Box<dyn BufRead>>,
}

impl SessionLog {
    pub fn new<R: BufRead + 'static>(reader: R) -> Self {
        let boxed: Box<dyn BufRead> = Box::new(reader);
        Self {
            lines: boxed.lines(),
        }
    }
}

impl fmt::Debug for SessionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionLog").finish_non_exhaustive()
    }
}

impl Iterator for SessionLog {
    type Item = TrainerResult<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(serde_json::from_str(&line).map_err(Into::into));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrainerError;
    use assert_matches::assert_matches;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn entry(text: &str) -> LogEntry {
        LogEntry {
            start: "2024-01-01T00:00:00Z".to_string(),
            text: text.to_string(),
            timeline: (1..=text.chars().count()).map(|i| i as f64 * 0.2).collect(),
        }
    }

    #[test]
    fn load_missing_stats_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::with_dir(dir.path().join("nested"));
        assert_matches!(store.load(), Ok(None));
        assert_matches!(store.open_log(), Ok(None));
    }

    #[test]
    fn stats_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileStore::with_dir(dir.path().join("data"));

        let mut stats = Statistics::new();
        let text: Vec<char> = "hello world".chars().collect();
        let timeline: Vec<f64> = (1..=text.len()).map(|i| i as f64 * 0.25).collect();
        stats.record_session(&text, &timeline, false).unwrap();

        store.save(&stats).unwrap();
        assert_eq!(store.load().unwrap(), Some(stats));
    }

    #[test]
    fn corrupt_stats_is_a_json_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::with_dir(dir.path());
        fs::write(store.stats_path(), b"{not json").unwrap();
        assert_matches!(store.load(), Err(TrainerError::Json(_)));
    }

    #[test]
    fn log_appends_and_reads_back_in_order() {
        let dir = tempdir().unwrap();
        let store = FileStore::with_dir(dir.path());
        store.append_log(&entry("first")).unwrap();
        store.append_log(&entry("second")).unwrap();

        let texts: Vec<String> = store
            .open_log()
            .unwrap()
            .unwrap()
            .map(|e| e.unwrap().text)
            .collect();
        assert_eq!(texts, vec!["first", "second"]);

        let raw = fs::read_to_string(store.log_path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
    }

    #[test]
    fn session_log_skips_blank_lines_and_reports_bad_ones() {
        let data = "{\"start\":\"2024-01-01T00:00:00Z\",\"text\":\"a\",\"timeline\":[1.0]}\n\n garbage\n";
        let mut log = SessionLog::new(Cursor::new(data.as_bytes().to_vec()));

        assert_eq!(log.next().unwrap().unwrap().text, "a");
        assert_matches!(log.next(), Some(Err(TrainerError::Json(_))));
        assert!(log.next().is_none());
    }

    #[test]
    fn text_progress_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileStore::with_dir(dir.path().join("data"));
        assert_eq!(store.load_progress().unwrap(), TextProgress::default());

        let book = dir.path().join("book.txt");
        fs::write(&book, "a\nb\nc\n").unwrap();
        let mut progress = TextProgress::default();
        progress.advance(&book, 0, 2).unwrap();
        store.save_progress(&progress).unwrap();

        let loaded = store.load_progress().unwrap();
        assert_eq!(loaded.offset(&book).unwrap(), 2);
    }

    #[test]
    fn session_log_debug_hides_reader() {
        let log = SessionLog::new(Cursor::new(Vec::new()));
        assert_eq!(format!("{log:?}"), "SessionLog { .. }");
    }
}
