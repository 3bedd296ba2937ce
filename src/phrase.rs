//! Plain practice text: random words from a word list, or a file's lines.

use crate::error::{TrainerError, TrainerResult};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

fn read_source(path: &Path) -> TrainerResult<String> {
    if is_stdin(path) {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

/// Trimmed, non-empty lines of `path`, or of stdin when `path` is `-`.
pub fn load_lines<P: AsRef<Path>>(path: P) -> TrainerResult<Vec<String>> {
    let path = path.as_ref();
    let lines: Vec<String> = read_source(path)?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    if lines.is_empty() {
        return Err(TrainerError::Validation(format!(
            "{} contains no usable lines",
            path.display()
        )));
    }
    Ok(lines)
}

/// Lines of a text to type, starting at line `offset`. Blank lines are kept
/// so paragraphs stay apart.
pub fn load_text<P: AsRef<Path>>(path: P, offset: usize) -> TrainerResult<Vec<String>> {
    let path = path.as_ref();
    let lines: Vec<String> = read_source(path)?
        .lines()
        .skip(offset)
        .map(String::from)
        .collect();
    if lines.is_empty() {
        return Err(TrainerError::Validation(format!(
            "{} contains no usable text at line {offset}",
            path.display()
        )));
    }
    Ok(lines)
}

/// `count` words picked uniformly (with repetition), joined by spaces.
pub fn random_words(words: &[String], count: usize, rng: &mut dyn RngCore) -> String {
    (0..count)
        .filter_map(|_| words.choose(rng))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Leading lines, trimmed, whose combined length counting one separator per
/// line reaches `min_length`. `0` keeps every line.
pub fn slice_lines(lines: &[String], min_length: usize) -> Vec<String> {
    let mut total = 0;
    let mut kept = Vec::new();
    for line in lines {
        let line = line.trim();
        kept.push(line.to_string());
        total += line.chars().count() + 1;
        if min_length > 0 && total >= min_length {
            break;
        }
    }
    kept
}

/// How far into each text file the user has got, in lines. Keyed by
/// absolute path; stdin is never tracked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextProgress {
    lines: BTreeMap<String, usize>,
}

impl TextProgress {
    fn key(path: &Path) -> TrainerResult<Option<String>> {
        if is_stdin(path) {
            return Ok(None);
        }
        let absolute = fs::canonicalize(path)?;
        Ok(Some(absolute.to_string_lossy().into_owned()))
    }

    /// Line to resume `path` from, 0 for files never practised.
    pub fn offset<P: AsRef<Path>>(&self, path: P) -> TrainerResult<usize> {
        Ok(Self::key(path.as_ref())?
            .and_then(|key| self.lines.get(&key).copied())
            .unwrap_or_default())
    }

    /// Mark `lines_shown` lines from `start` as done. Returns whether
    /// anything changed and needs saving.
    pub fn advance<P: AsRef<Path>>(
        &mut self,
        path: P,
        start: usize,
        lines_shown: usize,
    ) -> TrainerResult<bool> {
        if lines_shown == 0 {
            return Ok(false);
        }
        let Some(key) = Self::key(path.as_ref())? else {
            return Ok(false);
        };
        self.lines.insert(key, start + lines_shown);
        Ok(true)
    }
}
