use crate::error::TrainerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Two consecutive characters, used as a vertex in the weakest-loop graph
/// and as the state of the Markov chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bigram(pub [char; 2]);

impl Bigram {
    pub fn first(&self) -> char {
        self.0[0]
    }
}

impl fmt::Display for Bigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0], self.0[1])
    }
}

/// Three consecutive characters as typed in a session.
///
/// Stored as chars (not bytes) so multi-byte letters count as one position.
/// Serializes as a plain three character string, which also makes it usable
/// as a JSON object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Trigram(pub [char; 3]);

impl Trigram {
    /// Builds a trigram from the first three chars of `chars`.
    pub fn from_chars(chars: &[char]) -> Option<Self> {
        match chars {
            [a, b, c, ..] => Some(Trigram([*a, *b, *c])),
            _ => None,
        }
    }

    pub fn head(&self) -> Bigram {
        Bigram([self.0[0], self.0[1]])
    }

    pub fn tail(&self) -> Bigram {
        Bigram([self.0[1], self.0[2]])
    }

    pub fn last(&self) -> char {
        self.0[2]
    }

    pub fn chars(&self) -> [char; 3] {
        self.0
    }
}

impl fmt::Display for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for Trigram {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 3 {
            return Err(TrainerError::Validation(format!(
                "trigram must be exactly 3 characters, got {s:?}"
            )));
        }
        Ok(Trigram([chars[0], chars[1], chars[2]]))
    }
}

impl TryFrom<String> for Trigram {
    type Error = TrainerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Trigram> for String {
    fn from(t: Trigram) -> Self {
        t.to_string()
    }
}
