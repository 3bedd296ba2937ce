pub mod markov;
pub mod weakest_loop;

pub use markov::{MarkovChain, MarkovGenerator};
pub use weakest_loop::WeakestLoopGenerator;

use crate::error::{TrainerError, TrainerResult};
use crate::scoring::TrigramScore;
use clap::ValueEnum;
use rand::RngCore;

/// Generators refuse to run with fewer positively scored trigrams than this.
pub const MIN_POSITIVE_TRIGRAMS: usize = 10;

/// Length used when a caller asks for a sequence of length 0.
pub const DEFAULT_LENGTH: usize = 100;

/// Weakest loops are short and repetitive, so exercises default shorter.
pub const DEFAULT_WEAKEST_LENGTH: usize = 50;

/// Strategy for turning ranked trigrams into practice text
pub trait SequenceGenerator {
    /// Produce exactly `length` characters from `trigrams`, which must be
    /// sorted by descending score and non-empty.
    fn generate(&self, trigrams: &[TrigramScore], length: usize, rng: &mut dyn RngCore) -> String;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum GeneratorKind {
    /// Repeat the cheapest loop through the weakest trigram
    Weakest,
    /// Random text following a chain weighted by trigram scores
    Markov,
}

impl GeneratorKind {
    /// Exercise length when the caller does not ask for one.
    pub fn default_length(&self) -> usize {
        match self {
            GeneratorKind::Weakest => DEFAULT_WEAKEST_LENGTH,
            GeneratorKind::Markov => DEFAULT_LENGTH,
        }
    }

    pub fn generator(&self) -> Box<dyn SequenceGenerator> {
        match self {
            GeneratorKind::Weakest => Box::new(WeakestLoopGenerator),
            GeneratorKind::Markov => Box::new(MarkovGenerator),
        }
    }
}

/// Check there is enough typing history to build a meaningful exercise.
pub fn ensure_enough_data(trigrams: &[TrigramScore]) -> TrainerResult<()> {
    let available = trigrams.iter().filter(|t| t.score > 0.0).count();
    if available < MIN_POSITIVE_TRIGRAMS {
        return Err(TrainerError::InsufficientData {
            available,
            required: MIN_POSITIVE_TRIGRAMS,
        });
    }
    Ok(())
}

pub fn resolve_length(length: usize) -> usize {
    if length == 0 {
        DEFAULT_LENGTH
    } else {
        length
    }
}

/// Repeat `cycle` until exactly `length` characters are produced.
pub(crate) fn wrap(cycle: &[char], length: usize) -> String {
    if cycle.is_empty() {
        return String::new();
    }
    cycle.iter().cycle().take(length).collect()
}
