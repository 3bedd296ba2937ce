use crate::error::TrainerResult;
use crate::generator::{
    ensure_enough_data, resolve_length, GeneratorKind, MarkovGenerator, SequenceGenerator,
    WeakestLoopGenerator,
};
use crate::report::Report;
use crate::scoring::{trigrams_to_train, TrigramScore};
use crate::session::{LogEntry, Session};
use crate::stats::{check_session, SessionOutcome, Statistics, MIN_SESSION_LENGTH};
use crate::storage::StatsStore;
use rand::RngCore;
use tracing::{info, warn};

/// Statistics loaded for the lifetime of the process, together with the
/// store they are persisted to.
///
/// Open it once, feed it sessions, ask it for exercises. Every recorded
/// session is written back to the store before `record_session` returns.
#[derive(Debug)]
pub struct Trainer<S: StatsStore> {
    store: S,
    stats: Statistics,
}

/// Resolve a requested exercise length, warning when typing it back would
/// be too short to count.
fn exercise_length(length: usize) -> usize {
    let length = resolve_length(length);
    if length < MIN_SESSION_LENGTH {
        warn!(
            length,
            "exercises shorter than {MIN_SESSION_LENGTH} characters are not recorded"
        );
    }
    length
}

impl<S: StatsStore> Trainer<S> {
    /// Load statistics from `store`, starting empty when none were saved yet.
    pub fn open(store: S) -> TrainerResult<Self> {
        let stats = match store.load()? {
            Some(stats) => stats,
            None => {
                warn!("no saved statistics found, starting from scratch");
                Statistics::new()
            }
        };
        Ok(Self { store, stats })
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Log the session, fold it into the statistics and save them.
    ///
    /// Sessions that are too short are neither logged nor counted.
    pub fn record_session(&mut self, session: &Session) -> TrainerResult<SessionOutcome> {
        let text = session.chars();
        if check_session(&text, &session.timeline)? == SessionOutcome::TooShort {
            return Ok(SessionOutcome::TooShort);
        }
        self.store.append_log(&LogEntry::from(session))?;

        let outcome = self
            .stats
            .record_session(&text, &session.timeline, session.is_training)?;
        self.store.save(&self.stats)?;
        info!(
            chars = text.len(),
            seconds = session.duration(),
            training = session.is_training,
            "session saved"
        );
        Ok(outcome)
    }

    /// Ranked trigrams, refusing when there is too little history to be useful.
    pub fn trigrams_to_train(&self) -> TrainerResult<Vec<TrigramScore>> {
        let trigrams = trigrams_to_train(&self.stats);
        ensure_enough_data(&trigrams)?;
        Ok(trigrams)
    }

    pub fn weakest_sequence(&self, length: usize) -> TrainerResult<String> {
        let trigrams = self.trigrams_to_train()?;
        Ok(WeakestLoopGenerator::sequence(&trigrams, exercise_length(length)))
    }

    pub fn markov_sequence(&self, length: usize, rng: &mut dyn RngCore) -> TrainerResult<String> {
        let trigrams = self.trigrams_to_train()?;
        Ok(MarkovGenerator.generate(&trigrams, exercise_length(length), rng))
    }

    pub fn generate(
        &self,
        kind: GeneratorKind,
        length: usize,
        rng: &mut dyn RngCore,
    ) -> TrainerResult<String> {
        let trigrams = self.trigrams_to_train()?;
        info!(generator = %kind, trigrams = trigrams.len(), "generating exercise");
        Ok(kind
            .generator()
            .generate(&trigrams, exercise_length(length), rng))
    }

    pub fn report(&self, top_n: usize) -> TrainerResult<Report> {
        Report::build(&self.stats, self.store.open_log()?, top_n)
    }
}
