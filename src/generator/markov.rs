use super::{SequenceGenerator, MIN_POSITIVE_TRIGRAMS};
use crate::scoring::TrigramScore;
use crate::trigram::Bigram;
use rand::{Rng, RngCore};
use std::collections::BTreeMap;
use tracing::debug;

/// Weight given to trigrams that scored zero, so they stay reachable.
const SCORE_FLOOR: f64 = 1e-8;

/// First-order character chain: for each bigram, the probability of every
/// character seen after it, proportional to the score of the trigram formed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkovChain {
    links: BTreeMap<Bigram, Vec<(char, f64)>>,
}

impl MarkovChain {
    pub fn from_trigrams(trigrams: &[TrigramScore]) -> Self {
        let mut weights: BTreeMap<Bigram, BTreeMap<char, f64>> = BTreeMap::new();
        for ts in trigrams {
            let score = if ts.score == 0.0 { SCORE_FLOOR } else { ts.score };
            *weights
                .entry(ts.trigram.head())
                .or_default()
                .entry(ts.trigram.last())
                .or_default() += score;
        }

        let links = weights
            .into_iter()
            .map(|(bigram, next)| {
                let total: f64 = next.values().sum();
                let distribution = next.into_iter().map(|(c, w)| (c, w / total)).collect();
                (bigram, distribution)
            })
            .collect();

        Self { links }
    }

    /// Probability of `next` following `bigram`, `None` for an unseen bigram.
    pub fn probability(&self, bigram: Bigram, next: char) -> Option<f64> {
        self.links.get(&bigram).map(|dist| {
            dist.iter()
                .find(|(c, _)| *c == next)
                .map_or(0.0, |(_, p)| *p)
        })
    }

    /// Draw the character following `bigram` using `choice` in `[0, 1)`.
    pub fn next_char(&self, bigram: Bigram, choice: f64) -> Option<char> {
        let distribution = self.links.get(&bigram)?;
        let mut cumulative = 0.0;
        for (c, p) in distribution {
            cumulative += p;
            if choice < cumulative {
                return Some(*c);
            }
        }
        // rounding left the total just under 1
        distribution.last().map(|(c, _)| *c)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Random text that follows typed trigrams, favouring the weak ones.
pub struct MarkovGenerator;

impl SequenceGenerator for MarkovGenerator {
    fn generate(&self, trigrams: &[TrigramScore], length: usize, rng: &mut dyn RngCore) -> String {
        let chain = MarkovChain::from_trigrams(trigrams);
        if chain.is_empty() {
            return String::new();
        }
        debug!(states = chain.len(), length, "markov chain built");

        let seeds = trigrams.len().min(MIN_POSITIVE_TRIGRAMS);
        let seed = trigrams[rng.gen_range(0..seeds)].trigram;

        let mut text: Vec<char> = Vec::with_capacity(length.max(3));
        text.extend(seed.chars());
        while text.len() < length {
            let n = text.len();
            let bigram = Bigram([text[n - 2], text[n - 1]]);
            let next = chain
                .next_char(bigram, rng.gen::<f64>())
                .unwrap_or(text[n % 3]);
            text.push(next);
        }
        text.truncate(length);

        text.into_iter().collect()
    }
}
