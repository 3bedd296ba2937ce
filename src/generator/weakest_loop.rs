use super::{wrap, SequenceGenerator};
use crate::scoring::TrigramScore;
use crate::trigram::Bigram;
use rand::RngCore;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Builds a short loop of characters that starts with the weakest trigram and
/// returns to it through the cheapest chain of other weak trigrams.
///
/// Each trigram `abc` with a positive score is an edge `ab -> bc` weighted
/// `1 / score`, so well-trained trigrams are expensive to walk through. The
/// loop is the shortest path from the tail of the weakest trigram back to its
/// head, and the output is that loop repeated.
pub struct WeakestLoopGenerator;

#[derive(Debug, Clone, Copy)]
struct Edge {
    from: Bigram,
    to: Bigram,
    weight: f64,
}

impl WeakestLoopGenerator {
    /// The characters of one pass around the loop.
    pub fn weakest_loop(trigrams: &[TrigramScore]) -> Vec<char> {
        let Some(weakest) = trigrams.first() else {
            return Vec::new();
        };
        let start = weakest.trigram.tail();
        let finish = weakest.trigram.head();

        let mut vertices = BTreeSet::new();
        let edges: Vec<Edge> = trigrams
            .iter()
            .filter(|t| t.score > 0.0)
            .map(|t| {
                let edge = Edge {
                    from: t.trigram.head(),
                    to: t.trigram.tail(),
                    weight: 1.0 / t.score,
                };
                vertices.insert(edge.from);
                vertices.insert(edge.to);
                edge
            })
            .collect();

        let predecessors = shortest_paths(start, &vertices, &edges);

        match trace_path(start, finish, &predecessors) {
            Some(path) => path.iter().map(Bigram::first).collect(),
            None => {
                // TODO: decide whether an unreachable finish should try the next weakest trigram instead
                debug!(
                    trigram = %weakest.trigram,
                    "no path back to the weakest trigram, repeating it alone"
                );
                weakest.trigram.chars().to_vec()
            }
        }
    }

    /// The loop repeated to exactly `length` characters.
    pub fn sequence(trigrams: &[TrigramScore], length: usize) -> String {
        let cycle = Self::weakest_loop(trigrams);
        debug!(loop_length = cycle.len(), length, "weakest loop built");
        wrap(&cycle, length)
    }
}

impl SequenceGenerator for WeakestLoopGenerator {
    fn generate(&self, trigrams: &[TrigramScore], length: usize, _rng: &mut dyn RngCore) -> String {
        Self::sequence(trigrams, length)
    }
}

/// Bellman-Ford relaxation from `start`, returning for each reached vertex the
/// vertex it is entered from on its shortest path. All weights are positive.
fn shortest_paths(
    start: Bigram,
    vertices: &BTreeSet<Bigram>,
    edges: &[Edge],
) -> BTreeMap<Bigram, Bigram> {
    let mut distance: BTreeMap<Bigram, f64> =
        vertices.iter().map(|v| (*v, f64::INFINITY)).collect();
    let mut predecessor = BTreeMap::new();
    distance.insert(start, 0.0);

    for _ in 1..vertices.len().max(1) {
        let mut relaxed = false;
        for edge in edges {
            let through = distance[&edge.from] + edge.weight;
            if through < distance[&edge.to] {
                distance.insert(edge.to, through);
                predecessor.insert(edge.to, edge.from);
                relaxed = true;
            }
        }
        if !relaxed {
            break;
        }
    }

    predecessor
}

/// Walk predecessors from `finish` back to `start` and return the path in
/// forward order, or `None` when `finish` cannot be reached.
fn trace_path(
    start: Bigram,
    finish: Bigram,
    predecessors: &BTreeMap<Bigram, Bigram>,
) -> Option<Vec<Bigram>> {
    if start == finish {
        return None;
    }

    let mut path = vec![finish];
    let mut step = finish;
    while step != start {
        step = *predecessors.get(&step)?;
        // predecessor chains are acyclic with positive weights
        if path.len() > predecessors.len() + 1 {
            return None;
        }
        path.push(step);
    }
    path.reverse();
    Some(path)
}
