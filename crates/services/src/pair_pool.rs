use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::{IndexedRandom, SliceRandom};

use quiz_core::model::{OPTION_COUNT, VocabPair};

use crate::error::QuizError;

/// Minimum pool size: one question needs a correct meaning plus four
/// distractors, all from different pairs.
pub const MIN_PAIRS: usize = OPTION_COUNT;

/// The shuffled pool of vocabulary pairs for one quiz.
///
/// The full shuffled list is kept as a shared snapshot for progress totals
/// and distractor draws; `unused` is consumed from the tail, one pair per
/// question, only ever on the foreground task.
#[derive(Debug)]
pub struct PairPool {
    all: Arc<[VocabPair]>,
    unused: Vec<VocabPair>,
}

impl PairPool {
    /// Shuffle the pairs and build the pool.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientPairs` when fewer than [`MIN_PAIRS`]
    /// pairs are supplied.
    pub fn new(mut pairs: Vec<VocabPair>) -> Result<Self, QuizError> {
        if pairs.len() < MIN_PAIRS {
            return Err(QuizError::InsufficientPairs {
                needed: MIN_PAIRS,
                found: pairs.len(),
            });
        }
        pairs.shuffle(&mut rand::rng());
        Ok(Self {
            unused: pairs.clone(),
            all: pairs.into(),
        })
    }

    /// Remove and return the next unused pair, `None` once exhausted.
    pub fn pop_unused(&mut self) -> Option<VocabPair> {
        self.unused.pop()
    }

    /// Cheap read-only view of the full shuffled list, safe to hand to
    /// background builds.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[VocabPair]> {
        Arc::clone(&self.all)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.all.len()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.unused.len()
    }

    /// Sample `count` distractor pairs whose meanings are pairwise distinct
    /// and differ from the given meaning.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientDistractors` when fewer distinct
    /// candidate meanings exist. Unreachable for pools of all-distinct
    /// meanings thanks to the [`MIN_PAIRS`] floor, but checked anyway.
    pub fn distractors_excluding(
        &self,
        meaning: &str,
        count: usize,
    ) -> Result<Vec<VocabPair>, QuizError> {
        distinct_distractors(&self.all, meaning, count)
    }
}

/// Distractor sampling over any pair list.
///
/// Two terms may share a meaning string; only the first pair per meaning is
/// a candidate, so the resulting option set never contains duplicates.
pub(crate) fn distinct_distractors(
    pairs: &[VocabPair],
    meaning: &str,
    count: usize,
) -> Result<Vec<VocabPair>, QuizError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut candidates: Vec<&VocabPair> = Vec::new();
    for pair in pairs {
        if pair.meaning() == meaning {
            continue;
        }
        if seen.insert(pair.meaning()) {
            candidates.push(pair);
        }
    }

    if candidates.len() < count {
        return Err(QuizError::InsufficientDistractors {
            needed: count,
            found: candidates.len(),
        });
    }

    Ok(candidates
        .choose_multiple(&mut rand::rng(), count)
        .map(|pair| (*pair).clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(n: usize) -> Vec<VocabPair> {
        (0..n)
            .map(|i| VocabPair::new(format!("term{i}"), format!("meaning{i}")))
            .collect()
    }

    #[test]
    fn rejects_fewer_than_minimum_pairs() {
        let err = PairPool::new(pairs(4)).unwrap_err();
        assert!(matches!(
            err,
            QuizError::InsufficientPairs { needed: 5, found: 4 }
        ));
    }

    #[test]
    fn pops_return_each_pair_exactly_once() {
        let input = pairs(7);
        let mut pool = PairPool::new(input.clone()).unwrap();

        let mut popped = Vec::new();
        while let Some(pair) = pool.pop_unused() {
            popped.push(pair);
        }

        assert_eq!(popped.len(), input.len());
        let terms: HashSet<&str> = popped.iter().map(VocabPair::term).collect();
        assert_eq!(terms.len(), input.len());
        assert_eq!(pool.pop_unused(), None);
        assert_eq!(pool.remaining(), 0);
    }

    #[test]
    fn snapshot_keeps_the_full_list_while_the_pool_drains() {
        let mut pool = PairPool::new(pairs(5)).unwrap();
        let snapshot = pool.snapshot();

        pool.pop_unused();
        pool.pop_unused();

        assert_eq!(snapshot.len(), 5);
        assert_eq!(pool.total(), 5);
        assert_eq!(pool.remaining(), 3);
    }

    #[test]
    fn distractors_exclude_the_given_meaning() {
        let pool = PairPool::new(pairs(6)).unwrap();
        let distractors = pool.distractors_excluding("meaning3", 4).unwrap();

        assert_eq!(distractors.len(), 4);
        assert!(distractors.iter().all(|p| p.meaning() != "meaning3"));
    }

    #[test]
    fn distractor_meanings_are_distinct_even_when_pairs_share_one() {
        let mut input = pairs(5);
        input.push(VocabPair::new("extra1", "meaning0"));
        input.push(VocabPair::new("extra2", "meaning1"));
        let pool = PairPool::new(input).unwrap();

        for _ in 0..20 {
            let distractors = pool.distractors_excluding("meaning4", 4).unwrap();
            let meanings: HashSet<&str> = distractors.iter().map(VocabPair::meaning).collect();
            assert_eq!(meanings.len(), 4);
        }
    }

    #[test]
    fn too_few_distinct_meanings_is_an_error() {
        // Five pairs, but only two distinct meanings besides the excluded one.
        let input = vec![
            VocabPair::new("a", "shared"),
            VocabPair::new("b", "shared"),
            VocabPair::new("c", "shared"),
            VocabPair::new("d", "other"),
            VocabPair::new("e", "target"),
        ];
        let pool = PairPool::new(input).unwrap();

        let err = pool.distractors_excluding("target", 4).unwrap_err();
        assert!(matches!(
            err,
            QuizError::InsufficientDistractors { needed: 4, found: 2 }
        ));
    }
}
