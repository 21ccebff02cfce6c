//! Study session construction: a fixed, shuffled order of card ids.
use crate::error::SessionError;
use crate::models::{CardId, Flashcard};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// One bounded study pass. The order is fixed once built; reshuffling means
/// building a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    order: Vec<CardId>,
}

impl Session {
    /// Shuffles the given cards. With a seed the order is reproducible,
    /// otherwise it is drawn from OS entropy.
    pub fn build<'a, I>(cards: I, seed: Option<u64>) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = &'a Flashcard>,
    {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::build_with_rng(cards, &mut rng)
    }

    pub fn build_with_rng<'a, I, R>(cards: I, rng: &mut R) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = &'a Flashcard>,
        R: Rng + ?Sized,
    {
        let mut order: Vec<CardId> = cards.into_iter().map(|c| c.id).collect();
        if order.is_empty() {
            return Err(SessionError::EmptySet);
        }
        order.shuffle(rng);
        Ok(Self { order })
    }

    pub fn order(&self) -> &[CardId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCard;
    use chrono::Utc;
    use std::collections::HashSet;

    fn cards(n: usize) -> Vec<Flashcard> {
        (0..n)
            .map(|i| {
                Flashcard::new(
                    NewCard::new(format!("Question {i}"), "Answer text", "general", "easy")
                        .validate()
                        .unwrap(),
                    Utc::now(),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_set_is_rejected() {
        let result = Session::build(&Vec::<Flashcard>::new(), Some(1));
        assert!(matches!(result, Err(SessionError::EmptySet)));
    }

    #[test]
    fn test_seeded_build_is_stable() {
        let cards = cards(10);
        let first = Session::build(&cards, Some(42)).unwrap();
        let second = Session::build(&cards, Some(42)).unwrap();
        assert_eq!(first.order(), second.order());
    }

    #[test]
    fn test_order_is_a_permutation() {
        let cards = cards(8);
        let session = Session::build(&cards, None).unwrap();

        assert_eq!(session.len(), 8);
        let expected: HashSet<_> = cards.iter().map(|c| c.id).collect();
        let actual: HashSet<_> = session.order().iter().copied().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_different_seeds_can_differ() {
        let cards = cards(20);
        let orders: HashSet<Vec<CardId>> = (0..5)
            .map(|seed| Session::build(&cards, Some(seed)).unwrap().order().to_vec())
            .collect();
        assert!(orders.len() > 1);
    }
}
