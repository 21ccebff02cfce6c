//! Progress statistics, derived from the current cards on every call.

use crate::models::{Category, Flashcard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryStats {
    pub total: usize,
    pub mastered: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub total_cards: usize,
    pub reviewed_cards: usize,
    pub mastered_cards: usize,
    pub average_confidence: f64,
    /// One entry per category, in `Category::ALL` order.
    pub by_category: Vec<(Category, CategoryStats)>,
}

impl Stats {
    pub fn compute<'a, I>(cards: I) -> Self
    where
        I: IntoIterator<Item = &'a Flashcard>,
    {
        let mut total_cards = 0;
        let mut reviewed_cards = 0;
        let mut mastered_cards = 0;
        let mut confidence_sum: u64 = 0;
        let mut by_category: Vec<(Category, CategoryStats)> = Category::ALL
            .into_iter()
            .map(|c| (c, CategoryStats::default()))
            .collect();

        for card in cards {
            total_cards += 1;
            confidence_sum += u64::from(card.confidence);
            if card.is_reviewed() {
                reviewed_cards += 1;
            }
            if card.is_mastered() {
                mastered_cards += 1;
            }
            if let Some((_, entry)) = by_category.iter_mut().find(|(c, _)| *c == card.category) {
                entry.total += 1;
                if card.is_mastered() {
                    entry.mastered += 1;
                }
            }
        }

        let average_confidence = if total_cards == 0 {
            0.0
        } else {
            confidence_sum as f64 / total_cards as f64
        };

        Self {
            total_cards,
            reviewed_cards,
            mastered_cards,
            average_confidence,
            by_category,
        }
    }

    pub fn mastery_rate(&self) -> f64 {
        ratio(self.mastered_cards, self.total_cards)
    }

    pub fn review_coverage(&self) -> f64 {
        ratio(self.reviewed_cards, self.total_cards)
    }

    pub fn category(&self, category: Category) -> CategoryStats {
        self.by_category
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, s)| *s)
            .unwrap_or_default()
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
