//! Catalog filtering: which cards are visible for a category, difficulty and text search.

use crate::models::{Category, Difficulty, Flashcard};

/// Conjunctive predicate over cards. `None` / empty search means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub search: String,
}

impl CardFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.difficulty.is_none() && self.search.trim().is_empty()
    }

    pub fn matches(&self, card: &Flashcard) -> bool {
        if self.category.is_some_and(|c| c != card.category) {
            return false;
        }
        if self.difficulty.is_some_and(|d| d != card.difficulty) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        card.front.to_lowercase().contains(&needle)
            || card.back.to_lowercase().contains(&needle)
            || card.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }

    /// Matching cards, in input order. Borrowed, so results are the store's own cards.
    pub fn apply<'a, I>(&self, cards: I) -> Vec<&'a Flashcard>
    where
        I: IntoIterator<Item = &'a Flashcard>,
    {
        cards.into_iter().filter(|c| self.matches(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCard;
    use chrono::Utc;

    fn card(front: &str, category: &str, difficulty: &str, tags: &[&str]) -> Flashcard {
        Flashcard::new(
            NewCard::new(front, "Some answer text", category, difficulty)
                .with_tags(tags.iter().copied())
                .validate()
                .unwrap(),
            Utc::now(),
        )
    }

    fn catalog() -> Vec<Flashcard> {
        vec![
            card("What is a closure?", "javascript", "medium", &["scope"]),
            card("What does useMemo do?", "react", "medium", &["hooks"]),
            card("Explain quicksort", "algorithms", "hard", &[]),
            card("What is sharding?", "system-design", "hard", &["Scaling"]),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let cards = catalog();
        let filter = CardFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&cards).len(), 4);
    }

    #[test]
    fn test_category_filter_returns_store_cards() {
        let cards = catalog();
        let result = CardFilter::new().category(Category::React).apply(&cards);

        assert_eq!(result.len(), 1);
        assert!(std::ptr::eq(result[0], &cards[1]));
    }

    #[test]
    fn test_filters_compose() {
        let cards = catalog();
        let result = CardFilter::new()
            .difficulty(Difficulty::Hard)
            .search("sort")
            .apply(&cards);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].front, "Explain quicksort");
    }

    #[test]
    fn test_search_is_case_insensitive_over_front_back_and_tags() {
        let cards = catalog();

        assert_eq!(CardFilter::new().search("CLOSURE").apply(&cards).len(), 1);
        assert_eq!(CardFilter::new().search("scaling").apply(&cards).len(), 1);
        assert_eq!(CardFilter::new().search("answer").apply(&cards).len(), 4);
        assert!(CardFilter::new().search("kubernetes").apply(&cards).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let cards = catalog();
        let filter = CardFilter::new().difficulty(Difficulty::Medium).search("what");

        let once = filter.apply(&cards);
        let twice = filter.apply(once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_preserves_input_order() {
        let cards = catalog();
        let result = CardFilter::new().search("what").apply(&cards);
        let fronts: Vec<_> = result.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(
            fronts,
            vec!["What is a closure?", "What does useMemo do?", "What is sharding?"]
        );
    }
}
