//! Built-in sample deck of interview questions, imported into an empty store.
use crate::error::ValidationError;
use crate::models::{Flashcard, NewCard};
use chrono::Utc;

const SAMPLE_CARDS: &[(&str, &str, &str, &str, &[&str])] = &[
    (
        "What is a closure in JavaScript?",
        "A function bundled with references to its surrounding lexical scope, so it can use outer variables after the outer function returns.",
        "javascript",
        "medium",
        &["scope", "functions"],
    ),
    (
        "What is the difference between let, const and var?",
        "var is function-scoped and hoisted; let and const are block-scoped, and const bindings cannot be reassigned.",
        "javascript",
        "easy",
        &["variables"],
    ),
    (
        "Explain the JavaScript event loop.",
        "The call stack runs synchronous code; when it is empty, queued microtasks run first, then the next macrotask from the task queue.",
        "javascript",
        "hard",
        &["async", "runtime"],
    ),
    (
        "What does the useEffect hook do?",
        "Runs side effects after render; the dependency array controls when it re-runs and the returned function cleans up.",
        "react",
        "medium",
        &["hooks"],
    ),
    (
        "What is the virtual DOM?",
        "An in-memory representation of the UI that React diffs against the previous one to apply minimal updates to the real DOM.",
        "react",
        "easy",
        &["rendering"],
    ),
    (
        "What is the time complexity of binary search?",
        "O(log n): each comparison halves the remaining sorted search space.",
        "algorithms",
        "easy",
        &["search", "complexity"],
    ),
    (
        "How do you detect a cycle in a linked list?",
        "Floyd's tortoise and hare: advance one pointer by one and another by two; they meet if and only if there is a cycle.",
        "algorithms",
        "medium",
        &["linked-list", "two-pointers"],
    ),
    (
        "What does the CAP theorem state?",
        "A distributed store can guarantee at most two of consistency, availability and partition tolerance; under a partition you choose C or A.",
        "system-design",
        "hard",
        &["distributed"],
    ),
    (
        "When would you add a cache in front of a service?",
        "When reads dominate and data tolerates some staleness; pick an eviction and invalidation strategy to match.",
        "system-design",
        "medium",
        &["caching", "scaling"],
    ),
    (
        "What is a database index?",
        "An auxiliary structure, usually a B-tree, that speeds up lookups on columns at the cost of extra writes and storage.",
        "database",
        "easy",
        &["sql", "performance"],
    ),
    (
        "What are the ACID properties?",
        "Atomicity, consistency, isolation and durability: the guarantees a transaction provides.",
        "database",
        "medium",
        &["transactions"],
    ),
    (
        "Tell me about a time you disagreed with a teammate.",
        "Use STAR: describe the situation, your task, the actions you took to resolve it, and the measurable result.",
        "general",
        "medium",
        &["behavioral"],
    ),
];

/// Fresh, unseen cards for the sample deck.
pub fn sample_cards() -> Result<Vec<Flashcard>, ValidationError> {
    let now = Utc::now();
    SAMPLE_CARDS
        .iter()
        .map(|(front, back, category, difficulty, tags)| {
            let content = NewCard::new(*front, *back, *category, *difficulty)
                .with_tags(tags.iter().copied())
                .validate()?;
            Ok(Flashcard::new(content, now))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::store::{CardStore, MemoryStorage};
    use std::collections::HashSet;

    #[test]
    fn test_sample_cards_are_valid_and_unseen() {
        let cards = sample_cards().unwrap();
        assert_eq!(cards.len(), SAMPLE_CARDS.len());
        for card in &cards {
            assert!(card.check_integrity().is_ok());
            assert_eq!(card.confidence, 0);
        }
    }

    #[test]
    fn test_sample_cards_cover_every_category() {
        let categories: HashSet<Category> = sample_cards().unwrap().iter().map(|c| c.category).collect();
        assert_eq!(categories.len(), Category::ALL.len());
    }

    #[test]
    fn test_sample_cards_import_into_store() {
        let mut store = CardStore::open(MemoryStorage::new()).unwrap();
        let added = store.import(sample_cards().unwrap()).unwrap();
        assert_eq!(added, SAMPLE_CARDS.len());
    }
}
