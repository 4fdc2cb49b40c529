//! Output-token budget selection.

use cg_domain::config::TokenBudgets;
use cg_domain::topic::Topic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Simple,
    Standard,
    Complex,
}

impl Complexity {
    pub fn budget(self, budgets: &TokenBudgets) -> u32 {
        match self {
            Complexity::Simple => budgets.simple,
            Complexity::Standard => budgets.standard,
            Complexity::Complex => budgets.complex,
        }
    }
}

/// Topics whose answers list several options or steps.
const COMPLEX_TOPICS: &[Topic] = &[Topic::Packages, Topic::Ritual, Topic::GroupBookings];

/// Pick a complexity class from the message and the topics of its knowledge
/// matches.
pub fn classify_complexity(message: &str, topics: &[Topic]) -> Complexity {
    let questions = message.matches('?').count() + message.matches('¿').count();
    if questions >= 2 || topics.iter().any(|t| COMPLEX_TOPICS.contains(t)) {
        return Complexity::Complex;
    }

    let words = message.split_whitespace().count();
    if topics.iter().all(|t| t.is_conversational()) && words <= 6 {
        return Complexity::Simple;
    }

    Complexity::Standard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_part_questions_are_complex() {
        assert_eq!(
            classify_complexity("Do you have parking? And towels?", &[Topic::Facilities]),
            Complexity::Complex
        );
        assert_eq!(
            classify_complexity("¿Tenéis parking? ¿Y toallas?", &[]),
            Complexity::Complex
        );
    }

    #[test]
    fn package_questions_are_complex() {
        assert_eq!(
            classify_complexity("what is included", &[Topic::Packages]),
            Complexity::Complex
        );
    }

    #[test]
    fn short_chatter_is_simple() {
        assert_eq!(classify_complexity("nice place", &[]), Complexity::Simple);
    }

    #[test]
    fn factual_question_is_standard() {
        assert_eq!(
            classify_complexity("what time does the hammam open", &[Topic::Hours]),
            Complexity::Standard
        );
    }

    #[test]
    fn budget_maps_to_config() {
        let budgets = TokenBudgets::default();
        assert_eq!(Complexity::Simple.budget(&budgets), 150);
        assert_eq!(Complexity::Complex.budget(&budgets), 600);
    }
}
