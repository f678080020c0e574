//! Word-selection quiz
//!
//! Every affirming word has to be picked before the first gate opens.
//! Rejecting words only ever shake.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::consts::QUIZ_STAGGER_MS;

/// Whether a word counts toward completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Affirming,
    Rejecting,
}

impl Polarity {
    /// CSS modifier used on the quiz button
    pub fn css_modifier(&self) -> &'static str {
        match self {
            Polarity::Affirming => "positive",
            Polarity::Rejecting => "negative",
        }
    }
}

/// A single quiz word
#[derive(Debug, Clone)]
pub struct QuizItem {
    pub label: String,
    pub polarity: Polarity,
    /// Only ever set on affirming items
    pub selected: bool,
}

/// Outcome of clicking a quiz item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizClick {
    /// Affirming item newly selected, more remain
    Selected { remaining: usize },
    /// Last affirming item selected; reported exactly once
    Completed,
    /// Affirming item that was already selected
    AlreadySelected,
    /// Rejecting item: transient penalty only
    Rejected,
    /// No item at that index
    Missing,
}

/// Quiz state
#[derive(Debug, Clone)]
pub struct Quiz {
    items: Vec<QuizItem>,
    selected: usize,
    total_affirming: usize,
}

impl Quiz {
    /// Build the quiz from both word lists, shuffled once
    pub fn new<R: Rng + ?Sized>(affirming: &[String], rejecting: &[String], rng: &mut R) -> Self {
        let mut items: Vec<QuizItem> = affirming
            .iter()
            .map(|w| (w, Polarity::Affirming))
            .chain(rejecting.iter().map(|w| (w, Polarity::Rejecting)))
            .map(|(label, polarity)| QuizItem {
                label: label.clone(),
                polarity,
                selected: false,
            })
            .collect();
        items.shuffle(rng);

        Self {
            items,
            selected: 0,
            total_affirming: affirming.len(),
        }
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn selected_count(&self) -> usize {
        self.selected
    }

    pub fn total_affirming(&self) -> usize {
        self.total_affirming
    }

    pub fn is_complete(&self) -> bool {
        self.selected >= self.total_affirming
    }

    /// Entrance animation delay for the button at `index`
    pub fn stagger_delay_ms(index: usize) -> u32 {
        index as u32 * QUIZ_STAGGER_MS
    }

    /// Handle a click on the item at `index`.
    ///
    /// The per-item `selected` flag is the only guard: the counter never
    /// decreases, so the threshold is crossed at most once.
    pub fn click(&mut self, index: usize) -> QuizClick {
        let Some(item) = self.items.get_mut(index) else {
            return QuizClick::Missing;
        };

        match item.polarity {
            Polarity::Rejecting => QuizClick::Rejected,
            Polarity::Affirming if item.selected => QuizClick::AlreadySelected,
            Polarity::Affirming => {
                item.selected = true;
                self.selected += 1;
                log::debug!("Quiz: '{}' selected ({}/{})", item.label, self.selected, self.total_affirming);
                if self.selected == self.total_affirming {
                    QuizClick::Completed
                } else {
                    QuizClick::Selected {
                        remaining: self.total_affirming - self.selected,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_rng;
    use proptest::prelude::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn small_quiz(seed: u64) -> Quiz {
        let mut rng = session_rng(seed);
        Quiz::new(&words(&["Kind", "Brave", "Sweet"]), &words(&["Boring", "Ugly"]), &mut rng)
    }

    fn indices_of(quiz: &Quiz, polarity: Polarity) -> Vec<usize> {
        quiz.items()
            .iter()
            .enumerate()
            .filter(|(_, item)| item.polarity == polarity)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_quiz_contains_every_word_once() {
        let quiz = small_quiz(7);
        assert_eq!(quiz.items().len(), 5);
        let mut labels: Vec<&str> = quiz.items().iter().map(|i| i.label.as_str()).collect();
        labels.sort();
        assert_eq!(labels, vec!["Boring", "Brave", "Kind", "Sweet", "Ugly"]);
        assert_eq!(quiz.total_affirming(), 3);
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let a: Vec<String> = small_quiz(42).items().iter().map(|i| i.label.clone()).collect();
        let b: Vec<String> = small_quiz(42).items().iter().map(|i| i.label.clone()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reselect_is_noop() {
        let mut quiz = small_quiz(1);
        let first = indices_of(&quiz, Polarity::Affirming)[0];
        assert_eq!(quiz.click(first), QuizClick::Selected { remaining: 2 });
        assert_eq!(quiz.click(first), QuizClick::AlreadySelected);
        assert_eq!(quiz.selected_count(), 1);
    }

    #[test]
    fn test_rejecting_never_counts() {
        let mut quiz = small_quiz(3);
        let bad = indices_of(&quiz, Polarity::Rejecting)[0];
        for _ in 0..10 {
            assert_eq!(quiz.click(bad), QuizClick::Rejected);
        }
        assert_eq!(quiz.selected_count(), 0);
        assert!(!quiz.items()[bad].selected);
    }

    #[test]
    fn test_out_of_range_click() {
        let mut quiz = small_quiz(3);
        assert_eq!(quiz.click(99), QuizClick::Missing);
    }

    #[test]
    fn test_stagger_delay() {
        assert_eq!(Quiz::stagger_delay_ms(0), 0);
        assert_eq!(Quiz::stagger_delay_ms(10), 300);
    }

    proptest! {
        #[test]
        fn completion_fires_once_on_last_affirming(seed in any::<u64>(), clicks in prop::collection::vec(0usize..25, 0..200)) {
            let settings = crate::Settings::default();
            let mut rng = session_rng(seed);
            let mut quiz = Quiz::new(&settings.affirming_words, &settings.rejecting_words, &mut rng);

            // Arbitrary clicks first, then sweep every item so completion must happen.
            let sweep: Vec<usize> = (0..quiz.items().len()).collect();
            let mut completions = 0;
            for index in clicks.into_iter().chain(sweep) {
                let was_unselected_affirming = quiz.items()[index].polarity == Polarity::Affirming
                    && !quiz.items()[index].selected;
                let before = quiz.selected_count();
                match quiz.click(index) {
                    QuizClick::Completed => {
                        completions += 1;
                        prop_assert!(was_unselected_affirming);
                        prop_assert_eq!(before + 1, quiz.total_affirming());
                    }
                    QuizClick::Selected { .. } => prop_assert!(!quiz.is_complete()),
                    _ => prop_assert_eq!(before, quiz.selected_count()),
                }
            }
            prop_assert_eq!(completions, 1);
            prop_assert!(quiz.is_complete());
        }
    }
}
