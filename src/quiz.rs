//! Quiz question bank and per-connection session state.
//!
//! The bank is shared by every connection and only ever grows; the session
//! is owned by one connection and tracks the question awaiting an answer.

use rand::Rng;
use std::sync::Mutex;
use tracing::debug;

/// One quiz question with its expected answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub text: String,
    pub answer: String,
}

impl QuizQuestion {
    pub fn new(text: &str, answer: &str) -> Self {
        QuizQuestion {
            text: text.to_string(),
            answer: answer.to_string(),
        }
    }

    /// Whitespace-trimmed, case-insensitive answer check
    pub fn accepts(&self, given: &str) -> bool {
        given.trim().to_lowercase() == self.answer.trim().to_lowercase()
    }
}

/// Process-wide growable collection of quiz questions
pub struct QuestionBank {
    questions: Mutex<Vec<QuizQuestion>>,
}

impl QuestionBank {
    /// Create a bank preloaded with the starter questions
    pub fn with_defaults() -> Self {
        let bank = QuestionBank::from_questions(vec![
            QuizQuestion::new("What is 2+2?", "4"),
            QuizQuestion::new("What is the capital of France?", "Paris"),
        ]);
        debug!(count = bank.len(), "Question bank seeded");
        bank
    }

    /// Create an empty bank
    pub fn empty() -> Self {
        QuestionBank::from_questions(Vec::new())
    }

    pub fn from_questions(questions: Vec<QuizQuestion>) -> Self {
        QuestionBank {
            questions: Mutex::new(questions),
        }
    }

    /// Number of questions currently in the bank
    pub fn len(&self) -> usize {
        self.questions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a question to the bank
    pub fn add(&self, question: QuizQuestion) {
        let mut questions = self.questions.lock().unwrap();
        questions.push(question);
        debug!(total = questions.len(), "Question added to bank");
    }

    /// Pick a question uniformly at random, if any exist
    pub fn pick(&self) -> Option<QuizQuestion> {
        let questions = self.questions.lock().unwrap();
        if questions.is_empty() {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..questions.len());
        Some(questions[idx].clone())
    }
}

/// Per-connection quiz state: the question awaiting an answer, if any
#[derive(Debug, Default)]
pub struct QuizSession {
    current: Option<QuizQuestion>,
}

impl QuizSession {
    pub fn new() -> Self {
        QuizSession { current: None }
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.current.as_ref()
    }

    /// Make `question` the outstanding question
    pub fn begin(&mut self, question: QuizQuestion) {
        self.current = Some(question);
    }

    /// Clear the outstanding question
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ignores_case_and_whitespace() {
        let q = QuizQuestion::new("What is the capital of France?", "Paris");
        assert!(q.accepts("Paris"));
        assert!(q.accepts("paris"));
        assert!(q.accepts("PARIS"));
        assert!(q.accepts("  pArIs  "));
        assert!(!q.accepts("London"));
        assert!(!q.accepts(""));
    }

    #[test]
    fn test_defaults_are_seeded() {
        let bank = QuestionBank::with_defaults();
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn test_add_grows_bank() {
        let bank = QuestionBank::empty();
        assert!(bank.is_empty());

        bank.add(QuizQuestion::new("Smallest prime?", "2"));
        assert_eq!(bank.len(), 1);

        bank.add(QuizQuestion::new("Largest planet?", "Jupiter"));
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn test_pick_from_empty_bank() {
        let bank = QuestionBank::empty();
        assert!(bank.pick().is_none());
    }

    #[test]
    fn test_pick_returns_member() {
        let bank = QuestionBank::from_questions(vec![
            QuizQuestion::new("a", "1"),
            QuizQuestion::new("b", "2"),
        ]);

        for _ in 0..20 {
            let q = bank.pick().unwrap();
            assert!(q.text == "a" || q.text == "b");
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = QuizSession::new();
        assert!(session.current().is_none());

        session.begin(QuizQuestion::new("What is 2+2?", "4"));
        assert_eq!(session.current().unwrap().text, "What is 2+2?");

        session.clear();
        assert!(session.current().is_none());
    }
}
