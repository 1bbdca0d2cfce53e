use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::Question;

/// How an option should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Neutral,
    /// Chosen by the user, before submission.
    Selected,
    /// The true answer, after submission.
    Correct,
    /// Chosen by the user and wrong, after submission.
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssessmentSummary {
    pub score: usize,
    pub total: usize,
    pub answered: usize,
    /// Seconds from the first question to submission; 0 while in progress.
    pub elapsed_secs: i64,
}

impl AssessmentSummary {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.score as f64 / self.total as f64 * 100.0
    }
}

/// Number of questions whose recorded answer equals the expected answer
/// exactly. Unanswered indices never count.
pub fn score(questions: &[Question], answers: &BTreeMap<usize, String>) -> usize {
    questions
        .iter()
        .enumerate()
        .filter(|(i, q)| answers.get(i).is_some_and(|a| *a == q.answer))
        .count()
}

pub struct AssessmentSession {
    pub company: String,
    questions: Vec<Question>,
    current: usize,
    answers: BTreeMap<usize, String>,
    submitted: bool,
    score: usize,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl AssessmentSession {
    /// Returns `None` for an empty question list; a session always has a
    /// current question.
    pub fn new(company: &str, questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            company: company.to_string(),
            questions,
            current: 0,
            answers: BTreeMap::new(),
            submitted: false,
            score: 0,
            started_at: Utc::now(),
            submitted_at: None,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Record `option` for question `index`. Ignored after submission, for an
    /// out-of-range index, or for a string that is not one of the options.
    pub fn select_option(&mut self, index: usize, option: &str) {
        if self.submitted {
            return;
        }
        let Some(q) = self.questions.get(index) else {
            return;
        };
        if !q.options.iter().any(|o| o == option) {
            return;
        }
        self.answers.insert(index, option.to_string());
    }

    /// Select the `option_idx`-th option of the current question.
    pub fn select_current(&mut self, option_idx: usize) {
        let Some(option) = self.current_question().options.get(option_idx).cloned() else {
            return;
        };
        self.select_option(self.current, &option);
    }

    /// Score the session. Only the first call has any effect; returns whether
    /// this call did the scoring.
    pub fn submit(&mut self) -> bool {
        if self.submitted {
            return false;
        }
        self.score = score(&self.questions, &self.answers);
        self.submitted = true;
        self.submitted_at = Some(Utc::now());
        tracing::info!(
            company = %self.company,
            score = self.score,
            total = self.questions.len(),
            elapsed_secs = self.summary().elapsed_secs,
            "assessment submitted"
        );
        true
    }

    /// Jump to `index`; out-of-range indices are ignored. Allowed after
    /// submission for review.
    pub fn navigate(&mut self, index: usize) {
        if index < self.questions.len() {
            self.current = index;
        }
    }

    pub fn next(&mut self) {
        self.navigate(self.current + 1);
    }

    pub fn prev(&mut self) {
        if let Some(i) = self.current.checked_sub(1) {
            self.navigate(i);
        }
    }

    pub fn option_mark(&self, index: usize, option_idx: usize) -> OptionMark {
        let Some(q) = self.questions.get(index) else {
            return OptionMark::Neutral;
        };
        let Some(option) = q.options.get(option_idx) else {
            return OptionMark::Neutral;
        };
        let chosen = self.answer_for(index) == Some(option.as_str());

        if !self.submitted {
            return if chosen {
                OptionMark::Selected
            } else {
                OptionMark::Neutral
            };
        }

        if *option == q.answer {
            OptionMark::Correct
        } else if chosen {
            OptionMark::Incorrect
        } else {
            OptionMark::Neutral
        }
    }

    /// Explanation for the current question, only once submitted.
    pub fn explanation(&self) -> Option<&str> {
        if self.submitted {
            Some(self.current_question().explanation.as_str())
        } else {
            None
        }
    }

    pub fn summary(&self) -> AssessmentSummary {
        AssessmentSummary {
            score: self.score,
            total: self.questions.len(),
            answered: self.answers.len(),
            elapsed_secs: self
                .submitted_at
                .map(|t| (t - self.started_at).num_seconds().max(0))
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str, options: &[&str], answer: &str) -> Question {
        Question {
            question: text.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            answer: answer.to_string(),
            explanation: format!("because {answer}"),
            category: "Quantitative".to_string(),
        }
    }

    fn two_plus_two() -> AssessmentSession {
        AssessmentSession::new("TCS", vec![q("2+2?", &["3", "4", "5"], "4")]).unwrap()
    }

    fn three_questions() -> AssessmentSession {
        AssessmentSession::new(
            "ZOHO",
            vec![
                q("a", &["x", "y"], "x"),
                q("b", &["x", "y"], "y"),
                q("c", &["Yes", "yes"], "Yes"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_session_rejected() {
        assert!(AssessmentSession::new("TCS", Vec::new()).is_none());
    }

    #[test]
    fn test_correct_answer_scores_one() {
        let mut s = two_plus_two();
        s.select_option(0, "4");
        assert!(s.submit());
        assert_eq!(s.score(), 1);
        assert_eq!(s.summary().total, 1);
    }

    #[test]
    fn test_unanswered_scores_zero_and_marks() {
        let mut s = two_plus_two();
        s.submit();
        assert_eq!(s.score(), 0);
        assert_eq!(s.option_mark(0, 1), OptionMark::Correct);
        assert_eq!(s.option_mark(0, 0), OptionMark::Neutral);
        assert_eq!(s.option_mark(0, 2), OptionMark::Neutral);
    }

    #[test]
    fn test_wrong_selection_marked_incorrect() {
        let mut s = two_plus_two();
        s.select_option(0, "5");
        s.submit();
        assert_eq!(s.option_mark(0, 2), OptionMark::Incorrect);
        assert_eq!(s.option_mark(0, 1), OptionMark::Correct);
    }

    #[test]
    fn test_marks_before_submit() {
        let mut s = two_plus_two();
        s.select_current(0);
        assert_eq!(s.option_mark(0, 0), OptionMark::Selected);
        assert_eq!(s.option_mark(0, 1), OptionMark::Neutral);
        assert_eq!(s.explanation(), None);
    }

    #[test]
    fn test_comparison_is_exact() {
        let mut s = three_questions();
        s.select_option(2, "yes");
        s.submit();
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_reselect_overwrites() {
        let mut s = three_questions();
        s.select_option(0, "y");
        s.select_option(0, "x");
        assert_eq!(s.answer_for(0), Some("x"));
        assert_eq!(s.answers().len(), 1);
    }

    #[test]
    fn test_select_after_submit_is_noop() {
        let mut s = three_questions();
        s.select_option(0, "x");
        s.submit();
        let before = s.answers().clone();
        s.select_option(0, "y");
        s.select_option(1, "y");
        s.select_current(1);
        assert_eq!(s.answers(), &before);
    }

    #[test]
    fn test_submit_only_once() {
        let mut s = three_questions();
        s.select_option(0, "x");
        assert!(s.submit());
        assert!(!s.submit());
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn test_select_ignores_unknown_option_and_index() {
        let mut s = three_questions();
        s.select_option(0, "z");
        s.select_option(9, "x");
        assert!(s.answers().is_empty());
    }

    #[test]
    fn test_navigate_bounds() {
        let mut s = three_questions();
        s.navigate(2);
        assert_eq!(s.current_index(), 2);
        s.navigate(3);
        assert_eq!(s.current_index(), 2);
        s.next();
        assert_eq!(s.current_index(), 2);
        s.navigate(0);
        s.prev();
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn test_review_navigation_after_submit() {
        let mut s = three_questions();
        s.submit();
        s.navigate(1);
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.explanation(), Some("because y"));
    }

    #[test]
    fn test_score_function_counts_matches() {
        let s = three_questions();
        let mut answers = BTreeMap::new();
        answers.insert(0, "x".to_string());
        answers.insert(1, "x".to_string());
        answers.insert(2, "Yes".to_string());
        assert_eq!(score(s.questions(), &answers), 2);
        assert_eq!(score(s.questions(), &BTreeMap::new()), 0);
    }

    #[test]
    fn test_summary_percent() {
        let mut s = three_questions();
        s.select_option(0, "x");
        s.select_option(1, "y");
        s.submit();
        let summary = s.summary();
        assert_eq!(summary.answered, 2);
        assert!((summary.percent() - 66.666).abs() < 0.01);
    }
}
