// src/session.rs

//! Client-side test session state machine.
//!
//! The server stays stateless about in-flight tests; this models what a
//! test-taking client holds between fetching questions and submitting. It
//! is deliberately pure (the caller supplies timestamps and drives the
//! one-second tick) so the whole lifecycle is testable without a clock.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

use crate::models::question::PublicQuestion;
use crate::models::test_result::{SubmitTestRequest, SubmittedAnswer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    AlreadyStarted,
    NotStarted,
    PaymentRequired,
    NoDomainSelected,
    EmptyQuestionSet,
    UnknownQuestion(i64),
    InvalidOption(String),
    AnswerLocked(i64),
    AlreadySubmitted,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyStarted => write!(f, "Test already started"),
            SessionError::NotStarted => write!(f, "Test has not started"),
            SessionError::PaymentRequired => write!(f, "Payment required before starting"),
            SessionError::NoDomainSelected => write!(f, "A domain must be selected"),
            SessionError::EmptyQuestionSet => write!(f, "No questions available"),
            SessionError::UnknownQuestion(id) => write!(f, "Unknown question id {}", id),
            SessionError::InvalidOption(label) => write!(f, "Invalid option '{}'", label),
            SessionError::AnswerLocked(id) => write!(f, "Answer for question {} is locked", id),
            SessionError::AlreadySubmitted => write!(f, "Test already submitted"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Result of advancing the countdown by one second.
#[derive(Debug)]
pub enum Tick {
    Running { remaining_seconds: u32 },
    /// The timer hit zero; the session auto-submitted whatever was
    /// answered so far.
    Expired(SessionSummary),
}

/// Everything the client needs to post to the submit endpoint.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub domain: String,
    pub answers: Vec<SubmittedAnswer>,
    pub time_taken: i64,
    pub started_on: DateTime<Utc>,
    pub completed_on: DateTime<Utc>,
}

impl SessionSummary {
    pub fn into_request(self, student_name: &str, email: &str) -> SubmitTestRequest {
        SubmitTestRequest {
            student_name: student_name.to_string(),
            email: email.to_string(),
            domain: self.domain,
            questions: self.answers,
            time_taken: self.time_taken,
            started_on: self.started_on,
            completed_on: self.completed_on,
        }
    }
}

pub struct TestSession {
    domain: String,
    questions: Vec<PublicQuestion>,
    /// question id -> locked option label.
    selections: HashMap<i64, String>,
    current: usize,
    duration_seconds: u32,
    remaining_seconds: u32,
    state: SessionState,
    started_on: Option<DateTime<Utc>>,
}

impl TestSession {
    pub fn new(
        domain: impl Into<String>,
        questions: Vec<PublicQuestion>,
        duration_seconds: u32,
    ) -> Self {
        TestSession {
            domain: domain.into(),
            questions,
            selections: HashMap::new(),
            current: 0,
            duration_seconds,
            remaining_seconds: duration_seconds,
            state: SessionState::NotStarted,
            started_on: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn current_question(&self) -> Option<&PublicQuestion> {
        self.questions.get(self.current)
    }

    pub fn selected_option(&self, question_id: i64) -> Option<&str> {
        self.selections.get(&question_id).map(String::as_str)
    }

    /// Starts the countdown. Refused when the payment gate is closed, no
    /// domain was chosen, or the question set came back empty.
    pub fn start(&mut self, has_paid: bool, now: DateTime<Utc>) -> Result<(), SessionError> {
        match self.state {
            SessionState::NotStarted => {}
            SessionState::InProgress => return Err(SessionError::AlreadyStarted),
            SessionState::Submitted => return Err(SessionError::AlreadySubmitted),
        }
        if !has_paid {
            return Err(SessionError::PaymentRequired);
        }
        if self.domain.trim().is_empty() {
            return Err(SessionError::NoDomainSelected);
        }
        if self.questions.is_empty() {
            return Err(SessionError::EmptyQuestionSet);
        }

        self.state = SessionState::InProgress;
        self.remaining_seconds = self.duration_seconds;
        self.started_on = Some(now);
        Ok(())
    }

    /// Records an answer. First selection per question wins; once locked it
    /// cannot be changed.
    pub fn select_answer(&mut self, question_id: i64, option: &str) -> Result<(), SessionError> {
        match self.state {
            SessionState::InProgress => {}
            SessionState::NotStarted => return Err(SessionError::NotStarted),
            SessionState::Submitted => return Err(SessionError::AlreadySubmitted),
        }

        let question = self
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))?;
        if !question.options.contains_key(option) {
            return Err(SessionError::InvalidOption(option.to_string()));
        }
        if self.selections.contains_key(&question_id) {
            return Err(SessionError::AnswerLocked(question_id));
        }

        self.selections.insert(question_id, option.to_string());
        Ok(())
    }

    /// Moves to the next question. Navigation stays open after submission
    /// so the candidate can review.
    pub fn next(&mut self) {
        if self.state != SessionState::NotStarted && self.current + 1 < self.questions.len() {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.state != SessionState::NotStarted && self.current > 0 {
            self.current -= 1;
        }
    }

    /// Advances the countdown by one second. At zero the session submits
    /// itself with whatever was answered.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Tick, SessionError> {
        match self.state {
            SessionState::InProgress => {}
            SessionState::NotStarted => return Err(SessionError::NotStarted),
            SessionState::Submitted => return Err(SessionError::AlreadySubmitted),
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            return Ok(Tick::Expired(self.finish(now)));
        }
        Ok(Tick::Running {
            remaining_seconds: self.remaining_seconds,
        })
    }

    /// Manual submission. A second submit is refused rather than silently
    /// producing another payload.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<SessionSummary, SessionError> {
        match self.state {
            SessionState::InProgress => Ok(self.finish(now)),
            SessionState::NotStarted => Err(SessionError::NotStarted),
            SessionState::Submitted => Err(SessionError::AlreadySubmitted),
        }
    }

    fn finish(&mut self, now: DateTime<Utc>) -> SessionSummary {
        self.state = SessionState::Submitted;

        // Every question goes into the payload, answered or not, so the
        // server grades blanks as incorrect instead of ignoring them.
        let answers = self
            .questions
            .iter()
            .map(|q| SubmittedAnswer {
                question_id: q.id,
                selected_option: self.selections.get(&q.id).cloned(),
            })
            .collect();

        SessionSummary {
            domain: self.domain.clone(),
            answers,
            time_taken: (self.duration_seconds - self.remaining_seconds) as i64,
            started_on: self.started_on.unwrap_or(now),
            completed_on: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Difficulty;
    use sqlx::types::Json;
    use std::collections::BTreeMap;

    fn question(id: i64) -> PublicQuestion {
        let options: BTreeMap<String, String> = [("A", "first"), ("B", "second"), ("C", "third")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PublicQuestion {
            id,
            question: format!("Question {}", id),
            options: Json(options),
            category: "aptitude".to_string(),
            difficulty: Difficulty::Easy,
        }
    }

    fn started_session(count: i64, duration: u32) -> TestSession {
        let questions = (1..=count).map(question).collect();
        let mut session = TestSession::new("frontend", questions, duration);
        session.start(true, Utc::now()).unwrap();
        session
    }

    #[test]
    fn start_requires_payment() {
        let mut session = TestSession::new("frontend", vec![question(1)], 60);
        assert_eq!(session.start(false, Utc::now()), Err(SessionError::PaymentRequired));
        assert_eq!(session.state(), SessionState::NotStarted);
    }

    #[test]
    fn start_requires_a_domain_and_questions() {
        let mut session = TestSession::new("  ", vec![question(1)], 60);
        assert_eq!(session.start(true, Utc::now()), Err(SessionError::NoDomainSelected));

        let mut session = TestSession::new("frontend", vec![], 60);
        assert_eq!(session.start(true, Utc::now()), Err(SessionError::EmptyQuestionSet));
    }

    #[test]
    fn cannot_start_twice() {
        let mut session = started_session(2, 60);
        assert_eq!(session.start(true, Utc::now()), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn first_selection_locks_the_answer() {
        let mut session = started_session(2, 60);
        session.select_answer(1, "A").unwrap();

        assert_eq!(session.select_answer(1, "B"), Err(SessionError::AnswerLocked(1)));
        assert_eq!(session.selected_option(1), Some("A"));
    }

    #[test]
    fn selections_validate_question_and_option() {
        let mut session = started_session(2, 60);
        assert_eq!(session.select_answer(99, "A"), Err(SessionError::UnknownQuestion(99)));
        assert_eq!(
            session.select_answer(1, "Z"),
            Err(SessionError::InvalidOption("Z".to_string()))
        );
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut session = started_session(3, 60);
        session.previous();
        assert_eq!(session.current_question().unwrap().id, 1);

        session.next();
        session.next();
        session.next();
        session.next();
        assert_eq!(session.current_question().unwrap().id, 3);
    }

    #[test]
    fn timer_expiry_auto_submits_partial_answers() {
        let mut session = started_session(3, 3);
        session.select_answer(1, "A").unwrap();

        let now = Utc::now();
        assert!(matches!(
            session.tick(now),
            Ok(Tick::Running { remaining_seconds: 2 })
        ));
        assert!(matches!(
            session.tick(now),
            Ok(Tick::Running { remaining_seconds: 1 })
        ));

        let summary = match session.tick(now) {
            Ok(Tick::Expired(summary)) => summary,
            other => panic!("expected expiry, got {:?}", other),
        };

        assert_eq!(session.state(), SessionState::Submitted);
        assert_eq!(summary.answers.len(), 3);
        assert_eq!(summary.answers[0].selected_option.as_deref(), Some("A"));
        assert_eq!(summary.answers[1].selected_option, None);
        assert_eq!(summary.time_taken, 3);
    }

    #[test]
    fn manual_submit_is_not_repeatable() {
        let mut session = started_session(2, 300);
        session.select_answer(1, "B").unwrap();

        let summary = session.submit(Utc::now()).unwrap();
        assert_eq!(summary.answers.len(), 2);
        assert!(matches!(
            session.submit(Utc::now()),
            Err(SessionError::AlreadySubmitted)
        ));
        assert_eq!(
            session.select_answer(2, "A"),
            Err(SessionError::AlreadySubmitted)
        );
    }

    #[test]
    fn review_navigation_stays_open_after_submit() {
        let mut session = started_session(3, 300);
        session.submit(Utc::now()).unwrap();

        session.next();
        assert_eq!(session.current_question().unwrap().id, 2);
    }

    #[test]
    fn summary_converts_into_a_submit_request() {
        let mut session = started_session(2, 300);
        session.select_answer(1, "C").unwrap();
        let request = session
            .submit(Utc::now())
            .unwrap()
            .into_request("Asha", "asha@example.com");

        assert_eq!(request.domain, "frontend");
        assert_eq!(request.email, "asha@example.com");
        assert_eq!(request.questions.len(), 2);
        assert_eq!(request.time_taken, 0);
    }
}
