//! Conversation Manager: the transcript and the single outstanding question.

use crate::error::{NotReadyReason, Result, ScreenerError};
use crate::state::{Ticket, TicketCounter, Turn};

pub const GREETING: &str =
    "Upload a resume + job description, then ask me questions about the candidate.";
pub const ANALYSIS_READY: &str = "Analysis ready. Ask anything about this candidate!";
pub const NO_ANSWER: &str = "No answer returned.";
pub const ANSWER_FAILED: &str =
    "I couldn't answer that due to an error. Check backend terminal.";

/// One question to hand to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub ticket: Ticket,
    pub question: String,
}

#[derive(Debug)]
pub struct ConversationManager {
    transcript: Vec<Turn>,
    pending: Option<Ticket>,
    tickets: TicketCounter,
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationManager {
    pub fn new() -> Self {
        Self {
            transcript: vec![Turn::system(GREETING)],
            pending: None,
            tickets: TicketCounter::default(),
        }
    }

    /// Submit a question.
    ///
    /// Blank input is ignored with `Ok(None)`. Otherwise the user turn is
    /// appended before returning, and the caller must dispatch the request.
    pub fn ask(&mut self, text: &str, analysis_ready: bool) -> Result<Option<QuestionRequest>> {
        let question = text.trim();
        if question.is_empty() {
            return Ok(None);
        }

        if !analysis_ready {
            return Err(ScreenerError::NotReady(NotReadyReason::NoAnalysis));
        }
        if self.pending.is_some() {
            return Err(ScreenerError::NotReady(NotReadyReason::AnswerPending));
        }

        let ticket = self.tickets.issue();
        self.transcript.push(Turn::user(question));
        self.pending = Some(ticket);
        tracing::info!(%ticket, chars = question.len(), "question submitted");

        Ok(Some(QuestionRequest {
            ticket,
            question: question.to_string(),
        }))
    }

    /// Append the system turn answering the pending question.
    ///
    /// Returns false if the ticket is stale and nothing was appended.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<Option<String>>) -> bool {
        if self.pending != Some(ticket) {
            tracing::warn!(%ticket, pending = ?self.pending, "dropping stale answer");
            return false;
        }
        self.pending = None;

        let text = match outcome {
            Ok(Some(answer)) if !answer.trim().is_empty() => answer,
            Ok(_) => {
                tracing::debug!(%ticket, "answer missing, using fallback");
                NO_ANSWER.to_string()
            }
            Err(e) => {
                tracing::warn!(%ticket, error = %e, "question failed");
                ANSWER_FAILED.to_string()
            }
        };
        self.transcript.push(Turn::system(text));
        true
    }

    /// Append a system turn not tied to any question
    pub fn announce(&mut self, text: impl Into<String>) {
        self.transcript.push(Turn::system(text));
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ticket, Speaker};

    #[test]
    fn test_seeded_with_greeting() {
        let chat = ConversationManager::new();
        assert_eq!(chat.transcript(), [Turn::system(GREETING)]);
        assert!(!chat.is_pending());
    }

    #[test]
    fn test_blank_question_ignored() {
        let mut chat = ConversationManager::new();
        assert_eq!(chat.ask("   \n\t", true).unwrap(), None);
        assert_eq!(chat.transcript().len(), 1);
        assert!(!chat.is_pending());
    }

    #[test]
    fn test_question_before_analysis_refused() {
        let mut chat = ConversationManager::new();
        let err = chat.ask("Does the candidate know React?", false).unwrap_err();
        assert!(matches!(err, ScreenerError::NotReady(NotReadyReason::NoAnalysis)));
        assert_eq!(chat.transcript().len(), 1);
    }

    #[test]
    fn test_user_turn_appended_before_answer() {
        let mut chat = ConversationManager::new();
        let request = chat.ask("  Can they lead a team?  ", true).unwrap().unwrap();

        assert_eq!(request.question, "Can they lead a team?");
        assert_eq!(chat.transcript().last(), Some(&Turn::user("Can they lead a team?")));
        assert!(chat.is_pending());
    }

    #[test]
    fn test_only_one_question_outstanding() {
        let mut chat = ConversationManager::new();
        chat.ask("first", true).unwrap().unwrap();
        let err = chat.ask("second", true).unwrap_err();
        assert!(matches!(err, ScreenerError::NotReady(NotReadyReason::AnswerPending)));
        assert_eq!(chat.transcript().len(), 2);
    }

    #[test]
    fn test_successful_round_trip_adds_two_turns() {
        let mut chat = ConversationManager::new();
        let before = chat.transcript().len();
        let request = chat.ask("Knows SQL?", true).unwrap().unwrap();
        assert!(chat.resolve(request.ticket, Ok(Some("Yes, 5 years.".into()))));

        assert_eq!(
            &chat.transcript()[before..],
            [Turn::user("Knows SQL?"), Turn::system("Yes, 5 years.")]
        );
        assert!(!chat.is_pending());
    }

    #[test]
    fn test_missing_answer_uses_fallback() {
        let mut chat = ConversationManager::new();
        let request = chat.ask("Anything?", true).unwrap().unwrap();
        chat.resolve(request.ticket, Ok(None));
        assert_eq!(chat.transcript().last().unwrap().text, NO_ANSWER);

        let request = chat.ask("Again?", true).unwrap().unwrap();
        chat.resolve(request.ticket, Ok(Some(String::new())));
        assert_eq!(chat.transcript().last().unwrap().text, NO_ANSWER);
    }

    #[test]
    fn test_failed_round_trip_appends_error_turn() {
        let mut chat = ConversationManager::new();
        let before = chat.transcript().len();
        let request = chat.ask("Knows Rust?", true).unwrap().unwrap();
        chat.resolve(
            request.ticket,
            Err(ScreenerError::Status {
                endpoint: "/chat".into(),
                status: 502,
                body: String::new(),
            }),
        );

        let added = &chat.transcript()[before..];
        assert_eq!(added, [Turn::user("Knows Rust?"), Turn::system(ANSWER_FAILED)]);
        assert!(!chat.is_pending());
        // Recoverable: the next question goes through
        assert!(chat.ask("Knows Go?", true).unwrap().is_some());
    }

    #[test]
    fn test_stale_answer_dropped() {
        let mut chat = ConversationManager::new();
        let request = chat.ask("q", true).unwrap().unwrap();
        assert!(!chat.resolve(ticket(request.ticket.get() + 1), Ok(Some("late".into()))));
        assert!(chat.is_pending());
        assert_eq!(chat.transcript().last().unwrap().speaker, Speaker::User);
    }
}
