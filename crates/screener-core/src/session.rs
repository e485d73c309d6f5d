//! The central state object.
//!
//! `Session` owns the Upload Coordinator, the Conversation Manager and the
//! current blocking notice. Every event the UI sees maps to exactly one method
//! here, so ordering rules live in one place and the UI only renders.

use crate::analysis::{AnalysisResult, AnalysisView};
use crate::conversation::{ConversationManager, QuestionRequest, ANALYSIS_READY};
use crate::document::{Document, Slot};
use crate::error::{Result, ScreenerError};
use crate::state::{Ticket, Turn};
use crate::upload::{UploadCoordinator, UploadRequest};

pub const UPLOAD_FAILED: &str = "Upload failed. Check backend terminal for errors.";

#[derive(Debug, Default)]
pub struct Session {
    uploads: UploadCoordinator,
    conversation: ConversationManager,
    notice: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_file(&mut self, slot: Slot, document: Document) {
        self.uploads.select_file(slot, document);
    }

    /// Start an upload, raising a notice if the selection is incomplete
    pub fn submit(&mut self) -> Result<Option<UploadRequest>> {
        self.uploads.submit().map_err(|e| self.raise(e))
    }

    pub fn finish_upload(&mut self, ticket: Ticket, outcome: Result<AnalysisResult>) {
        match self.uploads.complete(ticket, outcome) {
            None => {}
            Some(Ok(())) => self.conversation.announce(ANALYSIS_READY),
            Some(Err(e)) if e.is_remote() => {
                tracing::warn!(error = %e, "upload failed");
                self.notify(UPLOAD_FAILED);
            }
            Some(Err(e)) => {
                self.raise(e);
            }
        }
    }

    /// Ask a question, raising a notice if chat is not available yet
    pub fn ask(&mut self, text: &str) -> Result<Option<QuestionRequest>> {
        let ready = self.chat_enabled();
        self.conversation.ask(text, ready).map_err(|e| self.raise(e))
    }

    pub fn finish_question(&mut self, ticket: Ticket, outcome: Result<Option<String>>) {
        self.conversation.resolve(ticket, outcome);
    }

    /// Chat accepts questions only with an analysis and no upload running
    pub fn chat_enabled(&self) -> bool {
        self.uploads.result().is_some() && !self.uploads.is_in_flight()
    }

    /// Show the user a notice for an error, handing the error back
    pub fn raise(&mut self, error: ScreenerError) -> ScreenerError {
        tracing::info!(error = %error, "notice raised");
        self.notice = Some(error.notice());
        error
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.uploads.result()
    }

    pub fn analysis_view(&self) -> AnalysisView {
        AnalysisView::derive(self.uploads.result())
    }

    pub fn selection(&self, slot: Slot) -> Option<&Document> {
        self.uploads.selection(slot)
    }

    pub fn is_uploading(&self) -> bool {
        self.uploads.is_in_flight()
    }

    pub fn is_answer_pending(&self) -> bool {
        self.conversation.is_pending()
    }

    pub fn transcript(&self) -> &[Turn] {
        self.conversation.transcript()
    }
}
