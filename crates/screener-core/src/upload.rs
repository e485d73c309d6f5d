//! Upload Coordinator: the two file slots and the analysis they produce.

use crate::analysis::AnalysisResult;
use crate::document::{Document, Slot};
use crate::error::{Result, ScreenerError};
use crate::state::{Ticket, TicketCounter};

pub const MISSING_FILES: &str = "Please choose both Resume and Job Description files.";

/// One upload to hand to the backend
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub ticket: Ticket,
    pub resume: Document,
    pub jd: Document,
}

#[derive(Debug, Default)]
pub struct UploadCoordinator {
    resume: Option<Document>,
    jd: Option<Document>,
    in_flight: Option<Ticket>,
    result: Option<AnalysisResult>,
    tickets: TicketCounter,
}

impl UploadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection for a slot. A displayed result stays until the
    /// next submit.
    pub fn select_file(&mut self, slot: Slot, document: Document) {
        tracing::info!(slot = slot.field_name(), name = document.name(), "file selected");
        match slot {
            Slot::Resume => self.resume = Some(document),
            Slot::JobDescription => self.jd = Some(document),
        }
    }

    pub fn selection(&self, slot: Slot) -> Option<&Document> {
        match slot {
            Slot::Resume => self.resume.as_ref(),
            Slot::JobDescription => self.jd.as_ref(),
        }
    }

    /// Start an upload.
    ///
    /// Returns `Ok(None)` while another upload is in flight. On success the
    /// previous result is cleared and the caller must dispatch the request.
    pub fn submit(&mut self) -> Result<Option<UploadRequest>> {
        if let Some(ticket) = self.in_flight {
            tracing::debug!(%ticket, "submit ignored, upload already in flight");
            return Ok(None);
        }

        let (Some(resume), Some(jd)) = (&self.resume, &self.jd) else {
            return Err(ScreenerError::Validation(MISSING_FILES.to_string()));
        };

        let ticket = self.tickets.issue();
        let request = UploadRequest {
            ticket,
            resume: resume.clone(),
            jd: jd.clone(),
        };

        self.in_flight = Some(ticket);
        self.result = None;
        tracing::info!(%ticket, resume = resume.name(), jd = jd.name(), "upload submitted");

        Ok(Some(request))
    }

    /// Apply the backend's answer to an upload.
    ///
    /// Returns `None` for a stale ticket, otherwise whether the analysis was
    /// stored.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult>,
    ) -> Option<Result<()>> {
        if self.in_flight != Some(ticket) {
            tracing::warn!(%ticket, in_flight = ?self.in_flight, "dropping stale upload response");
            return None;
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                tracing::info!(%ticket, score = result.match_score(), "analysis stored");
                self.result = Some(result);
                Some(Ok(()))
            }
            Err(e) => {
                tracing::warn!(%ticket, error = %e, "upload failed");
                self.result = None;
                Some(Err(e))
            }
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}
