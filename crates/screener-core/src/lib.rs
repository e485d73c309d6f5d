pub mod analysis;
pub mod client;
pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod session;
pub mod state;
pub mod upload;

// Re-export main types for convenience
pub use analysis::{score_label, AnalysisResult, AnalysisView};
pub use client::{HttpBackend, ScreeningBackend};
pub use config::{Config, Overrides, Settings};
pub use conversation::{ConversationManager, QuestionRequest};
pub use document::{Document, Slot};
pub use error::{NotReadyReason, Result, ScreenerError};
pub use session::Session;
pub use state::{Speaker, Ticket, Turn};
pub use upload::{UploadCoordinator, UploadRequest};
