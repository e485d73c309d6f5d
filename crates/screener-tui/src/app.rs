use std::path::PathBuf;
use std::sync::Arc;

use screener_core::{
    Document, QuestionRequest, ScreenerError, ScreeningBackend, Session, Slot, UploadRequest,
};
use tokio::sync::mpsc;

use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    ResumePath,
    JdPath,
    Question,
}

impl FocusPane {
    pub fn next(self) -> Self {
        match self {
            FocusPane::ResumePath => FocusPane::JdPath,
            FocusPane::JdPath => FocusPane::Question,
            FocusPane::Question => FocusPane::ResumePath,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusPane::ResumePath => FocusPane::Question,
            FocusPane::JdPath => FocusPane::ResumePath,
            FocusPane::Question => FocusPane::JdPath,
        }
    }

    /// Upload slot edited by this pane, if any
    pub fn slot(self) -> Option<Slot> {
        match self {
            FocusPane::ResumePath => Some(Slot::Resume),
            FocusPane::JdPath => Some(Slot::JobDescription),
            FocusPane::Question => None,
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Editable text with a cursor counted in characters
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// (line, column) of the cursor, both counted from zero
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before: String = self.text.chars().take(self.cursor).collect();
        let line = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0);
        (line, col)
    }
}

/// Expand a leading `~/` to the home directory
fn expand_path(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

pub struct App {
    pub should_quit: bool,
    pub focus: FocusPane,

    // Interaction state machine (uploads, transcript, notices)
    pub session: Session,

    // Input buffers
    pub resume_path: TextInput,
    pub jd_path: TextInput,
    pub question: TextInput,

    // Chat view: lines scrolled up from the bottom, and the last drawn size
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // Animation state
    pub animation_frame: u8,

    backend: Arc<dyn ScreeningBackend>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        backend: Arc<dyn ScreeningBackend>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            focus: FocusPane::ResumePath,

            session: Session::new(),

            resume_path: TextInput::default(),
            jd_path: TextInput::default(),
            question: TextInput::default(),

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,

            backend,
            events,
        }
    }

    pub fn path_input(&mut self, slot: Slot) -> &mut TextInput {
        match slot {
            Slot::Resume => &mut self.resume_path,
            Slot::JobDescription => &mut self.jd_path,
        }
    }

    /// Read the file named in a slot's path input; the result comes back as
    /// `AppEvent::FileLoaded`
    pub fn load_file(&self, slot: Slot) {
        let raw = match slot {
            Slot::Resume => self.resume_path.text.trim(),
            Slot::JobDescription => self.jd_path.text.trim(),
        };
        if raw.is_empty() {
            return;
        }

        let path = expand_path(raw);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = Document::load(&path).await;
            let _ = events.send(AppEvent::FileLoaded { slot, outcome });
        });
    }

    pub fn file_loaded(&mut self, slot: Slot, outcome: Result<Document, ScreenerError>) {
        match outcome {
            Ok(document) => self.session.select_file(slot, document),
            Err(e) => {
                tracing::warn!(slot = slot.field_name(), error = %e, "could not load file");
                self.session.raise(e);
            }
        }
    }

    /// Prefill a slot's path input and load it, used for CLI-provided files
    pub fn preselect(&mut self, slot: Slot, path: &str) {
        let input = self.path_input(slot);
        input.text = path.to_string();
        input.end();
        self.load_file(slot);
    }

    /// "Upload & Analyze"
    pub fn submit_upload(&mut self) {
        if let Ok(Some(request)) = self.session.submit() {
            self.dispatch_upload(request);
        }
    }

    /// Ask the question in the input buffer; the buffer is cleared once the
    /// question is accepted
    pub fn ask_question(&mut self) {
        if let Ok(Some(request)) = self.session.ask(&self.question.text) {
            self.question.clear();
            self.chat_scroll = 0;
            self.dispatch_question(request);
        }
    }

    fn dispatch_upload(&self, request: UploadRequest) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = backend.analyze(&request.resume, &request.jd).await;
            let _ = events.send(AppEvent::UploadFinished {
                ticket: request.ticket,
                outcome,
            });
        });
    }

    fn dispatch_question(&self, request: QuestionRequest) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = backend.ask(&request.question).await;
            let _ = events.send(AppEvent::AnswerFinished {
                ticket: request.ticket,
                outcome,
            });
        });
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_uploading() || self.session.is_answer_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_chat_up(&mut self) {
        let step = (self.chat_height / 2).max(1);
        self.chat_scroll = self.chat_scroll.saturating_add(step);
    }

    pub fn scroll_chat_down(&mut self) {
        let step = (self.chat_height / 2).max(1);
        self.chat_scroll = self.chat_scroll.saturating_sub(step);
    }
}
