use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use screener_core::{AnalysisView, Document, Slot, Speaker};

use crate::app::{App, FocusPane, TextInput};

const SPINNER: [&str; 3] = ["·  ", "·· ", "···"];

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        if start > 0 {
            spans.push(Span::raw(rest[..start].to_string()));
        }
        if end > 0 {
            spans.push(Span::styled(
                after[..end].to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        rest = &after[end + 2..];
    }

    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }

    Line::from(spans)
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let view = app.session.analysis_view();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [left_area, chat_area] = Layout::horizontal([
        Constraint::Percentage(55),
        Constraint::Percentage(45),
    ])
    .areas(body_area);

    let [upload_area, analysis_area] = Layout::vertical([
        Constraint::Length(10),
        Constraint::Min(0),
    ])
    .areas(left_area);

    render_header(&view, frame, header_area);
    render_upload(app, frame, upload_area);
    render_analysis(&view, frame, analysis_area);
    render_chat(app, frame, chat_area);
    render_footer(app, frame, footer_area);

    if let Some(notice) = app.session.notice() {
        render_notice(notice, frame, area);
    }
}

fn render_header(view: &AnalysisView, frame: &mut Frame, area: Rect) {
    let stat = |label: &'static str, value: &str| {
        vec![
            Span::styled(
                value.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}   ", label), Style::default().fg(Color::DarkGray)),
        ]
    };

    let mut stats = vec![Span::raw(" ")];
    stats.extend(stat("Match", &view.score_text));
    stats.extend(stat("Strengths", &view.strengths_count));
    stats.extend(stat("Gaps", &view.gaps_count));

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                " Resume Screening Tool ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "upload a resume and a job description, then ask about the candidate",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(stats),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(header, area);
}

fn selection_line(document: Option<&Document>) -> Line<'static> {
    match document {
        Some(doc) => Line::from(Span::styled(
            format!("  ✓ {} ({} bytes)", doc.name(), doc.size()),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(Span::styled(
            "  no file selected",
            Style::default().fg(Color::DarkGray),
        )),
    }
}

fn render_upload(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = matches!(app.focus, FocusPane::ResumePath | FocusPane::JdPath);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(" Upload Files ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [resume_label, resume_input, resume_status, jd_label, jd_input, jd_status, _, button] =
        Layout::vertical([Constraint::Length(1); 8]).areas(inner);

    for (slot, label_area, input_area, status_area) in [
        (Slot::Resume, resume_label, resume_input, resume_status),
        (Slot::JobDescription, jd_label, jd_input, jd_status),
    ] {
        let label = Paragraph::new(format!(
            "{} path (PDF/TXT), Enter to select",
            slot.display_name()
        ))
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(label, label_area);

        let pane_focused = app.focus.slot() == Some(slot);
        let input = match slot {
            Slot::Resume => &app.resume_path,
            Slot::JobDescription => &app.jd_path,
        };
        render_single_line_input(frame, input, input_area, pane_focused);

        let status = Paragraph::new(selection_line(app.session.selection(slot)));
        frame.render_widget(status, status_area);
    }

    let button_text = if app.session.is_uploading() {
        Span::styled(
            format!("[ Analyzing{} ]", SPINNER[app.animation_frame as usize % SPINNER.len()]),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(
            "[ Upload & Analyze ]  Ctrl+U",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(button_text)), button);
}

/// One-line input with horizontal scrolling to keep the cursor visible
fn render_single_line_input(frame: &mut Frame, input: &TextInput, area: Rect, focused: bool) {
    let prefix = "> ";
    let width = (area.width as usize).saturating_sub(prefix.len()).max(1);
    let offset = (input.cursor + 1).saturating_sub(width);
    let visible: String = input.text.chars().skip(offset).take(width).collect();

    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::DarkGray)),
        Span::styled(visible, style),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    if focused {
        let cursor_x = (input.cursor - offset + prefix.len()) as u16;
        frame.set_cursor_position((area.x + cursor_x, area.y));
    }
}

fn pills(items: &[String], color: Color, placeholder: Option<&'static str>) -> Line<'static> {
    if let Some(text) = placeholder {
        return Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)));
    }

    let mut spans = Vec::with_capacity(items.len() * 2);
    for item in items {
        spans.push(Span::styled(
            format!(" {} ", item),
            Style::default().fg(Color::Black).bg(color),
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn render_analysis(view: &AnalysisView, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(false))
        .title(" Match Analysis ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.is_empty {
        let empty = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                "No analysis yet",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Upload a resume and JD to see score, strengths, gaps and insights.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .centered()
        .wrap(Wrap { trim: true });
        frame.render_widget(empty, inner);
        return;
    }

    let mut insight_lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Key Insights",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    insight_lines.extend(view.insights.iter().map(|i| Line::from(format!("• {}", i))));
    let insights = Paragraph::new(insight_lines).wrap(Wrap { trim: true });
    let insights_height = insights.line_count(inner.width) as u16;

    let [score_area, bar_area, insights_area, lists_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(insights_height),
        Constraint::Min(0),
    ])
    .areas(inner);

    let score = Paragraph::new(Line::from(vec![
        Span::styled(
            view.score_text.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(view.score_label, Style::default().fg(Color::Cyan)),
    ]));
    frame.render_widget(score, score_area);

    let bar = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .percent(view.bar_percent)
        .label("");
    frame.render_widget(bar, bar_area);

    frame.render_widget(insights, insights_area);

    let [strengths_area, gaps_area] = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .areas(lists_area);

    let strengths = Paragraph::new(vec![
        Line::from(Span::styled(
            "✓ Strengths",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        pills(&view.strengths, Color::Green, view.strengths_placeholder()),
    ])
    .wrap(Wrap { trim: false });
    frame.render_widget(strengths, strengths_area);

    let gaps = Paragraph::new(vec![
        Line::from(Span::styled(
            "✗ Gaps",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        pills(&view.gaps, Color::Red, view.gaps_placeholder()),
    ])
    .wrap(Wrap { trim: false });
    frame.render_widget(gaps, gaps_area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let input_lines = app.question.text.split('\n').count().clamp(1, 4) as u16;
    let [history_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(input_lines + 2),
    ])
    .areas(area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = history_area.height.saturating_sub(2);
    app.chat_width = history_area.width.saturating_sub(2);

    let mut lines: Vec<Line> = Vec::new();
    for turn in app.session.transcript() {
        let color = match turn.speaker {
            Speaker::User => Color::Cyan,
            Speaker::System => Color::Yellow,
        };
        lines.push(Line::from(Span::styled(
            format!("{}:", turn.speaker.label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for line in turn.text.lines() {
            lines.push(parse_markdown_line(line));
        }
        lines.push(Line::default());
    }

    if app.session.is_answer_pending() {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let history = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });

    // Stick to the bottom unless the user scrolled up
    let total = u16::try_from(history.line_count(app.chat_width)).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(app.chat_height);
    app.chat_scroll = app.chat_scroll.min(max_scroll);
    let scroll = max_scroll - app.chat_scroll;

    let history = history
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(false))
                .title(" Ask Questions About This Candidate "),
        )
        .scroll((scroll, 0));
    frame.render_widget(history, history_area);

    let focused = app.focus == FocusPane::Question;
    let placeholder = if app.session.chat_enabled() {
        "Type your question and press Enter…"
    } else {
        "Upload first to enable chat…"
    };
    let title = if app.session.is_answer_pending() {
        " Question (waiting…) "
    } else {
        " Question "
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(title);

    let (cursor_line, cursor_col) = app.question.cursor_line_col();
    let line_offset = (cursor_line + 1).saturating_sub(input_lines as usize);

    let input = if app.question.text.is_empty() {
        Paragraph::new(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(app.question.text.as_str())
            .style(Style::default().fg(Color::Cyan))
            .scroll((line_offset as u16, 0))
    };
    frame.render_widget(input.block(input_block), input_area);

    if focused {
        let max_col = input_area.width.saturating_sub(3) as usize;
        frame.set_cursor_position((
            input_area.x + 1 + cursor_col.min(max_col) as u16,
            input_area.y + 1 + (cursor_line - line_offset) as u16,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.focus {
        FocusPane::ResumePath | FocusPane::JdPath => {
            "Tab: next field │ Enter: select file │ Ctrl+U: upload & analyze │ Ctrl+C: quit"
        }
        FocusPane::Question => {
            "Tab: next │ Enter: ask │ Alt/Shift+Enter: newline │ PgUp/PgDn: scroll │ Ctrl+C: quit"
        }
    };
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_notice(notice: &str, frame: &mut Frame, area: Rect) {
    // Calculate popup size and position (centered)
    let popup_width = 56.min(area.width.saturating_sub(4));
    let popup_height = 7.min(area.height);

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let body = Paragraph::new(vec![
        Line::from(notice.to_string()),
        Line::default(),
        Line::from(Span::styled(
            "Press Enter or Esc to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Notice "),
    );

    frame.render_widget(body, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use ratatui::{backend::TestBackend, Terminal};
    use screener_core::{AnalysisResult, ScreeningBackend};
    use tokio::sync::mpsc;

    struct Offline;

    #[async_trait]
    impl ScreeningBackend for Offline {
        async fn analyze(
            &self,
            _: &Document,
            _: &Document,
        ) -> screener_core::Result<AnalysisResult> {
            unreachable!("render tests never dispatch")
        }

        async fn ask(&self, _: &str) -> screener_core::Result<Option<String>> {
            unreachable!("render tests never dispatch")
        }
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(Arc::new(Offline), tx)
    }

    #[test]
    fn test_parse_markdown_bold() {
        let line = parse_markdown_line("has **5 years** of SQL");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "5 years");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));

        let unclosed = parse_markdown_line("a **b");
        assert_eq!(unclosed.spans.len(), 1);
        assert_eq!(unclosed.spans[0].content, "a **b");
    }

    #[test]
    fn test_empty_state_rendered() {
        let mut app = app();
        let screen = draw(&mut app);
        assert!(screen.contains("No analysis yet"));
        assert!(screen.contains("Upload a resume + job description"));
    }

    #[test]
    fn test_analysis_panel_rendered() {
        let mut app = app();
        app.session.select_file(Slot::Resume, Document::new("cv.pdf", "cv"));
        app.session.select_file(Slot::JobDescription, Document::new("jd.pdf", "jd"));
        let request = app.session.submit().unwrap().unwrap();
        app.session.finish_upload(
            request.ticket,
            Ok(AnalysisResult::new(
                72,
                vec!["Python".to_string(), "SQL".to_string()],
                Vec::new(),
                Vec::new(),
            )),
        );

        let screen = draw(&mut app);
        assert!(screen.contains("72%"));
        assert!(screen.contains("Good match"));
        assert!(screen.contains(" Python "));
        assert!(screen.contains(" SQL "));
        assert!(screen.contains("No gaps detected."));
    }

    fn analyzed_app(insights: Vec<String>) -> App {
        let mut app = app();
        app.session.select_file(Slot::Resume, Document::new("cv.pdf", "cv"));
        app.session.select_file(Slot::JobDescription, Document::new("jd.pdf", "jd"));
        let request = app.session.submit().unwrap().unwrap();
        app.session.finish_upload(
            request.ticket,
            Ok(AnalysisResult::new(64, Vec::new(), Vec::new(), insights)),
        );
        app
    }

    #[test]
    fn test_long_answer_tail_is_visible() {
        let mut app = analyzed_app(Vec::new());
        let request = app.session.ask("Summarize the candidate").unwrap().unwrap();
        let words = vec!["abcdefghijklmnopqrstuvwxyzabcd"; 30].join(" ");
        let answer = format!("{} ENDMARKER", words);
        app.session.finish_question(request.ticket, Ok(Some(answer)));

        let screen = draw(&mut app);
        assert!(screen.contains("ENDMARKER"));
    }

    #[test]
    fn test_wrapped_insights_all_visible() {
        let filler = "the candidate lists several overlapping responsibilities across roles ";
        let insights = (1..=6)
            .map(|n| format!("{}{}INSIGHT{}", filler, filler, n))
            .collect();
        let mut app = analyzed_app(insights);

        let screen = draw(&mut app);
        assert!(screen.contains("INSIGHT1"));
        assert!(screen.contains("INSIGHT6"));
    }

    #[test]
    fn test_notice_popup_rendered() {
        let mut app = app();
        let _ = app.session.submit();
        let screen = draw(&mut app);
        assert!(screen.contains("Notice"));
        assert!(screen.contains("Please choose both Resume"));
    }
}
