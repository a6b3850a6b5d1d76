use std::mem;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::error::ValidationError;
use crate::mailer::{deliver, Delivery, OutgoingMail};
use crate::report::{club_subject, format_club_info, format_update_info, update_subject};
use crate::session::{Page, Session};

use super::forms::{FieldId, FormCursor, FormModel};
use super::helpers::{centered_rect, scroll_offset};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows moved by PageUp/PageDown inside the preview.
const PREVIEW_PAGE: u16 = 10;

const CREDENTIALS_WARNING: &str =
    "Email credentials not found. Please set EMAIL_USER and EMAIL_PASSWORD in the environment or config.toml.";
const ATTACHMENT_NOTE: &str = "Background image would be included in the email as an attachment.";
const EXAMPLE_BANNER: &str = "⚠️ You are in example mode. Submission is disabled. Press Ctrl+E to clear the example first.";

/// The two buttons on the landing page.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LandingChoice {
    NewClub,
    UpdateClub,
}

impl LandingChoice {
    fn page(self) -> Page {
        match self {
            LandingChoice::NewClub => Page::NewClub,
            LandingChoice::UpdateClub => Page::UpdateClub,
        }
    }

    fn other(self) -> Self {
        match self {
            LandingChoice::NewClub => LandingChoice::UpdateClub,
            LandingChoice::UpdateClub => LandingChoice::NewClub,
        }
    }
}

/// Fine-grained modes layered over the current page.
enum Mode {
    Normal,
    Preview(PreviewState),
}

/// The would-be email shown when nothing could be sent.
struct PreviewState {
    title: &'static str,
    body: String,
    has_attachment: bool,
    scroll: u16,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state for one user session.
pub struct App {
    config: MailConfig,
    today: NaiveDate,
    session: Session,
    landing_choice: LandingChoice,
    club_cursor: FormCursor,
    update_cursor: FormCursor,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(config: MailConfig, today: NaiveDate) -> Self {
        Self {
            config,
            today,
            session: Session::new(today),
            landing_choice: LandingChoice::NewClub,
            club_cursor: FormCursor::new(FieldId::ClubName),
            update_cursor: FormCursor::new(FieldId::Identifier),
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Preview(state) => self.handle_preview(code, state),
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Route one key press, including Ctrl shortcuts. Returns `true` when the
    /// user asked to quit.
    pub(crate) fn handle_key_event(&mut self, event: KeyEvent) -> Result<bool> {
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            match event.code {
                KeyCode::Char('c') => return Ok(true),
                KeyCode::Char('s') => self.handle_ctrl_s(),
                KeyCode::Char('e') => self.handle_ctrl_e(),
                _ => {}
            }
            return Ok(false);
        }
        self.handle_key(event.code)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match self.session.page {
            Page::Landing => match code {
                KeyCode::Char('q') | KeyCode::Esc => *exit = true,
                KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                    self.landing_choice = self.landing_choice.other();
                }
                KeyCode::Enter => self.open(self.landing_choice.page()),
                KeyCode::Char('n') => self.open(Page::NewClub),
                KeyCode::Char('u') => self.open(Page::UpdateClub),
                _ => {}
            },
            Page::NewClub => {
                if self.club_cursor.handle_key(&mut self.session.club, code) {
                    self.back();
                }
            }
            Page::UpdateClub => {
                if self.update_cursor.handle_key(&mut self.session.update, code) {
                    self.back();
                }
            }
        }
        Mode::Normal
    }

    fn handle_preview(&mut self, code: KeyCode, mut state: PreviewState) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => return Mode::Normal,
            KeyCode::Up => state.scroll = state.scroll.saturating_sub(1),
            KeyCode::Down => state.scroll = state.scroll.saturating_add(1),
            KeyCode::PageUp => state.scroll = state.scroll.saturating_sub(PREVIEW_PAGE),
            KeyCode::PageDown => state.scroll = state.scroll.saturating_add(PREVIEW_PAGE),
            KeyCode::Home => state.scroll = 0,
            _ => {}
        }
        let max_scroll = state.body.lines().count() as u16;
        state.scroll = state.scroll.min(max_scroll);
        Mode::Preview(state)
    }

    fn open(&mut self, target: Page) {
        self.session.open(target);
        self.status = None;
        info!(page = ?self.session.page, "opened page");
    }

    fn back(&mut self) {
        self.session.back();
        self.status = None;
        info!("returned to landing page");
    }

    /// Submit the form on the current page.
    fn handle_ctrl_s(&mut self) {
        if !matches!(self.mode, Mode::Normal) {
            return;
        }
        self.mode = match self.session.page {
            Page::Landing => Mode::Normal,
            Page::NewClub => self.submit_new_club(),
            Page::UpdateClub => self.submit_update(),
        };
    }

    /// Load the sample club, or clear it again.
    fn handle_ctrl_e(&mut self) {
        if !matches!(self.mode, Mode::Normal) || self.session.page != Page::NewClub {
            return;
        }
        let draft = &mut self.session.club;
        if draft.is_example() {
            draft.clear_example(self.today);
            self.set_status("Example cleared.", StatusKind::Info);
            info!("example data cleared");
        } else {
            draft.load_example();
            self.set_status(
                "Example data loaded! Scroll down to see the form filled with example data.",
                StatusKind::Info,
            );
            info!("example data loaded");
        }
        self.club_cursor = FormCursor::new(FieldId::ClubName);
    }

    fn submit_new_club(&mut self) -> Mode {
        let record = match self.session.club.collect() {
            Ok(record) => record,
            Err(err) => {
                self.club_cursor.set_error(&self.session.club, &err);
                return self.reject(err);
            }
        };
        info!(
            club = %record.name,
            category = %record.category,
            presidents = record.presidents.len(),
            vice_presidents = record.vice_presidents.len(),
            "new club submission collected"
        );
        let mail = OutgoingMail {
            subject: club_subject(&record),
            body: format_club_info(&record),
            image: record.background_image,
        };
        self.finish(
            mail,
            "Email sent successfully!".to_string(),
            "Preview of the email content",
        )
    }

    fn submit_update(&mut self) -> Mode {
        let request = match self.session.update.collect() {
            Ok(request) => request,
            Err(err) => {
                self.update_cursor.set_error(&self.session.update, &err);
                return self.reject(err);
            }
        };
        info!(
            club = %request.club_identifier,
            fields = request.fields.len(),
            "update request collected"
        );
        let success = format!(
            "Update submitted for club: {}. Email sent!",
            request.club_identifier
        );
        let mail = OutgoingMail {
            subject: update_subject(&request),
            body: format_update_info(&request),
            image: request.background_image().cloned(),
        };
        self.finish(mail, success, "Preview of the update email content")
    }

    fn reject(&mut self, err: ValidationError) -> Mode {
        warn!(error = %err, "submission rejected");
        self.set_status(err.to_string(), StatusKind::Error);
        Mode::Normal
    }

    fn finish(&mut self, mail: OutgoingMail, success: String, title: &'static str) -> Mode {
        match deliver(&self.config, &mail) {
            Delivery::Sent => {
                self.set_status(success, StatusKind::Info);
                Mode::Normal
            }
            Delivery::Failed(message) => {
                self.set_status(message, StatusKind::Error);
                Mode::Normal
            }
            Delivery::Preview {
                body,
                has_attachment,
            } => {
                self.set_status(CREDENTIALS_WARNING, StatusKind::Warning);
                Mode::Preview(PreviewState {
                    title,
                    body,
                    has_attachment,
                    scroll: 0,
                })
            }
        }
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let show_cursor = matches!(self.mode, Mode::Normal);
        match self.session.page {
            Page::Landing => self.draw_landing(frame, content_area),
            Page::NewClub => {
                let draft = &self.session.club;
                let intro = if draft.is_example() {
                    vec![Line::from(Span::styled(
                        EXAMPLE_BANNER,
                        Style::default().fg(Color::Yellow),
                    ))]
                } else {
                    vec![Line::from(Span::styled(
                        "Fill in your club's details. Counters control how many entries each section has.",
                        Style::default().fg(Color::Gray),
                    ))]
                };
                draw_form(
                    frame,
                    content_area,
                    "🎭 New Club Information",
                    intro,
                    draft,
                    &self.club_cursor,
                    show_cursor,
                );
            }
            Page::UpdateClub => {
                let intro = vec![Line::from(Span::styled(
                    "Tick the sections that changed, then fill in only the new values.",
                    Style::default().fg(Color::Gray),
                ))];
                draw_form(
                    frame,
                    content_area,
                    "🔄 Update Club Information",
                    intro,
                    &self.session.update,
                    &self.update_cursor,
                    show_cursor,
                );
            }
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::Preview(state) = &self.mode {
            self.draw_preview(frame, area, state);
        }
    }

    fn draw_landing(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(5),
                Constraint::Min(0),
            ])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "Club Information Collector",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Please choose an action:"),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, chunks[0]);

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(35),
                Constraint::Percentage(10),
                Constraint::Percentage(35),
                Constraint::Percentage(10),
            ])
            .split(chunks[1]);

        for (choice, label, slot) in [
            (LandingChoice::NewClub, "🎭 New Club", buttons[1]),
            (LandingChoice::UpdateClub, "🔄 Update Old Club", buttons[3]),
        ] {
            let selected = choice == self.landing_choice;
            let mut block = Block::default().borders(Borders::ALL);
            let mut text_style = Style::default();
            if selected {
                block = block.style(Style::default().fg(Color::Yellow));
                text_style = text_style.add_modifier(Modifier::BOLD);
            }
            let button = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(label, text_style)),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(button, slot);
        }
    }

    fn draw_preview(&self, frame: &mut Frame, area: Rect, state: &PreviewState) {
        let popup_area = centered_rect(80, 80, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(state.title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let note_height = if state.has_attachment { 2 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(note_height)])
            .split(inner);

        let lines: Vec<Line> = state.body.lines().map(Line::from).collect();
        let body = Paragraph::new(lines).scroll((state.scroll, 0));
        frame.render_widget(body, chunks[0]);

        if state.has_attachment {
            let note = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    ATTACHMENT_NOTE,
                    Style::default().fg(Color::Cyan),
                )),
            ])
            .wrap(Wrap { trim: true });
            frame.render_widget(note, chunks[1]);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.session.page, &self.mode) {
            (_, Mode::Preview(_)) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Scroll   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Close"),
            ]),
            (Page::Landing, _) => Line::from(vec![
                Span::styled("[←→]", key_style),
                Span::raw(" Choose   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Open   "),
                Span::styled("[n/u]", key_style),
                Span::raw(" New/Update   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (page, _) => {
                let mut spans = vec![
                    Span::styled("[Tab/↑↓]", key_style),
                    Span::raw(" Move   "),
                    Span::styled("[←→]", key_style),
                    Span::raw(" Adjust   "),
                    Span::styled("[Space]", key_style),
                    Span::raw(" Toggle   "),
                    Span::styled("[Ctrl+S]", key_style),
                    Span::raw(" Submit   "),
                ];
                if *page == Page::NewClub {
                    spans.push(Span::styled("[Ctrl+E]", key_style));
                    spans.push(Span::raw(" Example   "));
                }
                spans.push(Span::styled("[Esc]", key_style));
                spans.push(Span::raw(" Back"));
                Line::from(spans)
            }
        }
    }
}

fn draw_form<M: FormModel>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    intro: Vec<Line<'static>>,
    model: &M,
    cursor: &FormCursor,
    show_cursor: bool,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let intro_height = (intro.len() as u16 + 1).min(inner.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(intro_height), Constraint::Min(0)])
        .split(inner);
    frame.render_widget(Paragraph::new(intro).wrap(Wrap { trim: true }), chunks[0]);

    let body = chunks[1];
    let rendered = cursor.render(model);
    let height = body.height as usize;
    let scroll = scroll_offset(rendered.focus_line, height, rendered.lines.len());
    frame.render_widget(
        Paragraph::new(rendered.lines).scroll((scroll as u16, 0)),
        body,
    );

    if !show_cursor {
        return;
    }
    if let Some(col) = rendered.cursor_col {
        let row = rendered.focus_line.saturating_sub(scroll);
        if row < height && col < body.width {
            frame.set_cursor_position((body.x + col, body.y + row as u16));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClubCategory;
    use crate::session::UpdateSection;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        let config = MailConfig {
            user: None,
            password: None,
            recipient: "office@example.com".into(),
        };
        App::new(config, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn landing_navigation_and_back() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.session.page, Page::NewClub);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.page, Page::Landing);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.page, Page::UpdateClub);

        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn typing_on_form_does_not_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "quiz");
        assert_eq!(app.session.club.fields.name, "quiz");
        assert_eq!(app.session.page, Page::NewClub);
    }

    #[test]
    fn blank_name_is_rejected_inline() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Tab);
        app.handle_ctrl_s();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.club_cursor.focus, FieldId::ClubName);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "Club Name is required.");
    }

    #[test]
    fn valid_submission_without_credentials_previews() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Chess Club");
        app.handle_ctrl_s();

        match &app.mode {
            Mode::Preview(state) => {
                assert!(state.body.starts_with("\nCLUB INFORMATION\n\nName: Chess Club"));
                assert!(!state.has_attachment);
            }
            Mode::Normal => panic!("expected a preview"),
        }
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Warning);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.session.page, Page::NewClub);
    }

    #[test]
    fn example_mode_blocks_submission_until_cleared() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        app.handle_ctrl_e();
        assert!(app.session.club.is_example());
        assert_eq!(app.session.club.fields.name, "Coding Club");

        app.handle_ctrl_s();
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);

        app.handle_ctrl_e();
        assert!(!app.session.club.is_example());
        assert!(app.session.club.fields.name.is_empty());
    }

    #[test]
    fn update_flow_collects_checked_sections() {
        let mut app = app();
        press(&mut app, KeyCode::Char('u'));
        type_text(&mut app, "Chess Club");
        app.handle_ctrl_s();
        assert_eq!(
            app.status.as_ref().unwrap().text,
            "Please select at least one section to update."
        );

        app.update_cursor.focus = FieldId::Section(UpdateSection::ClubCategory);
        press(&mut app, KeyCode::Char(' '));
        app.update_cursor.focus = FieldId::Category;
        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.update.fields.category, ClubCategory::ArtsAndCreative);

        app.handle_ctrl_s();
        match &app.mode {
            Mode::Preview(state) => {
                assert!(state
                    .body
                    .contains("- Club Category: Arts and creative clubs\n"));
            }
            Mode::Normal => panic!("expected a preview"),
        }
    }

    #[test]
    fn ctrl_e_is_ignored_outside_new_club_page() {
        let mut app = app();
        app.handle_ctrl_e();
        press(&mut app, KeyCode::Char('u'));
        app.handle_ctrl_e();
        assert!(!app.session.club.is_example());
        assert!(app.status.is_none());
    }

    #[test]
    fn pages_render() {
        let mut app = app();
        assert!(render(&app).contains("Update Old Club"));

        press(&mut app, KeyCode::Char('n'));
        app.handle_ctrl_e();
        let screen = render(&app);
        assert!(screen.contains("New Club Information"));
        assert!(screen.contains("Coding Club"));

        app.handle_ctrl_e();
        type_text(&mut app, "Chess");
        app.handle_ctrl_s();
        assert!(render(&app).contains("CLUB INFORMATION"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('u'));
        assert!(render(&app).contains("Select Sections to Update"));
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn unbound_ctrl_chords_do_not_type() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Chess");
        assert!(!app.handle_key_event(ctrl('a')).unwrap());
        assert!(!app.handle_key_event(ctrl('z')).unwrap());
        assert_eq!(app.session.club.fields.name, "Chess");

        assert!(!app
            .handle_key_event(KeyEvent::new(KeyCode::Char('!'), KeyModifiers::SHIFT))
            .unwrap());
        assert_eq!(app.session.club.fields.name, "Chess!");
    }

    #[test]
    fn ctrl_shortcuts_route_through_key_events() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.handle_key_event(ctrl('e')).unwrap());
        assert!(app.session.club.is_example());
        assert!(!app.handle_key_event(ctrl('e')).unwrap());

        type_text(&mut app, "Chess");
        assert!(!app.handle_key_event(ctrl('s')).unwrap());
        assert!(matches!(app.mode, Mode::Preview(_)));

        assert!(app.handle_key_event(ctrl('c')).unwrap());
    }
}
