use crossterm::event::KeyCode;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::error::ValidationError;
use crate::lists::CountBounds;
use crate::models::{ClubCategory, FieldGroup, Person, PersonAttr};
use crate::session::{
    ClubDraft, ClubFields, UpdateDraft, UpdateSection, PRESIDENT_BOUNDS,
    UPDATE_VICE_PRESIDENT_BOUNDS, VICE_PRESIDENT_BOUNDS,
};

use super::helpers::single_line;

/// Which leadership list a person row belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Role {
    President,
    VicePresident,
}

impl Role {
    fn title(self) -> &'static str {
        match self {
            Role::President => "President",
            Role::VicePresident => "Vice-President",
        }
    }
}

/// Structural address of every control on either form page.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldId {
    Identifier,
    Section(UpdateSection),
    ClubName,
    ClubEmoji,
    Category,
    EstablishmentDate,
    PeopleCount(Role),
    Person(Role, usize, PersonAttr),
    MeetingFrequency,
    MeetingDayTime,
    MeetingLocation,
    GroupCount(FieldGroup),
    GroupItem(FieldGroup, usize),
    ImagePath,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Counter,
    Choice,
    Toggle,
}

impl FieldId {
    pub(crate) fn kind(self) -> FieldKind {
        match self {
            FieldId::Section(_) => FieldKind::Toggle,
            FieldId::Category => FieldKind::Choice,
            FieldId::PeopleCount(_) | FieldId::GroupCount(_) => FieldKind::Counter,
            _ => FieldKind::Text,
        }
    }

    /// The control a validation error should be reported against.
    pub(crate) fn for_error(err: &ValidationError) -> Option<Self> {
        match err {
            ValidationError::ExampleMode => None,
            ValidationError::MissingClubName => Some(FieldId::ClubName),
            ValidationError::MissingIdentifier => Some(FieldId::Identifier),
            ValidationError::NoSectionSelected => Some(FieldId::Section(UpdateSection::ALL[0])),
            ValidationError::InvalidDate => Some(FieldId::EstablishmentDate),
            ValidationError::UnsupportedImageType
            | ValidationError::ImageTooLarge { .. }
            | ValidationError::ImageUnreadable { .. } => Some(FieldId::ImagePath),
        }
    }
}

/// One rendered line of a form page.
pub(crate) enum Row {
    Heading(String),
    Note(String),
    Field { id: FieldId, label: String },
}

impl Row {
    fn field(id: FieldId, label: impl Into<String>) -> Self {
        Row::Field {
            id,
            label: label.into(),
        }
    }
}

/// What the key handler needs from a page's draft.
pub(crate) trait FormModel {
    fn rows(&self) -> Vec<Row>;
    fn text(&self, id: FieldId) -> Option<&str>;
    fn text_mut(&mut self, id: FieldId) -> Option<&mut String>;
    fn count(&self, id: FieldId) -> Option<usize>;
    fn adjust(&mut self, id: FieldId, delta: isize);
    fn category(&self) -> ClubCategory;

    fn is_checked(&self, _id: FieldId) -> bool {
        false
    }

    fn toggle(&mut self, _id: FieldId) {}
}

fn people(fields: &ClubFields, role: Role) -> &[Person] {
    match role {
        Role::President => &fields.presidents,
        Role::VicePresident => &fields.vice_presidents,
    }
}

fn people_mut(fields: &mut ClubFields, role: Role) -> &mut Vec<Person> {
    match role {
        Role::President => &mut fields.presidents,
        Role::VicePresident => &mut fields.vice_presidents,
    }
}

fn field_text(fields: &ClubFields, id: FieldId) -> Option<&String> {
    match id {
        FieldId::ClubName => Some(&fields.name),
        FieldId::ClubEmoji => Some(&fields.emoji),
        FieldId::EstablishmentDate => Some(&fields.establishment_date),
        FieldId::Person(role, index, attr) => people(fields, role)
            .get(index)
            .map(|person| match attr {
                PersonAttr::ChineseName => &person.chinese_name,
                PersonAttr::EnglishName => &person.english_name,
                PersonAttr::Class => &person.class_label,
                PersonAttr::Email => &person.email,
                PersonAttr::WeChat => &person.wechat_id,
            }),
        FieldId::MeetingFrequency => Some(&fields.meeting.frequency),
        FieldId::MeetingDayTime => Some(&fields.meeting.day_time),
        FieldId::MeetingLocation => Some(&fields.meeting.location),
        FieldId::GroupItem(group, index) => fields.groups.get(group).get(index),
        FieldId::ImagePath => Some(&fields.image_path),
        _ => None,
    }
}

fn field_text_mut(fields: &mut ClubFields, id: FieldId) -> Option<&mut String> {
    match id {
        FieldId::ClubName => Some(&mut fields.name),
        FieldId::ClubEmoji => Some(&mut fields.emoji),
        FieldId::EstablishmentDate => Some(&mut fields.establishment_date),
        FieldId::Person(role, index, attr) => people_mut(fields, role)
            .get_mut(index)
            .map(|person| person.get_mut(attr)),
        FieldId::MeetingFrequency => Some(&mut fields.meeting.frequency),
        FieldId::MeetingDayTime => Some(&mut fields.meeting.day_time),
        FieldId::MeetingLocation => Some(&mut fields.meeting.location),
        FieldId::GroupItem(group, index) => fields.groups.get_mut(group).get_mut(index),
        FieldId::ImagePath => Some(&mut fields.image_path),
        _ => None,
    }
}

fn field_count(fields: &ClubFields, id: FieldId) -> Option<usize> {
    match id {
        FieldId::PeopleCount(role) => Some(people(fields, role).len()),
        FieldId::GroupCount(group) => Some(fields.groups.get(group).len()),
        _ => None,
    }
}

/// Group counters and the category selector behave the same on both pages.
fn adjust_shared(fields: &mut ClubFields, id: FieldId, delta: isize) {
    match id {
        FieldId::GroupCount(group) => {
            let next = group.bounds().step(fields.groups.get(group).len(), delta);
            fields.set_group_count(group, next);
        }
        FieldId::Category => fields.category = fields.category.cycle(delta),
        _ => {}
    }
}

fn step_people(fields: &ClubFields, role: Role, bounds: CountBounds, delta: isize) -> usize {
    bounds.step(people(fields, role).len(), delta)
}

fn group_count_label(group: FieldGroup) -> &'static str {
    match group {
        FieldGroup::Requirements => "Number of Requirements",
        FieldGroup::LearningObjectives => "Number of Learning Objectives",
        FieldGroup::ForWhom => "Number of For Whom Items",
        FieldGroup::PastActivities => "Number of Past Activities",
        FieldGroup::Benefits => "Number of Benefits",
    }
}

fn push_people_rows(rows: &mut Vec<Row>, role: Role, count: usize) {
    for index in 0..count {
        rows.push(Row::Heading(format!("{} {}", role.title(), index + 1)));
        for attr in PersonAttr::ALL {
            rows.push(Row::field(
                FieldId::Person(role, index, attr),
                attr.input_label(),
            ));
        }
    }
}

fn push_group_rows(rows: &mut Vec<Row>, fields: &ClubFields, group: FieldGroup, suffix: &str) {
    rows.push(Row::Heading(group.title().to_string()));
    rows.push(Row::Note(group.hint().to_string()));
    rows.push(Row::field(
        FieldId::GroupCount(group),
        format!("{}{suffix}", group_count_label(group)),
    ));
    for index in 0..fields.groups.get(group).len() {
        rows.push(Row::field(
            FieldId::GroupItem(group, index),
            format!("{} {}", group.item_label(), index + 1),
        ));
    }
}

const PICTURE_NOTE: &str = "Maximum file size: 30 MB. Accepted types: jpg, jpeg, png.";

impl FormModel for ClubDraft {
    fn rows(&self) -> Vec<Row> {
        let fields = &self.fields;
        let mut rows = vec![
            Row::Heading("Club".to_string()),
            Row::field(FieldId::ClubName, "Club Name"),
            Row::field(FieldId::ClubEmoji, "Club Emoji"),
            Row::field(FieldId::Category, "Club Category"),
            Row::field(FieldId::EstablishmentDate, "Date of Establishment (YYYY-MM-DD)"),
            Row::Heading("Leadership".to_string()),
            Row::field(FieldId::PeopleCount(Role::President), "Number of Presidents"),
            Row::field(
                FieldId::PeopleCount(Role::VicePresident),
                "Number of Vice-Presidents",
            ),
        ];
        push_people_rows(&mut rows, Role::President, fields.presidents.len());
        push_people_rows(&mut rows, Role::VicePresident, fields.vice_presidents.len());

        rows.push(Row::Heading("Meeting Schedule".to_string()));
        rows.push(Row::field(
            FieldId::MeetingFrequency,
            "Frequency of Meetings (e.g. Weekly, Bi-weekly, Monthly)",
        ));
        rows.push(Row::field(
            FieldId::MeetingDayTime,
            "Day and Time of Meetings (e.g. Tuesday P10)",
        ));
        rows.push(Row::field(
            FieldId::MeetingLocation,
            "Location of Meetings (e.g. Room 213)",
        ));

        for group in FieldGroup::ALL {
            push_group_rows(&mut rows, fields, group, "");
        }

        rows.push(Row::Heading("Background Picture".to_string()));
        rows.push(Row::Note(PICTURE_NOTE.to_string()));
        rows.push(Row::field(FieldId::ImagePath, "Picture Path"));
        rows
    }

    fn text(&self, id: FieldId) -> Option<&str> {
        field_text(&self.fields, id).map(String::as_str)
    }

    fn text_mut(&mut self, id: FieldId) -> Option<&mut String> {
        field_text_mut(&mut self.fields, id)
    }

    fn count(&self, id: FieldId) -> Option<usize> {
        field_count(&self.fields, id)
    }

    fn adjust(&mut self, id: FieldId, delta: isize) {
        match id {
            FieldId::PeopleCount(Role::President) => {
                let next = step_people(&self.fields, Role::President, PRESIDENT_BOUNDS, delta);
                self.set_president_count(next);
            }
            FieldId::PeopleCount(Role::VicePresident) => {
                let next = step_people(
                    &self.fields,
                    Role::VicePresident,
                    VICE_PRESIDENT_BOUNDS,
                    delta,
                );
                self.set_vice_president_count(next);
            }
            other => adjust_shared(&mut self.fields, other, delta),
        }
    }

    fn category(&self) -> ClubCategory {
        self.fields.category
    }
}

impl FormModel for UpdateDraft {
    fn rows(&self) -> Vec<Row> {
        let fields = &self.fields;
        let mut rows = vec![
            Row::field(FieldId::Identifier, "Club Name or Unique Identifier"),
            Row::Heading("Select Sections to Update".to_string()),
        ];
        for section in UpdateSection::ALL {
            rows.push(Row::field(FieldId::Section(section), section.label()));
        }

        let selected: Vec<UpdateSection> = UpdateSection::ALL
            .into_iter()
            .filter(|section| self.is_selected(*section))
            .collect();
        if !selected.is_empty() {
            rows.push(Row::Heading("New Values".to_string()));
        }

        for section in selected {
            match section {
                UpdateSection::ClubName => rows.push(Row::field(
                    FieldId::ClubName,
                    "New Club Name (leave blank to keep unchanged)",
                )),
                UpdateSection::ClubEmoji => rows.push(Row::field(
                    FieldId::ClubEmoji,
                    "New Club Emoji (leave blank to keep unchanged)",
                )),
                UpdateSection::ClubCategory => {
                    rows.push(Row::field(FieldId::Category, "New Club Category"));
                }
                UpdateSection::EstablishmentDate => rows.push(Row::field(
                    FieldId::EstablishmentDate,
                    "New Date of Establishment (YYYY-MM-DD)",
                )),
                UpdateSection::Presidents => {
                    rows.push(Row::Heading("Presidents".to_string()));
                    rows.push(Row::field(
                        FieldId::PeopleCount(Role::President),
                        "Number of Presidents to Update",
                    ));
                    push_people_rows(&mut rows, Role::President, fields.presidents.len());
                }
                UpdateSection::VicePresidents => {
                    rows.push(Row::Heading("Vice-Presidents".to_string()));
                    rows.push(Row::field(
                        FieldId::PeopleCount(Role::VicePresident),
                        "Number of Vice-Presidents to Update",
                    ));
                    push_people_rows(&mut rows, Role::VicePresident, fields.vice_presidents.len());
                }
                UpdateSection::MeetingSchedule => {
                    rows.push(Row::Heading("Meeting Schedule".to_string()));
                    rows.push(Row::field(
                        FieldId::MeetingFrequency,
                        "New Frequency of Meetings (leave blank to keep unchanged)",
                    ));
                    rows.push(Row::field(
                        FieldId::MeetingDayTime,
                        "New Day and Time of Meetings (leave blank to keep unchanged)",
                    ));
                    rows.push(Row::field(
                        FieldId::MeetingLocation,
                        "New Location of Meetings (leave blank to keep unchanged)",
                    ));
                }
                UpdateSection::Group(group) => {
                    push_group_rows(&mut rows, fields, group, " to Update");
                }
                UpdateSection::BackgroundImage => {
                    rows.push(Row::Heading("Background Picture".to_string()));
                    rows.push(Row::Note(PICTURE_NOTE.to_string()));
                    rows.push(Row::field(FieldId::ImagePath, "New Picture Path"));
                }
            }
        }
        rows
    }

    fn text(&self, id: FieldId) -> Option<&str> {
        match id {
            FieldId::Identifier => Some(&self.identifier),
            other => field_text(&self.fields, other).map(String::as_str),
        }
    }

    fn text_mut(&mut self, id: FieldId) -> Option<&mut String> {
        match id {
            FieldId::Identifier => Some(&mut self.identifier),
            other => field_text_mut(&mut self.fields, other),
        }
    }

    fn count(&self, id: FieldId) -> Option<usize> {
        field_count(&self.fields, id)
    }

    fn adjust(&mut self, id: FieldId, delta: isize) {
        match id {
            FieldId::PeopleCount(Role::President) => {
                let next = step_people(&self.fields, Role::President, PRESIDENT_BOUNDS, delta);
                self.set_president_count(next);
            }
            FieldId::PeopleCount(Role::VicePresident) => {
                let next = step_people(
                    &self.fields,
                    Role::VicePresident,
                    UPDATE_VICE_PRESIDENT_BOUNDS,
                    delta,
                );
                self.set_vice_president_count(next);
            }
            other => adjust_shared(&mut self.fields, other, delta),
        }
    }

    fn category(&self) -> ClubCategory {
        self.fields.category
    }

    fn is_checked(&self, id: FieldId) -> bool {
        match id {
            FieldId::Section(section) => self.is_selected(section),
            _ => false,
        }
    }

    fn toggle(&mut self, id: FieldId) {
        if let FieldId::Section(section) = id {
            UpdateDraft::toggle(self, section);
        }
    }
}

/// Rendered form lines plus where the focused control landed.
pub(crate) struct FormLines {
    pub(crate) lines: Vec<Line<'static>>,
    pub(crate) focus_line: usize,
    /// Column of the text cursor within the line, for text fields only.
    pub(crate) cursor_col: Option<u16>,
}

/// Focus and inline error state for one form page. The values themselves
/// live in the session's draft.
pub(crate) struct FormCursor {
    pub(crate) focus: FieldId,
    pub(crate) error: Option<(FieldId, String)>,
}

const FOCUS_MARKER: &str = "> ";
const NO_MARKER: &str = "  ";

impl FormCursor {
    pub(crate) fn new(focus: FieldId) -> Self {
        Self { focus, error: None }
    }

    fn focusable<M: FormModel>(model: &M) -> Vec<FieldId> {
        model
            .rows()
            .into_iter()
            .filter_map(|row| match row {
                Row::Field { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Keep focus on a control that still exists after the rows changed.
    fn ensure_focus<M: FormModel>(&mut self, model: &M) {
        let ids = Self::focusable(model);
        if !ids.contains(&self.focus) {
            if let Some(first) = ids.first() {
                self.focus = *first;
            }
        }
    }

    pub(crate) fn move_focus<M: FormModel>(&mut self, model: &M, delta: isize) {
        let ids = Self::focusable(model);
        if ids.is_empty() {
            return;
        }
        let current = ids.iter().position(|id| *id == self.focus).unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, ids.len() as isize - 1);
        self.focus = ids[next as usize];
    }

    fn focus_edge<M: FormModel>(&mut self, model: &M, last: bool) {
        let ids = Self::focusable(model);
        let edge = if last { ids.last() } else { ids.first() };
        if let Some(id) = edge {
            self.focus = *id;
        }
    }

    /// Append a character to the focused text field.
    pub(crate) fn push_char<M: FormModel>(&mut self, model: &mut M, ch: char) -> bool {
        if ch.is_control() || self.focus.kind() != FieldKind::Text {
            return false;
        }
        match model.text_mut(self.focus) {
            Some(value) => {
                value.push(ch);
                self.error = None;
                true
            }
            None => false,
        }
    }

    pub(crate) fn backspace<M: FormModel>(&mut self, model: &mut M) {
        if let Some(value) = model.text_mut(self.focus) {
            value.pop();
            self.error = None;
        }
    }

    fn adjust<M: FormModel>(&mut self, model: &mut M, delta: isize) {
        if matches!(self.focus.kind(), FieldKind::Counter | FieldKind::Choice) {
            model.adjust(self.focus, delta);
            self.error = None;
            self.ensure_focus(model);
        }
    }

    fn activate<M: FormModel>(&mut self, model: &mut M) {
        if self.focus.kind() == FieldKind::Toggle {
            model.toggle(self.focus);
            self.error = None;
            self.ensure_focus(model);
        } else {
            self.move_focus(model, 1);
        }
    }

    /// Route a key press to the form. Returns `true` when the user asked to
    /// leave the page.
    pub(crate) fn handle_key<M: FormModel>(&mut self, model: &mut M, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::BackTab => self.move_focus(model, -1),
            KeyCode::Down | KeyCode::Tab => self.move_focus(model, 1),
            KeyCode::PageUp => self.move_focus(model, -5),
            KeyCode::PageDown => self.move_focus(model, 5),
            KeyCode::Home => self.focus_edge(model, false),
            KeyCode::End => self.focus_edge(model, true),
            KeyCode::Left => self.adjust(model, -1),
            KeyCode::Right => self.adjust(model, 1),
            KeyCode::Enter => self.activate(model),
            KeyCode::Char(' ') if self.focus.kind() == FieldKind::Toggle => self.activate(model),
            KeyCode::Char(ch) => {
                self.push_char(model, ch);
            }
            KeyCode::Backspace => self.backspace(model),
            _ => {}
        }
        false
    }

    /// Point at the control responsible for `err` and remember the message
    /// so it renders underneath it.
    pub(crate) fn set_error<M: FormModel>(&mut self, model: &M, err: &ValidationError) {
        match FieldId::for_error(err) {
            Some(id) => {
                self.focus = id;
                self.ensure_focus(model);
                self.error = Some((self.focus, err.to_string()));
            }
            None => self.error = None,
        }
    }

    /// Build the styled lines for the whole page.
    pub(crate) fn render<M: FormModel>(&self, model: &M) -> FormLines {
        let mut lines = Vec::new();
        let mut focus_line = 0;
        let mut cursor_col = None;

        for row in model.rows() {
            match row {
                Row::Heading(title) => {
                    if !lines.is_empty() {
                        lines.push(Line::from(""));
                    }
                    lines.push(Line::from(Span::styled(
                        title,
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
                Row::Note(text) => lines.push(Line::from(Span::styled(
                    format!("{NO_MARKER}{text}"),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ))),
                Row::Field { id, label } => {
                    let focused = id == self.focus;
                    if focused {
                        focus_line = lines.len();
                    }
                    let (line, col) = self.field_line(model, id, &label, focused);
                    if focused {
                        cursor_col = col;
                    }
                    lines.push(line);
                    if let Some((error_id, message)) = &self.error {
                        if *error_id == id {
                            lines.push(Line::from(Span::styled(
                                format!("{NO_MARKER}  ↳ {message}"),
                                Style::default().fg(Color::Red),
                            )));
                        }
                    }
                }
            }
        }

        FormLines {
            lines,
            focus_line,
            cursor_col,
        }
    }

    fn field_line<M: FormModel>(
        &self,
        model: &M,
        id: FieldId,
        label: &str,
        focused: bool,
    ) -> (Line<'static>, Option<u16>) {
        let marker = if focused { FOCUS_MARKER } else { NO_MARKER };
        let active = Style::default().fg(Color::Yellow);

        match id.kind() {
            FieldKind::Toggle => {
                let mark = if model.is_checked(id) { "[x]" } else { "[ ]" };
                let style = if focused { active } else { Style::default() };
                (
                    Line::from(vec![
                        Span::raw(marker),
                        Span::styled(format!("{mark} {label}"), style),
                    ]),
                    None,
                )
            }
            FieldKind::Counter | FieldKind::Choice => {
                let value = match id.kind() {
                    FieldKind::Counter => model.count(id).unwrap_or_default().to_string(),
                    _ => model.category().to_string(),
                };
                let style = if focused { active } else { Style::default() };
                (
                    Line::from(vec![
                        Span::raw(format!("{marker}{label}: ")),
                        Span::styled(format!("◀ {value} ▶"), style),
                    ]),
                    None,
                )
            }
            FieldKind::Text => {
                let value = single_line(model.text(id).unwrap_or_default());
                let prefix = format!("{marker}{label}: ");
                // Terminal cells, not chars: CJK text and emoji are two cells wide.
                let col = (Span::raw(prefix.as_str()).width() + Span::raw(value.as_str()).width())
                    .min(u16::MAX as usize) as u16;
                let (display, style) = if value.is_empty() {
                    let style = if focused {
                        active
                    } else {
                        Style::default().fg(Color::DarkGray)
                    };
                    (String::new(), style)
                } else if focused {
                    (value, active)
                } else {
                    (value, Style::default())
                };
                (
                    Line::from(vec![Span::raw(prefix), Span::styled(display, style)]),
                    Some(col),
                )
            }
        }
    }
}
