//! Per-session form state and the submit-time collectors.
//!
//! A [`Session`] is owned by the running app for as long as the user keeps the
//! tool open and is dropped with it. The drafts hold raw widget values; the
//! `collect` methods turn them into the records the report writer consumes,
//! rejecting submissions that fail validation before anything is serialized.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::example;
use crate::image::BackgroundImage;
use crate::lists::{resize, CountBounds};
use crate::models::{
    ClubCategory, ClubRecord, FieldGroup, FieldGroups, MeetingSchedule, Person, UpdateField,
    UpdateRequest,
};

/// Presidents allowed on either page.
pub const PRESIDENT_BOUNDS: CountBounds = CountBounds::new(1, 5);
/// Vice-presidents allowed on the new-club page. A club may have none.
pub const VICE_PRESIDENT_BOUNDS: CountBounds = CountBounds::new(0, 5);
/// Vice-presidents allowed on the update page.
pub const UPDATE_VICE_PRESIDENT_BOUNDS: CountBounds = CountBounds::new(1, 5);

const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
const REPORT_DATE_FORMAT: &str = "%B %d, %Y";

/// Top-level pages. Landing is the hub; each form page only leads back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Landing,
    NewClub,
    UpdateClub,
}

impl Page {
    /// Follow a landing-page choice. Any other page ignores the request.
    pub fn open(self, target: Page) -> Page {
        match self {
            Page::Landing => target,
            current => current,
        }
    }

    pub fn back(self) -> Page {
        Page::Landing
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), INPUT_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate)
}

fn load_image(raw_path: &str) -> Result<Option<BackgroundImage>, ValidationError> {
    let trimmed = raw_path.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    BackgroundImage::load(Path::new(trimmed)).map(Some)
}

fn set_people_count(people: &mut Vec<Person>, bounds: CountBounds, count: usize) {
    resize(people, bounds.clamp(count));
}

/// Widget values shared by both form pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubFields {
    pub name: String,
    pub emoji: String,
    pub category: ClubCategory,
    /// As typed, "YYYY-MM-DD".
    pub establishment_date: String,
    pub presidents: Vec<Person>,
    pub vice_presidents: Vec<Person>,
    pub meeting: MeetingSchedule,
    pub groups: FieldGroups,
    pub image_path: String,
}

impl ClubFields {
    /// One president, one vice-president, one blank entry per group.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            emoji: String::new(),
            category: ClubCategory::default(),
            establishment_date: today.format(INPUT_DATE_FORMAT).to_string(),
            presidents: vec![Person::default()],
            vice_presidents: vec![Person::default()],
            meeting: MeetingSchedule::default(),
            groups: FieldGroups::single_blank(),
            image_path: String::new(),
        }
    }

    fn example() -> Self {
        Self {
            name: example::EXAMPLE_NAME.to_string(),
            emoji: example::EXAMPLE_EMOJI.to_string(),
            category: example::EXAMPLE_CATEGORY,
            establishment_date: example::EXAMPLE_DATE.to_string(),
            presidents: example::presidents(),
            vice_presidents: example::vice_presidents(),
            meeting: example::meeting(),
            groups: example::groups(),
            image_path: String::new(),
        }
    }

    pub fn set_group_count(&mut self, group: FieldGroup, count: usize) {
        resize(self.groups.get_mut(group), group.bounds().clamp(count));
    }
}

/// Raw widget values of the new-club page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubDraft {
    pub fields: ClubFields,
    example_mode: bool,
}

impl ClubDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            fields: ClubFields::new(today),
            example_mode: false,
        }
    }

    pub fn is_example(&self) -> bool {
        self.example_mode
    }

    /// Replace every value with the sample club and lock submission.
    pub fn load_example(&mut self) {
        *self = Self {
            fields: ClubFields::example(),
            example_mode: true,
        };
    }

    /// Leave example mode with a blank form.
    pub fn clear_example(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    pub fn set_president_count(&mut self, count: usize) {
        set_people_count(&mut self.fields.presidents, PRESIDENT_BOUNDS, count);
    }

    pub fn set_vice_president_count(&mut self, count: usize) {
        set_people_count(&mut self.fields.vice_presidents, VICE_PRESIDENT_BOUNDS, count);
    }

    /// Validate the draft and assemble the record to send.
    pub fn collect(&self) -> Result<ClubRecord, ValidationError> {
        if self.example_mode {
            return Err(ValidationError::ExampleMode);
        }
        let fields = &self.fields;
        if fields.name.trim().is_empty() {
            return Err(ValidationError::MissingClubName);
        }
        let date = parse_date(&fields.establishment_date)?;
        let background_image = load_image(&fields.image_path)?;

        Ok(ClubRecord {
            name: fields.name.clone(),
            emoji: fields.emoji.clone(),
            category: fields.category,
            establishment_date: date.format(REPORT_DATE_FORMAT).to_string(),
            presidents: fields.presidents.clone(),
            vice_presidents: fields.vice_presidents.clone(),
            meeting: fields.meeting.clone(),
            groups: fields.groups.clone(),
            background_image,
        })
    }
}

/// The checkboxes on the update page, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateSection {
    ClubName,
    ClubEmoji,
    ClubCategory,
    EstablishmentDate,
    Presidents,
    VicePresidents,
    MeetingSchedule,
    Group(FieldGroup),
    BackgroundImage,
}

impl UpdateSection {
    pub const ALL: [UpdateSection; 13] = [
        UpdateSection::ClubName,
        UpdateSection::ClubEmoji,
        UpdateSection::ClubCategory,
        UpdateSection::EstablishmentDate,
        UpdateSection::Presidents,
        UpdateSection::VicePresidents,
        UpdateSection::MeetingSchedule,
        UpdateSection::Group(FieldGroup::Requirements),
        UpdateSection::Group(FieldGroup::LearningObjectives),
        UpdateSection::Group(FieldGroup::ForWhom),
        UpdateSection::Group(FieldGroup::PastActivities),
        UpdateSection::Group(FieldGroup::Benefits),
        UpdateSection::BackgroundImage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UpdateSection::ClubName => "Club Name",
            UpdateSection::ClubEmoji => "Club Emoji",
            UpdateSection::ClubCategory => "Club Category",
            UpdateSection::EstablishmentDate => "Date of Establishment",
            UpdateSection::Presidents => "Presidents",
            UpdateSection::VicePresidents => "Vice-Presidents",
            UpdateSection::MeetingSchedule => "Meeting Schedule",
            UpdateSection::Group(FieldGroup::Requirements) => "Requirements",
            UpdateSection::Group(FieldGroup::LearningObjectives) => "Learning Objectives",
            UpdateSection::Group(FieldGroup::ForWhom) => "For Whom",
            UpdateSection::Group(FieldGroup::PastActivities) => "Past Activities/Projects",
            UpdateSection::Group(FieldGroup::Benefits) => "Benefits of Joining",
            UpdateSection::BackgroundImage => "Background Picture",
        }
    }
}

/// Raw widget values of the update page. Values of unchecked sections are
/// kept so re-checking a box restores what was typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDraft {
    pub identifier: String,
    selected: HashSet<UpdateSection>,
    pub fields: ClubFields,
}

impl UpdateDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            identifier: String::new(),
            selected: HashSet::new(),
            fields: ClubFields::new(today),
        }
    }

    pub fn is_selected(&self, section: UpdateSection) -> bool {
        self.selected.contains(&section)
    }

    /// Flip a checkbox, returning the new state.
    pub fn toggle(&mut self, section: UpdateSection) -> bool {
        if self.selected.remove(&section) {
            false
        } else {
            self.selected.insert(section);
            true
        }
    }

    pub fn set_president_count(&mut self, count: usize) {
        set_people_count(&mut self.fields.presidents, PRESIDENT_BOUNDS, count);
    }

    pub fn set_vice_president_count(&mut self, count: usize) {
        set_people_count(
            &mut self.fields.vice_presidents,
            UPDATE_VICE_PRESIDENT_BOUNDS,
            count,
        );
    }

    /// Validate the draft and assemble the sparse request. Only checked
    /// sections contribute, and checked-but-blank values are dropped.
    pub fn collect(&self) -> Result<UpdateRequest, ValidationError> {
        if self.identifier.trim().is_empty() {
            return Err(ValidationError::MissingIdentifier);
        }
        if self.selected.is_empty() {
            return Err(ValidationError::NoSectionSelected);
        }

        let values = &self.fields;
        let mut fields = Vec::new();
        for section in UpdateSection::ALL {
            if !self.is_selected(section) {
                continue;
            }
            match section {
                UpdateSection::ClubName => fields.push(UpdateField::ClubName(values.name.clone())),
                UpdateSection::ClubEmoji => {
                    fields.push(UpdateField::ClubEmoji(values.emoji.clone()));
                }
                UpdateSection::ClubCategory => {
                    fields.push(UpdateField::ClubCategory(values.category));
                }
                UpdateSection::EstablishmentDate => {
                    let value = if values.establishment_date.trim().is_empty() {
                        String::new()
                    } else {
                        parse_date(&values.establishment_date)?
                            .format(INPUT_DATE_FORMAT)
                            .to_string()
                    };
                    fields.push(UpdateField::EstablishmentDate(value));
                }
                UpdateSection::Presidents => {
                    fields.push(UpdateField::Presidents(values.presidents.clone()));
                }
                UpdateSection::VicePresidents => {
                    fields.push(UpdateField::VicePresidents(values.vice_presidents.clone()));
                }
                UpdateSection::MeetingSchedule => {
                    fields.push(UpdateField::MeetingFrequency(values.meeting.frequency.clone()));
                    fields.push(UpdateField::MeetingDayTime(values.meeting.day_time.clone()));
                    fields.push(UpdateField::MeetingLocation(values.meeting.location.clone()));
                }
                UpdateSection::Group(group) => {
                    fields.push(UpdateField::Group(group, values.groups.get(group).to_vec()));
                }
                UpdateSection::BackgroundImage => {
                    if let Some(image) = load_image(&values.image_path)? {
                        fields.push(UpdateField::BackgroundImage(image));
                    }
                }
            }
        }

        Ok(UpdateRequest::new(self.identifier.clone(), fields))
    }
}

/// Everything one user session holds: the current page and both drafts.
#[derive(Debug, Clone)]
pub struct Session {
    pub page: Page,
    pub club: ClubDraft,
    pub update: UpdateDraft,
}

impl Session {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            page: Page::Landing,
            club: ClubDraft::new(today),
            update: UpdateDraft::new(today),
        }
    }

    pub fn open(&mut self, target: Page) {
        self.page = self.page.open(target);
    }

    pub fn back(&mut self) {
        self.page = self.page.back();
    }
}
