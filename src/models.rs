//! Domain models assembled from the form at submit time and handed to the
//! report writer. They are plain data holders: nothing here is persisted and a
//! record lives only for the duration of a single submission.

use std::fmt;

use crate::image::BackgroundImage;
use crate::lists::CountBounds;

/// The fixed set of categories a club can be filed under. The order here is
/// the order of the selector on both form pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClubCategory {
    #[default]
    Academic,
    ArtsAndCreative,
    CommunityService,
    CulturalDiversity,
    SportFitness,
    Language,
    SchoolTeams,
    Test,
}

impl ClubCategory {
    pub const ALL: [ClubCategory; 8] = [
        ClubCategory::Academic,
        ClubCategory::ArtsAndCreative,
        ClubCategory::CommunityService,
        ClubCategory::CulturalDiversity,
        ClubCategory::SportFitness,
        ClubCategory::Language,
        ClubCategory::SchoolTeams,
        ClubCategory::Test,
    ];

    /// Label used in the selector and in outgoing reports.
    pub fn label(self) -> &'static str {
        match self {
            ClubCategory::Academic => "Academic clubs",
            ClubCategory::ArtsAndCreative => "Arts and creative clubs",
            ClubCategory::CommunityService => "Community Service & Volunteering clubs",
            ClubCategory::CulturalDiversity => "Cultural & Diversity clubs",
            ClubCategory::SportFitness => "Sport & fitness clubs",
            ClubCategory::Language => "Language clubs",
            ClubCategory::SchoolTeams => "School Teams",
            ClubCategory::Test => "Test Category",
        }
    }

    /// Step through the selector, wrapping at both ends.
    pub fn cycle(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or(0) as isize;
        Self::ALL[(index + delta).rem_euclid(len) as usize]
    }
}

impl fmt::Display for ClubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One attribute of a president or vice-president.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonAttr {
    ChineseName,
    EnglishName,
    Class,
    Email,
    WeChat,
}

impl PersonAttr {
    pub const ALL: [PersonAttr; 5] = [
        PersonAttr::ChineseName,
        PersonAttr::EnglishName,
        PersonAttr::Class,
        PersonAttr::Email,
        PersonAttr::WeChat,
    ];

    /// Label used in the new-club report.
    pub fn label(self) -> &'static str {
        match self {
            PersonAttr::ChineseName => "Chinese Name",
            PersonAttr::EnglishName => "English Name",
            PersonAttr::Class => "Class",
            PersonAttr::Email => "Email",
            PersonAttr::WeChat => "WeChat ID",
        }
    }

    /// Raw attribute key; the update report humanizes this instead of using
    /// `label`, so "wechat" shows up as "Wechat" there.
    pub fn key(self) -> &'static str {
        match self {
            PersonAttr::ChineseName => "chinese_name",
            PersonAttr::EnglishName => "english_name",
            PersonAttr::Class => "class",
            PersonAttr::Email => "email",
            PersonAttr::WeChat => "wechat",
        }
    }

    /// Label shown next to the input on the form pages.
    pub fn input_label(self) -> &'static str {
        match self {
            PersonAttr::ChineseName => "Chinese Name",
            PersonAttr::EnglishName => "English Name",
            PersonAttr::Class => "Class [Grade/Class]",
            PersonAttr::Email => "Email Address",
            PersonAttr::WeChat => "WeChat ID",
        }
    }
}

/// A president or vice-president. All fields are free text; no format or
/// uniqueness checks are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub chinese_name: String,
    pub english_name: String,
    pub class_label: String,
    pub email: String,
    pub wechat_id: String,
}

impl Person {
    pub fn get(&self, attr: PersonAttr) -> &str {
        match attr {
            PersonAttr::ChineseName => &self.chinese_name,
            PersonAttr::EnglishName => &self.english_name,
            PersonAttr::Class => &self.class_label,
            PersonAttr::Email => &self.email,
            PersonAttr::WeChat => &self.wechat_id,
        }
    }

    pub fn get_mut(&mut self, attr: PersonAttr) -> &mut String {
        match attr {
            PersonAttr::ChineseName => &mut self.chinese_name,
            PersonAttr::EnglishName => &mut self.english_name,
            PersonAttr::Class => &mut self.class_label,
            PersonAttr::Email => &mut self.email,
            PersonAttr::WeChat => &mut self.wechat_id,
        }
    }

    /// Attributes in report order.
    pub fn attributes(&self) -> impl Iterator<Item = (PersonAttr, &str)> + '_ {
        PersonAttr::ALL.into_iter().map(move |attr| (attr, self.get(attr)))
    }
}

/// The five user-resizable lists of free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Requirements,
    LearningObjectives,
    ForWhom,
    PastActivities,
    Benefits,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 5] = [
        FieldGroup::Requirements,
        FieldGroup::LearningObjectives,
        FieldGroup::ForWhom,
        FieldGroup::PastActivities,
        FieldGroup::Benefits,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FieldGroup::Requirements => "requirements",
            FieldGroup::LearningObjectives => "learning_objectives",
            FieldGroup::ForWhom => "for_whom",
            FieldGroup::PastActivities => "past_activities",
            FieldGroup::Benefits => "benefits",
        }
    }

    /// Section heading in the new-club report.
    pub fn heading(self) -> &'static str {
        match self {
            FieldGroup::Requirements => "REQUIREMENTS",
            FieldGroup::LearningObjectives => "LEARNING OBJECTIVES",
            FieldGroup::ForWhom => "FOR WHOM",
            FieldGroup::PastActivities => "EXAMPLES OF PAST ACTIVITIES/PROJECTS",
            FieldGroup::Benefits => "BENEFITS OF JOINING",
        }
    }

    /// Section title on the form pages.
    pub fn title(self) -> &'static str {
        match self {
            FieldGroup::Requirements => "Requirements",
            FieldGroup::LearningObjectives => "Learning Objectives",
            FieldGroup::ForWhom => "For Whom",
            FieldGroup::PastActivities => "Examples of Past Activities/Projects",
            FieldGroup::Benefits => "Benefits of Joining",
        }
    }

    /// Label of a single entry, suffixed with its 1-based position in the UI.
    pub fn item_label(self) -> &'static str {
        match self {
            FieldGroup::Requirements => "Requirement",
            FieldGroup::LearningObjectives => "Learning Objective",
            FieldGroup::ForWhom => "For Whom",
            FieldGroup::PastActivities => "Activity",
            FieldGroup::Benefits => "Benefit",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            FieldGroup::Requirements => {
                "e.g. No prerequisite / all students can join / Students with a GPA of > 3.8"
            }
            FieldGroup::LearningObjectives => "e.g. Learn about image processing",
            FieldGroup::ForWhom => {
                "Ideal for students who: (e.g. love math, are passionate about art, enjoy outdoor activities, etc.)"
            }
            FieldGroup::PastActivities | FieldGroup::Benefits => "Please write in full sentences.",
        }
    }

    pub fn bounds(self) -> CountBounds {
        match self {
            FieldGroup::ForWhom => CountBounds::new(1, 5),
            _ => CountBounds::new(1, 10),
        }
    }
}

/// Storage for the five field groups, addressed structurally by `FieldGroup`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldGroups {
    pub requirements: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub for_whom: Vec<String>,
    pub past_activities: Vec<String>,
    pub benefits: Vec<String>,
}

impl FieldGroups {
    /// Every group holding one blank entry, the state of a fresh form.
    pub fn single_blank() -> Self {
        let one = || vec![String::new()];
        Self {
            requirements: one(),
            learning_objectives: one(),
            for_whom: one(),
            past_activities: one(),
            benefits: one(),
        }
    }

    pub fn get(&self, group: FieldGroup) -> &[String] {
        match group {
            FieldGroup::Requirements => &self.requirements,
            FieldGroup::LearningObjectives => &self.learning_objectives,
            FieldGroup::ForWhom => &self.for_whom,
            FieldGroup::PastActivities => &self.past_activities,
            FieldGroup::Benefits => &self.benefits,
        }
    }

    pub fn get_mut(&mut self, group: FieldGroup) -> &mut Vec<String> {
        match group {
            FieldGroup::Requirements => &mut self.requirements,
            FieldGroup::LearningObjectives => &mut self.learning_objectives,
            FieldGroup::ForWhom => &mut self.for_whom,
            FieldGroup::PastActivities => &mut self.past_activities,
            FieldGroup::Benefits => &mut self.benefits,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingSchedule {
    pub frequency: String,
    pub day_time: String,
    pub location: String,
}

/// A complete new-club submission, built fresh from the draft on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubRecord {
    pub name: String,
    pub emoji: String,
    pub category: ClubCategory,
    /// Already formatted for the report, e.g. "September 15, 2022".
    pub establishment_date: String,
    pub presidents: Vec<Person>,
    pub vice_presidents: Vec<Person>,
    pub meeting: MeetingSchedule,
    pub groups: FieldGroups,
    pub background_image: Option<BackgroundImage>,
}

/// One requested change inside an update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateField {
    ClubName(String),
    ClubEmoji(String),
    ClubCategory(ClubCategory),
    EstablishmentDate(String),
    Presidents(Vec<Person>),
    VicePresidents(Vec<Person>),
    MeetingFrequency(String),
    MeetingDayTime(String),
    MeetingLocation(String),
    Group(FieldGroup, Vec<String>),
    BackgroundImage(BackgroundImage),
}

impl UpdateField {
    pub fn key(&self) -> &'static str {
        match self {
            UpdateField::ClubName(_) => "club_name",
            UpdateField::ClubEmoji(_) => "club_emoji",
            UpdateField::ClubCategory(_) => "club_category",
            UpdateField::EstablishmentDate(_) => "establishment_date",
            UpdateField::Presidents(_) => "presidents",
            UpdateField::VicePresidents(_) => "vice_presidents",
            UpdateField::MeetingFrequency(_) => "meeting_frequency",
            UpdateField::MeetingDayTime(_) => "meeting_day_time",
            UpdateField::MeetingLocation(_) => "meeting_location",
            UpdateField::Group(group, _) => group.key(),
            UpdateField::BackgroundImage(_) => "background_image",
        }
    }

    /// Empty strings and empty lists count as "left blank" and are dropped
    /// from the outgoing request. Lists of blank strings are not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            UpdateField::ClubName(value)
            | UpdateField::ClubEmoji(value)
            | UpdateField::EstablishmentDate(value)
            | UpdateField::MeetingFrequency(value)
            | UpdateField::MeetingDayTime(value)
            | UpdateField::MeetingLocation(value) => value.is_empty(),
            UpdateField::Presidents(people) | UpdateField::VicePresidents(people) => {
                people.is_empty()
            }
            UpdateField::Group(_, items) => items.is_empty(),
            UpdateField::ClubCategory(_) | UpdateField::BackgroundImage(_) => false,
        }
    }
}

/// An advisory request to change an existing club, identified only by the
/// free text the user typed. Nothing is looked up or mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub club_identifier: String,
    pub fields: Vec<UpdateField>,
}

impl UpdateRequest {
    /// Build a request, silently dropping fields that were left blank.
    pub fn new(club_identifier: impl Into<String>, fields: Vec<UpdateField>) -> Self {
        Self {
            club_identifier: club_identifier.into(),
            fields: fields.into_iter().filter(|f| !f.is_empty()).collect(),
        }
    }

    pub fn background_image(&self) -> Option<&BackgroundImage> {
        self.fields.iter().find_map(|field| match field {
            UpdateField::BackgroundImage(image) => Some(image),
            _ => None,
        })
    }
}
