//! Plain-text email bodies.
//!
//! Both writers are pure and their layout is relied on by whoever reads the
//! inbox, so the exact blank lines and prefixes are part of the contract. User
//! text is copied verbatim: no escaping, embedded newlines pass through.

use std::fmt;

use crate::models::{ClubRecord, FieldGroup, Person, UpdateField, UpdateRequest};

pub fn club_subject(record: &ClubRecord) -> String {
    format!("New Club Information: {}", record.name)
}

pub fn update_subject(request: &UpdateRequest) -> String {
    format!("Club Update Request: {}", request.club_identifier)
}

/// Turn a snake_case key into "Title Case" words.
pub fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut previous_alpha = false;
    for ch in key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if previous_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(ch);
            previous_alpha = false;
        }
    }
    out
}

fn write_person_block(f: &mut fmt::Formatter<'_>, title: &str, index: usize, person: &Person) -> fmt::Result {
    write!(f, "\n{title} {}:\n", index + 1)?;
    for (attr, value) in person.attributes() {
        writeln!(f, "- {}: {value}", attr.label())?;
    }
    Ok(())
}

fn write_bullets(f: &mut fmt::Formatter<'_>, group: FieldGroup, items: &[String]) -> fmt::Result {
    write!(f, "\n{}\n", group.heading())?;
    for item in items.iter().filter(|item| !item.trim().is_empty()) {
        writeln!(f, "- {item}")?;
    }
    Ok(())
}

/// New-club report body.
struct ClubReport<'a>(&'a ClubRecord);

impl fmt::Display for ClubReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        write!(
            f,
            "\nCLUB INFORMATION\n\nName: {} {}\nCategory: {}\nDate of Establishment: {}\n\nLEADERSHIP\n",
            record.name, record.emoji, record.category, record.establishment_date
        )?;

        for (index, president) in record.presidents.iter().enumerate() {
            write_person_block(f, "President", index, president)?;
        }
        for (index, vp) in record.vice_presidents.iter().enumerate() {
            write_person_block(f, "Vice-President", index, vp)?;
        }

        write!(
            f,
            "\nMEETING SCHEDULE\n- Frequency: {}\n- Day and Time: {}\n- Location: {}\n",
            record.meeting.frequency, record.meeting.day_time, record.meeting.location
        )?;

        for group in [
            FieldGroup::Requirements,
            FieldGroup::LearningObjectives,
            FieldGroup::ForWhom,
            FieldGroup::PastActivities,
        ] {
            write_bullets(f, group, record.groups.get(group))?;
        }

        write!(f, "\n{}\n", FieldGroup::Benefits.heading())?;
        for (index, benefit) in record.groups.benefits.iter().enumerate() {
            writeln!(f, "{}. {benefit}", index + 1)?;
        }
        Ok(())
    }
}

/// Render a new-club submission.
///
/// Every list skips blank entries except Benefits, which numbers each entry
/// by its position and keeps blanks.
pub fn format_club_info(record: &ClubRecord) -> String {
    ClubReport(record).to_string()
}

fn write_people(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    title: &str,
    people: &[Person],
) -> fmt::Result {
    writeln!(f, "- {heading}:")?;
    for (index, person) in people.iter().enumerate() {
        writeln!(f, "  {title} {}:", index + 1)?;
        for (attr, value) in person.attributes() {
            writeln!(f, "    {}: {value}", humanize(attr.key()))?;
        }
    }
    Ok(())
}

/// Update request body.
struct UpdateReport<'a>(&'a UpdateRequest);

impl fmt::Display for UpdateReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = self.0;
        write!(
            f,
            "\nCLUB UPDATE REQUEST\n\nClub Identifier: {}\n\nUpdated Fields:\n",
            request.club_identifier
        )?;

        for field in &request.fields {
            let label = humanize(field.key());
            match field {
                UpdateField::BackgroundImage(_) => {
                    f.write_str("- Background Image: [Attached if present]\n")?;
                }
                UpdateField::Presidents(people) => {
                    write_people(f, "Presidents", "President", people)?;
                }
                UpdateField::VicePresidents(people) => {
                    write_people(f, "Vice-Presidents", "Vice-President", people)?;
                }
                UpdateField::Group(_, items) => {
                    writeln!(f, "- {label}:")?;
                    for (index, item) in items.iter().enumerate() {
                        writeln!(f, "    {}. {item}", index + 1)?;
                    }
                }
                UpdateField::ClubCategory(category) => writeln!(f, "- {label}: {category}")?,
                UpdateField::ClubName(value)
                | UpdateField::ClubEmoji(value)
                | UpdateField::EstablishmentDate(value)
                | UpdateField::MeetingFrequency(value)
                | UpdateField::MeetingDayTime(value)
                | UpdateField::MeetingLocation(value) => writeln!(f, "- {label}: {value}")?,
            }
        }
        Ok(())
    }
}

/// Render an update request, one entry per included field in request order.
pub fn format_update_info(request: &UpdateRequest) -> String {
    UpdateReport(request).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::BackgroundImage;
    use crate::models::{ClubCategory, FieldGroups, MeetingSchedule};

    fn person(english: &str) -> Person {
        Person {
            chinese_name: "张明".into(),
            english_name: english.into(),
            class_label: "G12.1".into(),
            email: "ming.zhang@example.com".into(),
            wechat_id: "mingz2022".into(),
        }
    }

    fn record(groups: FieldGroups) -> ClubRecord {
        ClubRecord {
            name: "Coding Club".into(),
            emoji: "💻".into(),
            category: ClubCategory::Academic,
            establishment_date: "September 15, 2022".into(),
            presidents: vec![person("Ming Zhang")],
            vice_presidents: Vec::new(),
            meeting: MeetingSchedule {
                frequency: "Weekly".into(),
                day_time: "Wednesday P8".into(),
                location: "Computer Lab 2".into(),
            },
            groups,
            background_image: None,
        }
    }

    #[test]
    fn humanize_title_cases_words() {
        assert_eq!(humanize("club_category"), "Club Category");
        assert_eq!(humanize("wechat"), "Wechat");
        assert_eq!(humanize("meeting_day_time"), "Meeting Day Time");
    }

    #[test]
    fn club_report_layout() {
        let mut groups = FieldGroups::single_blank();
        groups.requirements = vec!["Interest in code".into(), "  ".into()];
        groups.benefits = vec!["Skills".into()];
        let text = format_club_info(&record(groups));

        let expected = "\nCLUB INFORMATION\n\n\
Name: Coding Club 💻\n\
Category: Academic clubs\n\
Date of Establishment: September 15, 2022\n\
\n\
LEADERSHIP\n\
\n\
President 1:\n\
- Chinese Name: 张明\n\
- English Name: Ming Zhang\n\
- Class: G12.1\n\
- Email: ming.zhang@example.com\n\
- WeChat ID: mingz2022\n\
\n\
MEETING SCHEDULE\n\
- Frequency: Weekly\n\
- Day and Time: Wednesday P8\n\
- Location: Computer Lab 2\n\
\n\
REQUIREMENTS\n\
- Interest in code\n\
\n\
LEARNING OBJECTIVES\n\
\n\
FOR WHOM\n\
\n\
EXAMPLES OF PAST ACTIVITIES/PROJECTS\n\
\n\
BENEFITS OF JOINING\n\
1. Skills\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn president_block_lists_attributes_in_order() {
        let text = format_club_info(&record(FieldGroups::single_blank()));
        let lines: Vec<&str> = text.lines().collect();
        let start = lines.iter().position(|l| *l == "President 1:").unwrap();
        let attrs: Vec<&str> = lines[start + 1..start + 6]
            .iter()
            .map(|l| l.split(':').next().unwrap())
            .collect();
        assert_eq!(
            attrs,
            [
                "- Chinese Name",
                "- English Name",
                "- Class",
                "- Email",
                "- WeChat ID"
            ]
        );
        assert!(text.contains("- Frequency: Weekly\n"));
    }

    #[test]
    fn blank_lists_only_number_benefits() {
        let text = format_club_info(&record(FieldGroups::single_blank()));
        assert!(text.contains("\nREQUIREMENTS\n\nLEARNING OBJECTIVES\n"));
        assert!(text.contains("\nFOR WHOM\n\nEXAMPLES OF PAST ACTIVITIES/PROJECTS\n\n"));
        assert!(text.ends_with("\nBENEFITS OF JOINING\n1. \n"));
        assert!(!text.contains("\n- \n"));
    }

    #[test]
    fn vice_presidents_follow_presidents() {
        let mut club = record(FieldGroups::single_blank());
        club.vice_presidents = vec![person("Hua Li"), person("Wei Chen")];
        let text = format_club_info(&club);
        let president = text.find("President 1:").unwrap();
        let vp2 = text.find("Vice-President 2:").unwrap();
        assert!(president < vp2);
        assert!(text.contains("\nVice-President 1:\n- Chinese Name: 张明\n- English Name: Hua Li\n"));
    }

    #[test]
    fn user_text_passes_through_verbatim() {
        let mut club = record(FieldGroups::single_blank());
        club.name = "A & B\n<Club>".into();
        let text = format_club_info(&club);
        assert!(text.contains("Name: A & B\n<Club> 💻\n"));
    }

    #[test]
    fn update_with_only_category() {
        let request = UpdateRequest::new(
            "Chess Club",
            vec![UpdateField::ClubCategory(ClubCategory::Language)],
        );
        let text = format_update_info(&request);
        assert_eq!(
            text,
            "\nCLUB UPDATE REQUEST\n\nClub Identifier: Chess Club\n\nUpdated Fields:\n- Club Category: Language clubs\n"
        );
        assert_eq!(text.lines().filter(|l| l.starts_with("- ")).count(), 1);
        assert_eq!(update_subject(&request), "Club Update Request: Chess Club");
    }

    #[test]
    fn update_renders_lists_people_and_image() {
        let request = UpdateRequest::new(
            "Chess Club",
            vec![
                UpdateField::Presidents(vec![person("Ming Zhang")]),
                UpdateField::Group(FieldGroup::PastActivities, vec!["Tournament".into(), "".into()]),
                UpdateField::MeetingDayTime("Friday P3".into()),
                UpdateField::BackgroundImage(BackgroundImage {
                    original_name: "bg.png".into(),
                    bytes: vec![1, 2, 3],
                }),
            ],
        );
        let text = format_update_info(&request);
        let expected_tail = "Updated Fields:\n\
- Presidents:\n  President 1:\n    Chinese Name: 张明\n    English Name: Ming Zhang\n    Class: G12.1\n    Email: ming.zhang@example.com\n    Wechat: mingz2022\n\
- Past Activities:\n    1. Tournament\n    2. \n\
- Meeting Day Time: Friday P3\n\
- Background Image: [Attached if present]\n";
        assert!(text.ends_with(expected_tail), "{text}");
    }

    #[test]
    fn update_vice_presidents_heading() {
        let request = UpdateRequest::new(
            "Chess Club",
            vec![UpdateField::VicePresidents(vec![person("Hua Li")])],
        );
        let text = format_update_info(&request);
        assert!(text.contains("- Vice-Presidents:\n  Vice-President 1:\n"));
    }

    #[test]
    fn subjects_use_names() {
        let club = record(FieldGroups::single_blank());
        assert_eq!(club_subject(&club), "New Club Information: Coding Club");
    }
}
