//! The sample club shown in example mode.

use crate::models::{ClubCategory, FieldGroups, MeetingSchedule, Person};

pub const EXAMPLE_NAME: &str = "Coding Club";
pub const EXAMPLE_EMOJI: &str = "💻";
pub const EXAMPLE_CATEGORY: ClubCategory = ClubCategory::Academic;
/// ISO form of "September 15, 2022", as typed into the date field.
pub const EXAMPLE_DATE: &str = "2022-09-15";

fn person(chinese: &str, english: &str, class: &str, email: &str, wechat: &str) -> Person {
    Person {
        chinese_name: chinese.to_string(),
        english_name: english.to_string(),
        class_label: class.to_string(),
        email: email.to_string(),
        wechat_id: wechat.to_string(),
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn presidents() -> Vec<Person> {
    vec![person(
        "张明",
        "Ming Zhang",
        "G12.1",
        "ming.zhang@example.com",
        "mingz2022",
    )]
}

pub fn vice_presidents() -> Vec<Person> {
    vec![person(
        "李华",
        "Hua Li",
        "G11.1",
        "hua.li@example.com",
        "huali_code",
    )]
}

pub fn meeting() -> MeetingSchedule {
    MeetingSchedule {
        frequency: "Weekly".to_string(),
        day_time: "Wednesday P8".to_string(),
        location: "Computer Lab 2".to_string(),
    }
}

pub fn groups() -> FieldGroups {
    FieldGroups {
        requirements: lines(&[
            "Basic programming knowledge is helpful but not required",
            "Interest in learning to code",
            "Commitment to attend regular meetings",
        ]),
        learning_objectives: lines(&[
            "Learn programming fundamentals in Python and JavaScript",
            "Build web applications and games",
            "Understand software development principles",
        ]),
        for_whom: lines(&[
            "Students interested in computer science and programming",
            "Those who want to pursue careers in technology",
            "Creative problem solvers who enjoy logical thinking",
        ]),
        past_activities: lines(&[
            "Developed a school event management app",
            "Participated in the regional coding competition",
            "Hosted a workshop on building personal websites",
        ]),
        benefits: lines(&[
            "Gain valuable programming skills relevant to many careers",
            "Build an impressive portfolio of coding projects",
            "Connect with like-minded peers and industry professionals",
        ]),
    }
}
