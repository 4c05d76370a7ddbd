//! Playable agents and their decoding from the agents document.

use serde_json::{Map, Value};

use super::present;
use crate::core::report::{Finding, Report, Subject};

/// Fields every agent entry must carry.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "name",
    "tag",
    "avatar",
    "qualities",
    "specialItem",
    "fullbody",
];

/// A playable character's identity and presentation data.
///
/// Required fields are still `Option`s: a missing field is reported during
/// decoding and the agent is kept, so later phases see partial data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agent {
    pub id: String,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub qualities: Vec<String>,
    pub special_item: Option<String>,
    pub avatar: Option<String>,
    pub fullbody: Option<String>,
    pub lucky_number: Option<u64>,
}

impl Agent {
    /// Decode one entry of the agents document.
    ///
    /// Returns `None` only when the entry is not a JSON object.
    pub fn from_json(id: &str, value: &Value) -> (Option<Agent>, Report) {
        let mut report = Report::new();

        let Some(obj) = value.as_object() else {
            report.push(Finding::InvalidFieldType {
                subject: Subject::Agent(id.to_string()),
                field: "agent".to_string(),
                expected: "an object",
            });
            return (None, report);
        };

        for field in REQUIRED_FIELDS {
            if present(obj, field).is_none() {
                report.push(Finding::MissingRequiredField {
                    subject: Subject::Agent(id.to_string()),
                    field: field.to_string(),
                });
            }
        }

        let agent = Agent {
            id: id.to_string(),
            name: string_field(id, obj, "name", &mut report),
            tag: string_field(id, obj, "tag", &mut report),
            qualities: qualities(id, obj, &mut report),
            special_item: string_field(id, obj, "specialItem", &mut report),
            avatar: string_field(id, obj, "avatar", &mut report),
            fullbody: string_field(id, obj, "fullbody", &mut report),
            lucky_number: lucky_number(id, obj, &mut report),
        };
        (Some(agent), report)
    }
}

fn invalid(id: &str, field: &str, expected: &'static str) -> Finding {
    Finding::InvalidFieldType {
        subject: Subject::Agent(id.to_string()),
        field: field.to_string(),
        expected,
    }
}

fn string_field(
    id: &str,
    obj: &Map<String, Value>,
    key: &str,
    report: &mut Report,
) -> Option<String> {
    match present(obj, key)? {
        Value::String(s) => Some(s.clone()),
        _ => {
            report.push(invalid(id, key, "a string"));
            None
        }
    }
}

fn qualities(id: &str, obj: &Map<String, Value>, report: &mut Report) -> Vec<String> {
    let Some(value) = present(obj, "qualities") else {
        return Vec::new();
    };
    let strings: Option<Vec<String>> = value
        .as_array()
        .and_then(|items| items.iter().map(|q| q.as_str().map(str::to_string)).collect());
    strings.unwrap_or_else(|| {
        report.push(invalid(id, "qualities", "an array of strings"));
        Vec::new()
    })
}

fn lucky_number(id: &str, obj: &Map<String, Value>, report: &mut Report) -> Option<u64> {
    let Some(value) = present(obj, "luckyNumber") else {
        report.push(Finding::MissingLuckyNumber {
            agent: id.to_string(),
        });
        return None;
    };
    let number = value.as_u64();
    if number.is_none() {
        report.push(invalid(id, "luckyNumber", "a non-negative integer"));
    }
    number
}
