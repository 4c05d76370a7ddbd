//! Scenes, choices, and the resolved scene kind.
//!
//! Story JSON is loosely typed: `puzzle` may be a string or an object and
//! `ending` may be a string or a boolean. Everything is resolved into
//! `SceneKind` here, once, so the validators never inspect raw JSON.

use serde_json::{Map, Value};

use super::present;
use crate::core::report::{Finding, Report, Subject};

/// A player-visible edge to another scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub text: Option<String>,
    pub next: Option<String>,
}

/// How a puzzle scene names its puzzle.
#[derive(Debug, Clone, PartialEq)]
pub enum PuzzleBinding {
    /// Configuration embedded in the scene itself.
    Inline(Map<String, Value>),
    /// Id into the puzzle registry.
    Reference(String),
}

/// A scene's classification, resolved at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneKind {
    Regular,
    Puzzle { binding: PuzzleBinding },
    /// `label` is the `ending` string when one was given.
    Ending { label: Option<String> },
}

impl SceneKind {
    pub fn class(&self) -> SceneClass {
        match self {
            Self::Regular => SceneClass::Regular,
            Self::Puzzle { .. } => SceneClass::Puzzle,
            Self::Ending { .. } => SceneClass::Ending,
        }
    }
}

/// Fieldless view of `SceneKind`, used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneClass {
    Regular,
    Puzzle,
    Ending,
}

/// One of the two outcome routes of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PuzzleRoute {
    Success,
    Fail,
}

impl PuzzleRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }
}

/// Outcome targets of a scene that carries a `puzzle` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleOutcomes {
    pub success: Option<String>,
    pub fail: Option<String>,
}

impl PuzzleOutcomes {
    pub fn route(&self, route: PuzzleRoute) -> Option<&str> {
        match route {
            PuzzleRoute::Success => self.success.as_deref(),
            PuzzleRoute::Fail => self.fail.as_deref(),
        }
    }
}

/// A node of the story graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,
    pub choices: Vec<Choice>,
    pub kind: SceneKind,
    /// Present iff the scene has a `puzzle` field, whatever its kind.
    pub outcomes: Option<PuzzleOutcomes>,
    pub image: Option<String>,
}

impl Scene {
    /// A scene with no choices, no puzzle and no ending marker.
    pub fn regular(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            choices: Vec::new(),
            kind: SceneKind::Regular,
            outcomes: None,
            image: None,
        }
    }

    pub fn has_puzzle(&self) -> bool {
        self.outcomes.is_some()
    }

    pub fn is_ending(&self) -> bool {
        matches!(self.kind, SceneKind::Ending { .. })
    }

    /// Decode a scene from its story JSON value.
    ///
    /// Fields of the wrong type are reported as `InvalidFieldType` and
    /// treated as absent; the scene itself is always produced.
    pub fn from_json(id: &str, value: &Value) -> (Scene, Report) {
        let mut report = Report::new();
        let subject = || Subject::Scene(id.to_string());

        let Some(obj) = value.as_object() else {
            report.push(Finding::InvalidFieldType {
                subject: subject(),
                field: "scene".to_string(),
                expected: "an object",
            });
            return (Scene::regular(id), report);
        };

        let string_field = |key: &str, report: &mut Report| -> Option<String> {
            match present(obj, key)? {
                Value::String(s) => Some(s.clone()),
                _ => {
                    report.push(Finding::InvalidFieldType {
                        subject: subject(),
                        field: key.to_string(),
                        expected: "a string",
                    });
                    None
                }
            }
        };

        let success = string_field("success", &mut report);
        let fail = string_field("fail", &mut report);
        let image = string_field("image", &mut report);

        let choices = decode_choices(id, obj, &mut report);

        let is_ending = match present(obj, "isEnding") {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                report.push(Finding::InvalidFieldType {
                    subject: subject(),
                    field: "isEnding".to_string(),
                    expected: "a boolean",
                });
                false
            }
        };

        // `ending` counts when it is a non-empty string or `true`.
        let (ending_flag, label) = match present(obj, "ending") {
            None => (false, None),
            Some(Value::Bool(b)) => (*b, None),
            Some(Value::String(s)) if s.is_empty() => (false, None),
            Some(Value::String(s)) => (true, Some(s.clone())),
            Some(_) => {
                report.push(Finding::InvalidFieldType {
                    subject: subject(),
                    field: "ending".to_string(),
                    expected: "a string or boolean",
                });
                (false, None)
            }
        };

        // The `puzzle` key counts even when null or mistyped: the scene keeps
        // its outcome routes and only the binding is lost.
        let has_puzzle_key = obj.contains_key("puzzle");
        let binding = match obj.get("puzzle") {
            None => None,
            Some(Value::String(puzzle_id)) => Some(PuzzleBinding::Reference(puzzle_id.clone())),
            Some(Value::Object(config)) => Some(PuzzleBinding::Inline(config.clone())),
            Some(_) => {
                report.push(Finding::InvalidFieldType {
                    subject: subject(),
                    field: "puzzle".to_string(),
                    expected: "a puzzle id or an inline puzzle object",
                });
                None
            }
        };

        let outcomes = if has_puzzle_key {
            Some(PuzzleOutcomes { success, fail })
        } else {
            if success.is_some() || fail.is_some() {
                tracing::debug!(scene = id, "ignoring success/fail on scene without puzzle");
            }
            None
        };

        let kind = if is_ending || ending_flag {
            SceneKind::Ending { label }
        } else if let Some(binding) = binding {
            SceneKind::Puzzle { binding }
        } else {
            SceneKind::Regular
        };

        let scene = Scene {
            id: id.to_string(),
            choices,
            kind,
            outcomes,
            image,
        };
        (scene, report)
    }
}

fn decode_choices(id: &str, obj: &Map<String, Value>, report: &mut Report) -> Vec<Choice> {
    let subject = || Subject::Scene(id.to_string());
    let raw = match present(obj, "choices") {
        None => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            report.push(Finding::InvalidFieldType {
                subject: subject(),
                field: "choices".to_string(),
                expected: "an array",
            });
            return Vec::new();
        }
    };

    let mut choices = Vec::with_capacity(raw.len());
    for (i, item) in raw.iter().enumerate() {
        let Some(choice) = item.as_object() else {
            report.push(Finding::InvalidFieldType {
                subject: subject(),
                field: format!("choices[{}]", i),
                expected: "an object",
            });
            continue;
        };

        let text = present(choice, "text").and_then(Value::as_str).map(str::to_string);
        let next = match present(choice, "next") {
            None => {
                tracing::debug!(scene = id, choice = i, "choice has no 'next' target");
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                report.push(Finding::InvalidFieldType {
                    subject: subject(),
                    field: format!("choices[{}].next", i),
                    expected: "a string",
                });
                None
            }
        };
        choices.push(Choice { text, next });
    }
    choices
}
