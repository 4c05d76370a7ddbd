//! Findings, severities, and the per-phase `Report` value every validator returns.

use std::fmt;
use std::path::PathBuf;

use crate::core::graph::EdgeKind;
use crate::schema::scene::PuzzleRoute;

/// How a finding affects the overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// The record a finding is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    Agent(String),
    Scene(String),
    /// The story document's `meta` block.
    StoryMeta,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(id) => write!(f, "agent '{}'", id),
            Self::Scene(id) => write!(f, "scene '{}'", id),
            Self::StoryMeta => write!(f, "story meta"),
        }
    }
}

/// A single validation finding.
///
/// Findings are data, not failures: every phase turns its problems into
/// findings and the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    // Errors
    LoadError {
        path: PathBuf,
        cause: String,
    },
    MissingRequiredField {
        subject: Subject,
        field: String,
    },
    InvalidFieldType {
        subject: Subject,
        field: String,
        expected: &'static str,
    },
    BrokenReference {
        from: String,
        edge_kind: EdgeKind,
        to: String,
    },
    MissingPuzzleDefinition {
        scene: String,
        puzzle_id: String,
    },
    MissingCriticalAsset {
        subject: Subject,
        field: &'static str,
        path: String,
    },
    MissingStartScene {
        start: String,
    },

    // Warnings
    MissingOptionalAsset {
        subject: Subject,
        field: &'static str,
        path: String,
    },
    MissingLuckyNumber {
        agent: String,
    },
    MissingPuzzleRoute {
        scene: String,
        missing: PuzzleRoute,
    },
    UnreachableScene {
        id: String,
    },
    DeadEnd {
        id: String,
    },
    NoEndingsFound,
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Self::LoadError { .. }
            | Self::MissingRequiredField { .. }
            | Self::InvalidFieldType { .. }
            | Self::BrokenReference { .. }
            | Self::MissingPuzzleDefinition { .. }
            | Self::MissingCriticalAsset { .. }
            | Self::MissingStartScene { .. } => Severity::Error,
            Self::MissingOptionalAsset { .. }
            | Self::MissingLuckyNumber { .. }
            | Self::MissingPuzzleRoute { .. }
            | Self::UnreachableScene { .. }
            | Self::DeadEnd { .. }
            | Self::NoEndingsFound => Severity::Warning,
        }
    }

    /// Stable machine-readable name of the finding kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::LoadError { .. } => "LoadError",
            Self::MissingRequiredField { .. } => "MissingRequiredField",
            Self::InvalidFieldType { .. } => "InvalidFieldType",
            Self::BrokenReference { .. } => "BrokenReference",
            Self::MissingPuzzleDefinition { .. } => "MissingPuzzleDefinition",
            Self::MissingCriticalAsset { .. } => "MissingCriticalAsset",
            Self::MissingStartScene { .. } => "MissingStartScene",
            Self::MissingOptionalAsset { .. } => "MissingOptionalAsset",
            Self::MissingLuckyNumber { .. } => "MissingLuckyNumber",
            Self::MissingPuzzleRoute { .. } => "MissingPuzzleRoute",
            Self::UnreachableScene { .. } => "UnreachableScene",
            Self::DeadEnd { .. } => "DeadEnd",
            Self::NoEndingsFound => "NoEndingsFound",
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadError { path, cause } => {
                write!(f, "could not load '{}': {}", path.display(), cause)
            }
            Self::MissingRequiredField { subject, field } => {
                write!(f, "{} is missing required field '{}'", subject, field)
            }
            Self::InvalidFieldType {
                subject,
                field,
                expected,
            } => write!(f, "{}: field '{}' must be {}", subject, field, expected),
            Self::BrokenReference {
                from,
                edge_kind,
                to,
            } => write!(
                f,
                "scene '{}' -> {} '{}' (no such scene)",
                from,
                edge_kind.as_str(),
                to
            ),
            Self::MissingPuzzleDefinition { scene, puzzle_id } => write!(
                f,
                "scene '{}' references puzzle '{}' which is not defined",
                scene, puzzle_id
            ),
            Self::MissingCriticalAsset {
                subject,
                field,
                path,
            } => write!(f, "{}: {} image not found at '{}'", subject, field, path),
            Self::MissingStartScene { start } => write!(
                f,
                "start scene '{}' is not defined; traversal skipped",
                start
            ),
            Self::MissingOptionalAsset {
                subject,
                field,
                path,
            } => write!(
                f,
                "{}: {} image not found at '{}' (optional)",
                subject, field, path
            ),
            Self::MissingLuckyNumber { agent } => {
                write!(f, "agent '{}' has no luckyNumber", agent)
            }
            Self::MissingPuzzleRoute { scene, missing } => write!(
                f,
                "scene '{}': puzzle has no '{}' route",
                scene,
                missing.as_str()
            ),
            Self::UnreachableScene { id } => {
                write!(f, "scene '{}' is unreachable from the start scene", id)
            }
            Self::DeadEnd { id } => write!(
                f,
                "scene '{}' is a dead end (no choices, no puzzle, not an ending)",
                id
            ),
            Self::NoEndingsFound => write!(f, "no scene is marked as an ending"),
        }
    }
}

/// Errors and warnings produced by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding under its severity.
    pub fn push(&mut self, finding: Finding) {
        match finding.severity() {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }

    /// Append another report, keeping `self`'s findings first.
    pub fn merge(&mut self, other: Report) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_clean()
    }
}

impl Extend<Finding> for Report {
    fn extend<I: IntoIterator<Item = Finding>>(&mut self, iter: I) {
        for finding in iter {
            self.push(finding);
        }
    }
}

impl FromIterator<Finding> for Report {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        let mut report = Report::new();
        report.extend(iter);
        report
    }
}

/// The validation phases, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    LoadIntegrity,
    AgentData,
    AssetExistence,
    ReferentialIntegrity,
    PuzzleBinding,
    Reachability,
    EndingClassification,
    DeadEndDetection,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Phase::LoadIntegrity,
        Phase::AgentData,
        Phase::AssetExistence,
        Phase::ReferentialIntegrity,
        Phase::PuzzleBinding,
        Phase::Reachability,
        Phase::EndingClassification,
        Phase::DeadEndDetection,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::LoadIntegrity => "Load integrity",
            Self::AgentData => "Agent data",
            Self::AssetExistence => "Asset existence",
            Self::ReferentialIntegrity => "Referential integrity",
            Self::PuzzleBinding => "Puzzle binding",
            Self::Reachability => "Reachability",
            Self::EndingClassification => "Ending classification",
            Self::DeadEndDetection => "Dead-end detection",
        }
    }
}
