//! Loads the agents, story, and puzzle documents.
//!
//! Each document is loaded independently: a failure on one becomes a
//! `LoadError` finding and the others are still attempted.

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::config::ValidatorConfig;
use crate::core::report::{Finding, Report, Subject};
use crate::schema::agent::Agent;
use crate::schema::puzzle::PuzzleRegistry;
use crate::schema::scene::Scene;

/// Start id used when the story has no `meta.start`.
pub const DEFAULT_START: &str = "intro";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{reason}")]
    Shape { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } | Self::Shape { path, .. } => path,
        }
    }

    pub fn to_finding(&self) -> Finding {
        Finding::LoadError {
            path: self.path().to_path_buf(),
            cause: self.to_string(),
        }
    }
}

/// The story document: start id and scenes in authored order.
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub start: String,
    pub scenes: Vec<Scene>,
}

impl Default for Story {
    fn default() -> Self {
        Self {
            start: DEFAULT_START.to_string(),
            scenes: Vec::new(),
        }
    }
}

/// Everything loaded for one validation run.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub agents: Vec<Agent>,
    pub story: Story,
    pub puzzles: PuzzleRegistry,
}

/// Loaded data plus the findings produced while loading.
#[derive(Debug, Clone, Default)]
pub struct LoadedGame {
    pub data: GameData,
    /// Unreadable or malformed documents and scene field type problems.
    pub load_report: Report,
    /// Agent field problems.
    pub agent_report: Report,
}

/// Load all three documents named by `config`.
pub fn load_game(config: &ValidatorConfig) -> LoadedGame {
    let mut loaded = LoadedGame::default();

    match load_agents(&config.agents) {
        Ok((agents, report)) => {
            tracing::info!(count = agents.len(), path = %config.agents.display(), "loaded agents");
            loaded.data.agents = agents;
            loaded.agent_report = report;
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %e.path().display(),
                "agents document failed to load"
            );
            loaded.load_report.push(e.to_finding());
        }
    }

    match load_story(&config.story) {
        Ok((story, report)) => {
            tracing::info!(
                scenes = story.scenes.len(),
                start = %story.start,
                path = %config.story.display(),
                "loaded story"
            );
            loaded.data.story = story;
            loaded.load_report.merge(report);
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %e.path().display(), "story document failed to load");
            loaded.load_report.push(e.to_finding());
        }
    }

    match load_puzzles(&config.puzzles) {
        Ok(puzzles) => {
            tracing::info!(
                count = puzzles.len(),
                path = %config.puzzles.display(),
                "loaded puzzles"
            );
            loaded.data.puzzles = puzzles;
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %e.path().display(),
                "puzzle document failed to load"
            );
            loaded.load_report.push(e.to_finding());
        }
    }

    loaded
}

/// Read and parse a JSON document.
pub fn read_document(path: &Path) -> Result<Value, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_agents(path: &Path) -> Result<(Vec<Agent>, Report), LoadError> {
    parse_agents(path, &read_document(path)?)
}

pub fn load_story(path: &Path) -> Result<(Story, Report), LoadError> {
    parse_story(path, &read_document(path)?)
}

pub fn load_puzzles(path: &Path) -> Result<PuzzleRegistry, LoadError> {
    parse_puzzles(path, &read_document(path)?)
}

fn shape(path: &Path, reason: &str) -> LoadError {
    LoadError::Shape {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Agents document: an object mapping agent id to agent entry.
pub fn parse_agents(path: &Path, doc: &Value) -> Result<(Vec<Agent>, Report), LoadError> {
    let entries = doc
        .as_object()
        .ok_or_else(|| shape(path, "agents document must be an object keyed by agent id"))?;

    let mut report = Report::new();
    let mut agents = Vec::with_capacity(entries.len());
    for (id, value) in entries {
        let (agent, findings) = Agent::from_json(id, value);
        report.merge(findings);
        agents.extend(agent);
    }
    Ok((agents, report))
}

/// Story document: `{meta: {start}, scenes: {id: scene}}`.
pub fn parse_story(path: &Path, doc: &Value) -> Result<(Story, Report), LoadError> {
    let root = doc
        .as_object()
        .ok_or_else(|| shape(path, "story document must be an object"))?;
    let mut report = Report::new();

    let start = match root.get("meta").and_then(|meta| meta.get("start")) {
        None | Some(Value::Null) => {
            tracing::debug!(default = DEFAULT_START, "story has no meta.start");
            DEFAULT_START.to_string()
        }
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            report.push(Finding::InvalidFieldType {
                subject: Subject::StoryMeta,
                field: "meta.start".to_string(),
                expected: "a string",
            });
            DEFAULT_START.to_string()
        }
    };

    let scenes = match root.get("scenes") {
        None | Some(Value::Null) => {
            tracing::warn!(path = %path.display(), "story document has no scenes");
            Vec::new()
        }
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(id, value)| {
                let (scene, findings) = Scene::from_json(id, value);
                report.merge(findings);
                scene
            })
            .collect(),
        Some(_) => return Err(shape(path, "'scenes' must be an object keyed by scene id")),
    };

    Ok((Story { start, scenes }, report))
}

/// Puzzle document: `{puzzles: {id: config}}`.
pub fn parse_puzzles(path: &Path, doc: &Value) -> Result<PuzzleRegistry, LoadError> {
    let root = doc
        .as_object()
        .ok_or_else(|| shape(path, "puzzle document must be an object"))?;

    let mut registry = PuzzleRegistry::new();
    match root.get("puzzles") {
        None | Some(Value::Null) => {}
        Some(Value::Object(entries)) => {
            for (id, config) in entries {
                registry.register(id.clone(), config.clone());
            }
        }
        Some(_) => return Err(shape(path, "'puzzles' must be an object keyed by puzzle id")),
    }
    Ok(registry)
}
