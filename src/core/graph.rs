//! The story graph: an arena of scenes indexed by dense `SceneIndex`,
//! with outgoing edges derived from choices and puzzle outcomes.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::schema::scene::{PuzzleRoute, Scene, SceneClass};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("start scene '{0}' is not defined in the scene mapping")]
    UnknownStart(String),
}

/// Dense index of a scene within a `StoryGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneIndex(pub usize);

/// What produced an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Choice,
    Success,
    Fail,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Choice => "choice",
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }
}

impl From<PuzzleRoute> for EdgeKind {
    fn from(route: PuzzleRoute) -> Self {
        match route {
            PuzzleRoute::Success => Self::Success,
            PuzzleRoute::Fail => Self::Fail,
        }
    }
}

/// A directed edge. `resolved` is `None` when `target` names no scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub target: String,
    pub resolved: Option<SceneIndex>,
}

/// Scene counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub regular: usize,
    pub puzzle: usize,
    pub ending: usize,
}

/// Immutable directed graph over scenes.
#[derive(Debug, Clone)]
pub struct StoryGraph {
    scenes: Vec<Scene>,
    index: FxHashMap<String, SceneIndex>,
    edges: Vec<Vec<Edge>>,
    start: String,
}

impl StoryGraph {
    /// Build the graph from decoded scenes, in the given order.
    ///
    /// Construction never fails: dangling edges are kept unresolved and the
    /// start id is only checked by [`StoryGraph::start_index`]. A repeated
    /// scene id keeps its first definition.
    pub fn new(scenes: Vec<Scene>, start: impl Into<String>) -> Self {
        let mut index = FxHashMap::default();
        let mut arena = Vec::with_capacity(scenes.len());
        for scene in scenes {
            if index.contains_key(&scene.id) {
                tracing::warn!(scene = %scene.id, "duplicate scene id, keeping first definition");
                continue;
            }
            index.insert(scene.id.clone(), SceneIndex(arena.len()));
            arena.push(scene);
        }

        let edges = arena
            .iter()
            .map(|scene| outgoing_edges(scene, &index))
            .collect();

        Self {
            scenes: arena,
            index,
            edges,
            start: start.into(),
        }
    }

    /// The declared start id, whether or not it resolves.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Resolve the start id. Traversal is impossible when this fails.
    pub fn start_index(&self) -> Result<SceneIndex, GraphError> {
        self.lookup(&self.start)
            .ok_or_else(|| GraphError::UnknownStart(self.start.clone()))
    }

    pub fn lookup(&self, id: &str) -> Option<SceneIndex> {
        self.index.get(id).copied()
    }

    pub fn scene(&self, idx: SceneIndex) -> &Scene {
        &self.scenes[idx.0]
    }

    /// Outgoing edges: choices in declared order, then success, then fail.
    pub fn edges(&self, idx: SceneIndex) -> &[Edge] {
        &self.edges[idx.0]
    }

    pub fn class(&self, idx: SceneIndex) -> SceneClass {
        self.scene(idx).kind.class()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SceneIndex, &Scene)> {
        self.scenes
            .iter()
            .enumerate()
            .map(|(i, scene)| (SceneIndex(i), scene))
    }

    pub fn class_counts(&self) -> ClassCounts {
        let mut counts = ClassCounts::default();
        for scene in &self.scenes {
            match scene.kind.class() {
                SceneClass::Regular => counts.regular += 1,
                SceneClass::Puzzle => counts.puzzle += 1,
                SceneClass::Ending => counts.ending += 1,
            }
        }
        counts
    }
}

fn outgoing_edges(scene: &Scene, index: &FxHashMap<String, SceneIndex>) -> Vec<Edge> {
    let edge = |kind: EdgeKind, target: &str| Edge {
        kind,
        target: target.to_string(),
        resolved: index.get(target).copied(),
    };

    let mut edges: Vec<Edge> = scene
        .choices
        .iter()
        .filter_map(|choice| choice.next.as_deref())
        .filter(|next| !next.is_empty())
        .map(|next| edge(EdgeKind::Choice, next))
        .collect();

    if let Some(outcomes) = &scene.outcomes {
        for route in [PuzzleRoute::Success, PuzzleRoute::Fail] {
            if let Some(target) = outcomes.route(route).filter(|t| !t.is_empty()) {
                edges.push(edge(route.into(), target));
            }
        }
    }
    edges
}
