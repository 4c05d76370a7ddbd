//! Graph traversal passes: reachability, dead ends, and ending classification.

use std::collections::{BTreeMap, VecDeque};

use crate::core::graph::{SceneIndex, StoryGraph};
use crate::core::report::{Finding, Report};
use crate::schema::scene::SceneKind;

/// Label used for endings that carry no `ending` string.
pub const DEFAULT_ENDING_LABEL: &str = "final";

/// The visited/unvisited partition of a breadth-first traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability {
    visited: Vec<bool>,
    /// Discovery order, starting with the start scene.
    order: Vec<SceneIndex>,
}

impl Reachability {
    /// Breadth-first traversal from `start` over every resolved edge.
    pub fn from_start(graph: &StoryGraph, start: SceneIndex) -> Self {
        let mut visited = vec![false; graph.len()];
        let mut order = Vec::with_capacity(graph.len());
        let mut queue = VecDeque::new();

        visited[start.0] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            order.push(current);
            for edge in graph.edges(current) {
                let Some(next) = edge.resolved else {
                    continue;
                };
                if !visited[next.0] {
                    visited[next.0] = true;
                    queue.push_back(next);
                }
            }
        }

        Self { visited, order }
    }

    pub fn is_visited(&self, idx: SceneIndex) -> bool {
        self.visited[idx.0]
    }

    pub fn order(&self) -> &[SceneIndex] {
        &self.order
    }

    pub fn visited_count(&self) -> usize {
        self.order.len()
    }
}

/// One `UnreachableScene` warning per scene outside the visited set, in
/// graph order.
pub fn check_reachability(graph: &StoryGraph, reach: &Reachability) -> Report {
    graph
        .iter()
        .filter(|(idx, _)| !reach.is_visited(*idx))
        .map(|(_, scene)| Finding::UnreachableScene {
            id: scene.id.clone(),
        })
        .collect()
}

/// Non-ending scenes with no choices and no puzzle.
pub fn check_dead_ends(graph: &StoryGraph) -> Report {
    graph
        .iter()
        .filter(|(_, scene)| !scene.is_ending() && scene.choices.is_empty() && !scene.has_puzzle())
        .map(|(_, scene)| Finding::DeadEnd {
            id: scene.id.clone(),
        })
        .collect()
}

/// Ending scenes grouped by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndingSummary {
    /// `(scene id, label)` sorted by scene id.
    pub endings: Vec<(String, String)>,
    pub by_label: BTreeMap<String, usize>,
}

impl EndingSummary {
    pub fn total(&self) -> usize {
        self.endings.len()
    }
}

pub fn classify_endings(graph: &StoryGraph) -> EndingSummary {
    let mut summary = EndingSummary::default();
    for (_, scene) in graph.iter() {
        let SceneKind::Ending { label } = &scene.kind else {
            continue;
        };
        let label = label.as_deref().unwrap_or(DEFAULT_ENDING_LABEL).to_string();
        *summary.by_label.entry(label.clone()).or_insert(0) += 1;
        summary.endings.push((scene.id.clone(), label));
    }
    summary.endings.sort();
    summary
}

pub fn check_endings(summary: &EndingSummary) -> Report {
    let mut report = Report::new();
    if summary.total() == 0 {
        report.push(Finding::NoEndingsFound);
    }
    report
}
