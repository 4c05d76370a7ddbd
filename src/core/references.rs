//! Referential integrity and puzzle binding checks.

use crate::core::graph::StoryGraph;
use crate::core::report::{Finding, Report};
use crate::schema::puzzle::PuzzleRegistry;
use crate::schema::scene::{PuzzleBinding, PuzzleRoute, SceneKind};

/// Report every edge whose target is not a scene. Exhaustive: one finding
/// per dangling edge.
pub fn check_references(graph: &StoryGraph) -> Report {
    let mut report = Report::new();
    for (idx, scene) in graph.iter() {
        for edge in graph.edges(idx) {
            if edge.resolved.is_none() {
                report.push(Finding::BrokenReference {
                    from: scene.id.clone(),
                    edge_kind: edge.kind,
                    to: edge.target.clone(),
                });
            }
        }
    }
    report
}

/// Check puzzle-classified scenes: referenced puzzle ids must be registered,
/// and both outcome routes should be present.
pub fn check_puzzle_bindings(graph: &StoryGraph, puzzles: &PuzzleRegistry) -> Report {
    let mut report = Report::new();
    for (_, scene) in graph.iter() {
        let SceneKind::Puzzle { binding } = &scene.kind else {
            continue;
        };

        match binding {
            PuzzleBinding::Inline(_) => {
                tracing::debug!(scene = %scene.id, "inline puzzle binding");
            }
            PuzzleBinding::Reference(puzzle_id) => {
                if !puzzles.contains(puzzle_id) {
                    report.push(Finding::MissingPuzzleDefinition {
                        scene: scene.id.clone(),
                        puzzle_id: puzzle_id.clone(),
                    });
                }
            }
        }

        for route in [PuzzleRoute::Success, PuzzleRoute::Fail] {
            let target = scene.outcomes.as_ref().and_then(|o| o.route(route));
            if target.is_none() {
                report.push(Finding::MissingPuzzleRoute {
                    scene: scene.id.clone(),
                    missing: route,
                });
            }
        }
    }
    report
}
