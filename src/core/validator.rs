//! Runs every validation phase in a fixed order and aggregates the result.
//!
//! Phases never short-circuit: each one runs on whatever data loaded and
//! contributes its own `Report`.

use std::fmt;

use crate::core::assets::{check_assets, AssetRoot};
use crate::core::config::ValidatorConfig;
use crate::core::graph::{ClassCounts, StoryGraph};
use crate::core::loader::{load_game, LoadedGame};
use crate::core::references::{check_puzzle_bindings, check_references};
use crate::core::report::{Finding, Phase, Report};
use crate::core::traversal::{
    check_dead_ends, check_endings, check_reachability, classify_endings, EndingSummary,
    Reachability,
};

/// The findings of a single phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub report: Report,
}

/// Summary statistics printed after the findings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub agents: usize,
    pub scenes: usize,
    pub classes: ClassCounts,
    pub puzzles: usize,
    /// `None` when the start scene could not be resolved.
    pub reachable: Option<usize>,
    pub endings: EndingSummary,
}

/// The result of a full validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub phases: Vec<PhaseReport>,
    pub stats: Statistics,
}

impl ValidationOutcome {
    /// All errors, in phase order.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.phases.iter().flat_map(|p| p.report.errors())
    }

    /// All warnings, in phase order.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.phases.iter().flat_map(|p| p.report.warnings())
    }

    pub fn phase(&self, phase: Phase) -> Option<&Report> {
        self.phases
            .iter()
            .find(|p| p.phase == phase)
            .map(|p| &p.report)
    }

    /// Passed iff there are no errors; warnings never fail a run.
    pub fn is_success(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// The full text report.
impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors: Vec<_> = self.errors().collect();
        let warnings: Vec<_> = self.warnings().collect();

        writeln!(f, "=== Story Integrity Report ===\n")?;
        for (i, p) in self.phases.iter().enumerate() {
            writeln!(
                f,
                "[{}/{}] {}: {} errors, {} warnings",
                i + 1,
                self.phases.len(),
                p.phase.title(),
                p.report.errors().len(),
                p.report.warnings().len()
            )?;
        }

        if errors.is_empty() && warnings.is_empty() {
            writeln!(f, "\nAll checks passed!")?;
        }

        if !errors.is_empty() {
            writeln!(f, "\nErrors ({}):", errors.len())?;
            for e in &errors {
                writeln!(f, "  ERROR [{}] {}", e.code(), e)?;
            }
        }

        if !warnings.is_empty() {
            writeln!(f, "\nWarnings ({}):", warnings.len())?;
            for w in &warnings {
                writeln!(f, "  WARNING [{}] {}", w.code(), w)?;
            }
        }

        let s = &self.stats;
        writeln!(f, "\n=== Statistics ===\n")?;
        writeln!(f, "Agents: {}", s.agents)?;
        writeln!(f, "Scenes: {}", s.scenes)?;
        writeln!(f, "  - regular: {}", s.classes.regular)?;
        writeln!(f, "  - puzzle: {}", s.classes.puzzle)?;
        writeln!(f, "  - ending: {}", s.classes.ending)?;
        writeln!(f, "Puzzles defined: {}", s.puzzles)?;
        match s.reachable {
            Some(n) => writeln!(f, "Reachable scenes: {}/{}", n, s.scenes)?,
            None => writeln!(f, "Reachable scenes: n/a (no start scene)")?,
        }
        writeln!(f, "Endings: {}", s.endings.total())?;
        for (label, count) in &s.endings.by_label {
            writeln!(f, "  - {}: {}", label, count)?;
        }
        for (id, label) in &s.endings.endings {
            writeln!(f, "    {} ({})", id, label)?;
        }

        write!(f, "\nResult: ")?;
        if !errors.is_empty() {
            writeln!(f, "FAILED ({} errors, {} warnings)", errors.len(), warnings.len())
        } else if !warnings.is_empty() {
            writeln!(f, "PASSED with {} warnings", warnings.len())
        } else {
            writeln!(f, "PASSED")
        }
    }
}

/// Load the documents named by `config` and validate them.
pub fn validate(config: &ValidatorConfig) -> ValidationOutcome {
    let loaded = load_game(config);
    validate_game(loaded, &AssetRoot::new(config.asset_root.clone()))
}

/// Validate already-loaded game data.
pub fn validate_game(loaded: LoadedGame, assets: &AssetRoot) -> ValidationOutcome {
    let LoadedGame {
        data,
        load_report,
        agent_report,
    } = loaded;

    let graph = StoryGraph::new(data.story.scenes, data.story.start);
    let mut phases = Vec::with_capacity(Phase::ALL.len());
    let mut record = |phase: Phase, report: Report| {
        tracing::debug!(
            phase = phase.title(),
            errors = report.errors().len(),
            warnings = report.warnings().len(),
            "phase complete"
        );
        phases.push(PhaseReport { phase, report });
    };

    record(Phase::LoadIntegrity, load_report);
    record(Phase::AgentData, agent_report);
    record(Phase::AssetExistence, check_assets(&data.agents, &graph, assets));
    record(Phase::ReferentialIntegrity, check_references(&graph));
    record(
        Phase::PuzzleBinding,
        check_puzzle_bindings(&graph, &data.puzzles),
    );

    let reach = match graph.start_index() {
        Ok(start) => Some(Reachability::from_start(&graph, start)),
        Err(e) => {
            tracing::warn!(error = %e, "skipping traversal");
            None
        }
    };
    let reach_report = match &reach {
        Some(reach) => check_reachability(&graph, reach),
        None => [Finding::MissingStartScene {
            start: graph.start().to_string(),
        }]
        .into_iter()
        .collect(),
    };
    record(Phase::Reachability, reach_report);

    let endings = classify_endings(&graph);
    record(Phase::EndingClassification, check_endings(&endings));
    record(Phase::DeadEndDetection, check_dead_ends(&graph));

    let stats = Statistics {
        agents: data.agents.len(),
        scenes: graph.len(),
        classes: graph.class_counts(),
        puzzles: data.puzzles.len(),
        reachable: reach.as_ref().map(Reachability::visited_count),
        endings,
    };

    ValidationOutcome { phases, stats }
}
