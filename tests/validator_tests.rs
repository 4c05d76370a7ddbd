//! End-to-end validation runs over temporary game directories.

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use story_integrity::core::graph::EdgeKind;
use story_integrity::schema::scene::PuzzleRoute;
use story_integrity::{validate, Finding, Phase, ValidationOutcome, ValidatorConfig};

struct Game {
    dir: TempDir,
}

impl Game {
    fn new(story: Value) -> Self {
        let game = Game {
            dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(game.dir.path().join("web/data")).unwrap();
        game.write("web/data/agents.json", &json!({}).to_string());
        game.write("web/data/story.json", &story.to_string());
        game.write("web/data/puzzles.json", &json!({"puzzles": {}}).to_string());
        game
    }

    fn write(&self, rel: &str, contents: &str) {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn run(&self) -> ValidationOutcome {
        validate(&ValidatorConfig::default().rooted_at(self.root()))
    }
}

fn errors(outcome: &ValidationOutcome) -> Vec<Finding> {
    outcome.errors().cloned().collect()
}

fn warnings(outcome: &ValidationOutcome) -> Vec<Finding> {
    outcome.warnings().cloned().collect()
}

#[test]
fn scenario_a_minimal_valid_story() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {
            "intro": {"choices": [{"text": "go", "next": "hall"}]},
            "hall": {"isEnding": true, "ending": "good"}
        }
    }));
    let outcome = game.run();

    assert!(errors(&outcome).is_empty());
    assert!(warnings(&outcome).is_empty());
    assert_eq!(outcome.stats.endings.total(), 1);
    assert_eq!(outcome.stats.endings.by_label["good"], 1);
    assert_eq!(outcome.stats.reachable, Some(2));
    assert_eq!(outcome.exit_code(), 0);
    assert!(outcome.to_string().contains("All checks passed!"));
}

#[test]
fn scenario_b_broken_choice_reference() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {
            "intro": {"choices": [{"text": "go", "next": "ghost"}]}
        }
    }));
    let outcome = game.run();

    assert_eq!(
        errors(&outcome),
        vec![Finding::BrokenReference {
            from: "intro".to_string(),
            edge_kind: EdgeKind::Choice,
            to: "ghost".to_string(),
        }]
    );
    assert_eq!(outcome.exit_code(), 1);
}

#[test]
fn scenario_c_puzzle_without_fail_route() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {
            "intro": {"choices": [{"text": "open", "next": "vault"}]},
            "vault": {"puzzle": {"type": "combination"}, "success": "done"},
            "done": {"isEnding": true}
        }
    }));
    let outcome = game.run();

    assert!(errors(&outcome).is_empty());
    assert_eq!(
        warnings(&outcome),
        vec![Finding::MissingPuzzleRoute {
            scene: "vault".to_string(),
            missing: PuzzleRoute::Fail,
        }]
    );
}

#[test]
fn scenario_d_orphan_scene() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {
            "intro": {"choices": [{"text": "go", "next": "end"}]},
            "end": {"isEnding": true},
            "orphan": {"choices": [{"text": "back", "next": "intro"}]}
        }
    }));
    let outcome = game.run();

    assert_eq!(
        warnings(&outcome),
        vec![Finding::UnreachableScene {
            id: "orphan".to_string()
        }]
    );
    assert_eq!(outcome.stats.reachable, Some(2));
}

#[test]
fn scenario_e_no_endings() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {
            "intro": {"choices": [{"text": "loop", "next": "intro"}]}
        }
    }));
    let outcome = game.run();

    assert_eq!(warnings(&outcome), vec![Finding::NoEndingsFound]);
    assert_eq!(outcome.stats.endings.total(), 0);
    assert!(outcome.to_string().contains("Endings: 0"));
}

#[test]
fn null_puzzle_keeps_outcome_edges() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {
            "intro": {"puzzle": null, "success": "e"},
            "e": {"isEnding": true}
        }
    }));
    let outcome = game.run();

    assert!(matches!(
        errors(&outcome).as_slice(),
        [Finding::InvalidFieldType { field, .. }] if field == "puzzle"
    ));
    assert!(warnings(&outcome).is_empty());
    assert_eq!(outcome.stats.reachable, Some(2));
}

#[test]
fn empty_targets_are_not_edges() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {
            "intro": {"choices": [
                {"text": "wait", "next": ""},
                {"text": "go", "next": "vault"}
            ]},
            "vault": {"puzzle": {"type": "riddle"}, "success": "end", "fail": ""},
            "end": {"isEnding": true}
        }
    }));
    let outcome = game.run();

    assert!(outcome.is_success());
    assert!(outcome.phase(Phase::ReferentialIntegrity).unwrap().is_clean());
}

#[test]
fn validation_is_idempotent() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {
            "intro": {"choices": [
                {"text": "a", "next": "ghost"},
                {"text": "b", "next": "vault"}
            ]},
            "vault": {"puzzle": "missing_lock"},
            "stub": {},
            "lost": {"image": "images/lost.png"}
        }
    }));

    let first = game.run();
    let second = game.run();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn every_phase_reports_in_one_run() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {
            "intro": {
                "image": "images/intro.png",
                "choices": [{"text": "a", "next": "ghost"}, {"text": "b", "next": "vault"}]
            },
            "vault": {"puzzle": "lock", "success": "intro"},
            "stub": {}
        }
    }));
    game.write(
        "web/data/agents.json",
        &json!({"vega": {"name": "Vega", "fullbody": "images/vega.png"}}).to_string(),
    );
    let outcome = game.run();

    let has = |phase: Phase| !outcome.phase(phase).unwrap().is_clean();
    assert!(!has(Phase::LoadIntegrity));
    assert!(has(Phase::AgentData));
    assert!(has(Phase::AssetExistence));
    assert!(has(Phase::ReferentialIntegrity));
    assert!(has(Phase::PuzzleBinding));
    assert!(has(Phase::Reachability));
    assert!(has(Phase::EndingClassification));
    assert!(has(Phase::DeadEndDetection));

    let dead_ends: Vec<_> = warnings(&outcome)
        .into_iter()
        .filter(|f| matches!(f, Finding::DeadEnd { .. }))
        .collect();
    assert_eq!(
        dead_ends,
        vec![Finding::DeadEnd {
            id: "stub".to_string()
        }]
    );
}

#[test]
fn unloadable_story_still_produces_report() {
    let game = Game::new(json!({}));
    game.write("web/data/story.json", "{ this is not json");
    let outcome = game.run();

    let load = outcome.phase(Phase::LoadIntegrity).unwrap();
    assert_eq!(load.errors().len(), 1);
    assert!(matches!(&load.errors()[0], Finding::LoadError { .. }));
    assert_eq!(outcome.phases.len(), Phase::ALL.len());
    assert_eq!(outcome.stats.scenes, 0);

    let text = outcome.to_string();
    assert!(text.contains("ERROR [LoadError]"));
    assert!(text.contains("Result: FAILED"));
}

#[test]
fn missing_documents_are_independent() {
    let game = Game::new(json!({
        "scenes": {"intro": {"isEnding": true}}
    }));
    fs::remove_file(game.root().join("web/data/agents.json")).unwrap();
    fs::remove_file(game.root().join("web/data/puzzles.json")).unwrap();
    let outcome = game.run();

    let load = outcome.phase(Phase::LoadIntegrity).unwrap();
    assert_eq!(load.errors().len(), 2);
    assert_eq!(outcome.stats.scenes, 1);
    assert_eq!(outcome.stats.reachable, Some(1));
}

#[test]
fn ending_label_without_is_ending_counts() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {
            "intro": {"choices": [
                {"text": "a", "next": "left"},
                {"text": "b", "next": "right"}
            ]},
            "left": {"ending": "good"},
            "right": {"isEnding": true}
        }
    }));
    let outcome = game.run();

    assert!(outcome.is_success());
    assert!(warnings(&outcome).is_empty());
    assert_eq!(outcome.stats.classes.ending, 2);
    assert_eq!(outcome.stats.endings.by_label["good"], 1);
    assert_eq!(outcome.stats.endings.by_label["final"], 1);
}

#[test]
fn agent_findings() {
    let game = Game::new(json!({
        "meta": {"start": "intro"},
        "scenes": {"intro": {"isEnding": true}}
    }));
    game.write(
        "web/data/agents.json",
        &json!({
            "vega": {
                "name": "Vega",
                "tag": "The Cartographer",
                "avatar": "images/vega_avatar.png",
                "qualities": ["patient"],
                "specialItem": "Compass",
                "fullbody": "images/vega_full.png"
            }
        })
        .to_string(),
    );
    game.write("web/images/vega_full.png", "");
    let outcome = game.run();

    assert!(outcome.is_success());
    assert_eq!(
        outcome.phase(Phase::AgentData).unwrap().warnings(),
        &[Finding::MissingLuckyNumber {
            agent: "vega".to_string()
        }]
    );
    assert!(matches!(
        outcome.phase(Phase::AssetExistence).unwrap().warnings(),
        [Finding::MissingOptionalAsset { field: "avatar", .. }]
    ));
    assert_eq!(outcome.stats.agents, 1);
}

#[test]
fn config_file_redirects_paths() {
    let game = Game::new(json!({}));
    game.write(
        "content/story.json",
        &json!({"meta": {"start": "a"}, "scenes": {"a": {"ending": "only"}}}).to_string(),
    );
    game.write(
        "story_validator.ron",
        r#"(story: "content/story.json", asset_root: "content")"#,
    );

    let config = ValidatorConfig::discover(game.root()).unwrap();
    let outcome = validate(&config);
    assert!(outcome.is_success());
    assert_eq!(outcome.stats.scenes, 1);
    assert_eq!(outcome.stats.endings.by_label["only"], 1);
}
