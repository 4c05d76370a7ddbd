//! Asset existence checks for agent portraits and scene images.
//!
//! Only stats paths; file contents are never read.

use std::path::{Path, PathBuf};

use crate::core::graph::StoryGraph;
use crate::core::report::{Finding, Report, Subject};
use crate::schema::agent::Agent;

/// Directory that asset paths in the documents are relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a document path under the root. Leading `/` is stripped so
    /// site-absolute paths land under the root too.
    pub fn resolve(&self, asset: &str) -> PathBuf {
        self.root.join(asset.trim_start_matches(&['/', '\\'][..]))
    }

    pub fn exists(&self, asset: &str) -> bool {
        self.resolve(asset).is_file()
    }
}

/// Check agent `fullbody` (critical) and `avatar` (optional) images, and
/// every scene `image` (critical).
pub fn check_assets(agents: &[Agent], graph: &StoryGraph, root: &AssetRoot) -> Report {
    let mut report = Report::new();

    for agent in agents {
        if let Some(avatar) = &agent.avatar {
            if !root.exists(avatar) {
                report.push(Finding::MissingOptionalAsset {
                    subject: Subject::Agent(agent.id.clone()),
                    field: "avatar",
                    path: avatar.clone(),
                });
            }
        }
        if let Some(fullbody) = &agent.fullbody {
            if !root.exists(fullbody) {
                report.push(Finding::MissingCriticalAsset {
                    subject: Subject::Agent(agent.id.clone()),
                    field: "fullbody",
                    path: fullbody.clone(),
                });
            }
        }
    }

    for (_, scene) in graph.iter() {
        let Some(image) = &scene.image else {
            continue;
        };
        if !root.exists(image) {
            report.push(Finding::MissingCriticalAsset {
                subject: Subject::Scene(scene.id.clone()),
                field: "image",
                path: image.clone(),
            });
        }
    }

    tracing::debug!(
        root = %root.path().display(),
        missing = report.len(),
        "asset check complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::scene::Scene;
    use std::fs;
    use tempfile::TempDir;

    fn agent(id: &str, avatar: &str, fullbody: &str) -> Agent {
        Agent {
            id: id.to_string(),
            avatar: Some(avatar.to_string()),
            fullbody: Some(fullbody.to_string()),
            ..Agent::default()
        }
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn resolve_strips_leading_slash() {
        let root = AssetRoot::new("web");
        assert_eq!(root.resolve("/images/a.png"), PathBuf::from("web/images/a.png"));
        assert_eq!(root.resolve("images/a.png"), PathBuf::from("web/images/a.png"));
    }

    #[test]
    fn missing_avatar_is_warning_missing_fullbody_is_error() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "images/vega_full.png");
        let root = AssetRoot::new(dir.path());

        let agents = vec![
            agent("vega", "images/vega_avatar.png", "images/vega_full.png"),
            agent("orion", "images/orion_avatar.png", "images/orion_full.png"),
        ];
        let graph = StoryGraph::new(Vec::new(), "intro");
        let report = check_assets(&agents, &graph, &root);

        assert_eq!(report.warnings().len(), 2);
        assert_eq!(
            report.errors(),
            &[Finding::MissingCriticalAsset {
                subject: Subject::Agent("orion".to_string()),
                field: "fullbody",
                path: "images/orion_full.png".to_string(),
            }]
        );
    }

    #[test]
    fn scene_images() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "images/scenes/intro.webp");
        let root = AssetRoot::new(dir.path());

        let mut intro = Scene::regular("intro");
        intro.image = Some("images/scenes/intro.webp".to_string());
        let mut hall = Scene::regular("hall");
        hall.image = Some("images/scenes/hall.webp".to_string());
        let graph = StoryGraph::new(vec![intro, hall, Scene::regular("plain")], "intro");

        let report = check_assets(&[], &graph, &root);
        assert_eq!(report.errors().len(), 1);
        assert!(matches!(
            &report.errors()[0],
            Finding::MissingCriticalAsset {
                subject: Subject::Scene(id),
                field: "image",
                ..
            } if id == "hall"
        ));
    }

    #[test]
    fn directories_do_not_count_as_assets() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("images/hall.png")).unwrap();
        assert!(!AssetRoot::new(dir.path()).exists("images/hall.png"));
    }
}
