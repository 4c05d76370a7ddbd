use rustc_hash::FxHashMap;
use serde_json::Value;

/// Named puzzle configurations, keyed by puzzle id.
///
/// The validator never interprets a configuration; it only checks that
/// referenced ids exist.
#[derive(Debug, Clone, Default)]
pub struct PuzzleRegistry {
    puzzles: FxHashMap<String, Value>,
}

impl PuzzleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, config: Value) {
        self.puzzles.insert(id.into(), config);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.puzzles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}
