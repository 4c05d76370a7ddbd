//! Typed records decoded from the game's JSON documents.

pub mod agent;
pub mod puzzle;
pub mod scene;

use serde_json::{Map, Value};

/// Look up `key`, treating an explicit `null` the same as an absent key.
pub(crate) fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}
