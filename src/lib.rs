//! Story Integrity: structural validation for branching narrative games.
//!
//! Loads a game's agents, story and puzzle documents, builds the scene
//! graph, and runs independent read-only checks over it: referential
//! integrity, puzzle bindings, asset existence, reachability from the
//! start scene, dead ends, and ending classification.

pub mod core;
pub mod schema;

pub use crate::core::config::ValidatorConfig;
pub use crate::core::report::{Finding, Phase, Report, Severity};
pub use crate::core::validator::{validate, validate_game, ValidationOutcome};
