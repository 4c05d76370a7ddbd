pub mod assets;
pub mod config;
pub mod graph;
pub mod loader;
pub mod references;
pub mod report;
pub mod traversal;
pub mod validator;
