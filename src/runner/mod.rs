//! Traversal engine orchestrating a full run.

pub mod engine;

pub use engine::TestRunner;
