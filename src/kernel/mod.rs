//! Decision logic. Nothing in here performs I/O.

pub mod apps;
pub mod dialogue;
pub mod intent;
pub mod text;
pub mod wake;
