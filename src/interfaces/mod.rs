//! Presentation of flow sessions to the outside world.

pub mod cli;
