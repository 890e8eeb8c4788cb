//! Command-line front end for conlang-honing.

pub mod cli;
pub mod commands;
pub mod espeak;
pub mod logging;
pub mod settings;
pub mod summary;
