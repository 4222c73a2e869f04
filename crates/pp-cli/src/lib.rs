//! Bootstrap and terminal commands for PixelPost.

pub mod bootstrap;
mod cli;

pub use cli::run;
