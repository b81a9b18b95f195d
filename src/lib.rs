#[macro_use]
extern crate tracing;

pub mod cli;
pub mod input;
pub mod replay;
pub mod utils;
