pub mod cli;
pub mod client;
pub mod console;
pub mod prompt;
