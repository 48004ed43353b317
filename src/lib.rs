pub mod assembly;
pub mod cli;
pub mod config;
pub mod engine;
pub mod replica;
pub mod shutdown;
pub mod supervisor;
