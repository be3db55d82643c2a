pub mod checks;
pub mod config;
pub mod dataset;
pub mod generator;
pub mod indicators;
pub mod output;
pub mod pipeline;
pub mod schema;
