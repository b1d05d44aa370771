// Library root: game file loading, season CSV loading and card assembly,
// exposed so integration tests can drive the same path as the binary.

pub mod config;
pub mod game;
pub mod season;
