//! Oracle adapters implementing the application's `ScoringOracle` port

mod http;

pub use http::{HttpOracleSettings, HttpScoringOracle};
