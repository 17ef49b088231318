//! External decision oracle: HTTP client, request shaping, answer parsing

pub mod client;
pub mod context;
pub mod oracle;
pub mod parser;

pub use client::LlmClient;
pub use context::OracleRequest;
pub use oracle::{DecisionOracle, LlmOracle};
pub use parser::parse_task;
