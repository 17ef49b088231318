//! Blocking oracle seam used by the simulation
//!
//! The simulation is synchronous, so the oracle is consulted through a
//! plain trait. `LlmOracle` bridges to the async client on a private
//! current-thread runtime and bounds every call with a timeout.

use crate::core::error::{ColonyError, Result};
use crate::llm::client::LlmClient;
use crate::llm::context::{OracleRequest, DECISION_SYSTEM_PROMPT};
use std::time::Duration;
use tokio::runtime::Runtime;

/// An external source of task decisions
///
/// Implementations return the raw answer text; validation against the
/// task vocabulary happens in the policy. Any error is recoverable.
pub trait DecisionOracle {
    fn query(&mut self, request: &OracleRequest) -> Result<String>;
}

/// Oracle backed by an LLM endpoint
///
/// Owns a current-thread runtime and blocks on it for each query, so it
/// must be driven from plain synchronous code. Queried from inside another
/// tokio runtime it reports an `OracleError` instead of calling out.
pub struct LlmOracle {
    client: LlmClient,
    runtime: Runtime,
    timeout: Duration,
}

impl LlmOracle {
    pub fn new(client: LlmClient, timeout: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            client,
            runtime,
            timeout,
        })
    }

    /// Build from `LLM_*` environment variables
    pub fn from_env(timeout: Duration) -> Result<Self> {
        Self::new(LlmClient::from_env(timeout)?, timeout)
    }
}

impl DecisionOracle for LlmOracle {
    fn query(&mut self, request: &OracleRequest) -> Result<String> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(ColonyError::OracleError(
                "cannot block on the oracle from inside an async runtime".into(),
            ));
        }

        let prompt = request.summary();
        let client = &self.client;
        let timeout = self.timeout;

        // The timer needs the runtime's reactor, so it is created inside it
        self.runtime.block_on(async move {
            match tokio::time::timeout(timeout, client.complete(DECISION_SYSTEM_PROMPT, &prompt)).await {
                Ok(result) => result,
                Err(_) => Err(ColonyError::OracleTimeout(timeout)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::time::Instant;

    fn oracle_at(url: String) -> LlmOracle {
        let client = LlmClient::new(None, url, "none".into(), Duration::from_secs(30)).unwrap();
        LlmOracle::new(client, Duration::from_millis(200)).unwrap()
    }

    fn request() -> OracleRequest {
        OracleRequest {
            energy: 50.0,
            max_energy: 100.0,
            carried_food: 0.0,
            carrying_capacity: 3.0,
            current_task: crate::entity::tasks::TaskKind::Explore,
            recent_memories: vec![],
            near_food: false,
            near_home: true,
            near_agent_count: 0,
            can_dig_here: false,
        }
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error_not_a_panic() {
        let mut oracle = oracle_at("http://127.0.0.1:9/api/generate".into());
        assert!(oracle.query(&request()).is_err());
    }

    #[test]
    fn test_silent_endpoint_times_out() {
        // Accepted by the backlog, never answered
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut oracle = oracle_at(format!("http://127.0.0.1:{}/api/generate", port));

        let started = Instant::now();
        let result = oracle.query(&request());

        assert!(matches!(result, Err(ColonyError::OracleTimeout(_))));
        assert!(started.elapsed() < Duration::from_secs(5));
        drop(listener);
    }

    #[test]
    fn test_refuses_to_block_inside_a_runtime() {
        let mut oracle = oracle_at("http://127.0.0.1:9/api/generate".into());
        let outer = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let result = outer.block_on(async { oracle.query(&request()) });

        assert!(matches!(result, Err(ColonyError::OracleError(_))));
    }
}
