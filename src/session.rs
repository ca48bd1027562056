//! Single-session state for the interactive front end.
//!
//! Every submission takes a new epoch. A completion carrying an older epoch is dropped,
//! so overlapping analyses can never apply out of order.

use ethers_core::types::H256;
use log::{debug, warn};

use crate::error::AnalysisError;
use crate::models::Analysis;
use crate::validation::validate_tx_hash;

#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    Validating,
    Fetching { epoch: u64 },
    Ready(Box<Analysis>),
    Failed(AnalysisError),
}

/// A request the caller should run, tagged with the epoch it was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub epoch: u64,
    pub hash: H256,
}

#[derive(Debug)]
pub struct Session {
    input: String,
    epoch: u64,
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            epoch: 0,
            state: SessionState::Idle,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.state, SessionState::Fetching { .. })
    }

    pub fn can_analyze(&self) -> bool {
        !self.input.is_empty() && !self.is_fetching()
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match &self.state {
            SessionState::Ready(analysis) => Some(analysis.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match &self.state {
            SessionState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Validates the current input and, if it is well formed, clears the previous
    /// result and issues a ticket for a new fetch.
    pub fn submit(&mut self) -> Result<Ticket, AnalysisError> {
        self.state = SessionState::Validating;

        match validate_tx_hash(&self.input) {
            Ok(hash) => {
                self.epoch += 1;
                self.state = SessionState::Fetching { epoch: self.epoch };
                debug!("Issued epoch {} for {}", self.epoch, self.input);
                Ok(Ticket {
                    epoch: self.epoch,
                    hash,
                })
            }
            Err(err) => {
                self.state = SessionState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Applies a finished fetch. Returns `false` if the ticket is stale and the result was dropped.
    pub fn complete(&mut self, epoch: u64, result: Result<Analysis, AnalysisError>) -> bool {
        if epoch != self.epoch || !self.is_fetching() {
            warn!(
                "Discarding stale result for epoch {} (current epoch {})",
                epoch, self.epoch
            );
            return false;
        }

        self.state = match result {
            Ok(analysis) => SessionState::Ready(Box::new(analysis)),
            Err(err) => SessionState::Failed(err),
        };
        true
    }

    /// Clears input, result and error. Any fetch still in flight becomes stale.
    pub fn reset(&mut self) {
        self.input.clear();
        self.epoch += 1;
        self.state = SessionState::Idle;
    }
}
