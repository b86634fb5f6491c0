//! Advance and inspect handlers in the shape of rollup requests.
//!
//! The engine itself never does I/O. These handlers turn engine results into
//! the accept/reject status and the notice/report texts the host expects.

use crate::codec::{decode_payload, str_to_hex};
use crate::engine::OddsEvensEngine;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub msg_sender: String,
    #[serde(default)]
    pub epoch_index: u64,
    #[serde(default)]
    pub input_index: u64,
    #[serde(default)]
    pub block_number: u64,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceRequest {
    pub metadata: Metadata,
    /// Hex encoded (`0x...`) or plain move payload.
    pub payload: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectRequest {
    #[serde(default)]
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request_type", content = "data", rename_all = "snake_case")]
pub enum RollupRequest {
    AdvanceState(AdvanceRequest),
    InspectState(InspectRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishStatus {
    Accept,
    Reject,
}

impl fmt::Display for FinishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishStatus::Accept => f.write_str("accept"),
            FinishStatus::Reject => f.write_str("reject"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceResponse {
    Accept { notice: String },
    Reject { report: String },
}

impl AdvanceResponse {
    pub fn finish_status(&self) -> FinishStatus {
        match self {
            AdvanceResponse::Accept { .. } => FinishStatus::Accept,
            AdvanceResponse::Reject { .. } => FinishStatus::Reject,
        }
    }

    fn reject(err: &EngineError) -> Self {
        AdvanceResponse::Reject {
            report: format!("Error: {}", err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectResponse {
    pub report: String,
}

/// Process one move. Only a corrupt game escapes as `Err`; every other failure
/// becomes a rejection.
pub fn handle_advance(
    engine: &mut OddsEvensEngine,
    request: &AdvanceRequest,
) -> Result<AdvanceResponse> {
    tracing::info!(
        "Received advance request from {} at {}",
        request.metadata.msg_sender,
        request.metadata.timestamp
    );

    let payload = match decode_payload(&request.payload) {
        Ok(payload) => payload,
        Err(e) => {
            let err = EngineError::from(e);
            tracing::error!("{}", err);
            return Ok(AdvanceResponse::reject(&err));
        }
    };

    match engine.advance(
        &request.metadata.msg_sender,
        request.metadata.timestamp,
        &payload,
    ) {
        Ok(outcome) => Ok(AdvanceResponse::Accept {
            notice: outcome.message,
        }),
        Err(e) if e.is_recoverable() => Ok(AdvanceResponse::reject(&e)),
        Err(e) => Err(e),
    }
}

/// List open games; never touches the store.
pub fn handle_inspect(engine: &OddsEvensEngine) -> Result<InspectResponse> {
    tracing::info!("Received inspect request");
    Ok(InspectResponse {
        report: engine.inspect()?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Notice,
    Report,
}

/// A notice or report emitted while processing a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub kind: OutputKind,
    pub text: String,
}

impl Output {
    /// Hex payload as posted to the host.
    pub fn payload(&self) -> String {
        str_to_hex(&self.text)
    }
}

/// Feeds an ordered stream of rollup requests through the engine
#[derive(Debug, Default)]
pub struct RollupDriver {
    engine: OddsEvensEngine,
    rollup_address: Option<String>,
    outputs: Vec<Output>,
}

impl RollupDriver {
    pub fn new(engine: OddsEvensEngine) -> Self {
        Self {
            engine,
            rollup_address: None,
            outputs: Vec::new(),
        }
    }

    pub fn engine(&self) -> &OddsEvensEngine {
        &self.engine
    }

    pub fn rollup_address(&self) -> Option<&str> {
        self.rollup_address.as_deref()
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Handle one request and return the finish status for it along with the
    /// output it produced, if any.
    pub fn handle(&mut self, request: &RollupRequest) -> Result<(FinishStatus, Option<Output>)> {
        let output = match request {
            RollupRequest::AdvanceState(advance) => {
                let meta = &advance.metadata;
                if meta.epoch_index == 0
                    && meta.input_index == 0
                    && self.rollup_address.is_none()
                {
                    tracing::info!("Captured rollup address: {}", meta.msg_sender);
                    self.rollup_address = Some(meta.msg_sender.clone());
                    return Ok((FinishStatus::Accept, None));
                }

                match handle_advance(&mut self.engine, advance)? {
                    AdvanceResponse::Accept { notice } => Output {
                        kind: OutputKind::Notice,
                        text: notice,
                    },
                    AdvanceResponse::Reject { report } => Output {
                        kind: OutputKind::Report,
                        text: report,
                    },
                }
            }
            RollupRequest::InspectState(_) => Output {
                kind: OutputKind::Report,
                text: handle_inspect(&self.engine)?.report,
            },
        };

        let status = match (request, output.kind) {
            (RollupRequest::AdvanceState(_), OutputKind::Report) => FinishStatus::Reject,
            _ => FinishStatus::Accept,
        };
        tracing::info!("Adding {:?}: {}", output.kind, output.text);
        self.outputs.push(output.clone());
        Ok((status, Some(output)))
    }
}
