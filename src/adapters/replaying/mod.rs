//! Replaying adapters that replay recorded interactions.

pub mod llm;

pub use llm::ReplayingLlmClient;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;

/// Pull the output of the next `port::method` interaction from a shared replayer.
///
/// A missing replayer or a cassette that has run dry is reported as a port
/// error, so the run fails like any other failed call.
pub(crate) fn next_output(
    replayer: Option<&Arc<Mutex<CassetteReplayer>>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, PortError> {
    let replayer = replayer.ok_or_else(|| {
        format!("{port} port has no cassette loaded; cannot replay {port}::{method}")
    })?;
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    Ok(guard.next_interaction(port, method)?.output)
}

/// Decode a recorded `{"Ok": v}` / `{"Err": "message"}` output.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, PortError> {
    if let Some(err) = output.get("Err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").cloned().unwrap_or(output);
    serde_json::from_value(value)
        .map_err(|e| format!("failed to deserialize replayed output: {e}").into())
}
