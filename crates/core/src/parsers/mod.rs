pub mod cpuprofile;

use crate::model::Profile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cpuprofile: {0}")]
    CpuProfile(#[from] cpuprofile::CpuProfileParseError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unable to detect format")]
    UnknownFormat,
}

/// Detect where the CPU profile sits in `data` and parse it.
///
/// Accepted shapes:
/// 1. A bare `.cpuprofile` object (`nodes` + `samples` + `timeDeltas`).
/// 2. A `Profiler.stop` result: `{"profile": {...}}`.
/// 3. A full inspector protocol reply: `{"id": n, "result": {"profile": {...}}}`.
pub fn parse_auto(data: &[u8]) -> Result<Profile, ParseError> {
    let mut value: serde_json::Value = serde_json::from_slice(data)?;

    if let Some(result) = value.get_mut("result").map(serde_json::Value::take) {
        value = result;
    }
    if let Some(profile) = value.get_mut("profile").map(serde_json::Value::take) {
        value = profile;
    }

    let is_cpuprofile = value
        .as_object()
        .is_some_and(|obj| obj.contains_key("nodes") && obj.contains_key("samples"));
    if !is_cpuprofile {
        return Err(ParseError::UnknownFormat);
    }

    Ok(cpuprofile::from_value(value)?)
}
