use proftree_protocol::CpuProfile;
use thiserror::Error;

use crate::model::{Profile, ProfileError};

#[derive(Debug, Error)]
pub enum CpuProfileParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Parse a V8 CPU profile (.cpuprofile) into a validated `Profile`.
///
/// Used by: Node.js `--cpu-prof`, Chrome DevTools CPU profiler, Deno, and
/// the inspector's `Profiler.stop` result.
pub fn parse_cpuprofile(data: &[u8]) -> Result<Profile, CpuProfileParseError> {
    let raw: CpuProfile = serde_json::from_slice(data)?;
    Ok(Profile::new(raw)?)
}

pub(crate) fn from_value(value: serde_json::Value) -> Result<Profile, CpuProfileParseError> {
    let raw: CpuProfile = serde_json::from_value(value)?;
    Ok(Profile::new(raw)?)
}
