#![cfg_attr(debug_assertions, allow(dead_code))]

use ::thiserror::Error;

/**
The three error kinds the recording pipeline ever raises, distinguished at
the type level so callers can match on kind (the Container Reader's recovery
policy cares specifically about `InvalidData`).

Call sites generally propagate these through `anyhow::Result` via `?`, the
same way the rest of the crate's `Context`-chained errors flow; `CoreError`
exists so a `downcast_ref::<CoreError>()` at a recovery boundary can tell
"malformed data" apart from "I/O failed" apart from "we don't support this".
*/
#[derive(Clone, Debug, Error)]
pub enum CoreError
{
	#[error("invalid data: {0}")]
	InvalidData(String),

	#[error("not supported: {0}")]
	NotSupported(String),

	#[error("I/O error: {0}")]
	Io(String),
}

impl CoreError
{
	pub fn isInvalidData(error: &::anyhow::Error) -> bool
	{
		matches!(error.downcast_ref::<CoreError>(), Some(CoreError::InvalidData(_)))
	}
}

impl From<std::io::Error> for CoreError
{
	fn from(error: std::io::Error) -> Self
	{
		CoreError::Io(error.to_string())
	}
}
