#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::anyhow::Result;
use ::serde::Serialize;
use crate::containers::Recording;

/** One line of the mined JSON output: a frame's timestamp plus its tagged events. */
#[derive(Serialize)]
struct MinedFrame<'a>
{
	timestamp_ms: u32,
	events: &'a [crate::events::Event],
}

/** Serializes `recording` as one JSON object per frame, newline-delimited, via `Event`'s `#[serde(tag = "kind")]` encoding. No parser back into `Recording` exists; nothing downstream currently re-ingests this format. */
pub fn mineToJsonLines(recording: &Recording) -> Result<String>
{
	let mut output = String::new();
	for frame in &recording.frames
	{
		let mined = MinedFrame { timestamp_ms: frame.timestampMs, events: &frame.events };
		output.push_str(&::serde_json::to_string(&mined)?);
		output.push('\n');
	}
	Ok(output)
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::containers::Frame;
	use crate::events::Event;
	use crate::position::Position;

	#[test]
	fn MinesOneJsonObjectPerFrame()
	{
		let recording = Recording
		{
			runtimeMs: 1000,
			frames: vec![
				Frame { timestampMs: 0, events: vec![Event::WorldInitialized { playerId: 1, playerName: "Rashid".into(), position: Position::default() }] },
				Frame { timestampMs: 500, events: vec![] },
			],
		};

		let json = mineToJsonLines(&recording).unwrap();
		assert_eq!(2, json.lines().count());
		assert!(json.contains("\"kind\":\"WorldInitialized\""));
	}
}
