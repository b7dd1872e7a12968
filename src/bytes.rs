#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

/**
Convert a slice of Windows-1252 code points into a UTF-8 `String`.

The recording formats and the wire protocol both store text as raw
Windows-1252 bytes rather than UTF-8; bytes 0x80-0x9F map to the CP1252
control-code substitutions (smart quotes, the Euro sign, etc.) instead of
the Latin-1 C1 control range.
*/
pub fn Windows1252ToUtf8(bytes: &[u8]) -> String
{
	bytes.iter().map(|&byte| Windows1252Codepoint(byte)).collect()
}

fn Windows1252Codepoint(byte: u8) -> char
{
	const HighTable: [u16; 32] =
	[
		0x20AC, 0x0081, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021,
		0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0x008D, 0x017D, 0x008F,
		0x0090, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014,
		0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x009D, 0x017E, 0x0178,
	];

	return match byte
	{
		0x80..=0x9F => char::from_u32(HighTable[(byte - 0x80) as usize] as u32).unwrap_or('\u{FFFD}'),
		_ => byte as char,
	};
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn Windows1252ToUtf8HandlesAscii()
	{
		let result = Windows1252ToUtf8(b"Rashid");
		assert_eq!("Rashid", result);
	}

	#[test]
	fn Windows1252ToUtf8HandlesHighBytes()
	{
		//0x93/0x94 are curly quotes in CP1252, not the Latin-1 control codes.
		let result = Windows1252ToUtf8(&[0x93, b'h', b'i', 0x94]);
		assert_eq!("\u{201C}hi\u{201D}", result);
	}
}
