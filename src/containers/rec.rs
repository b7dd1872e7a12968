#![allow(non_snake_case, non_upper_case_globals)]
#![cfg_attr(debug_assertions, allow(dead_code))]

use ::aes::Aes256;
use ::anyhow::Result;
use ::ecb::cipher::{BlockDecryptMut, KeyInit, block_padding::Pkcs7};
use crate::demux::Demuxer;
use crate::error::CoreError;
use crate::parser::Parser;
use crate::reader::DataReader;
use crate::version::VersionTriple;

use super::{recoverable, Recording, RecoveryMode};

type Aes256EcbDecryptor = ::ecb::Decryptor<Aes256>;

/** The constant key recordings encrypted with container versions >=517 are protected by: "Thy key is mine (c) 2006 GB Monaco". */
const Rec517Key: [u8; 32] =
[
	0x54, 0x68, 0x79, 0x20, 0x6B, 0x65, 0x79, 0x20,
	0x69, 0x73, 0x20, 0x6D, 0x69, 0x6E, 0x65, 0x20,
	0xA9, 0x20, 0x32, 0x30, 0x30, 0x36, 0x20, 0x47,
	0x42, 0x20, 0x4D, 0x6F, 0x6E, 0x61, 0x63, 0x6F,
];

/** Early (pre-515) recordings carry 32-bit frame lengths and no obfuscation at all. */
const MaxFrameSize: usize = 64 << 10;

fn twirlAmount(containerVersion: u16) -> u32
{
	match containerVersion
	{
		515 => 5,
		516 | 517 => 8,
		518 => 6,
		_ => 0,
	}
}

pub fn queryVersion(bytes: &[u8]) -> Result<Option<VersionTriple>>
{
	if bytes.len() < 2
	{
		return Ok(None);
	}
	let mut reader = DataReader::New(bytes);
	let _containerVersion = reader.readU16()?;
	// Rec carries only the frame stream, not an embedded protocol version; callers must
	// supply one via `--input-version`. A partial probe is still useful for format detection.
	Ok(None)
}

/**
Reads the container header, then steps through each fragment individually:
length and timestamp are always plaintext, only the payload bytes between
them are twirled/encrypted, and versions >=515 tuck an extra trailing
checksum word after every fragment that must be skipped before the next
length field.
*/
pub fn parse(bytes: &[u8], parser: &mut Parser, recovery: RecoveryMode) -> Result<(Recording, bool)>
{
	let mut header = DataReader::New(bytes);
	let containerVersion = header.readU16()?;
	if !matches!(containerVersion, 259 | 515..=518)
	{
		return Err(CoreError::InvalidData(format!("unrecognised rec container version {containerVersion}")).into());
	}

	let fragmentCountField = header.readI32()?;

	let (fragmentCount, lengthIsU32, twirl, encrypted, hasChecksum) = if containerVersion == 259
	{
		(fragmentCountField, true, 0u32, false, false)
	}
	else
	{
		if fragmentCountField < 57
		{
			return Err(CoreError::InvalidData(format!("rec fragment count {fragmentCountField} too small")).into());
		}
		(fragmentCountField - 57, false, twirlAmount(containerVersion), containerVersion >= 517, true)
	};

	let mut recording = Recording::default();
	let mut demuxer = Demuxer::New(2);
	let mut partial = false;
	let mut parsedFrames = 0i32;

	while parsedFrames < fragmentCount
	{
		if parsedFrames == fragmentCount - 1 && header.remaining() == 0
		{
			// Recordings cut off exactly at the last frame boundary are a common
			// recorder race condition, not corruption; tolerate it quietly.
			break;
		}

		let length = if lengthIsU32 { header.readU32()? as usize } else { header.readU16()? as usize };
		if length > MaxFrameSize
		{
			return Err(CoreError::InvalidData(format!("rec fragment length {length} exceeds {MaxFrameSize}")).into());
		}
		let timestampMs = header.readU32()?;
		let mut cipherData = header.readBytes(length)?;

		untwirlFragment(&mut cipherData, timestampMs, twirl);

		let plainData = if encrypted { decryptAes256Ecb(&cipherData)? } else { cipherData };

		if hasChecksum
		{
			header.skip(4)?;
		}

		let mut frameReader = DataReader::New(&plainData);
		let outcome = demuxer.submit(timestampMs, &mut frameReader, |packet, ts|
		{
			let events = parser.parsePacket(packet)?;
			recording.pushFrame(ts, events);
			Ok(())
		});

		match recoverable(recovery, outcome)?
		{
			true => parsedFrames += 1,
			false =>
			{
				partial = true;
				if recovery == RecoveryMode::Repair
				{
					resynchronize(&mut header);
					if header.isAtEnd() { break; }
					continue;
				}
				break;
			}
		}
	}

	Ok((recording, partial))
}

fn decryptAes256Ecb(cipherText: &[u8]) -> Result<Vec<u8>>
{
	if cipherText.len() % 16 != 0
	{
		return Err(CoreError::InvalidData("rec AES-256-ECB payload is not block-aligned".into()).into());
	}

	let cipher = Aes256EcbDecryptor::new_from_slice(&Rec517Key)
		.map_err(|error| CoreError::NotSupported(format!("AES-256-ECB key setup failed: {error}")))?;

	let mut buffer = cipherText.to_vec();
	let plainLength = cipher.decrypt_padded_mut::<Pkcs7>(&mut buffer)
		.map_err(|error| CoreError::InvalidData(format!("AES-256-ECB decrypt failed: {error}")))?
		.len();
	buffer.truncate(plainLength);
	Ok(buffer)
}

/**
Subtracts the recorder's per-fragment obfuscation: the byte-wise key is
derived from this fragment's own `length`/`timestamp` fields (not a global
running index), the per-byte step sign-extends to `i8` before taking it
modulo `twirl`, and the final adjustment folds the remainder back into a
positive offset before subtracting it from the ciphertext byte.
*/
fn untwirlFragment(data: &mut [u8], timestampMs: u32, twirl: u32)
{
	if twirl == 0
	{
		return;
	}

	let twirl = twirl as i32;
	let key = ((data.len() as u32).wrapping_add(timestampMs).wrapping_add(2) & 0xFF) as i32;

	for (index, byte) in data.iter_mut().enumerate()
	{
		let mut alpha = (key + (index as i32).wrapping_mul(33)) & 0xFF;
		if alpha > 127
		{
			alpha -= 256;
		}

		let mut beta = alpha % twirl;
		if beta < 0
		{
			beta += twirl;
		}
		if beta != 0
		{
			alpha += twirl - beta;
		}

		*byte = byte.wrapping_sub(alpha as u8);
	}
}

/** Rescans for a recognisable login-state packet prefix to resume after a corrupted frame. */
fn resynchronize(reader: &mut DataReader)
{
	while reader.remaining() > 1
	{
		if let Ok(marker) = reader.peek(1)
		{
			if marker[0] == 0x0A
			{
				return;
			}
		}
		let _ = reader.skip(1);
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn UntwirlFragmentInvertsTheRecorderObfuscationPass()
	{
		let original = [10u8, 20, 30, 40, 50];
		let timestampMs = 12345u32;
		let twirl = 8i32;
		let key = ((original.len() as u32).wrapping_add(timestampMs).wrapping_add(2) & 0xFF) as i32;

		let mut obfuscated = original;
		for (index, byte) in obfuscated.iter_mut().enumerate()
		{
			let mut alpha = (key + (index as i32).wrapping_mul(33)) & 0xFF;
			if alpha > 127 { alpha -= 256; }
			let mut beta = alpha % twirl;
			if beta < 0 { beta += twirl; }
			if beta != 0 { alpha += twirl - beta; }
			*byte = byte.wrapping_add(alpha as u8);
		}

		untwirlFragment(&mut obfuscated, timestampMs, twirl as u32);
		assert_eq!(original, obfuscated);
	}

	#[test]
	fn TwirlAmountMatchesContainerVersionTable()
	{
		assert_eq!(5, twirlAmount(515));
		assert_eq!(8, twirlAmount(516));
		assert_eq!(8, twirlAmount(517));
		assert_eq!(6, twirlAmount(518));
	}

	#[test]
	fn RejectsUnknownContainerVersion()
	{
		let mut parser = crate::parser::Parser::New(
			crate::version::Version::New(VersionTriple::New(7, 40, 0)).unwrap(),
			&crate::assets::AssetStore::default());
		let bytes = [0xFFu8, 0xFF, 0, 0, 0, 0];
		assert!(parse(&bytes, &mut parser, RecoveryMode::None).is_err());
	}
}
