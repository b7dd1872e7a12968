#![allow(non_snake_case, non_upper_case_globals, dead_code)]

use std::fs;
use std::path::PathBuf;
use ::anyhow::{bail, Context, Result};
use ::clap::Parser as ClapParser;
use ::log::warn;
use ::tile_mmo_recorder::assets::AssetStore;
use ::tile_mmo_recorder::containers::{self, Format, RecoveryMode};
use ::tile_mmo_recorder::gamestate::{self, Gamestate};
use ::tile_mmo_recorder::miner;
use ::tile_mmo_recorder::parser::Parser as WireParser;
use ::tile_mmo_recorder::renderer::{self, RenderOptions};
use ::tile_mmo_recorder::version::{Version, VersionTriple};

#[derive(ClapParser, Debug)]
#[command(name = "convert", about = "Decode a recording and re-render or mine it", version)]
struct Args
{
	data_folder: PathBuf,
	input_path: PathBuf,
	output_path: PathBuf,

	#[arg(long)]
	input_format: Option<String>,

	#[arg(long)]
	input_version: Option<String>,

	#[arg(long, default_value_t = false)]
	input_partial: bool,

	#[arg(long, default_value_t = 0)]
	start_time: u32,

	#[arg(long)]
	end_time: Option<u32>,

	#[arg(long, default_value_t = 20)]
	frame_rate: u32,

	#[arg(long, default_value_t = 1)]
	frame_skip: u32,

	#[arg(long)]
	resolution: Option<String>,

	#[arg(long, default_value = "json")]
	output_format: String,

	#[arg(long)]
	output_encoding: Option<String>,

	#[arg(long)]
	output_flags: Option<String>,

	#[arg(long, default_value = "inert")]
	output_backend: String,

	#[arg(long = "skip-rendering-creatures", default_value_t = false)]
	skip_creatures: bool,

	#[arg(long = "skip-rendering-items", default_value_t = false)]
	skip_items: bool,

	#[arg(long = "skip-rendering-missiles", default_value_t = false)]
	skip_missiles: bool,

	#[arg(long = "skip-rendering-messages", default_value_t = false)]
	skip_messages: bool,
}

fn main()
{
	::env_logger::init();

	if let Err(error) = run()
	{
		eprintln!("error: {error:#}");
		std::process::exit(1);
	}
}

fn run() -> Result<()>
{
	let args = Args::parse();

	let bytes = fs::read(&args.input_path)
		.with_context(|| format!("reading {}", args.input_path.display()))?;

	let format = resolveFormat(&args, &bytes)?;
	let triple = resolveVersion(&args, format, &bytes)?;
	let version = Version::New(triple)?;

	let pic = fs::read(args.data_folder.join("Tibia.pic")).context("reading Tibia.pic")?;
	let spr = fs::read(args.data_folder.join("Tibia.spr")).context("reading Tibia.spr")?;
	let dat = fs::read(args.data_folder.join("Tibia.dat")).context("reading Tibia.dat")?;
	let assets = AssetStore::fromBlobs(&pic, &spr, &dat, &version)?;

	let mut wireParser = WireParser::New(version, &assets);
	let recovery = if args.input_partial { RecoveryMode::PartialReturn } else { RecoveryMode::None };
	let (recording, partial) = containers::parse(format, &bytes, &mut wireParser, recovery)?;

	if partial
	{
		warn!("recording truncated by recovery mode, {} frames decoded", recording.frames.len());
	}

	match args.output_format.as_str()
	{
		"json" => writeJson(&recording, &args.output_path)?,
		_ => renderFrames(&recording, &assets, &args)?,
	}

	Ok(())
}

fn resolveFormat(args: &Args, bytes: &[u8]) -> Result<Format>
{
	if let Some(name) = &args.input_format
	{
		return Format::fromExtension(name).with_context(|| format!("unrecognised --input-format {name}"));
	}

	if let Some(extension) = args.input_path.extension().and_then(|extension| extension.to_str())
	{
		if let Some(format) = Format::fromExtension(extension)
		{
			return Ok(format);
		}
	}

	warn!("auto-detecting container format from file contents");
	Format::detect(bytes).context("could not determine container format")
}

fn resolveVersion(args: &Args, format: Format, bytes: &[u8]) -> Result<VersionTriple>
{
	if let Some(text) = &args.input_version
	{
		return parseVersionTriple(text);
	}

	warn!("auto-detecting protocol version from container contents");
	containers::queryVersion(format, bytes)?
		.context("container does not embed a version; pass --input-version")
}

fn parseVersionTriple(text: &str) -> Result<VersionTriple>
{
	let mut parts = text.split('.');
	let major: u16 = parts.next().context("missing major version")?.parse()?;
	let minor: u16 = parts.next().context("missing minor version")?.parse()?;
	let preview: u8 = parts.next().map(str::parse).transpose()?.unwrap_or(0);
	Ok(VersionTriple::New(major, minor, preview))
}

fn writeJson(recording: &containers::Recording, outputPath: &std::path::Path) -> Result<()>
{
	let json = miner::mineToJsonLines(recording)?;
	fs::write(outputPath, json).with_context(|| format!("writing {}", outputPath.display()))
}

/**
Applies every frame's events to a fresh Game State and renders each one to
a canvas; encoding to an actual video container is out of this crate's
scope, so the `inert` backend (the only one implemented) just reports
progress, and `libav` is rejected as not supported.
*/
fn renderFrames(recording: &containers::Recording, assets: &AssetStore, args: &Args) -> Result<()>
{
	if args.output_backend != "inert"
	{
		bail!("output backend '{}' is not supported by this build", args.output_backend);
	}

	let mut options = RenderOptions::default();
	if args.skip_creatures { options = options.without(RenderOptions::Creatures); }
	if args.skip_items { options = options.without(RenderOptions::Items); }
	if args.skip_missiles { options = options.without(RenderOptions::Missiles); }
	if args.skip_messages { options = options.without(RenderOptions::Messages); }

	let mut state = Gamestate::New();
	let mut canvas = renderer::newMapCanvas();
	let mut lastReportedMs = 0u32;
	let mut rendered = 0usize;

	for (index, frame) in recording.frames.iter().enumerate()
	{
		if frame.timestampMs < args.start_time
		{
			continue;
		}
		if let Some(endTime) = args.end_time
		{
			if frame.timestampMs > endTime
			{
				break;
			}
		}
		if index % (args.frame_skip.max(1) as usize) != 0
		{
			continue;
		}

		for event in &frame.events
		{
			gamestate::apply(event, &mut state, assets)?;
		}
		state.currentTick = frame.timestampMs;

		renderer::draw_gamestate(options, &state, assets, &mut canvas);
		renderer::draw_overlay(options, &state, &mut canvas);
		rendered += 1;

		if frame.timestampMs.saturating_sub(lastReportedMs) >= 500
		{
			println!("progress: {} / {} / {}", frame.timestampMs, args.start_time, args.end_time.unwrap_or(recording.runtimeMs));
			lastReportedMs = frame.timestampMs;
		}
	}

	println!("rendered {rendered} frames");
	Ok(())
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn ParsesMajorMinorVersionString()
	{
		assert_eq!(VersionTriple::New(7, 40, 0), parseVersionTriple("7.40").unwrap());
	}

	#[test]
	fn ParsesVersionWithPreviewByte()
	{
		assert_eq!(VersionTriple::New(9, 80, 1), parseVersionTriple("9.80.1").unwrap());
	}

	#[test]
	fn RejectsMalformedVersionString()
	{
		assert!(parseVersionTriple("notaversion").is_err());
	}
}
