use anyhow::Result;
use std::path::PathBuf;
use tileslim::mbtiles::probe_archive;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// MBTiles archive to inspect
	#[arg()]
	file: PathBuf,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let info = probe_archive(&arguments.file)?;

	println!("tiles: {}", info.tile_count);
	match info.zoom_range {
		Some((min, max)) => println!("zoom levels: {min}..{max}"),
		None => println!("zoom levels: none"),
	}

	if info.sample_layers.is_empty() {
		println!("layers: no decodable tile found");
	} else {
		println!("layers of a sample tile:");
		for (name, feature_count) in &info.sample_layers {
			println!("  {name} ({feature_count} features)");
		}
	}

	Ok(())
}
