use anyhow::{anyhow, Context, Result};
use log::warn;
use std::path::PathBuf;
use tileslim::{
	mbtiles::{slim_archive, CancelToken},
	profile::{is_known_layer, Profile, ProfileStore},
	progress::ConsoleProgress,
	transform::KeepSet,
};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// source MBTiles archive (never modified)
	#[arg()]
	input_file: PathBuf,

	/// destination for the shrunk archive
	#[arg()]
	output_file: PathBuf,

	/// keep exactly these layers (comma-separated), bypassing the profile store
	#[arg(long, short, value_name = "LAYERS", conflicts_with = "profile")]
	keep: Option<String>,

	/// use this profile instead of the default one
	#[arg(long, short, value_name = "NAME")]
	profile: Option<String>,

	/// location of the profile store
	#[arg(long, value_name = "FILE", default_value = "profiles.sqlite")]
	profiles_db: PathBuf,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let keep = resolve_keep_set(arguments)?;

	eprintln!(
		"slimming {:?} to {:?}, keeping {} layers",
		arguments.input_file,
		arguments.output_file,
		keep.len()
	);

	let cancel = CancelToken::new();
	let ctrl_c_cancel = cancel.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			eprintln!("\ncancelling, cleaning up");
			ctrl_c_cancel.cancel();
		}
	});

	let mut progress = ConsoleProgress::new("processing tiles");
	let summary = slim_archive(
		&arguments.input_file,
		&arguments.output_file,
		&keep,
		&mut progress,
		&cancel,
	)
	.await?;

	eprintln!(
		"done: {} tiles processed, {} rewritten, {} undecodable",
		summary.processed, summary.modified, summary.decode_failures
	);

	Ok(())
}

/// `--keep` wins over `--profile` wins over the store's default profile.
fn resolve_keep_set(arguments: &Subcommand) -> Result<KeepSet> {
	if let Some(list) = &arguments.keep {
		let keep = Profile::layers_from_text(list);
		for name in &keep {
			if !is_known_layer(name) {
				warn!("{name:?} is not a known layer name");
			}
		}
		return Ok(keep);
	}

	let mut store =
		ProfileStore::open(&arguments.profiles_db).context("Failed to open the profile store")?;
	store.ensure_valid_default()?;

	let profile = match &arguments.profile {
		Some(name) => store
			.list()?
			.into_iter()
			.find(|profile| profile.name.eq_ignore_ascii_case(name))
			.ok_or_else(|| anyhow!("no profile named {name:?}"))?,
		None => store.get_default()?,
	};

	Ok(profile.layers_to_keep)
}
