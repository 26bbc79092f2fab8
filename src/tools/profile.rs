use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;
use tileslim::profile::{is_known_layer, Profile, ProfileStore, LAYER_CATALOG};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	#[command(subcommand)]
	action: Action,

	/// location of the profile store
	#[arg(long, value_name = "FILE", default_value = "profiles.sqlite", global = true)]
	profiles_db: PathBuf,
}

#[derive(clap::Subcommand, Debug)]
enum Action {
	/// List all profiles
	List,

	/// Show the layers a profile keeps
	Show {
		/// profile name
		name: String,
	},

	/// Create a profile
	Create {
		/// profile name
		name: String,

		/// layers to keep (comma-separated)
		#[arg(long, value_name = "LAYERS")]
		keep: String,
	},

	/// Delete a profile
	Delete {
		/// profile name
		name: String,
	},

	/// Make a profile the default
	SetDefault {
		/// profile name
		name: String,
	},
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let mut store = ProfileStore::open(&arguments.profiles_db)?;
	store.ensure_valid_default()?;

	match &arguments.action {
		Action::List => {
			for profile in store.list()? {
				let marker = if profile.is_default { "*" } else { " " };
				println!("{marker} {} ({} layers)", profile.name, profile.layers_to_keep.len());
			}
		}

		Action::Show { name } => {
			let profile = find_by_name(&store, name)?;
			for (layer, description) in LAYER_CATALOG {
				let marker = if profile.layers_to_keep.contains(*layer) { "keep" } else { "drop" };
				println!("{marker}  {layer:<24} {description}");
			}
		}

		Action::Create { name, keep } => {
			let layers = Profile::layers_from_text(keep);
			for layer in &layers {
				if !is_known_layer(layer) {
					bail!("{layer:?} is not a known layer name");
				}
			}
			store.insert(&Profile::new(&id_for_name(name), name, layers))?;
			println!("created profile {name:?}");
		}

		Action::Delete { name } => {
			let profile = find_by_name(&store, name)?;
			store.delete(&profile.id)?;
			println!("deleted profile {name:?}");
		}

		Action::SetDefault { name } => {
			let profile = find_by_name(&store, name)?;
			store.set_default(&profile.id)?;
			println!("{name:?} is now the default profile");
		}
	}

	Ok(())
}

fn find_by_name(store: &ProfileStore, name: &str) -> Result<Profile> {
	store
		.list()?
		.into_iter()
		.find(|profile| profile.name.eq_ignore_ascii_case(name))
		.ok_or_else(|| anyhow!("no profile named {name:?}"))
}

/// Profile ids are opaque; a slug of the name is stable and readable.
fn id_for_name(name: &str) -> String {
	name
		.to_lowercase()
		.chars()
		.map(|c| if c.is_alphanumeric() { c } else { '-' })
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn id_slugs() {
		assert_eq!(id_for_name("Scooter Touring"), "scooter-touring");
		assert_eq!(id_for_name("Default"), "default");
	}
}
