//! # tileslim
//!
//! Shrinks a vector-tile MBTiles archive for offline use: drops whole map
//! layers a profile does not keep and filters the `streets` layer down to the
//! road classes the target vehicles can actually use.
//!
//! The pipeline stages a working copy of the source, rewrites tiles in
//! batches with all cores, vacuums the database and publishes the result
//! atomically. The source archive is never modified.
//!
//! ```no_run
//! use tileslim::{
//!     mbtiles::{slim_archive, CancelToken},
//!     profile::default_keep_set,
//!     progress::ProgressDrain,
//! };
//! use std::path::Path;
//!
//! # #[tokio::main] async fn main() -> anyhow::Result<()> {
//! let summary = slim_archive(
//!     Path::new("germany.mbtiles"),
//!     Path::new("germany-slim.mbtiles"),
//!     &default_keep_set(),
//!     &mut ProgressDrain,
//!     &CancelToken::new(),
//! )
//! .await?;
//! println!("rewrote {} of {} tiles", summary.modified, summary.processed);
//! # Ok(()) }
//! ```

pub mod io;
pub mod mbtiles;
pub mod profile;
pub mod progress;
pub mod transform;
pub mod types;
pub mod utils;
pub mod vector_tile;
