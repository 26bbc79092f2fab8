//! The MBTiles processing pipeline: staged copy, batched rewrite, vacuum,
//! atomic publish.

mod cancel;
mod driver;
mod probe;
mod worker;

pub use cancel::CancelToken;
pub use driver::{slim_archive, RunSummary, SlimError, BATCH_SIZE};
pub use probe::{probe_archive, ArchiveInfo};
pub use worker::{process_batch, TileKey, TileOutcome};
