use std::sync::{
	atomic::{AtomicBool, Ordering},
	Arc,
};

/// Cooperative cancellation flag, checked by the driver between pipeline
/// phases and between batches. Cloneable; all clones share the flag.
#[derive(Clone, Default)]
pub struct CancelToken {
	flag: Arc<AtomicBool>,
}

impl CancelToken {
	#[must_use]
	pub fn new() -> CancelToken {
		CancelToken::default()
	}

	pub fn cancel(&self) {
		self.flag.store(true, Ordering::Relaxed);
	}

	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		self.flag.load(Ordering::Relaxed)
	}
}
