use super::ProgressSink;

/// A no-op progress sink.
pub struct ProgressDrain;

impl ProgressSink for ProgressDrain {
	fn report(&mut self, _fraction: f64) {}
}
