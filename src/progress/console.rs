use super::ProgressSink;
use std::time::{Duration, Instant};

/// Prints progress to stderr, throttled to avoid flooding the terminal.
pub struct ConsoleProgress {
	message: String,
	last_draw: Option<Instant>,
	finished: bool,
}

const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

impl ConsoleProgress {
	pub fn new(message: &str) -> ConsoleProgress {
		ConsoleProgress {
			message: message.to_string(),
			last_draw: None,
			finished: false,
		}
	}
}

impl ProgressSink for ConsoleProgress {
	fn report(&mut self, fraction: f64) {
		if self.finished {
			return;
		}
		let fraction = fraction.clamp(0.0, 1.0);

		if fraction >= 1.0 {
			self.finished = true;
			eprintln!("\r{}: 100%", self.message);
			return;
		}

		let due = match self.last_draw {
			Some(instant) => instant.elapsed() >= REDRAW_INTERVAL,
			None => true,
		};
		if due {
			self.last_draw = Some(Instant::now());
			eprint!("\r{}: {:3.0}%", self.message, fraction * 100.0);
		}
	}
}
