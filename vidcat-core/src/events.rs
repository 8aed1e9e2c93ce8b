//! Pipeline events.
//!
//! The core library reports what it is doing through an injected set of
//! event handlers rather than a process-wide reporter, so the CLI (or a
//! test) decides how progress is rendered.

use crate::discovery::MergeOrder;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Event {
    /// Discovery finished and fixed the merge order.
    DiscoveryComplete {
        file_count: usize,
        order: MergeOrder,
    },

    /// One input file was probed successfully.
    FileProbed {
        filename: String,
        duration_secs: f64,
        summary: String,
    },

    /// The ffmpeg merge process was spawned.
    MergeStarted {
        output_file: String,
        input_count: usize,
        total_duration_secs: f64,
    },

    /// The merge percentage advanced. Emitted at most 101 times per run,
    /// strictly increasing.
    MergeProgress { percent: u8 },

    /// The merge finished and the output verified.
    MergeComplete {
        output_file: String,
        output_size: u64,
        elapsed: Duration,
    },

    Warning { message: String },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

/// Fans one event out to every registered handler, in registration order.
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<u8>>);

    impl EventHandler for Recorder {
        fn handle(&self, event: &Event) {
            if let Event::MergeProgress { percent } = event {
                self.0.lock().unwrap().push(*percent);
            }
        }
    }

    #[test]
    fn test_dispatch_reaches_all_handlers() {
        let first = Arc::new(Recorder(Mutex::new(Vec::new())));
        let second = Arc::new(Recorder(Mutex::new(Vec::new())));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(first.clone());
        dispatcher.add_handler(second.clone());

        dispatcher.emit(Event::MergeProgress { percent: 42 });
        dispatcher.emit(Event::Warning {
            message: "ignored by recorder".to_string(),
        });

        assert_eq!(*first.0.lock().unwrap(), vec![42]);
        assert_eq!(*second.0.lock().unwrap(), vec![42]);
    }
}
