use crate::error::Result;
use crate::pipeline::{Message, SinkComponent};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Messages gathered by a [`NumberCollector`], shared with the test.
#[derive(Clone, Default)]
pub struct Collected(Arc<Mutex<Vec<Message<i64>>>>);

impl Collected {
    pub fn messages(&self) -> Vec<Message<i64>> {
        self.0.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn payloads(&self) -> Vec<i64> {
        self.messages().into_iter().map(|m| m.payload).collect()
    }

    pub fn sequences(&self) -> Vec<u64> {
        self.messages().into_iter().map(|m| m.sequence).collect()
    }
}

pub struct NumberCollector {
    name: String,
    pub results: Collected,
}

impl NumberCollector {
    pub fn new() -> Self {
        NumberCollector {
            name: "collect".to_string(),
            results: Collected::default(),
        }
    }
}

impl Default for NumberCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkComponent for NumberCollector {
    type Input = i64;

    fn name(&self) -> &str {
        &self.name
    }

    fn consume(&mut self, msg: Message<i64>) -> Result<()> {
        debug!("NumberCollector received {}", msg.payload);
        if let Ok(mut results) = self.results.0.lock() {
            results.push(msg);
        }
        Ok(())
    }
}
