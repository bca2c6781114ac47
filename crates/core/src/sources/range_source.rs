use crate::pipeline::SourceComponent;
use tracing::debug;

/// Emits `0..count` in increasing order.
pub struct RangeSource {
    name: String,
    next: i64,
    count: i64,
}

impl RangeSource {
    pub fn new(count: usize) -> Self {
        Self::with_name("generate", count)
    }

    pub fn with_name(name: impl Into<String>, count: usize) -> Self {
        RangeSource {
            name: name.into(),
            next: 0,
            count: i64::try_from(count).unwrap_or(i64::MAX),
        }
    }
}

impl SourceComponent for RangeSource {
    type Output = i64;

    fn name(&self) -> &str {
        &self.name
    }

    fn produce(&mut self) -> Option<i64> {
        if self.next >= self.count {
            debug!("{} exhausted after {} items", self.name, self.count);
            return None;
        }
        let item = self.next;
        self.next += 1;
        Some(item)
    }
}
