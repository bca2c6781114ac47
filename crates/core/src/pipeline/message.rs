use std::fmt;

/// Envelope around one item travelling between stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message<T> {
    pub payload: T,
    /// Index of the generator item this message descends from.
    pub sequence: u64,
    /// Name of the stage that last emitted this message.
    pub source_id: Option<String>,
}

impl<T: fmt::Display> fmt::Display for Message<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload)
    }
}

impl<T> Message<T> {
    pub fn new(payload: T, sequence: u64) -> Self {
        Message {
            payload,
            sequence,
            source_id: None,
        }
    }

    /// Builds the message a stage emits for this one by applying `f` to the
    /// payload. The old message is consumed, the sequence carries over.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Message<U> {
        Message {
            payload: f(self.payload),
            sequence: self.sequence,
            source_id: self.source_id,
        }
    }

    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }
}
