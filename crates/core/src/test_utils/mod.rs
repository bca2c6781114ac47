mod number_collector;
mod shared_buffer;

pub use number_collector::{Collected, NumberCollector};
pub use shared_buffer::SharedBuffer;
