pub mod range_source;

pub use range_source::RangeSource;
