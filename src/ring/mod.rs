pub mod buffer;
pub mod ops;
pub mod ring_error;

pub use buffer::RingBuffer;
pub use ring_error::*;
