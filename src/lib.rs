pub mod ring;
pub mod sink;
pub mod storage;
