pub mod buffer_pool;
pub mod catalog;
pub mod encoder;
pub mod heap_file;
