// I/O module for block streaming
pub mod block_stream;
pub mod buffer_utils;

pub use block_stream::{
    BlockReader,
    BlockWriter,
};
