use async_trait::async_trait;
use std::io;

mod pipe;

pub use pipe::*;

/// Trait for types that communicate line by line.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait Io {
    /// Receive a line, without its line break.
    async fn recv(&mut self) -> io::Result<String>;

    /// Send a message, which may span several lines.
    async fn send(&mut self, msg: &str) -> io::Result<()>;

    /// Flush the internal buffers.
    async fn flush(&mut self) -> io::Result<()>;
}
