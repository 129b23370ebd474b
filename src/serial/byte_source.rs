//! Trait abstraction for the decoder's byte supply to enable testing

use async_trait::async_trait;
use std::io;

/// Pull-based byte producer feeding the packet decoder
///
/// Decouples the streaming decoder from any particular transport:
/// the real implementation reads the headset UART, tests feed
/// pre-recorded byte streams.
#[async_trait]
pub trait ByteSource: Send {
    /// Pull the next byte, `Ok(None)` on end of stream
    async fn next_byte(&mut self) -> io::Result<Option<u8>>;
}
