//! Side-channel byte stream used for host control commands.

/// A byte stream from the host, polled without blocking.
///
/// # Implementation Notes
///
/// - `read_available` appends whatever bytes are buffered right now and
///   returns how many were appended. It must not wait for more.
/// - A disconnected channel reads as zero bytes, not an error.
pub trait CommandChannel {
    /// Error type for reads.
    type Error: core::fmt::Debug;

    /// Append all currently buffered bytes to `buf`.
    fn read_available(&mut self, buf: &mut Vec<u8>) -> Result<usize, Self::Error>;
}

/// A missing channel reads as permanently empty.
impl<C: CommandChannel> CommandChannel for Option<C> {
    type Error = C::Error;

    fn read_available(&mut self, buf: &mut Vec<u8>) -> Result<usize, Self::Error> {
        match self {
            Some(channel) => channel.read_available(buf),
            None => Ok(0),
        }
    }
}
