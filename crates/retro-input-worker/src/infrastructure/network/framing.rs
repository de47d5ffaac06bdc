//! Frame envelope for the TCP intake stream.
//!
//! TCP delivers a byte stream, not messages, so every wire payload travels
//! in a small header that says what it is and how long it is:
//!
//! ```text
//! ┌────────┬────────┬────────────────┬──────────────────┐
//! │ kind   │ port   │ len (u16 BE)   │ payload (len)    │
//! │ 1 byte │ 1 byte │ 2 bytes        │ 0..=64 bytes     │
//! └────────┴────────┴────────────────┴──────────────────┘
//! ```
//!
//! An oversized `len` means the stream is out of step and cannot be
//! recovered, so the reader fails hard.  An unknown `kind` is consumed in
//! full and reported, so the caller can skip it and keep reading.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::application::intake::{FrameKind, InputFrame};

/// Length of the frame header in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

/// Largest payload a frame may carry.
pub const MAX_FRAME_PAYLOAD: usize = 64;

/// Errors produced while reading or writing frames.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The underlying stream failed, or ended inside a frame.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The header announced a payload larger than [`MAX_FRAME_PAYLOAD`].
    #[error("frame payload of {len} bytes exceeds limit of {max}")]
    Oversized { len: usize, max: usize },

    /// The kind byte is not a known [`FrameKind`].  The payload was consumed.
    #[error("unknown frame kind 0x{0:02X}")]
    UnknownKind(u8),
}

impl FrameError {
    /// True if the stream can still be read after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FrameError::UnknownKind(_))
    }
}

/// Reads one frame from `reader`.
///
/// Returns `Ok(None)` when the stream ends cleanly between frames.
///
/// # Errors
///
/// - [`FrameError::Io`] if the stream fails or ends mid-frame.
/// - [`FrameError::Oversized`] if `len` exceeds [`MAX_FRAME_PAYLOAD`].
/// - [`FrameError::UnknownKind`] for an unrecognised kind byte, after its
///   payload has been read and discarded.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<InputFrame>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; FRAME_HEADER_LEN];
    if reader.read(&mut header[..1]).await? == 0 {
        return Ok(None);
    }
    reader.read_exact(&mut header[1..]).await?;

    let len = usize::from(u16::from_be_bytes([header[2], header[3]]));
    if len > MAX_FRAME_PAYLOAD {
        return Err(FrameError::Oversized {
            len,
            max: MAX_FRAME_PAYLOAD,
        });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;

    let kind = FrameKind::try_from(header[0]).map_err(|()| FrameError::UnknownKind(header[0]))?;
    Ok(Some(InputFrame {
        kind,
        port: header[1],
        payload,
    }))
}

/// Encodes a frame into its wire form.
///
/// # Errors
///
/// Returns [`FrameError::Oversized`] if `payload` exceeds [`MAX_FRAME_PAYLOAD`].
pub fn encode_frame(kind: FrameKind, port: u8, payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    if payload.len() > MAX_FRAME_PAYLOAD {
        return Err(FrameError::Oversized {
            len: payload.len(),
            max: MAX_FRAME_PAYLOAD,
        });
    }
    let mut buf = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    buf.push(kind as u8);
    buf.push(port);
    // Bounded by MAX_FRAME_PAYLOAD above.
    buf.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}
