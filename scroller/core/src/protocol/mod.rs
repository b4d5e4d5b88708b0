//! Controller transport: the frame sink seam and the TCP OPC client.
//!
//! The engine depends on [`FrameSink`] only; [`OpcClient`] is the production
//! implementation holding the single outbound connection. Connecting happens
//! once at startup and a failure there is fatal to the process. A failed
//! send is returned to the engine, which drops that frame and carries on.
//! There is no reconnection.

pub mod message;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::pixel::Frame;

pub use message::{
    encode_frame, CHANNEL_BROADCAST, CMD_SET_PIXEL_COLORS, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};

/// Errors from the controller transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Could not establish the initial controller connection
    #[error("could not connect to controller at {addr}: {source}")]
    ConnectionFailed {
        /// Controller address that was dialed
        addr: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// A frame write failed mid-stream
    #[error("frame transmission failed: {0}")]
    SendFailed(#[from] std::io::Error),

    /// Frame payload does not fit the 16-bit length field
    #[error("frame payload of {len} bytes exceeds protocol maximum {max}")]
    FrameTooLarge {
        /// Payload size that was requested
        len: usize,
        /// Largest representable payload
        max: usize,
    },
}

/// Anything that can take a finished frame off the engine's hands.
///
/// Production uses [`OpcClient`]; tests substitute recording or failing
/// sinks.
#[async_trait]
pub trait FrameSink {
    /// Transmit one frame.
    ///
    /// # Errors
    ///
    /// An error means this frame is lost; it carries no implication for
    /// subsequent frames.
    async fn send_frame(&mut self, frame: &Frame) -> Result<(), ProtocolError>;
}

/// TCP client speaking Open Pixel Control to the lighting controller.
#[derive(Debug)]
pub struct OpcClient {
    stream: TcpStream,
}

impl OpcClient {
    /// Establish the controller connection.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::ConnectionFailed`]. Callers treat this as
    /// fatal — the process cannot do anything useful without a controller.
    pub async fn connect(addr: &str) -> Result<Self, ProtocolError> {
        let stream =
            TcpStream::connect(addr)
                .await
                .map_err(|e| ProtocolError::ConnectionFailed {
                    addr: addr.to_string(),
                    source: e,
                })?;

        tracing::info!(addr, "connected to controller");
        Ok(Self { stream })
    }
}

#[async_trait]
impl FrameSink for OpcClient {
    async fn send_frame(&mut self, frame: &Frame) -> Result<(), ProtocolError> {
        let encoded = encode_frame(CHANNEL_BROADCAST, frame)?;
        self.stream.write_all(&encoded).await?;
        Ok(())
    }
}
