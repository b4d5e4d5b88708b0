//! Scroller Core - animation engine and controller client
//!
//! This crate drives a single LED string through a Fadecandy-style
//! controller speaking Open Pixel Control: a render loop emits one full
//! frame per tick while a capacity-1 mailbox feeds it configuration updates
//! from outside, without ever stalling the output stream.
//!
//! # Architecture
//!
//! ```text
//! submitter ──submit──▶ ConfigMailbox ──try_take──▶ AnimationEngine
//!                                                        │ send_frame
//!                                                        ▼
//!                                                  FrameSink (OpcClient)
//!                                                        │ TCP
//!                                                        ▼
//!                                                    controller
//! ```
//!
//! The engine is the only task that ever touches the current configuration;
//! the mailbox slot is the only state shared with the submission path.
//! Submitting never blocks (a pending update wins over a new one), taking
//! never blocks, and a failed frame transmission costs exactly that frame.
//!
//! # Module Overview
//!
//! - [`pixel`]: colors and frames
//! - [`config`]: animation configuration, string geometry, validated intake
//! - [`mailbox`]: the single-slot configuration handoff
//! - [`engine`]: the render loop
//! - [`protocol`]: OPC wire encoding and the TCP client
//!
//! # No UI dependencies
//!
//! The browser-facing layer lives outside this crate; it only ever calls
//! [`config::decode_update`] and [`ConfigMailbox::submit`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod engine;
pub mod mailbox;
pub mod pixel;
pub mod protocol;

// Re-exports for convenience
pub use config::{decode_update, ConfigError, ScrollConfig, StringGeometry, MAX_LED_COUNT};
pub use engine::{render_frame, AnimationEngine};
pub use mailbox::{ConfigMailbox, SubmitOutcome};
pub use pixel::{Color, Frame};
pub use protocol::{FrameSink, OpcClient, ProtocolError};
