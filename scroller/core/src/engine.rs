//! The render loop.
//!
//! One tokio task owns the whole animation: build a frame for the current
//! index, hand it to the sink, sleep for the configured delay, then poll the
//! mailbox for a replacement configuration. A failed send loses exactly that
//! frame. The loop has no stop state; it runs until the process does.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{ScrollConfig, StringGeometry};
use crate::mailbox::ConfigMailbox;
use crate::pixel::{Color, Frame};
use crate::protocol::FrameSink;

/// Paint the train for frame index `i`.
///
/// Starts from an all-black frame and lights `train_length` pixels
/// beginning at `i`. A pixel that would land past the end of the string is
/// reflected to `train_length - offset - 1` rather than wrapped cyclically;
/// the double-light and skip artifacts this produces near the end of the
/// string are part of the animation's observable output. A reflected index
/// can itself still overrun the string when the train is longer than the
/// string; those pixels are dropped.
///
/// In random mode every channel of every lit pixel is drawn uniformly from
/// 2..=254.
#[must_use]
pub fn render_frame(config: &ScrollConfig, led_count: usize, i: usize) -> Frame {
    let mut frame = Frame::black(led_count);
    let mut rng = rand::thread_rng();

    for offset in 0..config.train_length {
        let mut pix = i + offset;
        if pix >= led_count {
            pix = config.train_length - offset - 1;
        }
        if pix >= led_count {
            continue;
        }

        let color = if config.random {
            Color::new(
                rng.gen_range(2..255),
                rng.gen_range(2..255),
                rng.gen_range(2..255),
            )
        } else {
            config.color
        };
        frame.set(pix, color);
    }

    frame
}

/// The animation engine: one configuration, one geometry, one sink.
///
/// Runs as a single task; frame computation, transmission, and sleeping are
/// strictly sequential within it. The mailbox is its only link to the rest
/// of the process.
pub struct AnimationEngine<S> {
    geometry: StringGeometry,
    mailbox: ConfigMailbox,
    sink: S,
    config: ScrollConfig,
}

impl<S: FrameSink + Send> AnimationEngine<S> {
    /// Create an engine starting from the default configuration
    /// (100 ms delay, train of 7, solid red).
    #[must_use]
    pub fn new(geometry: StringGeometry, mailbox: ConfigMailbox, sink: S) -> Self {
        Self::with_config(geometry, ScrollConfig::default(), mailbox, sink)
    }

    /// Create an engine starting from an explicit configuration.
    #[must_use]
    pub fn with_config(
        geometry: StringGeometry,
        config: ScrollConfig,
        mailbox: ConfigMailbox,
        sink: S,
    ) -> Self {
        Self {
            geometry,
            mailbox,
            sink,
            config,
        }
    }

    /// Run the render loop forever.
    ///
    /// Emits one frame per index in strict order, sleeps `delay_ms` between
    /// frames, and adopts a pending configuration — the whole value, all
    /// four fields at once — after each sleep. Send failures are logged and
    /// the loop moves on; nothing short of process termination stops it.
    pub async fn run(mut self) {
        info!(
            leds = self.geometry.led_count(),
            delay_ms = self.config.delay_ms,
            "animation engine started"
        );

        let mut i = 0usize;
        loop {
            let frame = render_frame(&self.config, self.geometry.led_count(), i);

            if let Err(e) = self.sink.send_frame(&frame).await {
                warn!(error = %e, frame = i, "dropping frame after failed send");
            }

            tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;

            if let Some(next) = self.mailbox.try_take() {
                debug!(
                    delay_ms = next.delay_ms,
                    train_length = next.train_length,
                    random = next.random,
                    "adopted new configuration"
                );
                self.config = next;
            }

            i += 1;
            if i >= self.geometry.led_count() {
                i = 0;
            }
        }
    }
}
