//! End-to-end render loop behavior, driven against test sinks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use scroller_core::{
    AnimationEngine, Color, ConfigMailbox, Frame, FrameSink, ProtocolError, ScrollConfig,
    StringGeometry,
};

/// Sink that records every successfully "sent" frame and can be told to
/// fail one call.
#[derive(Clone, Default)]
struct RecordingSink {
    frames: Arc<Mutex<Vec<Frame>>>,
    calls: Arc<AtomicUsize>,
    fail_on_call: Option<usize>,
}

impl RecordingSink {
    fn recorded(&self) -> Vec<Frame> {
        self.frames.lock().unwrap().clone()
    }

    fn recorded_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

#[async_trait]
impl FrameSink for RecordingSink {
    async fn send_frame(&mut self, frame: &Frame) -> Result<(), ProtocolError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if Some(call) == self.fail_on_call {
            return Err(ProtocolError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "sink told to fail",
            )));
        }
        self.frames.lock().unwrap().push(frame.clone());
        Ok(())
    }
}

/// Index of the single lit pixel in a train-of-1 frame.
fn lit_index(frame: &Frame) -> usize {
    let lit: Vec<usize> = frame
        .pixels()
        .iter()
        .enumerate()
        .filter(|(_, c)| **c != Color::BLACK)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(lit.len(), 1, "expected exactly one lit pixel");
    lit[0]
}

fn fast_config(train_length: usize, color: Color) -> ScrollConfig {
    ScrollConfig {
        delay_ms: 1,
        train_length,
        random: false,
        color,
    }
}

async fn wait_for_frames(sink: &RecordingSink, count: usize) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while sink.recorded_count() < count {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("engine did not produce enough frames in time");
}

#[tokio::test]
async fn test_frames_are_emitted_in_index_order() {
    let geometry = StringGeometry::new("localhost:7890", 5).unwrap();
    let mailbox = ConfigMailbox::new();
    let sink = RecordingSink::default();

    let engine = AnimationEngine::with_config(
        geometry,
        fast_config(1, Color::RED),
        mailbox,
        sink.clone(),
    );
    let task = tokio::spawn(engine.run());

    wait_for_frames(&sink, 12).await;
    task.abort();

    let indices: Vec<usize> = sink.recorded().iter().take(12).map(lit_index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4, 0, 1]);
}

#[tokio::test]
async fn test_send_failure_does_not_stall_the_loop() {
    let geometry = StringGeometry::new("localhost:7890", 4).unwrap();
    let mailbox = ConfigMailbox::new();
    let sink = RecordingSink {
        fail_on_call: Some(1),
        ..RecordingSink::default()
    };

    let engine = AnimationEngine::with_config(
        geometry,
        fast_config(1, Color::RED),
        mailbox,
        sink.clone(),
    );
    let task = tokio::spawn(engine.run());

    wait_for_frames(&sink, 6).await;
    task.abort();

    // Frame 1 was lost to the failed send; the loop still advanced to 2
    // and kept the index sequence intact.
    let indices: Vec<usize> = sink.recorded().iter().take(6).map(lit_index).collect();
    assert_eq!(indices, vec![0, 2, 3, 0, 1, 2]);
}

#[tokio::test]
async fn test_submitted_config_is_adopted_whole() {
    let geometry = StringGeometry::new("localhost:7890", 8).unwrap();
    let mailbox = ConfigMailbox::new();
    let sink = RecordingSink::default();

    let engine = AnimationEngine::with_config(
        geometry,
        fast_config(1, Color::RED),
        mailbox.clone(),
        sink.clone(),
    );
    let task = tokio::spawn(engine.run());

    wait_for_frames(&sink, 3).await;

    let green = Color::new(0, 200, 0);
    assert!(mailbox
        .submit(ScrollConfig {
            delay_ms: 1,
            train_length: 2,
            random: false,
            color: green,
        })
        .is_accepted());

    // The update lands within roughly one frame delay; give it a few.
    let seen = sink.recorded_count();
    wait_for_frames(&sink, seen + 5).await;
    task.abort();

    let frames = sink.recorded();
    let last = frames.last().unwrap();
    let lit: Vec<Color> = last
        .pixels()
        .iter()
        .copied()
        .filter(|c| *c != Color::BLACK)
        .collect();

    // Train length and color switched together, not piecemeal.
    assert_eq!(lit.len(), 2);
    assert!(lit.iter().all(|c| *c == green));

    // No frame ever mixes the old color with the new train, or vice versa.
    for frame in &frames {
        let colors: Vec<Color> = frame
            .pixels()
            .iter()
            .copied()
            .filter(|c| *c != Color::BLACK)
            .collect();
        let all_red = colors.iter().all(|c| *c == Color::RED);
        let all_green = colors.iter().all(|c| *c == green);
        assert!(all_red || all_green, "frame mixes configurations");
        if all_red {
            assert_eq!(colors.len(), 1);
        } else {
            assert_eq!(colors.len(), 2);
        }
    }
}

#[tokio::test]
async fn test_connect_failure_precedes_any_frame() {
    use scroller_core::OpcClient;
    use tokio::net::TcpListener;

    // Grab a port, then close it again so the connect is refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let result = OpcClient::connect(&addr).await;
    let err = result.err().expect("connect must fail");
    assert!(matches!(err, ProtocolError::ConnectionFailed { .. }));
    // No client, no sink, no engine: nothing was ever sent.
}
