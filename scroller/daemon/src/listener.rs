//! Control listener: the submission path into the render loop.
//!
//! Accepts any number of connections on a local TCP socket; each connection
//! carries newline-delimited JSON configuration updates. Every line is
//! answered on the same connection: `ok` once the update is pending for the
//! engine, `dropped` when an earlier update was still pending, or
//! `error: <reason>` when the payload failed validation. No routing and no
//! file serving — the browser-facing UI lives elsewhere and speaks to this
//! socket.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

use scroller_core::{config, ConfigMailbox, SubmitOutcome};

/// Accepts control connections and forwards validated updates to the
/// mailbox.
pub struct ControlListener {
    listener: TcpListener,
    mailbox: ConfigMailbox,
}

impl ControlListener {
    /// Bind the control socket.
    pub async fn bind(addr: &str, mailbox: ConfigMailbox) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        Ok(Self { listener, mailbox })
    }

    /// Address the listener actually bound to.
    #[allow(dead_code)]
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        self.listener
            .local_addr()
            .context("control listener has no local address")
    }

    /// Accept connections until the task is dropped.
    pub async fn run(self) -> Result<()> {
        loop {
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .context("control listener accept failed")?;
            debug!(%peer, "control connection opened");

            let mailbox = self.mailbox.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, mailbox).await {
                    warn!(%peer, error = %e, "control connection ended with error");
                }
            });
        }
    }
}

/// Serve one control connection line by line.
async fn handle_connection(stream: TcpStream, mailbox: ConfigMailbox) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match config::decode_update(line.as_bytes()) {
            Ok(update) => match mailbox.submit(update) {
                SubmitOutcome::Accepted => "ok".to_string(),
                SubmitOutcome::Dropped => {
                    debug!("update dropped, previous one still pending");
                    "dropped".to_string()
                }
            },
            Err(e) => format!("error: {e}"),
        };

        write_half.write_all(reply.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
    }

    Ok(())
}
