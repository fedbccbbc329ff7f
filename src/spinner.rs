//! Progress mark shown while a query is outstanding.

use std::io::Write;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spinner frames.
const FRAMES: &[&str] = &["-", "\\", "|", "/"];

/// Animation speed per frame.
const FRAME_DURATION: Duration = Duration::from_millis(100);

/// Returns the frame shown on the given tick.
pub fn frame(tick: usize) -> &'static str {
    FRAMES[tick % FRAMES.len()]
}

/// A running spinner task. Stop it before writing anything else.
pub struct Spinner {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Spinner {
    /// Starts drawing on `out`. The first frame appears after one interval,
    /// so fast queries draw nothing.
    pub fn start<W>(mut out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FRAME_DURATION);
            ticker.tick().await;

            let mut tick = 0;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let _ = write!(out, "\r{}", frame(tick));
                        let _ = out.flush();
                        tick += 1;
                    }
                }
            }

            if tick > 0 {
                let _ = write!(out, "\r \r");
                let _ = out.flush();
            }
        });

        Self { cancel, handle }
    }

    /// Stops the spinner and waits until its mark is cleared.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::debug!("Spinner task ended abnormally: {}", e);
        }
    }
}
