//! Line editing and history for terminal sessions.
//!
//! `rustyline` blocks on the terminal, so the editor lives on its own thread
//! and the shell talks to it over channels.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use async_trait::async_trait;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::{MqliError, Result};
use crate::shell::LineSource;

enum Request {
    Read {
        prompt: &'static str,
        reply: oneshot::Sender<Result<Option<String>>>,
    },
    Remember(String),
}

/// Handle to a line editor running on a dedicated thread.
///
/// History entries are written to the history file as soon as they are
/// added. The thread exits when the handle is dropped.
pub struct LineEditor {
    requests: mpsc::UnboundedSender<Request>,
}

impl LineEditor {
    /// Starts the editor, loading history from `history_path` if given.
    pub async fn start(history_path: Option<PathBuf>) -> Result<Self> {
        let (requests, receiver) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        thread::Builder::new()
            .name("mqli-editor".to_string())
            .spawn(move || serve(history_path, receiver, ready_tx))
            .map_err(|e| MqliError::internal(format!("Failed to start line editor: {e}")))?;

        ready_rx.await.map_err(|_| stopped())??;
        Ok(Self { requests })
    }
}

#[async_trait]
impl LineSource for LineEditor {
    async fn read_line(&mut self, prompt: &'static str) -> Result<Option<String>> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Read { prompt, reply })
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())?
    }

    fn shows_prompt(&self) -> bool {
        true
    }

    fn add_history(&mut self, query: &str) {
        if self
            .requests
            .send(Request::Remember(query.to_string()))
            .is_err()
        {
            debug!("Line editor stopped, history entry dropped");
        }
    }
}

/// Returns the default history file path.
///
/// Uses the XDG state directory on Linux (`~/.local/state/mqli/history`),
/// or the config directory on other platforms.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("mqli").join("history"))
}

fn stopped() -> MqliError {
    MqliError::internal("Line editor stopped")
}

fn serve(
    history_path: Option<PathBuf>,
    mut requests: mpsc::UnboundedReceiver<Request>,
    ready: oneshot::Sender<Result<()>>,
) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            let _ = ready.send(Err(MqliError::internal(format!(
                "Failed to initialize line editor: {e}"
            ))));
            return;
        }
    };

    if let Some(path) = &history_path {
        // A missing file just means an empty history.
        if let Err(e) = editor.load_history(path) {
            debug!("No history loaded from {}: {}", path.display(), e);
        }
    }

    if ready.send(Ok(())).is_err() {
        return;
    }

    while let Some(request) = requests.blocking_recv() {
        match request {
            Request::Read { prompt, reply } => {
                let _ = reply.send(read(&mut editor, prompt));
            }
            Request::Remember(entry) => {
                if let Err(e) = editor.add_history_entry(entry.as_str()) {
                    debug!("History entry rejected: {}", e);
                    continue;
                }
                if let Some(path) = &history_path {
                    save_history(&mut editor, path);
                }
            }
        }
    }
}

fn read(editor: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    match editor.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        // Ctrl-D and Ctrl-C both end the session.
        Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
        Err(ReadlineError::Io(e)) => Err(e.into()),
        Err(e) => Err(MqliError::internal(format!("Failed to read input: {e}"))),
    }
}

fn save_history(editor: &mut DefaultEditor, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Could not create history directory: {}", e);
            return;
        }
    }
    if let Err(e) = editor.save_history(path) {
        warn!("Could not save history to {}: {}", path.display(), e);
    }
}
