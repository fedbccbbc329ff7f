//! Interactive read-eval loop.
//!
//! Reads MQL from an async line source, runs it through a [`QueryClient`],
//! and writes tables or `ERROR:` lines to the output.

use std::io::Write;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::client::{query_all, QueryClient};
use crate::error::Result;
use crate::render::{render, OutputFormat, RenderOptions};
use crate::result::Table;
use crate::spinner::Spinner;

/// Prompt for a new query.
pub const PROMPT: &str = "mql> ";

/// Prompt while a query continues over several lines.
pub const CONTINUATION_PROMPT: &str = "  -> ";

/// Joins physical lines into one query.
///
/// A line ending in `\` continues on the next line. Blank lines are ignored.
#[derive(Debug, Default)]
pub struct InputBuffer {
    pending: String,
    continuing: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the prompt for the next line.
    pub fn prompt(&self) -> &'static str {
        if self.continuing {
            CONTINUATION_PROMPT
        } else {
            PROMPT
        }
    }

    /// Adds a line, returning the complete query once it is finished.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(head) = line.strip_suffix('\\') {
            self.pending.push_str(head);
            self.continuing = true;
            return None;
        }

        self.pending.push_str(line);
        self.continuing = false;
        Some(std::mem::take(&mut self.pending))
    }
}

/// Returns true for `exit` or `quit`, in any case.
pub fn is_exit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

/// Where the shell reads its input lines from.
#[async_trait]
pub trait LineSource: Send {
    /// Reads the next line, without its line ending.
    ///
    /// Returns `None` at end of input.
    async fn read_line(&mut self, prompt: &'static str) -> Result<Option<String>>;

    /// Returns true if the source draws `prompt` itself.
    fn shows_prompt(&self) -> bool {
        false
    }

    /// Records a finished query.
    fn add_history(&mut self, _query: &str) {}
}

/// Reads lines from any buffered async reader.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the
/// session.
pub struct ReaderInput<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin + Send> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> LineSource for ReaderInput<R> {
    async fn read_line(&mut self, _prompt: &'static str) -> Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }

        let line = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf[..]);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        Ok(Some(String::from_utf8_lossy(line).into_owned()))
    }
}

/// Shell settings.
#[derive(Debug, Clone, Copy)]
pub struct ShellOptions {
    pub render: RenderOptions,
    /// Draw a progress mark on stderr while a query runs.
    pub spinner: bool,
    pub max_pages: usize,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            spinner: false,
            max_pages: 100,
        }
    }
}

/// The interactive shell.
pub struct Shell<'a, W: Write> {
    client: &'a dyn QueryClient,
    out: W,
    options: ShellOptions,
}

impl<'a, W: Write> Shell<'a, W> {
    pub fn new(client: &'a dyn QueryClient, out: W, options: ShellOptions) -> Self {
        Self {
            client,
            out,
            options,
        }
    }

    /// Consumes the shell, returning its output.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs the loop over a plain reader until `exit`, `quit`, or end of
    /// input. Prompts are written to the output.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        self.run_with(&mut ReaderInput::new(input)).await
    }

    /// Runs the loop until `exit`, `quit`, or end of input.
    pub async fn run_with<S>(&mut self, source: &mut S) -> Result<()>
    where
        S: LineSource + ?Sized,
    {
        let mut buffer = InputBuffer::new();

        loop {
            let prompt = buffer.prompt();
            if !source.shows_prompt() {
                write!(self.out, "{}", prompt)?;
                self.out.flush()?;
            }

            let Some(line) = source.read_line(prompt).await? else {
                writeln!(self.out)?;
                break;
            };

            let Some(query) = buffer.push_line(&line) else {
                continue;
            };
            source.add_history(&query);

            if is_exit_command(&query) {
                break;
            }

            self.execute(&query).await?;
        }

        writeln!(self.out, "Bye")?;
        self.out.flush()?;
        Ok(())
    }

    /// Runs one query and prints its result or error.
    ///
    /// Returns `Ok(false)` if the query failed. Only output errors are
    /// propagated.
    pub async fn execute(&mut self, query: &str) -> Result<bool> {
        info!("Running query");
        debug!("Query text: {}", query);

        let spinner = self
            .options
            .spinner
            .then(|| Spinner::start(std::io::stderr()));
        let start = Instant::now();
        let result = query_all(self.client, query, self.options.max_pages).await;
        if let Some(spinner) = spinner {
            spinner.stop().await;
        }
        debug!("Query finished in {:?}", start.elapsed());

        match result {
            Ok(response) => {
                let table = Table::from(&response);
                self.print_table(&table)?;
                Ok(true)
            }
            Err(e) => {
                writeln!(self.out, "ERROR: {}", e)?;
                Ok(false)
            }
        }
    }

    fn print_table(&mut self, table: &Table) -> Result<()> {
        let options = &self.options.render;

        if options.format == OutputFormat::Json {
            write!(self.out, "{}", render(table, options)?)?;
        } else if table.is_empty() {
            write!(self.out, "Empty result\n\n")?;
        } else {
            write!(self.out, "{}", render(table, options)?)?;
            write!(self.out, "{} points in result\n\n", table.rows.len())?;
        }

        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockQueryClient;
    use crate::monitoring::QueryResponse;
    use crate::status::StructuredError;

    #[test]
    fn test_input_single_line() {
        let mut buffer = InputBuffer::new();
        assert_eq!(buffer.prompt(), PROMPT);
        assert_eq!(
            buffer.push_line("  fetch gce_instance  "),
            Some("fetch gce_instance".to_string())
        );
    }

    #[test]
    fn test_input_continuation() {
        let mut buffer = InputBuffer::new();
        assert_eq!(buffer.push_line("fetch gce_instance \\"), None);
        assert_eq!(buffer.prompt(), CONTINUATION_PROMPT);
        assert_eq!(buffer.push_line("| within 5m"), Some("fetch gce_instance | within 5m".to_string()));
        assert_eq!(buffer.prompt(), PROMPT);
    }

    #[test]
    fn test_input_skips_blank_lines() {
        let mut buffer = InputBuffer::new();
        assert_eq!(buffer.push_line(""), None);
        assert_eq!(buffer.push_line("   "), None);
        assert_eq!(buffer.prompt(), PROMPT);

        assert_eq!(buffer.push_line("a\\"), None);
        assert_eq!(buffer.push_line(""), None);
        assert_eq!(buffer.prompt(), CONTINUATION_PROMPT);
        assert_eq!(buffer.push_line("b"), Some("ab".to_string()));
    }

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command("Exit"));
        assert!(!is_exit_command("exit now"));
    }

    #[tokio::test]
    async fn test_execute_prints_table_and_count() {
        let client = MockQueryClient::new();
        let mut shell = Shell::new(&client, Vec::new(), ShellOptions::default());

        assert!(shell.execute("fetch gce_instance").await.unwrap());

        let out = String::from_utf8(shell.into_output()).unwrap();
        assert!(out.contains("| zone "));
        assert!(out.contains("| utilization |"));
        assert!(out.ends_with("3 points in result\n\n"));
    }

    #[tokio::test]
    async fn test_execute_empty_result() {
        let client = MockQueryClient::with_pages(vec![QueryResponse::default()]);
        let mut shell = Shell::new(&client, Vec::new(), ShellOptions::default());

        assert!(shell.execute("fetch nothing").await.unwrap());
        assert_eq!(String::from_utf8(shell.into_output()).unwrap(), "Empty result\n\n");
    }

    #[tokio::test]
    async fn test_execute_error() {
        let client = MockQueryClient::failing(StructuredError::new(400, "bad"));
        let mut shell = Shell::new(&client, Vec::new(), ShellOptions::default());

        assert!(!shell.execute("fetch").await.unwrap());
        assert_eq!(
            String::from_utf8(shell.into_output()).unwrap(),
            "ERROR: code: 400, message: \"bad\", detail: \"\"\n"
        );
    }

    #[tokio::test]
    async fn test_execute_json_format() {
        let client = MockQueryClient::new();
        let options = ShellOptions {
            render: RenderOptions {
                format: OutputFormat::Json,
                max_column_width: None,
            },
            ..Default::default()
        };
        let mut shell = Shell::new(&client, Vec::new(), options);
        shell.execute("fetch gce_instance").await.unwrap();

        let out = String::from_utf8(shell.into_output()).unwrap();
        let table: Table = serde_json::from_str(&out).unwrap();
        assert_eq!(table.header, vec!["zone", "instance_name", "time", "utilization"]);
        assert_eq!(table.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_run_until_exit() {
        let client = MockQueryClient::new();
        let mut shell = Shell::new(&client, Vec::new(), ShellOptions::default());

        let input: &[u8] = b"fetch gce_instance \\\n| within 5m\nexit\nfetch ignored\n";
        shell.run(input).await.unwrap();

        assert_eq!(client.queries(), vec!["fetch gce_instance | within 5m"]);
        let out = String::from_utf8(shell.into_output()).unwrap();
        assert!(out.starts_with(PROMPT));
        assert!(out.contains(CONTINUATION_PROMPT));
        assert!(out.ends_with("Bye\n"));
    }

    /// Feeds fixed lines and records what the shell stores as history.
    struct ScriptedInput {
        lines: std::vec::IntoIter<&'static str>,
        prompts: Vec<&'static str>,
        history: Vec<String>,
    }

    impl ScriptedInput {
        fn new(lines: Vec<&'static str>) -> Self {
            Self {
                lines: lines.into_iter(),
                prompts: Vec::new(),
                history: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl LineSource for ScriptedInput {
        async fn read_line(&mut self, prompt: &'static str) -> Result<Option<String>> {
            self.prompts.push(prompt);
            Ok(self.lines.next().map(str::to_string))
        }

        fn shows_prompt(&self) -> bool {
            true
        }

        fn add_history(&mut self, query: &str) {
            self.history.push(query.to_string());
        }
    }

    #[tokio::test]
    async fn test_run_with_records_joined_history() {
        let client = MockQueryClient::new();
        let mut shell = Shell::new(&client, Vec::new(), ShellOptions::default());
        let mut input = ScriptedInput::new(vec!["fetch gce_instance \\", "| within 5m", "quit"]);

        shell.run_with(&mut input).await.unwrap();

        assert_eq!(input.history, vec!["fetch gce_instance | within 5m", "quit"]);
        assert_eq!(input.prompts, vec![PROMPT, CONTINUATION_PROMPT, PROMPT]);

        let out = String::from_utf8(shell.into_output()).unwrap();
        assert!(!out.contains(PROMPT));
        assert!(out.ends_with("Bye\n"));
    }

    #[tokio::test]
    async fn test_reader_input_strips_line_endings() {
        let mut input = ReaderInput::new(&b"fetch a\r\nfetch b"[..]);
        assert_eq!(input.read_line(PROMPT).await.unwrap().as_deref(), Some("fetch a"));
        assert_eq!(input.read_line(PROMPT).await.unwrap().as_deref(), Some("fetch b"));
        assert_eq!(input.read_line(PROMPT).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reader_input_replaces_invalid_utf8() {
        let mut input = ReaderInput::new(&b"fetch \xff\n"[..]);
        assert_eq!(
            input.read_line(PROMPT).await.unwrap().as_deref(),
            Some("fetch \u{fffd}")
        );
    }

    #[tokio::test]
    async fn test_run_until_eof() {
        let client = MockQueryClient::new();
        let mut shell = Shell::new(&client, Vec::new(), ShellOptions::default());

        let input: &[u8] = b"";
        shell.run(input).await.unwrap();

        assert!(client.queries().is_empty());
        assert_eq!(
            String::from_utf8(shell.into_output()).unwrap(),
            format!("{PROMPT}\nBye\n")
        );
    }
}
