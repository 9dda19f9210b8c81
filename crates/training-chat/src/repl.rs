//! Read-eval-print loop over a [`ChatAgent`].

use std::io::{self, Write};

use agent_core::{ChatAgent, ChatMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

pub const BANNER: &str = "Training AI chat. Type 'exit' or 'quit' to stop.";
pub const PROMPT: &str = "you> ";

fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Run until `exit`/`quit` or end of input.
///
/// A failed turn is reported on `err` and leaves the history untouched.
pub async fn run<A, R, W, E>(agent: &A, input: R, mut out: W, mut err: E) -> io::Result<()>
where
    A: ChatAgent + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
    E: Write,
{
    let mut lines = input.lines();
    let mut history: Vec<ChatMessage> = Vec::new();

    writeln!(out, "{}", BANNER)?;

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit(line) {
            break;
        }

        match agent.chat(line, &history).await {
            Ok(run) => {
                history = run.messages;
                debug!(history = history.len(), "Turn complete");
                if !run.output.is_empty() {
                    writeln!(out, "assistant> {}", run.output)?;
                }
            }
            Err(e) => {
                writeln!(err, "Request failed: {}", e)?;
            }
        }
    }

    Ok(())
}
