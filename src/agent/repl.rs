//! Line-oriented interactive loop over any async reader and writer.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::orchestrator::{Orchestrator, TurnOutcome};
use crate::error::Result;

const USER_PROMPT: &str = "User: ";
const ASSISTANT_PREFIX: &str = "Assistant: ";

/// Read lines from `input` until a shutdown command or end of input,
/// printing every reply to `output`.
///
/// Blank lines are ignored. Model errors end the loop and are returned.
pub async fn run_repl<R, W>(orchestrator: &mut Orchestrator, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        output.write_all(USER_PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            orchestrator.shutdown();
            output.write_all(b"\n").await?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match orchestrator.handle_input(&line).await? {
            TurnOutcome::Replied { reply, .. } => {
                output
                    .write_all(format!("{ASSISTANT_PREFIX}{}\n", reply.trim_end()).as_bytes())
                    .await?;
            }
            TurnOutcome::Unrouted { .. } => {}
            TurnOutcome::Shutdown => break,
        }
    }
    output.flush().await?;
    Ok(())
}
