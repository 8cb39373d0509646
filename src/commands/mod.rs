mod ask;
mod create;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

use crate::query::RoutingDecision;
use crate::state::AppState;

/// One processed input line.
#[derive(Debug)]
pub enum Outcome {
    /// Model answer, printed with the `Bot:` prefix.
    Answer(String),
    /// Local status message, printed as-is.
    Notice(String),
    /// Exit sentinel seen.
    Exit,
}

/// Route one line of input and run it to completion.
pub async fn dispatch(state: &AppState, line: &str) -> Result<Outcome> {
    let input = line.trim();
    if input.eq_ignore_ascii_case("exit") {
        return Ok(Outcome::Exit);
    }

    let decision = state.router.route(input, &state.index);
    match decision {
        RoutingDecision::AlreadyExists(number) => {
            Ok(Outcome::Notice(create::already_exists(state, number)))
        }
        RoutingDecision::Generate(number) => create::create(state, number).await.map(Outcome::Notice),
        RoutingDecision::AnswerScoped(..) | RoutingDecision::AnswerGlobal => {
            ask::ask(state, &decision, input).await.map(Outcome::Answer)
        }
    }
}

/// Line-oriented session: one input processed fully before the next is read.
/// Ends on `exit` or end of input. Failures are printed and the session continues.
pub async fn run_session<R, W>(state: &AppState, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    writer
        .write_all(b"Chatbot ready! Type 'exit' to quit.\n")
        .await?;

    loop {
        writer.write_all(b"You: ").await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let text = match dispatch(state, &line).await {
            Ok(Outcome::Exit) => break,
            Ok(Outcome::Answer(answer)) => format!("Bot: {}\n", answer),
            Ok(Outcome::Notice(notice)) => format!("{}\n", notice),
            Err(e) => {
                error!("request failed: {:#}", e);
                format!("Error: {:#}\n", e)
            }
        };
        writer.write_all(text.as_bytes()).await?;
    }

    writer.flush().await?;
    info!("session ended");
    Ok(())
}
