//! Interactive loop: one utterance per line until an exit word or EOF.

use crate::output::render_turn;
use crate::Result;
use chirp_core::{LlmClient, Session, SocialApi};
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Words that end the session (case-insensitive).
pub const EXIT_WORDS: [&str; 3] = ["exit", "quit", "bye"];

pub fn is_exit_word(line: &str) -> bool {
    let line = line.trim();
    EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w))
}

/// Run the loop over `input`, writing prompts and results to `output`.
///
/// Returns the number of turns processed.
pub async fn run<L, A, R, W>(session: &mut Session<L, A>, input: R, output: &mut W) -> Result<usize>
where
    L: LlmClient,
    A: SocialApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut turns = 0;

    writeln!(
        output,
        "{} Ask about X in plain language (model: {}). Type {} to quit.",
        "chirp".cyan().bold(),
        session.translator().llm().model_name(),
        EXIT_WORDS.join("/").bold()
    )?;

    loop {
        write!(output, "\n{} ", "You:".bold())?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            debug!("Input closed");
            writeln!(output)?;
            break;
        };

        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }
        if is_exit_word(utterance) {
            writeln!(output, "Goodbye!")?;
            break;
        }

        let report = session.translate_and_execute(utterance).await;
        turns += 1;
        write!(
            output,
            "{}",
            render_turn(&report, session.identities().len())?
        )?;
    }

    Ok(turns)
}
