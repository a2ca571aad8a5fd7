//! Interactive terminal front end.
//!
//! Reads one command per line, dispatches it to the session store and prints
//! the re-rendered screen. The screen is also redrawn when the feedback banner
//! expires. Logs go to stderr in this mode so stdout only carries the screen.

mod render;

pub use render::render_screen;

use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::session::{Action, SessionStore};

const HELP: &str = "\
Commands:
  search <text>   filter cities by name (empty text clears the filter)
  select <id>     open the eco rules for a city
  done <id>       complete an eco rule
  back            return to the city list
  show            redraw the screen
  reset           start a new session
  quit            exit
";

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Show,
    Help,
    Quit,
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "search" | "s" => Ok(Command::Act(Action::SetFilterText(rest.to_string()))),
        "select" | "open" => parse_id(rest).map(|id| Command::Act(Action::SelectDestination(id))),
        "done" | "complete" => parse_id(rest).map(|id| Command::Act(Action::CompleteTask(id))),
        "back" => Ok(Command::Act(Action::ClearSelection)),
        "reset" => Ok(Command::Act(Action::Reset)),
        "show" | "" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("Unknown command: {} (type `help`)", other)),
    }
}

fn parse_id(text: &str) -> Result<u32, String> {
    text.parse()
        .map_err(|_| format!("Expected a numeric id, got `{}`", text))
}

async fn write_screen<W>(output: &mut W, screen: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(screen.as_bytes()).await?;
    output.write_all(b"\n> ").await?;
    output.flush().await?;
    Ok(())
}

/// Run the interactive loop until `quit` or end of input.
pub async fn run<R, W>(store: SessionStore, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    write_screen(&mut output, &render_screen(&store.view())).await?;

    loop {
        let remaining = store.feedback_remaining();
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::time::sleep(remaining.unwrap_or_default() + Duration::from_millis(1)),
                if remaining.is_some() => {
                write_screen(&mut output, &render_screen(&store.view())).await?;
                continue;
            }
        };
        let Some(line) = line else { break };

        let screen = match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => HELP.to_string(),
            Ok(Command::Show) => render_screen(&store.view()),
            Ok(Command::Act(action)) => match store.dispatch(action) {
                Ok(view) => render_screen(&view),
                Err(e) => format!("Error: {}\n", e),
            },
            Err(message) => format!("{}\n", message),
        };
        write_screen(&mut output, &screen).await?;
    }

    Ok(())
}
