use std::io::{self, BufRead, Write};

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use contract_finder_agent::{ContractAgent, DialogueState, Message, TurnError, extract_fields};

const EXIT_KEYWORDS: &[&str] = &["quit", "exit", "q"];

const WELCOME: &str = "Welcome to the Contract Finder Agent!\n\
I'll help you find the best contract opportunities.";
const FAREWELL: &str = "Goodbye! Hope you found some great contract opportunities.";

enum TurnOutcome {
    Continue,
    Exit,
}

/// Why a console turn failed.  Any of these ends the session.
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error("console input closed")]
    InputClosed,
    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),
}

fn is_exit_keyword(line: &str) -> bool {
    EXIT_KEYWORDS.contains(&line.to_lowercase().as_str())
}

/// Drive the console conversation until an exit keyword or the first
/// failed turn.  A failed turn is reported and ends the whole session.
///
/// Only failures writing to `output` while reporting are returned.
pub(crate) async fn run_session<R: BufRead, W: Write>(
    agent: &ContractAgent,
    state: &mut DialogueState,
    mut input: R,
    mut output: W,
) -> Result<()> {
    writeln!(output, "{WELCOME}")?;

    loop {
        match run_turn(agent, state, &mut input, &mut output).await {
            Ok(TurnOutcome::Continue) => {}
            Ok(TurnOutcome::Exit) => {
                writeln!(output, "{FAREWELL}")?;
                break;
            }
            Err(err) => {
                writeln!(output, "An error occurred: {err}")?;
                break;
            }
        }
    }

    output.flush()?;
    Ok(())
}

async fn run_turn<R: BufRead, W: Write>(
    agent: &ContractAgent,
    state: &mut DialogueState,
    input: &mut R,
    output: &mut W,
) -> Result<TurnOutcome, SessionError> {
    write!(output, "\nUser: ")?;
    output.flush()?;

    let mut raw = String::new();
    if input.read_line(&mut raw)? == 0 {
        return Err(SessionError::InputClosed);
    }
    let line = raw.strip_suffix('\n').unwrap_or(&raw);
    let line = line.strip_suffix('\r').unwrap_or(line);

    if is_exit_keyword(line) {
        return Ok(TurnOutcome::Exit);
    }

    state.push(Message::user(line));
    let outcome = agent.run_pass(state).await?;
    if let Some(failure) = &outcome.search_failure {
        writeln!(output, "Error in contract search: {failure}")?;
    }
    for message in outcome.messages {
        writeln!(output, "\nAssistant: {}", message.content)?;
        state.push(message);
    }

    extract_fields(state, line);
    debug!(
        industry = ?state.industry,
        contract_type = ?state.contract_type,
        location = ?state.location,
        budget_range = ?state.budget_range,
        "criteria after turn"
    );
    Ok(TurnOutcome::Continue)
}
