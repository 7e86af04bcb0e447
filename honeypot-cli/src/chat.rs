//! Interactive chat loop.
//!
//! Reads lines from stdin and maps them onto the session's command handlers.
//! Stdin is not read while a turn is outstanding, which is what keeps the
//! submit trigger disabled for the duration of a turn.

use honeypot_core::{
    ConversationSession, Draft, HttpApiClient, TelemetryHandle, EXAMPLE_MESSAGES,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};

use crate::render;

const HELP: &str = "\
Type a scam message and press Enter to send it.
  /example N   load example message N (1-4) into the draft
  /send        send the draft (Enter on an empty line does the same)
  /clear       clear the conversation
  /stats       show session statistics
  /intel       show extracted intelligence
  /metrics     show backend performance metrics
  /history     show the transcript
  /help        show this help
  /quit        exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Example(usize),
    SendDraft,
    Clear,
    Stats,
    Intel,
    Metrics,
    History,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Submit(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("example"), Some(n)) => match n.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Example(n - 1),
                _ => Command::Unknown(trimmed.to_string()),
            },
            (Some("send"), None) => Command::SendDraft,
            (Some("clear"), None) => Command::Clear,
            (Some("stats"), None) => Command::Stats,
            (Some("intel"), None) => Command::Intel,
            (Some("metrics"), None) => Command::Metrics,
            (Some("history"), None) => Command::History,
            (Some("help"), None) => Command::Help,
            (Some("quit") | Some("exit"), None) => Command::Quit,
            _ => Command::Unknown(trimmed.to_string()),
        }
    }
}

pub async fn run_chat(client: HttpApiClient, telemetry: Option<TelemetryHandle>) -> anyhow::Result<()> {
    run_chat_with(client, telemetry, BufReader::new(tokio::io::stdin())).await
}

/// Drive the chat from `input`. The poller is stopped whether the loop ends
/// normally or on an I/O error.
async fn run_chat_with<R: AsyncBufRead + Unpin>(
    client: HttpApiClient,
    telemetry: Option<TelemetryHandle>,
    input: R,
) -> anyhow::Result<()> {
    let mut lines = input.lines();
    let result = chat_loop(&client, telemetry.as_ref(), &mut lines).await;

    if let Some(handle) = telemetry {
        handle.stop().await;
    }
    if let Err(e) = &result {
        tracing::error!(error = %e, "Chat loop aborted");
    }
    result
}

async fn chat_loop<R: AsyncBufRead + Unpin>(
    client: &HttpApiClient,
    telemetry: Option<&TelemetryHandle>,
    lines: &mut Lines<R>,
) -> anyhow::Result<()> {
    let mut session = ConversationSession::new();
    let mut draft = Draft::new();

    println!("Connected to {}", client.base_url());
    println!("{}", HELP);

    loop {
        prompt("> ").await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Submit(text) if text.trim().is_empty() && !draft.is_blank() => {
                submit(&mut session, client, &mut draft, None).await;
            }
            Command::Submit(text) => {
                submit(&mut session, client, &mut draft, Some(text)).await;
            }
            Command::SendDraft => {
                submit(&mut session, client, &mut draft, None).await;
            }
            Command::Example(index) => {
                if draft.set_example_text(index) {
                    println!("Draft: {}", draft.as_str());
                    println!("(press Enter or /send to submit)");
                } else {
                    println!("No example {}; choose 1-{}", index + 1, EXAMPLE_MESSAGES.len());
                }
            }
            Command::Clear => {
                if confirm(lines, "Are you sure you want to clear the conversation? [y/N] ").await? {
                    session.reset();
                    draft.clear();
                    println!("Conversation cleared.");
                }
            }
            Command::Stats => {
                println!("{}", render::stats_panel(session.stats(), session.intelligence()));
            }
            Command::Intel => match render::intelligence_details(session.intelligence()) {
                Some(details) => println!("{}", details),
                None => println!("No intelligence extracted yet."),
            },
            Command::Metrics => {
                let snapshot = telemetry.and_then(|t| t.snapshot());
                println!("{}", render::metrics_panel(snapshot.as_ref(), session.stats()));
            }
            Command::History => {
                if session.transcript().is_empty() {
                    println!("No messages yet. Send a test message to start!");
                }
                for entry in session.transcript() {
                    println!("{}", render::transcript_line(entry));
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(cmd) => println!("Unknown command: {} (try /help)", cmd),
        }
    }

    Ok(())
}

/// Submit `text`, or the draft when `text` is `None`. The draft is only
/// cleared once the turn succeeds.
async fn submit(
    session: &mut ConversationSession,
    client: &HttpApiClient,
    draft: &mut Draft,
    text: Option<String>,
) {
    let from_draft = text.is_none();
    let text = text.unwrap_or_else(|| draft.as_str().to_string());

    println!("Processing...");
    match session.submit_turn(client, &text).await {
        Ok(outcome) => {
            let shown = session.transcript().len().saturating_sub(if outcome.reply.is_some() { 2 } else { 1 });
            for entry in &session.transcript()[shown..] {
                println!("{}", render::transcript_line(entry));
            }
            println!("{}", render::turn_card(&outcome));
            if outcome.new_entities > 0 {
                println!("{} new intelligence item(s) extracted (/intel to view)", outcome.new_entities);
            }
            if from_draft {
                draft.clear();
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Turn rejected");
            println!("{}", e);
        }
    }
}

async fn prompt(text: &str) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}

async fn confirm<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>, question: &str) -> std::io::Result<bool> {
    prompt(question).await?;
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
