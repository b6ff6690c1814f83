//! Interactive console and one-shot question answering.

use std::path::Path;

use anyhow::{Context, bail};
use docchat_session::{Session, UploadReport};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::error;

use crate::commands::{HELP, ReplCommand};

/// Read `path` and load it into `session`. Invalid UTF-8 is replaced rather
/// than rejected.
pub async fn upload_file(session: &mut Session, path: &Path) -> anyhow::Result<UploadReport> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(session.upload_text(&name, &text).await)
}

/// Load `doc`, answer `question` and print the answer.
pub async fn run_once(mut session: Session, doc: &Path, question: &str) -> anyhow::Result<()> {
    let report = upload_file(&mut session, doc).await?;
    if !report.is_loaded() {
        bail!("{}: {report}", doc.display());
    }
    eprintln!("{report}");

    match session.ask(question).await {
        Some(answer) => println!("{answer}"),
        None => bail!("the question is empty"),
    }
    Ok(())
}

/// Run the interactive REPL until `/quit`, Ctrl-C or Ctrl-D.
pub async fn run_console(mut session: Session) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("docchat - chat with a text document ({} mode)", session.mode());
    println!("Type /upload <path> to load a document, /help for commands.\n");

    loop {
        let line = match rl.readline(&format!("[{}] > ", session.mode())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        };
        if !line.trim().is_empty() {
            let _ = rl.add_history_entry(line.as_str());
        }

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Ask(question) => {
                if let Some(answer) = session.ask(&question).await {
                    println!("\n{answer}\n");
                }
            }
            ReplCommand::Upload(path) => match upload_file(&mut session, &path).await {
                Ok(report) => println!("{report}"),
                Err(e) => println!("{e:#}"),
            },
            ReplCommand::Mode(mode) => {
                session.set_mode(mode);
                println!("Response mode: {mode}");
            }
            ReplCommand::Clear => {
                session.clear();
                println!("Chat history cleared.");
            }
            ReplCommand::History => {
                if session.messages().is_empty() {
                    println!("No messages yet.");
                }
                for message in session.messages() {
                    println!(
                        "[{}] {} ({}): {}",
                        message.timestamp.format("%H:%M:%S"),
                        message.role,
                        message.mode,
                        message.content
                    );
                }
            }
            ReplCommand::Status => {
                let status = session.status().await;
                println!("Session:    {}", status.session_id);
                println!("Mode:       {}", status.mode);
                match &status.document {
                    Some(doc) => println!(
                        "Document:   {} ({} lines, {} fallback embeddings)",
                        doc.document_id, doc.chunk_count, doc.fallback_count
                    ),
                    None => println!("Document:   none"),
                }
                println!("Messages:   {}", status.message_count);
                println!("Web search: {}", if status.web_search { "on" } else { "off" });
            }
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
            ReplCommand::Invalid(message) => println!("{message}"),
        }
    }

    println!("Goodbye!");
    Ok(())
}
