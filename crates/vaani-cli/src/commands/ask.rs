//! Ask questions from the terminal.
//!
//! With a question, answers it once. Without one, reads questions from stdin
//! so follow-ups like "when was it launched?" resolve against earlier turns.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use vaani_core::{Assistant, ConversationStore, VaaniError};
use vaani_graph::GraphClient;
use vaani_web::AppConfig;

use crate::output;

#[derive(Args)]
pub struct AskArgs {
    /// The question; omit to start an interactive session
    pub question: Option<String>,

    /// Conversation id used for follow-up context
    #[arg(long, default_value = "cli")]
    pub context_id: String,

    /// Print the structured result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: AskArgs, config: AppConfig) -> Result<()> {
    let client = GraphClient::connect(&config.graph)
        .await
        .with_context(|| format!("Could not reach Neo4j at {}", config.graph.uri))?;
    let assistant = Assistant::new(Arc::new(client), ConversationStore::new(config.conversation));

    match args.question {
        Some(question) => ask_once(&assistant, &question, &args.context_id, args.json).await,
        None => interactive(&assistant, &args.context_id, args.json).await,
    }
}

async fn ask_once(assistant: &Assistant, question: &str, context_id: &str, json: bool) -> Result<()> {
    match assistant.answer(question, Some(context_id)).await {
        Ok(response) => {
            output::print_response(&response, json);
            Ok(())
        }
        Err(e @ VaaniError::MalformedInput(_)) => {
            println!("{}", e.user_message().yellow());
            Ok(())
        }
        Err(e) => Err(e).context("Failed to answer question"),
    }
}

async fn interactive(assistant: &Assistant, context_id: &str, json: bool) -> Result<()> {
    println!("{} {}", "Vaani".cyan().bold(), "ask anything about space (Ctrl+D to quit)".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".cyan());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        // Store outages are reported and the session goes on.
        if let Err(e) = ask_once(assistant, &line, context_id, json).await {
            println!("{} {:#}", "✗".red(), e);
        }
        println!();
    }
    Ok(())
}
