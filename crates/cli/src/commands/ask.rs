//! Ask command handler.
//!
//! Resolves one question through the same pipeline the server uses and
//! prints the answer to stdout, streamed token by token by default.

use clap::Args;
use futures::StreamExt;
use sikkim_chat::{ChatSettings, Resolver};
use sikkim_core::{config::AppConfig, AppResult};
use sikkim_knowledge::KnowledgeBase;
use sikkim_llm::OllamaClient;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Resolve a single question from the terminal
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub message: String,

    /// Language hint (e.g., "en", "hi")
    #[arg(long)]
    pub lang: Option<String>,

    /// Print the answer at once instead of streaming
    #[arg(long)]
    pub no_stream: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let resolver = build_resolver(config);

        if self.no_stream {
            let answer = resolver.resolve(&self.message, self.lang.as_deref()).await;
            tracing::debug!("Answer source: {}", answer.source.as_str());
            println!("{}", answer.text);
            return Ok(());
        }

        let mut chunks = resolver
            .resolve_stream(&self.message, self.lang.as_deref())
            .await;

        let mut stdout = std::io::stdout();
        while let Some(chunk) = chunks.next().await {
            if let Some(error) = chunk.error {
                tracing::error!("Stream aborted: {}", error);
                break;
            }
            if chunk.done {
                break;
            }
            print!("{}", chunk.text);
            stdout.flush()?;
        }

        // Add newline after streaming output
        println!();

        Ok(())
    }
}

/// Wire the pipeline from configuration.
fn build_resolver(config: &AppConfig) -> Resolver {
    let knowledge = Arc::new(KnowledgeBase::load(&config.qa_file));

    let llm = Arc::new(OllamaClient::with_base_url(&config.ollama_url).with_timeouts(
        Duration::from_secs(config.probe_timeout_secs),
        Duration::from_secs(config.generate_timeout_secs),
        Duration::from_secs(config.stream_timeout_secs),
    ));

    Resolver::new(knowledge, llm, ChatSettings::from(config))
}
