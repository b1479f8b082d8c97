use crate::config::ConfigLoader;
use anyhow::Result;
use clap::Args;
use sagar_models::{Assistant, ChatRequest, Message};

#[derive(Args)]
pub struct ChatArgs {
    /// Question for SeaSage
    pub message: String,

    /// Session id forwarded to the backend (random if omitted)
    #[arg(long)]
    pub session: Option<String>,
}

pub async fn run(args: ChatArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let assistant = Assistant::from_config(&config.assistant)?;

    let session = args
        .session
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let request = ChatRequest::new(vec![Message::user(args.message)], session);

    let reply = assistant.reply(&request).await;

    println!("{}", reply.content);
    println!();
    println!(
        "{} • {:.0}% confidence",
        reply.provenance,
        reply.confidence * 100.0
    );
    Ok(())
}
