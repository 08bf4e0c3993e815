pub mod cli;
pub mod client;
pub mod history;
pub mod llm;
pub mod models;
pub mod rag;
pub mod server;

use cli::{ Args, ClientArgs, Command };
use client::{ configured_base_url, resolve_base_url, ChatClient };
use history::Conversation;
use log::{ info, warn };
use models::chat::ChatResponse;
use server::Server;
use std::error::Error;
use std::time::Duration;
use tokio::io::{ AsyncBufReadExt, AsyncWriteExt, BufReader };

pub use client::ClientError;
pub use models::chat::{ ConversationMessage, Role, Source };

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    match args.command {
        Command::Serve(serve) => {
            info!("--- Server Configuration ---");
            info!("Server Address: {}", serve.server_addr);
            info!("Chat Model: {}", serve.chat_model);
            info!("Gemini Base URL: {}", serve.gemini_base_url);
            info!("Temperature: {}", serve.temperature);
            info!("Max Tokens: {}", serve.max_tokens);
            info!("Answer Language: {}", serve.answer_language);
            info!("----------------------------");

            let server = Server::from_config(
                serve.server_addr.clone(),
                &serve.llm_config(),
                Some(serve.answer_language.clone())
            );
            server.run().await?;
        }
        Command::Ask { message, client } => {
            let client = build_client(&client)?;
            let resp = client.send_chat_message(&message, &[]).await?;
            print_response(&resp);
        }
        Command::Chat { client } => {
            let client = build_client(&client)?;
            interactive_chat(&client).await?;
        }
        Command::Health { client } => {
            let client = build_client(&client)?;
            let health = client.health().await?;
            println!("status: {}", health.status);
            println!("rag_service_ready: {}", health.rag_service_ready);
        }
    }

    Ok(())
}

pub fn build_client(args: &ClientArgs) -> Result<ChatClient, Box<dyn Error + Send + Sync>> {
    let base_url = match &args.api_url {
        Some(url) => resolve_base_url(Some(url.clone())),
        None => configured_base_url().to_string(),
    };

    let http = match args.timeout_secs {
        Some(secs) => reqwest::Client::builder().timeout(Duration::from_secs(secs)).build()?,
        None => reqwest::Client::new(),
    };

    info!("Chat backend: {}", base_url);
    Ok(ChatClient::with_http(base_url, http))
}

fn print_response(resp: &ChatResponse) {
    println!("{}", resp.answer);
    if !resp.sources.is_empty() {
        println!();
        for source in &resp.sources {
            println!("[{}] {} ({})", source.id, source.content, source.section);
        }
    }
}

async fn interactive_chat(client: &ChatClient) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut conversation = Conversation::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        match message {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                conversation.clear();
                println!("(history cleared)");
                continue;
            }
            _ => {}
        }

        match client.send_chat_message(message, conversation.messages()).await {
            Ok(resp) => {
                print_response(&resp);
                conversation.record_exchange(message, resp.answer);
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                println!("error: {}", e);
            }
        }
    }

    Ok(())
}
