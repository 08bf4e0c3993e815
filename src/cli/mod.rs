use clap::{ Args as ClapArgs, Parser, Subcommand };

use crate::rag::DEFAULT_ANSWER_LANGUAGE;
use crate::llm::{
    LlmConfig,
    DEFAULT_CHAT_MODEL,
    DEFAULT_GEMINI_BASE_URL,
    DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the chat backend (/health, /api/chat, /chat).
    Serve(ServeArgs),

    /// Send a single message and print the answer.
    Ask {
        /// The question to send.
        message: String,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Interactive chat on stdin. `/reset` clears the history, `/quit` exits.
    Chat {
        #[command(flatten)]
        client: ClientArgs,
    },

    /// Query the backend's /health endpoint.
    Health {
        #[command(flatten)]
        client: ClientArgs,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ClientArgs {
    /// Base URL of the chat backend. Falls back to http://localhost:5001.
    #[arg(long, env = "API_BASE_URL")]
    pub api_url: Option<String>,

    /// Overall request timeout in seconds. Unset means the HTTP client's defaults.
    #[arg(long, env = "API_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:5001")]
    pub server_addr: String,

    /// API key for Gemini. Without it the server starts but answers 503 to chat requests.
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    pub chat_model: String,

    /// Base URL of the Gemini API.
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    #[arg(long, env = "TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    #[arg(long, env = "MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Language the model is asked to answer in. An empty value leaves it to the model.
    #[arg(long, env = "ANSWER_LANGUAGE", default_value = DEFAULT_ANSWER_LANGUAGE)]
    pub answer_language: String,
}

impl ServeArgs {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_key: self.gemini_api_key.clone().filter(|k| !k.is_empty()),
            completion_model: Some(self.chat_model.clone()),
            base_url: Some(self.gemini_base_url.clone()),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
