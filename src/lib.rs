pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod server;
pub mod storage;

use cli::Args;
use config::{ OpenAiConfig, StorageConfig };
use llm::completion::CompletionGateway;
use log::info;
use server::Server;
use storage::StorageGateway;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let openai_config = OpenAiConfig::from_args(&args)?;
    let storage_config = StorageConfig::from_args(&args)?;

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr());
    info!("CORS Origin: {}", args.cors_origin);
    info!("OpenAI Base URL: {}", openai_config.base_url);
    info!("Chat Model: {}", openai_config.models.chat_model);
    info!("Vision Model: {}", openai_config.models.vision_model);
    info!(
        "Speech Model: {} (voice {})",
        openai_config.models.speech_model,
        openai_config.models.speech_voice
    );
    info!("Transcription Model: {}", openai_config.models.transcription_model);
    info!("Image Model: {}", openai_config.models.image_model);
    info!("Storage URL: {}", storage_config.url);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let provider = llm::new_provider(&openai_config)?;
    let storage = StorageGateway::new(storage::new_backend(&storage_config)?);
    let gateway = Arc::new(CompletionGateway::new(provider, storage, openai_config.models.clone()));

    let server = Server::new(args.server_addr(), gateway, args.clone());
    server.run().await?;

    Ok(())
}
