use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Interface the HTTP server binds to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Front-end origin allowed by the CORS policy.
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,

    // --- OpenAI Provider Args ---
    /// Secret key for the OpenAI API.
    #[arg(long, env = "OPEN_AI_SECRET_KEY")]
    pub openai_api_key: String,

    /// Base URL of the OpenAI API (e.g., https://api.openai.com/v1)
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Model used for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "gpt-3.5-turbo")]
    pub chat_model: String,

    /// Model used for image description.
    #[arg(long, env = "VISION_MODEL", default_value = "gpt-4o")]
    pub vision_model: String,

    /// Model used for text-to-speech.
    #[arg(long, env = "SPEECH_MODEL", default_value = "tts-1-hd")]
    pub speech_model: String,

    /// Voice used for text-to-speech (alloy, echo, fable, onyx, nova, shimmer)
    #[arg(long, env = "SPEECH_VOICE", default_value = "alloy")]
    pub speech_voice: String,

    /// Model used for audio transcription.
    #[arg(long, env = "TRANSCRIPTION_MODEL", default_value = "whisper-1")]
    pub transcription_model: String,

    /// Model used for image generation.
    #[arg(long, env = "IMAGE_MODEL", default_value = "dall-e-3")]
    pub image_model: String,

    // --- Storage Args ---
    /// Supabase project URL (e.g., https://xyzcompany.supabase.co)
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase service or anon key.
    #[arg(long, env = "SUPABASE_KEY")]
    pub supabase_key: Option<String>,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
