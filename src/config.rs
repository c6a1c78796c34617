use serde::Deserialize;

/// Which key-value backend holds favorites, ratings and generated recipes
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Redis,
    Memory,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Storage backend (`redis` or `memory`)
    #[serde(default)]
    pub storage_backend: StorageBackend,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Prefix prepended to every storage key
    #[serde(default)]
    pub storage_namespace: String,

    /// Gemini API key
    #[serde(default)]
    pub gemini_api_key: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Gemini model used for recipe generation
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Image classification inference endpoint
    #[serde(default = "default_classifier_url")]
    pub classifier_url: String,

    /// Bearer token for the classification endpoint
    #[serde(default)]
    pub classifier_token: Option<String>,

    /// Number of classifier labels offered as ingredient candidates
    #[serde(default = "default_classifier_top_n")]
    pub classifier_top_n: usize,

    /// Largest accepted image upload for classification
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    /// Quiet period before a generation request is sent
    #[serde(default = "default_generation_debounce_ms")]
    pub generation_debounce_ms: u64,

    /// Optional recipe catalog file replacing the built-in one
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Optional substitution table file replacing the built-in one
    #[serde(default)]
    pub substitutions_path: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_classifier_url() -> String {
    "https://api-inference.huggingface.co/models/google/mobilenet_v2_1.0_224".to_string()
}

fn default_classifier_top_n() -> usize {
    4
}

fn default_max_image_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_generation_debounce_ms() -> u64 {
    1000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
