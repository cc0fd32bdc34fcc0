//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `MENTOR_*` environment
//! variables. The two service endpoints are required when loading from the
//! environment; everything else falls back to a default.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

/// Default off-topic decision-score threshold.
///
/// Decision scores are not probabilities; the classifier routinely emits
/// negative values for on-topic questions, hence the negative default.
pub const DEFAULT_OFF_TOPIC_THRESHOLD: f32 = -0.631;

/// Default paraphrase score above which two questions are considered duplicates.
pub const DEFAULT_PARAPHRASE_THRESHOLD: f32 = 0.92;

/// Default bonus added when an entity's governing verb has the subject "I".
pub const DEFAULT_SUBJECT_BONUS: f32 = 0.5;

/// Default width of the similarity fan-out task group.
pub const DEFAULT_SIMILARITY_CONCURRENCY: usize = 12;

/// Default max entries in the classifier cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Engine configuration.
///
/// Construct explicitly for tests, or use [`Config::from_env`] to read
/// `MENTOR_*` overrides on top of defaults. Call [`Config::validate`] once
/// at startup; no setting is re-checked per request.
#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint of the knowledge base.
    pub graphql_endpoint: String,

    /// Base URL of the sentence-encoder service.
    pub sbert_endpoint: String,

    /// Base URL of the sentence/entity parser service.
    pub parser_endpoint: String,

    /// Bearer secret sent to the knowledge base and encoder services.
    pub api_secret: Option<String>,

    /// Directory holding per-mentor model artifacts. Default: `./models`.
    pub models_path: PathBuf,

    /// Directory holding shared lexicon files (`pop_culture.csv`).
    /// Default: `./shared`.
    pub shared_path: PathBuf,

    /// Predictions scoring below this are answered with an off-topic
    /// utterance. Default: [`DEFAULT_OFF_TOPIC_THRESHOLD`].
    pub off_topic_threshold: f32,

    /// Max mentors held in the classifier cache. Default: `1000`.
    pub cache_capacity: u64,

    /// Concurrent similarity requests during follow-up scoring. Default: `12`.
    pub similarity_concurrency: usize,

    /// Paraphrase score above which a generated follow-up is dropped as a
    /// duplicate. Default: `0.92`.
    pub paraphrase_threshold: f32,

    /// Weight bonus for entities governed by a first-person verb. Default: `0.5`.
    pub subject_bonus: f32,

    /// Whether to run paraphrase-based deduplication of generated
    /// follow-ups against already-answered questions. Default: `false`.
    pub semantic_dedup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graphql_endpoint: "http://localhost:3001/graphql".to_string(),
            sbert_endpoint: "http://localhost:5001".to_string(),
            parser_endpoint: "http://localhost:5002".to_string(),
            api_secret: None,
            models_path: PathBuf::from("./models"),
            shared_path: PathBuf::from("./shared"),
            off_topic_threshold: DEFAULT_OFF_TOPIC_THRESHOLD,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            similarity_concurrency: DEFAULT_SIMILARITY_CONCURRENCY,
            paraphrase_threshold: DEFAULT_PARAPHRASE_THRESHOLD,
            subject_bonus: DEFAULT_SUBJECT_BONUS,
            semantic_dedup: false,
        }
    }
}

impl Config {
    const ENV_GRAPHQL_ENDPOINT: &'static str = "MENTOR_GRAPHQL_ENDPOINT";
    const ENV_SBERT_ENDPOINT: &'static str = "MENTOR_SBERT_ENDPOINT";
    const ENV_PARSER_ENDPOINT: &'static str = "MENTOR_PARSER_ENDPOINT";
    const ENV_API_SECRET: &'static str = "MENTOR_API_SECRET";
    const ENV_MODELS_PATH: &'static str = "MENTOR_MODELS_PATH";
    const ENV_SHARED_PATH: &'static str = "MENTOR_SHARED_PATH";
    const ENV_OFF_TOPIC_THRESHOLD: &'static str = "MENTOR_OFF_TOPIC_THRESHOLD";
    const ENV_CACHE_CAPACITY: &'static str = "MENTOR_CACHE_MAX_SIZE";
    const ENV_SIMILARITY_CONCURRENCY: &'static str = "MENTOR_SIMILARITY_CONCURRENCY";
    const ENV_PARAPHRASE_THRESHOLD: &'static str = "MENTOR_PARAPHRASE_THRESHOLD";
    const ENV_SUBJECT_BONUS: &'static str = "MENTOR_SUBJECT_BONUS";
    const ENV_SEMANTIC_DEDUP: &'static str = "MENTOR_SEMANTIC_DEDUP";

    /// Loads configuration from environment variables.
    ///
    /// The GraphQL and encoder endpoints are required; all other settings
    /// fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let graphql_endpoint = Self::require_string_from_env(Self::ENV_GRAPHQL_ENDPOINT)?;
        let sbert_endpoint = Self::require_string_from_env(Self::ENV_SBERT_ENDPOINT)?;
        let parser_endpoint =
            Self::parse_string_from_env(Self::ENV_PARSER_ENDPOINT, defaults.parser_endpoint);
        let api_secret = Self::parse_optional_string_from_env(Self::ENV_API_SECRET);
        let models_path = Self::parse_path_from_env(Self::ENV_MODELS_PATH, defaults.models_path);
        let shared_path = Self::parse_path_from_env(Self::ENV_SHARED_PATH, defaults.shared_path);
        let off_topic_threshold = Self::parse_f32_from_env(
            Self::ENV_OFF_TOPIC_THRESHOLD,
            defaults.off_topic_threshold,
        )?;
        let cache_capacity =
            Self::parse_u64_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity)?;
        let similarity_concurrency = Self::parse_usize_from_env(
            Self::ENV_SIMILARITY_CONCURRENCY,
            defaults.similarity_concurrency,
        )?;
        let paraphrase_threshold = Self::parse_f32_from_env(
            Self::ENV_PARAPHRASE_THRESHOLD,
            defaults.paraphrase_threshold,
        )?;
        let subject_bonus =
            Self::parse_f32_from_env(Self::ENV_SUBJECT_BONUS, defaults.subject_bonus)?;
        let semantic_dedup = Self::parse_bool_from_env(Self::ENV_SEMANTIC_DEDUP);

        let config = Self {
            graphql_endpoint,
            sbert_endpoint,
            parser_endpoint,
            api_secret,
            models_path,
            shared_path,
            off_topic_threshold,
            cache_capacity,
            similarity_concurrency,
            paraphrase_threshold,
            subject_bonus,
            semantic_dedup,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates endpoints, thresholds and sizes (does not touch the filesystem
    /// beyond checking that an existing models path is a directory).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graphql_endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint {
                name: "graphql_endpoint",
            });
        }
        if self.sbert_endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint {
                name: "sbert_endpoint",
            });
        }
        if self.parser_endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint {
                name: "parser_endpoint",
            });
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::MustBePositive {
                name: "cache_capacity",
            });
        }
        if self.similarity_concurrency == 0 {
            return Err(ConfigError::MustBePositive {
                name: "similarity_concurrency",
            });
        }
        if !self.off_topic_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold {
                name: "off_topic_threshold",
                reason: "must be finite".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.paraphrase_threshold) {
            return Err(ConfigError::InvalidThreshold {
                name: "paraphrase_threshold",
                reason: format!("{} is outside [0, 1]", self.paraphrase_threshold),
            });
        }
        if self.models_path.exists() && !self.models_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.models_path.clone(),
            });
        }
        Ok(())
    }

    fn require_string_from_env(var_name: &'static str) -> Result<String, ConfigError> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEnvVar { name: var_name })
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_f32_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: var_name,
                value,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: var_name,
                value,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: var_name,
                value,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &str) -> bool {
        env::var(var_name)
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "t" | "true"))
            .unwrap_or(false)
    }
}
