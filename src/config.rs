use serde::{Deserialize, Serialize};

use crate::utils::get_env_with_prefix;

/// Main configuration for the application core
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub subscription: SubscriptionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

/// Freemium ceilings and subscription pricing.
///
/// Ceilings bound what a non-premium account may use; premium accounts
/// are unconditionally ungated. All values come from environment-style
/// configuration with hard-coded fallbacks.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionConfig {
    /// Maximum owned plants on the free tier.
    #[serde(default = "default_max_free_plants")]
    pub max_free_plants: u32,

    /// Maximum AI room analyses per period on the free tier.
    #[serde(default = "default_max_free_ai_analysis")]
    pub max_free_ai_analysis: u32,

    /// Maximum AI care consultations per period on the free tier.
    #[serde(default = "default_max_free_ai_consultation")]
    pub max_free_ai_consultation: u32,

    /// Maximum AR image generations per period on the free tier.
    #[serde(default = "default_max_free_ar_generation")]
    pub max_free_ar_generation: u32,

    /// Premium subscription price, display only.
    #[serde(default = "default_monthly_price")]
    pub monthly_price: u64,

    /// Currency code for the displayed price.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            max_free_plants: default_max_free_plants(),
            max_free_ai_analysis: default_max_free_ai_analysis(),
            max_free_ai_consultation: default_max_free_ai_consultation(),
            max_free_ar_generation: default_max_free_ar_generation(),
            monthly_price: default_monthly_price(),
            currency: default_currency(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

fn default_max_free_plants() -> u32 {
    5
}

fn default_max_free_ai_analysis() -> u32 {
    5
}

fn default_max_free_ai_consultation() -> u32 {
    10
}

fn default_max_free_ar_generation() -> u32 {
    5
}

fn default_monthly_price() -> u64 {
    480
}

fn default_currency() -> String {
    "JPY".to_string()
}

impl SubscriptionConfig {
    /// Load subscription ceilings from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = get_env_with_prefix("MAX_FREE_PLANTS") {
            if let Ok(val) = v.parse() {
                config.max_free_plants = val;
            }
        }

        if let Some(v) = get_env_with_prefix("MAX_FREE_AI_ANALYSIS") {
            if let Ok(val) = v.parse() {
                config.max_free_ai_analysis = val;
            }
        }

        if let Some(v) = get_env_with_prefix("MAX_FREE_AI_CONSULTATION") {
            if let Ok(val) = v.parse() {
                config.max_free_ai_consultation = val;
            }
        }

        if let Some(v) = get_env_with_prefix("MAX_FREE_AR_GENERATION") {
            if let Ok(val) = v.parse() {
                config.max_free_ar_generation = val;
            }
        }

        if let Some(v) = get_env_with_prefix("SUBSCRIPTION_PRICE") {
            if let Ok(val) = v.parse() {
                config.monthly_price = val;
            }
        }

        if let Some(v) = get_env_with_prefix("SUBSCRIPTION_CURRENCY") {
            config.currency = v;
        }

        config
    }
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overlay values from the environment onto the current config
    pub fn from_env(mut self) -> Self {
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        self.config.subscription = SubscriptionConfig::from_env();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_max_free_plants(mut self, max: u32) -> Self {
        self.config.subscription.max_free_plants = max;
        self
    }

    pub fn with_max_free_ai_analysis(mut self, max: u32) -> Self {
        self.config.subscription.max_free_ai_analysis = max;
        self
    }

    pub fn with_max_free_ai_consultation(mut self, max: u32) -> Self {
        self.config.subscription.max_free_ai_consultation = max;
        self
    }

    pub fn with_max_free_ar_generation(mut self, max: u32) -> Self {
        self.config.subscription.max_free_ar_generation = max;
        self
    }

    pub fn with_subscription(mut self, subscription: SubscriptionConfig) -> Self {
        self.config.subscription = subscription;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
