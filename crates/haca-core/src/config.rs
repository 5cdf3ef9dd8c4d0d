//! Terminal configuration
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! [timing]
//! login_delay_ms = 400
//!
//! [escalation]
//! moderate_flash_chance = 0.25
//!
//! [markup]
//! keywords = ["THORNE", "MIMIR"]
//! ```

use crate::error::ConfigError;
use haca_corpus::Clearance;
use haca_markup::{ContentTransformer, DEFAULT_KEYWORDS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete terminal configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Presentation delays
    pub timing: TimingConfig,
    /// Sanity and disturbance tracks
    pub escalation: EscalationConfig,
    /// First-login guide
    pub tutorial: TutorialConfig,
    /// Document markup
    pub markup: MarkupConfig,
}

impl TerminalConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for malformed TOML, or any validation error.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`TerminalConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "Loaded terminal config");
        Ok(config)
    }

    /// Check value ranges and orderings
    ///
    /// # Errors
    /// The first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let esc = &self.escalation;

        for (field, value) in [
            ("moderate_flash_chance", esc.moderate_flash_chance),
            ("infection_flash_chance", esc.infection_flash_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ChanceOutOfRange { field, value });
            }
        }

        if !(esc.mild_threshold < esc.moderate_threshold
            && esc.moderate_threshold < esc.severe_threshold)
        {
            return Err(ConfigError::ThresholdsNotAscending {
                mild: esc.mild_threshold,
                moderate: esc.moderate_threshold,
                severe: esc.severe_threshold,
            });
        }

        for (field, value) in [
            ("moderate_tick_ms", esc.moderate_tick_ms),
            ("moderate_flash_ms", esc.moderate_flash_ms),
            ("infection_tick_ms", esc.infection_tick_ms),
            ("infection_flash_ms", esc.infection_flash_ms),
            ("color_cycle_tick_ms", esc.color_cycle_tick_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval { field });
            }
        }

        self.markup.transformer().map(|_| ())
    }

    /// With timing section
    #[inline]
    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// With escalation section
    #[inline]
    #[must_use]
    pub fn with_escalation(mut self, escalation: EscalationConfig) -> Self {
        self.escalation = escalation;
        self
    }

    /// With highlighted keywords
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markup.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// With the clearance that qualifies a first login for the tutorial
    #[inline]
    #[must_use]
    pub fn with_tutorial_clearance(mut self, clearance: Clearance) -> Self {
        self.tutorial.clearance = clearance;
        self
    }
}

/// Presentation delays, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Between a login request and its completion
    pub login_delay_ms: u64,
    /// Between a first login and the tutorial
    pub tutorial_delay_ms: u64,
    /// Between selecting a keyword and its search
    pub keyword_follow_delay_ms: u64,
}

impl TimingConfig {
    /// Login delay as a duration
    #[inline]
    #[must_use]
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    /// Tutorial delay as a duration
    #[inline]
    #[must_use]
    pub fn tutorial_delay(&self) -> Duration {
        Duration::from_millis(self.tutorial_delay_ms)
    }

    /// Keyword follow delay as a duration
    #[inline]
    #[must_use]
    pub fn keyword_follow_delay(&self) -> Duration {
        Duration::from_millis(self.keyword_follow_delay_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            login_delay_ms: 800,
            tutorial_delay_ms: 500,
            keyword_follow_delay_ms: 100,
        }
    }
}

/// Sanity decay and disturbance track parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Opening a document at or above this clearance counts as exposure
    pub exposure_min_clearance: Clearance,
    /// Sanity lost per exposure
    pub sanity_decay_per_exposure: u32,
    /// Exposure count activating the mild track
    pub mild_threshold: u32,
    /// Exposure count activating the moderate track
    pub moderate_threshold: u32,
    /// Exposure count activating the severe track
    pub severe_threshold: u32,
    /// Moderate flash roll period
    pub moderate_tick_ms: u64,
    /// Moderate flash probability per roll
    pub moderate_flash_chance: f64,
    /// Moderate overlay lifetime
    pub moderate_flash_ms: u64,
    /// Infection flash roll period
    pub infection_tick_ms: u64,
    /// Infection flash probability per roll
    pub infection_flash_chance: f64,
    /// Infection overlay lifetime
    pub infection_flash_ms: u64,
    /// Color cycle advance period
    pub color_cycle_tick_ms: u64,
    /// Hue advance per color cycle tick, in degrees
    pub color_cycle_step_deg: u16,
    /// Between infection activation and the banner
    pub banner_delay_ms: u64,
    /// Banner time on screen before fading
    pub banner_visible_ms: u64,
    /// Banner fade-out length
    pub banner_fade_ms: u64,
}

impl EscalationConfig {
    /// With exposure thresholds
    #[inline]
    #[must_use]
    pub fn with_thresholds(mut self, mild: u32, moderate: u32, severe: u32) -> Self {
        self.mild_threshold = mild;
        self.moderate_threshold = moderate;
        self.severe_threshold = severe;
        self
    }

    /// With flash probabilities
    #[inline]
    #[must_use]
    pub fn with_flash_chances(mut self, moderate: f64, infection: f64) -> Self {
        self.moderate_flash_chance = moderate;
        self.infection_flash_chance = infection;
        self
    }
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            exposure_min_clearance: Clearance::new(3),
            sanity_decay_per_exposure: 5,
            mild_threshold: 3,
            moderate_threshold: 6,
            severe_threshold: 10,
            moderate_tick_ms: 5000,
            moderate_flash_chance: 0.1,
            moderate_flash_ms: 200,
            infection_tick_ms: 2000,
            infection_flash_chance: 0.3,
            infection_flash_ms: 300,
            color_cycle_tick_ms: 100,
            color_cycle_step_deg: 2,
            banner_delay_ms: 500,
            banner_visible_ms: 3000,
            banner_fade_ms: 1000,
        }
    }
}

/// First-login guide settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialConfig {
    /// Account clearance that qualifies for the guide
    pub clearance: Clearance,
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            clearance: Clearance::new(1),
        }
    }
}

/// Document markup settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Interactive keywords, matched whole-word and case-insensitively
    pub keywords: Vec<String>,
}

impl MarkupConfig {
    /// Build the transformer for these settings
    ///
    /// # Errors
    /// [`ConfigError::Markup`] for blank keywords.
    pub fn transformer(&self) -> Result<ContentTransformer, ConfigError> {
        Ok(ContentTransformer::with_keywords(self.keywords.as_slice())?)
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}
