//! Motivational text for the craving flow
//!
//! A [`MotivationSource`] produces text and may fail. The [`MotivationRequester`]
//! wraps a source with a timeout and always hands back usable text: generated
//! when the source answers in time, a localised fallback otherwise.

pub mod command;

pub use command::CommandSource;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::i18n::{fill, Language};

/// Boxed future returned by object-safe async traits
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Situation the craving arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgeContext {
    #[default]
    Neutral,
    Coffee,
    Alcohol,
    Stress,
    Boredom,
    Meal,
}

impl UrgeContext {
    pub const ALL: [UrgeContext; 6] = [
        UrgeContext::Neutral,
        UrgeContext::Coffee,
        UrgeContext::Alcohol,
        UrgeContext::Stress,
        UrgeContext::Boredom,
        UrgeContext::Meal,
    ];

    /// Next context in [`UrgeContext::ALL`], wrapping
    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (UrgeContext::Neutral, Language::En) => "no particular reason",
            (UrgeContext::Neutral, Language::It) => "nessun motivo particolare",
            (UrgeContext::Coffee, Language::En) => "coffee",
            (UrgeContext::Coffee, Language::It) => "caffè",
            (UrgeContext::Alcohol, Language::En) => "drinks",
            (UrgeContext::Alcohol, Language::It) => "alcol",
            (UrgeContext::Stress, Language::En) => "stress",
            (UrgeContext::Stress, Language::It) => "stress",
            (UrgeContext::Boredom, Language::En) => "boredom",
            (UrgeContext::Boredom, Language::It) => "noia",
            (UrgeContext::Meal, Language::En) => "after a meal",
            (UrgeContext::Meal, Language::It) => "dopo un pasto",
        }
    }
}

/// Tone of the motivational text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityBand {
    Low,
    Mid,
    High,
}

/// Intensity thresholds for the tone bands
///
/// Independent of the Guided/HighUrge branch threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneThresholds {
    /// Lowest intensity with a "mid" tone
    pub mid: u8,
    /// Lowest intensity with a "high" tone
    pub high: u8,
}

impl Default for ToneThresholds {
    fn default() -> Self {
        Self { mid: 5, high: 8 }
    }
}

impl IntensityBand {
    pub fn from_intensity(intensity: u8, thresholds: &ToneThresholds) -> Self {
        if intensity >= thresholds.high {
            IntensityBand::High
        } else if intensity >= thresholds.mid {
            IntensityBand::Mid
        } else {
            IntensityBand::Low
        }
    }
}

/// What the generator is asked for
#[derive(Debug, Clone, PartialEq)]
pub struct MotivationRequest {
    pub language: Language,
    pub goal_label: String,
    pub elapsed_text: String,
    pub urge_intensity: u8,
    pub context: UrgeContext,
    pub band: IntensityBand,
}

/// Errors at the text-generation boundary
///
/// These never leave the requester; they are logged and replaced by fallback text.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to start generator: {0}")]
    Spawn(String),

    #[error("generator failed: {0}")]
    Failed(String),

    #[error("generator returned no text")]
    EmptyResponse,

    #[error("generator timed out after {0:?}")]
    Timeout(Duration),

    #[error("generator protocol error: {0}")]
    Protocol(String),
}

/// Something that can write a motivational message
pub trait MotivationSource: Send + Sync {
    fn generate<'a>(
        &'a self,
        request: &'a MotivationRequest,
    ) -> BoxFuture<'a, Result<String, GenerationError>>;
}

/// Text handed back to the craving session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Motivation {
    /// Written by the generator
    Generated(String),
    /// Local text used because generation failed or is not configured
    Fallback(String),
}

impl Motivation {
    pub fn text(&self) -> &str {
        match self {
            Motivation::Generated(text) | Motivation::Fallback(text) => text,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Motivation::Generated(_))
    }
}

/// Source plus timeout plus fallback
#[derive(Clone)]
pub struct MotivationRequester {
    source: Option<Arc<dyn MotivationSource>>,
    timeout: Duration,
}

impl std::fmt::Debug for MotivationRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotivationRequester")
            .field("has_source", &self.source.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl MotivationRequester {
    pub fn new(source: Option<Arc<dyn MotivationSource>>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Requester that only ever returns fallback text
    pub fn offline() -> Self {
        Self::new(None, Duration::from_secs(10))
    }

    /// Ask for text. Never fails.
    pub async fn request(&self, request: &MotivationRequest) -> Motivation {
        match self.try_generate(request).await {
            Ok(text) => Motivation::Generated(text),
            Err(e) => {
                warn!(error = %e, "Motivation generation failed, using fallback");
                Motivation::Fallback(fallback_for(request))
            }
        }
    }

    async fn try_generate(&self, request: &MotivationRequest) -> Result<String, GenerationError> {
        let Some(source) = &self.source else {
            debug!("No generator configured");
            return Err(GenerationError::Spawn("no generator configured".to_string()));
        };

        let text = tokio::time::timeout(self.timeout, source.generate(request))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Local text for a request
pub fn fallback_for(request: &MotivationRequest) -> String {
    fallback_text(
        request.language,
        request.context,
        &request.goal_label,
        &request.elapsed_text,
    )
}

/// Deterministic local text chosen by language and context
pub fn fallback_text(
    language: Language,
    context: UrgeContext,
    goal: &str,
    elapsed: &str,
) -> String {
    let strings = language.strings();
    let template = match context {
        UrgeContext::Neutral => strings.fallback_neutral,
        UrgeContext::Coffee => strings.fallback_coffee,
        UrgeContext::Alcohol => strings.fallback_alcohol,
        UrgeContext::Stress => strings.fallback_stress,
        UrgeContext::Boredom => strings.fallback_boredom,
        UrgeContext::Meal => strings.fallback_meal,
    };
    fill(template, &[("goal", goal), ("elapsed", elapsed)])
}

/// Instruction given to the generator
pub fn system_prompt(request: &MotivationRequest) -> String {
    let template = match request.language {
        Language::En => {
            "You are a supportive and clever motivational coach. The user is experiencing a \
             smoking craving. Your goal is to help them delay it for 10 minutes. Refer to their \
             dream: \"{goal}\" and the fact they've been smoke-free for {elapsed}. Keep it catchy \
             and under 2 sentences."
        }
        Language::It => {
            "Sei un coach motivazionale incoraggiante e intelligente. L'utente sta avendo voglia \
             di fumare. Il tuo obiettivo è aiutarlo a rimandare di 10 minuti. Fai riferimento al \
             suo sogno: \"{goal}\" e al fatto che non fuma da {elapsed}. Rendi la frase \
             accattivante e non superare le 2 frasi."
        }
    };
    let base = fill(
        template,
        &[
            ("goal", request.goal_label.as_str()),
            ("elapsed", request.elapsed_text.as_str()),
        ],
    );
    format!("{} {}", base, band_strategy(request.language, request.band))
}

/// The question itself
pub fn user_prompt(language: Language) -> &'static str {
    match language {
        Language::En => "Give me a single catchy, motivational reason to not smoke right now.",
        Language::It => {
            "Dammi un unico motivo motivazionale e accattivante per non fumare proprio ora."
        }
    }
}

fn band_strategy(language: Language, band: IntensityBand) -> &'static str {
    match (language, band) {
        (Language::En, IntensityBand::Low) => "Be light and playful.",
        (Language::En, IntensityBand::Mid) => {
            "Be warm and concrete, suggest one small action for the next minute."
        }
        (Language::En, IntensityBand::High) => {
            "Be calm and firm, acknowledge the urge is strong and that it will pass."
        }
        (Language::It, IntensityBand::Low) => "Usa un tono leggero e giocoso.",
        (Language::It, IntensityBand::Mid) => {
            "Usa un tono caldo e concreto, suggerisci una piccola azione per il prossimo minuto."
        }
        (Language::It, IntensityBand::High) => {
            "Usa un tono calmo e deciso, riconosci che la voglia è forte e che passerà."
        }
    }
}
