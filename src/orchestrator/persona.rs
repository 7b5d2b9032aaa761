//! Persona tone and the static apologies that go with it.

use crate::config::PersonaConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Friendly,
    Professional,
    #[default]
    Neutral,
}

impl Tone {
    /// Case-insensitive; anything unrecognized is [`Tone::Neutral`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "friendly" => Tone::Friendly,
            "professional" => Tone::Professional,
            _ => Tone::Neutral,
        }
    }

    /// Static reply used when every provider failed. No network call.
    pub fn apology(self) -> &'static str {
        match self {
            Tone::Friendly => {
                "Oops! 😅 I couldn't come up with an answer just now. \
                 Mind trying again in a moment? 🙏"
            }
            Tone::Professional => {
                "I apologize, but I am unable to process your request at this time. \
                 Please try again shortly."
            }
            Tone::Neutral => "Sorry, something went wrong. Please try again.",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Friendly => "friendly",
            Tone::Professional => "professional",
            Tone::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

/// Persona supplied by the caller, opaque apart from its tone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Persona {
    pub tone: Tone,
    /// Tone directives prepended to the prompt on direct generation
    pub preamble: Option<String>,
}

impl Persona {
    pub fn new(tone: Tone, preamble: Option<String>) -> Self {
        Self { tone, preamble }
    }

    /// Prompt for direct generation: preamble and prompt separated by a blank line.
    pub fn augment(&self, prompt: &str) -> String {
        match self.preamble.as_deref().map(str::trim) {
            Some(preamble) if !preamble.is_empty() => format!("{}\n\n{}", preamble, prompt),
            _ => prompt.to_string(),
        }
    }
}

impl From<&PersonaConfig> for Persona {
    fn from(config: &PersonaConfig) -> Self {
        Self {
            tone: Tone::parse(&config.tone),
            preamble: config.preamble.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_parse() {
        assert_eq!(Tone::parse("friendly"), Tone::Friendly);
        assert_eq!(Tone::parse(" Professional "), Tone::Professional);
        assert_eq!(Tone::parse("sarcastic"), Tone::Neutral);
        assert_eq!(Tone::parse(""), Tone::Neutral);
    }

    #[test]
    fn test_apologies_differ_by_tone() {
        assert!(Tone::Friendly.apology().contains('😅'));
        assert!(!Tone::Professional.apology().contains('😅'));
        assert_ne!(Tone::Professional.apology(), Tone::Neutral.apology());
    }

    #[test]
    fn test_augment_with_and_without_preamble() {
        let plain = Persona::default();
        assert_eq!(plain.augment("hi"), "hi");

        let blank = Persona::new(Tone::Neutral, Some("   ".to_string()));
        assert_eq!(blank.augment("hi"), "hi");

        let sunny = Persona::new(Tone::Friendly, Some("You are Sunny.".to_string()));
        assert_eq!(sunny.augment("hi"), "You are Sunny.\n\nhi");
    }

    #[test]
    fn test_persona_from_config() {
        let config = PersonaConfig {
            tone: "professional".to_string(),
            preamble: Some("Be brief.".to_string()),
        };
        let persona = Persona::from(&config);
        assert_eq!(persona.tone, Tone::Professional);
        assert_eq!(persona.preamble.as_deref(), Some("Be brief."));
    }
}
