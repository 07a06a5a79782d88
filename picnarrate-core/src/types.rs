use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Shown in place of a description the service did not return.
pub const FALLBACK_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

fn slug(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionMode {
    #[default]
    Summary,
    Detailed,
}

impl DescriptionMode {
    pub const ALL: [DescriptionMode; 2] = [DescriptionMode::Summary, DescriptionMode::Detailed];

    pub fn as_str(self) -> &'static str {
        match self {
            DescriptionMode::Summary => "summary",
            DescriptionMode::Detailed => "detailed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DescriptionMode::Summary => "Short description",
            DescriptionMode::Detailed => "Long description",
        }
    }
}

impl fmt::Display for DescriptionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriptionMode {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = slug(s);
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| UnknownChoice {
                kind: "description mode",
                value: s.to_string(),
            })
    }
}

/// Named synthesis voices offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Speaker {
    AnaFlorence,
    ClaribelDervla,
    DaisyStudious,
    GracieWise,
    AndrewChipper,
    CraigGutsy,
}

impl Speaker {
    pub const ALL: [Speaker; 6] = [
        Speaker::AnaFlorence,
        Speaker::ClaribelDervla,
        Speaker::DaisyStudious,
        Speaker::GracieWise,
        Speaker::AndrewChipper,
        Speaker::CraigGutsy,
    ];

    /// The voice name as the service expects it in the `speaker` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Speaker::AnaFlorence => "Ana Florence",
            Speaker::ClaribelDervla => "Claribel Dervla",
            Speaker::DaisyStudious => "Daisy Studious",
            Speaker::GracieWise => "Gracie Wise",
            Speaker::AndrewChipper => "Andrew Chipper",
            Speaker::CraigGutsy => "Craig Gutsy",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Speaker {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = slug(s);
        Self::ALL
            .into_iter()
            .find(|v| slug(v.as_str()) == wanted)
            .ok_or_else(|| UnknownChoice {
                kind: "speaker",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    UsEnglish,
    UkEnglish,
    SpanishLatam,
    BrazilianPortuguese,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::UsEnglish,
        Language::UkEnglish,
        Language::SpanishLatam,
        Language::BrazilianPortuguese,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::UsEnglish => "US English",
            Language::UkEnglish => "UK English",
            Language::SpanishLatam => "Spanish (LatAm)",
            Language::BrazilianPortuguese => "Brazilian Portuguese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = slug(s);
        Self::ALL
            .into_iter()
            .find(|l| slug(l.as_str()) == wanted)
            .ok_or_else(|| UnknownChoice {
                kind: "language",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match slug(s).as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(UnknownChoice {
                kind: "theme",
                value: s.to_string(),
            }),
        }
    }
}

/// User-chosen parameters sent alongside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadOptions {
    pub mode: DescriptionMode,
    #[serde(default)]
    pub speaker: Option<Speaker>,
    #[serde(default)]
    pub language: Option<Language>,
}

/// Outcome of one successful upload. `audio` may be empty ("no audio available").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub description: String,
    pub audio: String,
}

impl UploadResult {
    pub fn has_audio(&self) -> bool {
        !self.audio.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub id: String,
    pub url: String,
}

impl Recording {
    /// Ids are positional and only stable within one listing.
    pub fn from_listing(urls: Vec<String>) -> Vec<Recording> {
        urls.into_iter()
            .enumerate()
            .map(|(i, url)| Recording {
                id: i.to_string(),
                url,
            })
            .collect()
    }
}
