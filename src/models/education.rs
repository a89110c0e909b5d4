//! Education levels recognised by the classification table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An education credential, ordered from lowest to highest.
///
/// The derived `Ord` follows declaration order, so
/// `EducationLevel::Bachelor < EducationLevel::Doctorate`.
///
/// # Example
///
/// ```
/// use grade_engine::models::EducationLevel;
///
/// let level: EducationLevel = "Tezli Yüksek Lisans".parse().unwrap();
/// assert_eq!(level, EducationLevel::ThesisMaster);
/// assert!(level > EducationLevel::NonThesisMaster);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    /// Bachelor's degree ("Lisans").
    #[serde(alias = "Lisans")]
    Bachelor,
    /// Master's degree without thesis ("Tezsiz Yüksek Lisans").
    #[serde(alias = "Tezsiz Yüksek Lisans")]
    NonThesisMaster,
    /// Master's degree with thesis ("Tezli Yüksek Lisans").
    #[serde(alias = "Tezli Yüksek Lisans")]
    ThesisMaster,
    /// Doctorate ("Doktora").
    #[serde(alias = "Doktora")]
    Doctorate,
}

impl EducationLevel {
    /// Every level, lowest credential first.
    pub const ALL: [EducationLevel; 4] = [
        EducationLevel::Bachelor,
        EducationLevel::NonThesisMaster,
        EducationLevel::ThesisMaster,
        EducationLevel::Doctorate,
    ];

    /// The literal label written into sheets and compared against in formulas.
    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::Bachelor => "Lisans",
            EducationLevel::NonThesisMaster => "Tezsiz Yüksek Lisans",
            EducationLevel::ThesisMaster => "Tezli Yüksek Lisans",
            EducationLevel::Doctorate => "Doktora",
        }
    }

    /// Resolves a sheet label (surrounding whitespace ignored).
    pub fn from_label(label: &str) -> EngineResult<Self> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.label() == trimmed)
            .ok_or_else(|| EngineError::UnknownEducationLevel {
                label: label.to_string(),
            })
    }

    /// Position in the lowest-to-highest ordering.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EducationLevel {
    type Err = EngineError;

    /// Accepts either the sheet label or the snake_case key used by the API.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bachelor" => Ok(EducationLevel::Bachelor),
            "non_thesis_master" => Ok(EducationLevel::NonThesisMaster),
            "thesis_master" => Ok(EducationLevel::ThesisMaster),
            "doctorate" => Ok(EducationLevel::Doctorate),
            other => Self::from_label(other),
        }
    }
}
