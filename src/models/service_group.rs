//! Service groups and the titles bound to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One of the five seniority bands, most senior first.
///
/// Each group is bijectively tied to a [`Title`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceGroup {
    /// 16 years and above.
    #[serde(rename = "A/AG-2")]
    Ag2,
    /// 12 to 16 years.
    #[serde(rename = "A/AG-3")]
    Ag3,
    /// 8 to 12 years.
    #[serde(rename = "A/AG-4")]
    Ag4,
    /// 3 to 8 years.
    #[serde(rename = "A/AG-5")]
    Ag5,
    /// Below 3 years.
    #[serde(rename = "A/AG-6")]
    Ag6,
}

impl ServiceGroup {
    /// Every group, most senior first.
    pub const ALL: [ServiceGroup; 5] = [
        ServiceGroup::Ag2,
        ServiceGroup::Ag3,
        ServiceGroup::Ag4,
        ServiceGroup::Ag5,
        ServiceGroup::Ag6,
    ];

    /// The group code as printed on the decision record.
    pub fn code(self) -> &'static str {
        match self {
            ServiceGroup::Ag2 => "A/AG-2",
            ServiceGroup::Ag3 => "A/AG-3",
            ServiceGroup::Ag4 => "A/AG-4",
            ServiceGroup::Ag5 => "A/AG-5",
            ServiceGroup::Ag6 => "A/AG-6",
        }
    }

    /// Parses a group code.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownServiceGroup`] for anything but the five codes.
    pub fn from_code(code: &str) -> EngineResult<Self> {
        Self::ALL
            .into_iter()
            .find(|group| group.code() == code)
            .ok_or_else(|| EngineError::UnknownServiceGroup {
                code: code.to_string(),
            })
    }

    /// The title held by members of this group.
    pub fn title(self) -> Title {
        match self {
            ServiceGroup::Ag2 => Title::SeniorChiefSpecialist,
            ServiceGroup::Ag3 => Title::ChiefSpecialist,
            ServiceGroup::Ag4 => Title::SeniorSpecialist,
            ServiceGroup::Ag5 => Title::Specialist,
            ServiceGroup::Ag6 => Title::AssistantSpecialist,
        }
    }
}

impl fmt::Display for ServiceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Job rank, one per service group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Title {
    /// "Kıdemli Başuzman" (A/AG-2).
    #[serde(rename = "Kıdemli Başuzman")]
    SeniorChiefSpecialist,
    /// "Başuzman" (A/AG-3).
    #[serde(rename = "Başuzman")]
    ChiefSpecialist,
    /// "Kıdemli Uzman" (A/AG-4).
    #[serde(rename = "Kıdemli Uzman")]
    SeniorSpecialist,
    /// "Uzman" (A/AG-5).
    #[serde(rename = "Uzman")]
    Specialist,
    /// "Uzman Yardımcısı" (A/AG-6).
    #[serde(rename = "Uzman Yardımcısı")]
    AssistantSpecialist,
}

impl Title {
    /// The title as printed on the decision record.
    pub fn label(self) -> &'static str {
        match self {
            Title::SeniorChiefSpecialist => "Kıdemli Başuzman",
            Title::ChiefSpecialist => "Başuzman",
            Title::SeniorSpecialist => "Kıdemli Uzman",
            Title::Specialist => "Uzman",
            Title::AssistantSpecialist => "Uzman Yardımcısı",
        }
    }

    /// The group this title belongs to.
    pub fn service_group(self) -> ServiceGroup {
        match self {
            Title::SeniorChiefSpecialist => ServiceGroup::Ag2,
            Title::ChiefSpecialist => ServiceGroup::Ag3,
            Title::SeniorSpecialist => ServiceGroup::Ag4,
            Title::Specialist => ServiceGroup::Ag5,
            Title::AssistantSpecialist => ServiceGroup::Ag6,
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
