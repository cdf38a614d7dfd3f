use ratatui::style::{Color, Style};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of result categories the dashboard search knows about.
///
/// Every presentation detail (labels, icons, colors) is an exhaustive match,
/// so adding a variant will not compile until each of them is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "patients", alias = "patient")]
    Patient,
    #[serde(rename = "appointments", alias = "appointment")]
    Appointment,
}

impl Category {
    /// All categories in their default display order
    pub const ALL: [Category; 2] = [Category::Patient, Category::Appointment];

    /// Field name used by the dashboard backend for this bucket
    pub fn bucket_key(&self) -> &'static str {
        match self {
            Category::Patient => "patients",
            Category::Appointment => "appointments",
        }
    }

    /// Singular label shown in the type badge of each row
    pub fn label(&self) -> &'static str {
        match self {
            Category::Patient => "Patient",
            Category::Appointment => "Appointment",
        }
    }

    /// Plural label used in section headers
    pub fn header(&self) -> &'static str {
        match self {
            Category::Patient => "Patients",
            Category::Appointment => "Appointments",
        }
    }

    pub fn icon(&self, use_glyphs: bool) -> &'static str {
        match (self, use_glyphs) {
            (Category::Patient, true) => "👥",
            (Category::Patient, false) => "[P]",
            (Category::Appointment, true) => "📅",
            (Category::Appointment, false) => "[A]",
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Category::Patient => Style::default().fg(Color::Cyan),
            Category::Appointment => Style::default().fg(Color::Magenta),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bucket_key())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patient" | "patients" => Ok(Category::Patient),
            "appointment" | "appointments" => Ok(Category::Appointment),
            other => Err(anyhow::anyhow!("Unknown result category: '{}'", other)),
        }
    }
}
