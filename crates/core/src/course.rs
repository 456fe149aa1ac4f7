//! Course slot resolution.
//!
//! The platform hands us the course slot verbatim; this layer only decides
//! between "use it as given", "fall back to the full menu", and "missing".
//! Recognition against the known course table happens in the dialog layer,
//! and the renderer falls back to the full menu for anything unexpected.

use serde::{Deserialize, Serialize};

/// Course assumed by the one-shot entry point when none was spoken.
pub const DEFAULT_COURSE: &str = "all";

/// A resolved course slot, kept verbatim from the platform.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CourseSelection {
    pub course: String,
}

impl CourseSelection {
    pub fn new(course: impl Into<String>) -> Self {
        Self {
            course: course.into(),
        }
    }
}

/// Missing or unusable course slot. When a raw value was spoken it is kept
/// here so prompts can echo it back to the user.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("course slot missing or invalid")]
pub struct CourseSlotError {
    pub raw: Option<String>,
}

/// The courses the skill can answer for, including spoken aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Course {
    Soup,
    Entree,
    Sides,
    Vegan,
    All,
    DayNumber,
}

impl Course {
    /// Maps a spoken course name or alias to a known course.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "soup" | "soups" => Some(Self::Soup),
            "entree" | "entrees" => Some(Self::Entree),
            "side" | "sides" => Some(Self::Sides),
            "vegan" | "vegans" | "vegan option" | "vegan options" => Some(Self::Vegan),
            "all" | "everything" | "full menu" | "lunch" | "menu" => Some(Self::All),
            "day" | "day number" => Some(Self::DayNumber),
            _ => None,
        }
    }
}

/// Extracts a course selection from a raw slot value.
///
/// An absent or empty slot resolves to the full menu when `allow_default` is
/// set (the one-shot path) and to an error otherwise (the dialog path). A
/// present value is taken verbatim with no validation at this layer.
pub fn resolve_course(
    raw: Option<&str>,
    allow_default: bool,
) -> Result<CourseSelection, CourseSlotError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(CourseSelection::new(value)),
        None if allow_default => Ok(CourseSelection::new(DEFAULT_COURSE)),
        None => Err(CourseSlotError { raw: None }),
    }
}
