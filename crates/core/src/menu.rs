//! Menu payload model and speech rendering.
//!
//! The raw shape mirrors the remote menu API; rendering turns each course
//! list into a spoken phrase. The exact joining of item names is relied on
//! by existing clients and must not change.

use serde::Deserialize;

use crate::course::Course;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    #[serde(default)]
    pub name: Option<String>,
}

/// Raw menu shape returned by the remote API for one calendar day. Unknown
/// JSON fields (ids, timestamps) are ignored.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    #[serde(default)]
    pub soups: Vec<MenuItem>,
    #[serde(default)]
    pub entrees: Vec<MenuItem>,
    #[serde(default)]
    pub sides: Vec<MenuItem>,
    #[serde(default)]
    pub vegans: Vec<MenuItem>,
}

/// Per-course spoken phrases plus the full-menu concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMenu {
    pub soup: String,
    pub entree: String,
    pub side: String,
    pub vegan: String,
    pub all: String,
}

impl RenderedMenu {
    /// Selects the phrase for a course name, falling back to the full menu
    /// for anything unrecognized.
    pub fn for_course(&self, course: &str) -> &str {
        match Course::from_name(course) {
            Some(Course::Soup) => &self.soup,
            Some(Course::Entree) => &self.entree,
            Some(Course::Sides) => &self.side,
            Some(Course::Vegan) => &self.vegan,
            _ => &self.all,
        }
    }
}

pub fn render(menu: &Menu) -> RenderedMenu {
    let soup = render_course(&menu.soups, "soup", "soups");
    let entree = render_course(&menu.entrees, "entree", "entrees");
    let side = render_course(&menu.sides, "side", "sides");
    let vegan = render_course(&menu.vegans, "vegan option", "vegan options");
    // Single-space separators, preserving gaps left by empty courses.
    let all = format!("{soup} {entree} {side} {vegan}");
    RenderedMenu {
        soup,
        entree,
        side,
        vegan,
        all,
    }
}

/// Renders one course list into a phrase.
///
/// An empty list, or a first item without a name, produces an empty string.
/// Multiple names are space-joined with "and " prepended to the last name
/// only.
fn render_course(items: &[MenuItem], singular: &str, plural: &str) -> String {
    let first = match items.first().and_then(|item| item.name.as_deref()) {
        Some(name) if !name.is_empty() => name,
        _ => return String::new(),
    };
    if items.len() == 1 {
        return format!("The {singular} is {first}. ");
    }
    let names: Vec<&str> = items
        .iter()
        .map(|item| item.name.as_deref().unwrap_or_default())
        .collect();
    let mut joined = names[..names.len() - 1].join(" ");
    joined.push_str(" and ");
    joined.push_str(names[names.len() - 1]);
    format!("The {plural} are {joined}. ")
}
