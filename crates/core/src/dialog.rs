//! Dialog orchestration for the menu skill.
//!
//! Decides, turn by turn, whether enough information exists to fetch the
//! menu or which single missing piece to prompt for next. Intent dispatch is
//! pure and produces a [`DialogPlan`]; the one outbound fetch and the final
//! response assembly happen only after a plan resolves to `Fetch`.
//!
//! Commit policy: a date is validated (school day, then current week) before
//! it is ever written into the session attributes, so an invalid date is
//! never persisted. Reprompt paths leave previously committed attributes
//! intact so the user can retry the turn.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calendar::{self, SchoolCalendar};
use crate::course::{self, Course, CourseSelection, CourseSlotError};
use crate::dates::{self, MenuDate};
use crate::fetcher::MenuFetcher;
use crate::menu;

pub const ONESHOT_MENU_INTENT: &str = "OneshotMenuIntent";
pub const DIALOG_MENU_INTENT: &str = "DialogMenuIntent";
pub const SUPPORTED_COURSES_INTENT: &str = "SupportedCoursesIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";

const WHICH_DAY_PROMPT: &str = "Which day would you like the menu for?";
const CAPABILITIES: &str = "I can get you the cafeteria menu for any school day \
    from the current week. You can also ask me for specific courses for a \
    particular day, such as soup, entree, sides, and vegan option. ";
const FETCH_FAILED: &str =
    "Sorry, something funky is happening with the menu. Please try again later.";
const GOODBYE: &str = "Goodbye";
const CARD_TITLE: &str = "MenuTeller";

/// The two slots the platform may fill on a menu intent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotValues {
    pub course: Option<String>,
    pub date: Option<String>,
}

/// Per-session dialog state, round-tripped through the platform envelope
/// each turn. Slot knowledge is a type-level distinction, never a key
/// lookup in a free-form map.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<MenuDate>,
}

/// A single user-facing turn result. Exactly one is produced per turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResponse {
    /// Speak and keep the session open, awaiting another turn.
    Ask { speech: String, reprompt: String },
    /// Speak and close the session.
    Tell { speech: String },
    /// Speak, close the session, and attach a display card.
    TellWithCard {
        speech: String,
        card_title: String,
        card_content: String,
    },
}

/// The only failure that escapes the orchestrator; everything else becomes
/// a spoken reprompt or apology.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("unsupported intent: {0}")]
    UnsupportedIntent(String),
}

/// Pure outcome of intent dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DialogPlan {
    Respond(DialogResponse),
    Fetch {
        selection: CourseSelection,
        date: MenuDate,
    },
}

pub struct DialogOrchestrator {
    fetcher: Arc<dyn MenuFetcher>,
    calendar: Arc<SchoolCalendar>,
    cutoff_hour: u32,
}

impl DialogOrchestrator {
    pub fn new(
        fetcher: Arc<dyn MenuFetcher>,
        calendar: Arc<SchoolCalendar>,
        cutoff_hour: u32,
    ) -> Self {
        Self {
            fetcher,
            calendar,
            cutoff_hour,
        }
    }

    pub fn handle_launch(&self) -> DialogResponse {
        welcome()
    }

    /// Dispatches one intent turn and produces exactly one response.
    pub async fn handle_intent(
        &self,
        intent_name: &str,
        slots: &SlotValues,
        attributes: &mut SessionAttributes,
        now: NaiveDateTime,
    ) -> Result<DialogResponse, DialogError> {
        let plan = match intent_name {
            ONESHOT_MENU_INTENT => self.plan_oneshot(slots, attributes, now),
            DIALOG_MENU_INTENT => self.plan_dialog(slots, attributes, now),
            SUPPORTED_COURSES_INTENT => DialogPlan::Respond(supported_courses()),
            HELP_INTENT => DialogPlan::Respond(help()),
            STOP_INTENT | CANCEL_INTENT => DialogPlan::Respond(DialogResponse::Tell {
                speech: GOODBYE.to_string(),
            }),
            other => return Err(DialogError::UnsupportedIntent(other.to_string())),
        };

        match plan {
            DialogPlan::Respond(response) => Ok(response),
            DialogPlan::Fetch { selection, date } => {
                Ok(self.fetch_and_respond(&selection, &date).await)
            }
        }
    }

    /// One-shot entry: all slots may arrive in a single utterance, with the
    /// course defaulting to the full menu.
    fn plan_oneshot(
        &self,
        slots: &SlotValues,
        attributes: &mut SessionAttributes,
        now: NaiveDateTime,
    ) -> DialogPlan {
        let selection = match course::resolve_course(slots.course.as_deref(), true) {
            Ok(selection) => selection,
            Err(err) => return DialogPlan::Respond(course_reprompt(&err)),
        };
        if Course::from_name(&selection.course).is_none() {
            return DialogPlan::Respond(course_reprompt(&CourseSlotError {
                raw: Some(selection.course),
            }));
        }

        let date = match dates::normalize(slots.date.as_deref(), now, self.cutoff_hour) {
            Ok(date) => date,
            Err(_) => {
                // The course survived, so keep it for the next turn.
                attributes.course = Some(selection);
                return DialogPlan::Respond(date_reprompt());
            }
        };
        if let Some(response) = self.validate_date(&date, now) {
            attributes.course = Some(selection);
            return DialogPlan::Respond(response);
        }
        DialogPlan::Fetch { selection, date }
    }

    /// Dialog entry: the turn carries a course, a date, both, or nothing
    /// usable; session attributes fill the gaps across turns.
    fn plan_dialog(
        &self,
        slots: &SlotValues,
        attributes: &mut SessionAttributes,
        now: NaiveDateTime,
    ) -> DialogPlan {
        let has_course = slots
            .course
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty());
        let has_date = slots
            .date
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty());

        if has_course {
            self.plan_course_turn(slots, attributes, now)
        } else if has_date {
            self.plan_date_turn(slots, attributes, now)
        } else {
            plan_empty_turn(attributes)
        }
    }

    fn plan_course_turn(
        &self,
        slots: &SlotValues,
        attributes: &mut SessionAttributes,
        now: NaiveDateTime,
    ) -> DialogPlan {
        let selection = match course::resolve_course(slots.course.as_deref(), false) {
            Ok(selection) => selection,
            Err(err) => return DialogPlan::Respond(course_reprompt(&err)),
        };
        if Course::from_name(&selection.course).is_none() {
            // Echo the unrecognized name; the session is left untouched.
            return DialogPlan::Respond(course_reprompt(&CourseSlotError {
                raw: Some(selection.course),
            }));
        }
        attributes.course = Some(selection.clone());

        // A date may arrive on the same turn as the course.
        let turn_date = match slots.date.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => match dates::normalize(Some(raw), now, self.cutoff_hour) {
                Ok(date) => Some(date),
                Err(_) => return DialogPlan::Respond(date_reprompt()),
            },
            None => None,
        };

        match turn_date.or_else(|| attributes.date.clone()) {
            Some(date) => {
                if let Some(response) = self.validate_date(&date, now) {
                    return DialogPlan::Respond(response);
                }
                DialogPlan::Fetch { selection, date }
            }
            None => DialogPlan::Respond(ask_for_date(&selection)),
        }
    }

    fn plan_date_turn(
        &self,
        slots: &SlotValues,
        attributes: &mut SessionAttributes,
        now: NaiveDateTime,
    ) -> DialogPlan {
        let date = match dates::normalize(slots.date.as_deref(), now, self.cutoff_hour) {
            Ok(date) => date,
            Err(_) => return DialogPlan::Respond(date_reprompt()),
        };
        if let Some(response) = self.validate_date(&date, now) {
            return DialogPlan::Respond(response);
        }

        match attributes.course.clone() {
            Some(selection) => DialogPlan::Fetch { selection, date },
            None => {
                attributes.date = Some(date.clone());
                DialogPlan::Respond(ask_for_course(&date))
            }
        }
    }

    /// Runs the school-day check, then the current-week check, producing the
    /// first failing check's reprompt. The checks stay separate messages.
    fn validate_date(&self, date: &MenuDate, now: NaiveDateTime) -> Option<DialogResponse> {
        if !self.calendar.is_school_day(&date.calendar_date) {
            info!(calendar_date = %date.calendar_date, "date is not a school day");
            return Some(not_school_day(date));
        }
        if !calendar::is_current_week(date, now.date()) {
            info!(calendar_date = %date.calendar_date, "date is outside the current week");
            return Some(outside_current_week());
        }
        None
    }

    /// Issues the single outbound fetch and renders the final response.
    async fn fetch_and_respond(
        &self,
        selection: &CourseSelection,
        date: &MenuDate,
    ) -> DialogResponse {
        let menu = match self.fetcher.fetch_menu(&date.calendar_date).await {
            Ok(menu) => menu,
            Err(err) => {
                warn!(calendar_date = %date.calendar_date, error = %err, "menu fetch failed");
                return DialogResponse::Tell {
                    speech: FETCH_FAILED.to_string(),
                };
            }
        };

        let day_label = self
            .calendar
            .day_label(&date.calendar_date)
            .unwrap_or("a school day");
        let speech = match Course::from_name(&selection.course) {
            Some(Course::DayNumber) => {
                format!("{} is {}.", date.display_date, day_label)
            }
            _ => {
                let rendered = menu::render(&menu);
                let phrase = rendered.for_course(&selection.course);
                if phrase.trim().is_empty() {
                    format!(
                        "{} is {}. {}",
                        date.display_date,
                        day_label,
                        no_course_phrase(&selection.course)
                    )
                } else {
                    format!("{} is {}. {}", date.display_date, day_label, phrase.trim_end())
                }
            }
        };

        info!(calendar_date = %date.calendar_date, course = %selection.course, "responding with menu");
        DialogResponse::TellWithCard {
            speech: speech.clone(),
            card_title: CARD_TITLE.to_string(),
            card_content: speech,
        }
    }
}

fn plan_empty_turn(attributes: &SessionAttributes) -> DialogPlan {
    if attributes.course.is_some() {
        let text = "Please try again saying a day of the week, for example, Saturday.";
        DialogPlan::Respond(DialogResponse::Ask {
            speech: text.to_string(),
            reprompt: text.to_string(),
        })
    } else {
        DialogPlan::Respond(supported_courses())
    }
}

fn welcome() -> DialogResponse {
    DialogResponse::Ask {
        speech: format!("Welcome to Chef Bridgette's Menu Assistant. {WHICH_DAY_PROMPT}"),
        reprompt: format!(
            "{CAPABILITIES}You could say what's for lunch on Friday. Or what's the \
             entree tomorrow. You can also say exit. {WHICH_DAY_PROMPT}"
        ),
    }
}

fn help() -> DialogResponse {
    DialogResponse::Ask {
        speech: format!(
            "{CAPABILITIES}You could say what's for lunch on Friday. Or you could \
             say exit. {WHICH_DAY_PROMPT}"
        ),
        reprompt: WHICH_DAY_PROMPT.to_string(),
    }
}

fn supported_courses() -> DialogResponse {
    let reprompt = "Which course would you like information for?";
    DialogResponse::Ask {
        speech: format!(
            "I can look up information for soups, entrees, sides, and the vegan \
             option. {reprompt}"
        ),
        reprompt: reprompt.to_string(),
    }
}

fn course_reprompt(err: &CourseSlotError) -> DialogResponse {
    let reprompt = "I can get the full menu or just courses including soup, entree, \
                    sides, and vegan option. Or all the courses if you say all."
        .to_string();
    let speech = match &err.raw {
        Some(raw) => format!("I'm sorry, I don't have any data for {raw}. {reprompt}"),
        None => reprompt.clone(),
    };
    DialogResponse::Ask { speech, reprompt }
}

fn date_reprompt() -> DialogResponse {
    let reprompt = "Please try again saying a day of the week, for example, Saturday. \
                    For which date would you like menu information?"
        .to_string();
    DialogResponse::Ask {
        speech: format!("I'm sorry, I didn't understand that date. {reprompt}"),
        reprompt,
    }
}

fn ask_for_date(selection: &CourseSelection) -> DialogResponse {
    DialogResponse::Ask {
        speech: "For which date?".to_string(),
        reprompt: format!("For which date would you like the {} menu?", selection.course),
    }
}

fn ask_for_course(date: &MenuDate) -> DialogResponse {
    DialogResponse::Ask {
        speech: format!("Which course would you like for {}?", date.display_date),
        reprompt: "Which course would you like information for?".to_string(),
    }
}

fn not_school_day(date: &MenuDate) -> DialogResponse {
    DialogResponse::Ask {
        speech: format!(
            "I don't have a menu for {}. It doesn't look like a school day. {WHICH_DAY_PROMPT}",
            date.display_date
        ),
        reprompt: WHICH_DAY_PROMPT.to_string(),
    }
}

fn outside_current_week() -> DialogResponse {
    DialogResponse::Ask {
        speech: format!("I can only look up menus for the current school week. {WHICH_DAY_PROMPT}"),
        reprompt: WHICH_DAY_PROMPT.to_string(),
    }
}

fn no_course_phrase(course: &str) -> String {
    let label = match Course::from_name(course) {
        Some(Course::Soup) => "soup",
        Some(Course::Entree) => "entree",
        Some(Course::Sides) => "side",
        Some(Course::Vegan) => "vegan option",
        _ => return "There is no menu posted yet.".to_string(),
    };
    format!("There is no {label} today.")
}
