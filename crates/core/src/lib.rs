//! Core dialog logic for the MenuTeller skill.
//!
//! Everything here is independent of the web service: the service hands in
//! slot values, session attributes, and the wall-clock "now", and gets back
//! exactly one [`dialog::DialogResponse`] per turn.

pub mod calendar;
pub mod course;
pub mod dates;
pub mod dialog;
pub mod fetcher;
pub mod menu;
