//! Small personal time tracker: keep a list of epics you work on, run a timer
//! against one of them, and turn a finished session into a calendar event
//! link. Everything is stored locally, there is no server and no sync.
//!

pub mod calendar;
pub mod cli;
pub mod config;
pub mod locale;
pub mod storage;
pub mod tracker;
pub mod utils;
