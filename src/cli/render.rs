use ansi_term::{Colour, Style};
use chrono::Local;

use crate::{tracker::entities::EpicEntity, utils::time::from_epoch_millis};

/// Prints the filtered epic list. The active epic sits at the top already,
/// rendering only marks it.
pub fn print_epics(epics: &[&EpicEntity], active_name: Option<&str>) {
    for epic in epics {
        let is_active = active_name == Some(epic.name.as_str());
        let marker = if is_active { ">" } else { " " };
        let name = if is_active {
            Colour::Green.bold().paint(epic.name.as_str()).to_string()
        } else {
            epic.name.clone()
        };
        if epic.description.is_empty() {
            println!("{marker} {name}");
        } else {
            println!(
                "{marker} {name}  {}",
                Style::new().dimmed().paint(epic.description.as_str())
            );
        }
    }
}

/// Local wall-clock rendering of a millisecond timestamp for status output.
pub fn format_local(millis: i64) -> String {
    from_epoch_millis(millis)
        .with_timezone(&Local)
        .format("%x %H:%M")
        .to_string()
}
