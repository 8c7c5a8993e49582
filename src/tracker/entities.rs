use serde::Deserialize;
use serde::Serialize;

/// A named unit of work. `name` is the identity key: it must be unique among
/// all epics, is compared case-sensitively, and never changes after creation.
/// Only the description can be edited.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct EpicEntity {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Millisecond timestamp of the last time work was started on this epic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<i64>,
}

impl EpicEntity {
    pub fn new(name: String, description: String) -> Self {
        Self {
            name,
            description,
            last_used: None,
        }
    }
}

/// The in-progress work session. It references its epic weakly, by name:
/// deleting the epic leaves the session running and it can still be stopped
/// and recorded.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct SessionEntity {
    pub epic_name: String,
    /// Milliseconds since epoch. Set once when the session is created. Legacy
    /// data may lack it, in which case stopping can't record a duration.
    pub started_at: Option<i64>,
}

/// Splits raw panel input into a name and a description on the first `/`.
/// `"Alpha / write docs"` becomes `("Alpha", "write docs")`; any later `/`
/// stays part of the description verbatim.
pub fn parse_epic_input(raw: &str) -> (String, String) {
    match raw.split_once('/') {
        Some((name, description)) => (name.trim().to_owned(), description.trim().to_owned()),
        None => (raw.trim().to_owned(), String::new()),
    }
}
