//! Pure derivation of the panel view. Nothing here is persisted, the view is
//! recomputed on every change of the epic list, the query or the active epic.

use super::entities::{parse_epic_input, EpicEntity};

/// Filters and orders epics for display.
///
/// The query is parsed like panel input: text before the first `/` matches
/// against names and descriptions, text after it against descriptions only.
/// Matching is case-insensitive substring containment, so an empty query
/// matches everything. Relative order of the input is preserved, except the
/// active epic is moved to the front.
pub fn filter_epics<'a>(
    epics: &'a [EpicEntity],
    query: &str,
    active_name: Option<&str>,
) -> Vec<&'a EpicEntity> {
    let (name_query, description_query) = parse_epic_input(query);
    let name_query = name_query.to_lowercase();
    let description_query = description_query.to_lowercase();

    let mut matched = epics
        .iter()
        .filter(|epic| {
            let name = epic.name.to_lowercase();
            let description = epic.description.to_lowercase();
            name.contains(&name_query)
                || description.contains(&name_query)
                || (!description_query.is_empty() && description.contains(&description_query))
        })
        .collect::<Vec<_>>();

    if let Some(active) = active_name {
        if let Some(index) = matched.iter().position(|epic| epic.name == active) {
            let active_epic = matched.remove(index);
            matched.insert(0, active_epic);
        }
    }

    matched
}
