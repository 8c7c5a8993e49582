//! Builds calendar template-event links for recorded work sessions. This is
//! pure string construction; opening the link is the presentation layer's
//! business and no network call happens here.

use crate::utils::time::format_utc_basic;

/// Used when the preferences don't override the template link.
pub const DEFAULT_TEMPLATE_URL: &str = "https://www.google.com/calendar/render?action=TEMPLATE";

/// Builds an event-creation link. The title lands percent-encoded in the
/// `text` parameter, the timestamps joined with `/` in the `dates` parameter
/// using the RFC 5545 compact UTC form.
pub fn build_event_url(title: &str, start_millis: i64, end_millis: i64, template: &str) -> String {
    let base = if template.is_empty() {
        DEFAULT_TEMPLATE_URL
    } else {
        template
    };
    format!(
        "{base}&text={}&dates={}/{}",
        urlencoding::encode(title),
        format_utc_basic(start_millis),
        format_utc_basic(end_millis),
    )
}
