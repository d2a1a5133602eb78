use crate::models::EventDetails;

pub const STYLE_SUGGESTIONS: &str = include_str!("../data/prompts/style_suggestions.txt");
pub const STYLED_IMAGE: &str = include_str!("../data/prompts/styled_image.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

pub fn style_suggestions(event: &EventDetails, count: usize) -> String {
    render(
        STYLE_SUGGESTIONS,
        &[
            ("event_type", &event.event_type),
            ("venue", &event.venue),
            ("theme", &event.theme),
            ("count", &count.to_string()),
        ],
    )
}

pub fn styled_image(event: &EventDetails, style: &str) -> String {
    render(
        STYLED_IMAGE,
        &[
            ("event_type", &event.event_type),
            ("venue", &event.venue),
            ("theme", &event.theme),
            ("style", style),
        ],
    )
}
