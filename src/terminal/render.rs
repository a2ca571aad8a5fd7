//! Plain-text rendering of a session screen.

use crate::models::{RuleView, SessionView};

const DONE: char = '●';
const OPEN: char = '○';

fn rule_symbol(rule: &RuleView) -> char {
    if rule.completed {
        DONE
    } else {
        OPEN
    }
}

/// Render the whole screen: header, search line, then either the city list
/// or the rule checklist of the selected city.
///
/// Example output with a city selected:
/// ```text
/// EcoTourist  [coins: 5]
/// Search: (none)
///
/// Eco Rules for Mumbai  (type `back` to return)
/// ● [1] Dispose wrappers in designated dustbins only  +5
/// ○ [2] Use reusable water bottles when possible  +5
///
///   +5 Coins!
/// ```
pub fn render_screen(view: &SessionView) -> String {
    let mut output = format!("EcoTourist  [coins: {}]\n", view.points);
    if view.filter_text.is_empty() {
        output.push_str("Search: (none)\n\n");
    } else {
        output.push_str(&format!("Search: {}\n\n", view.filter_text));
    }

    match &view.selected {
        None => render_destinations(&mut output, view),
        Some(destination) => {
            output.push_str(&format!(
                "Eco Rules for {}  (type `back` to return)\n",
                destination.name
            ));
            for rule in &view.rules {
                output.push_str(&format!(
                    "{} [{}] {}  +{}\n",
                    rule_symbol(rule),
                    rule.task.id,
                    rule.task.description,
                    rule.task.points
                ));
            }
        }
    }

    if let Some(feedback) = &view.feedback {
        output.push_str(&format!("\n  {}\n", feedback.message));
    }
    output
}

fn render_destinations(output: &mut String, view: &SessionView) {
    if view.destinations.is_empty() {
        output.push_str("No cities match your search.\n");
        return;
    }
    for destination in &view.destinations {
        output.push_str(&format!(
            "[{}] {} - {}\n",
            destination.id, destination.name, destination.description
        ));
    }
}
