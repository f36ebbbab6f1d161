use bundlex_core::{classify, Category, ClassifiedEvent, HttpMethod, LegacyBundle, Phase, KNOWN_EVENTS};
use colored::*;
use serde_json::Value;

/// Print a legacy bundle as a key summary.
pub fn print_legacy_bundle(event: &str, legacy: &LegacyBundle) {
    println!();
    println!(
        "{}",
        format!(" bundlex v{} — Legacy bundle for {}", env!("CARGO_PKG_VERSION"), event).bold()
    );
    println!();

    println!(" {}", "Event".bold().underline());
    println!(" {} Category: {}", "|-".dimmed(), legacy.category().label().cyan());
    println!(" {} Phase:    {}", "|-".dimmed(), phase_label(legacy.phase()));
    if let Some(request) = legacy.request() {
        let method = request.get("method").and_then(Value::as_str).unwrap_or("?");
        let url = request.get("url").and_then(Value::as_str).unwrap_or("(none)");
        println!(" {} Request:  {} {}", "|-".dimmed(), method.bold(), url);
    }
    println!();

    println!(" {}", "=".repeat(60).dimmed());
    println!();

    println!(" {}", "Keys".bold().underline());
    for key in legacy.keys() {
        let summary = legacy.get(key).map(summarize).unwrap_or_default();
        println!(" {} {:<22} {}", "|-".dimmed(), key.green(), summary.dimmed());
    }
    println!();
}

/// Print the classification of a single event name.
pub fn print_classification(name: &str, classified: &ClassifiedEvent) {
    println!(" {} {}", "Event:".bold(), name);
    println!(" {} Category: {}", "|-".dimmed(), classified.category.label().cyan());
    println!(" {} Phase:    {}", "|-".dimmed(), phase_label(classified.phase));
    println!(
        " {} Method:   {}",
        "|-".dimmed(),
        method_label(classified.category.method())
    );
    if classified.phase.is_post() {
        println!(
            " {} Requires an upstream response (--status/--content)",
            "!".yellow().bold()
        );
    }
}

/// Print every accepted event name grouped by category.
pub fn print_event_catalog() {
    println!();
    println!(" {}", "Event Catalog".bold().underline());
    println!();

    for category in Category::ALL {
        println!(
            " {} {}",
            category.label().cyan().bold(),
            format!("[{}]", method_label(category.method())).dimmed()
        );
        for known in KNOWN_EVENTS {
            let Ok(classified) = classify(known.name, known.key) else {
                continue;
            };
            if classified.category != category {
                continue;
            }
            let key = known
                .key
                .map(|k| format!(" (key={})", k))
                .unwrap_or_default();
            println!(
                "   {} {}{} {}",
                "|-".dimmed(),
                known.name,
                key.dimmed(),
                phase_label(classified.phase)
            );
        }
        println!();
    }
}

fn phase_label(phase: Phase) -> ColoredString {
    match phase {
        Phase::Pre => "pre".blue(),
        Phase::Post => "post".magenta(),
    }
}

fn method_label(method: HttpMethod) -> ColoredString {
    match method {
        HttpMethod::Get => method.as_str().green(),
        HttpMethod::Post => method.as_str().yellow(),
        HttpMethod::Delete => method.as_str().red(),
    }
}

fn summarize(value: &Value) -> String {
    match value {
        Value::Object(map) => format!("{{{} keys}}", map.len()),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::String(s) if s.chars().count() > 40 => {
            format!("\"{}...\"", s.chars().take(37).collect::<String>())
        }
        other => other.to_string(),
    }
}
