//! Example: parsing agent replies of varying shape.
//!
//! Run with: `cargo run --example parse_reply`

use storycircuit::{Platform, ResponseParser};

fn main() {
    let parser = ResponseParser::default();
    let requested = [Platform::Twitter, Platform::Blog];

    let replies = [
        (
            "json",
            r##"{"plan": {"hook": "Ship it", "keyPoints": ["Small PRs"]},
                 "outputs": {"twitter": {"content": "Ship small.", "hashtags": ["#dev"]}}}"##,
        ),
        (
            "fenced",
            "Here you go:\n```json\n{\"outputs\": {\"blog\": {\"content\": \"Long form.\"}}}\n```",
        ),
        (
            "markdown",
            "## A) Plan\n**Hook:** Ship it\n\n## B) Platform Outputs\n### Blog\nLong form.\n**Hashtags:** #dev",
        ),
        ("prose", "Shipping small changes keeps reviews honest."),
        ("empty", ""),
    ];

    println!("Strategies: {:?}\n", parser.strategy_names());

    for (label, reply) in replies {
        let outcome = parser.parse_with_report(reply, &requested);
        let report = &outcome.report;
        println!(
            "{:<9} strategy={:<12} quality={:<10} attempts={} platforms={:?}",
            label,
            report.strategy.unwrap_or("fallback"),
            report.quality().as_str(),
            report.attempts.len(),
            outcome.content.outputs.keys().collect::<Vec<_>>(),
        );
        if let Some(reason) = &report.fallback_reason {
            println!("          fallback: {}", reason);
        }
    }
}
