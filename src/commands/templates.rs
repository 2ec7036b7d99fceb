use console::style;

use crate::core::templates::{sample_template_ids, BUILT_IN_TEMPLATES, FAQ_TEMPLATE_ID};

/// List Dakora's built-in templates and which ones have sample inputs.
pub fn run() -> Result<(), String> {
    println!("{}", style("Built-in Dakora templates:").green().bold());
    for (id, description) in BUILT_IN_TEMPLATES {
        let marker = if sample_template_ids().contains(id) {
            style("•").green()
        } else {
            style("•").dim()
        };
        let default = if *id == FAQ_TEMPLATE_ID { " (default)" } else { "" };
        println!("  {} {}{} - {}", marker, style(id).yellow(), default, description);
    }
    println!(
        "\n{} marks templates with sample inputs; set DAKORA_TEMPLATE_ID to pick one.",
        style("•").green()
    );
    Ok(())
}
