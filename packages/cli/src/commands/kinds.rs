use anyhow::Result;
use colored::Colorize;
use formcraft_fields::registry;

/// Print the designer palette
pub fn kinds() -> Result<()> {
    println!("{}", "Available fields".bright_blue().bold());
    println!();

    for (kind, button) in registry::palette() {
        let input = if registry::strategy(kind).collects_input() {
            "input".green()
        } else {
            "layout".dimmed()
        };
        println!(
            "  {:<18} {:<16} {:<12} {}",
            kind.as_str().bright_white(),
            button.label,
            button.icon.dimmed(),
            input
        );
    }

    Ok(())
}
