//! Terminal output helpers.

use colored::Colorize;
use idpsync_engine::SyncPlan;
use tabled::{settings::Style, Table, Tabled};

use crate::error::{CliError, CliResult};

// ============================================================================
// Message Helpers
// ============================================================================

/// Prints a success message with a green check mark.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message with a red cross to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message with a yellow warning sign to stderr.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an informational message with a blue marker.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Prints a bold section heading.
pub fn heading(message: &str) {
    println!("\n{}", message.bold());
}

/// Prints one planned or applied addition.
pub fn added(message: &str) {
    println!("  {} {}", "+".green(), message);
}

/// Prints one planned or applied removal.
pub fn removed(message: &str) {
    println!("  {} {}", "-".red(), message);
}

/// Prints one planned or applied modification.
pub fn changed(message: &str) {
    println!("  {} {}", "~".yellow(), message);
}

// ============================================================================
// Plan Summary
// ============================================================================

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Action")]
    action: &'static str,
    #[tabled(rename = "Users")]
    users: usize,
    #[tabled(rename = "Groups")]
    groups: usize,
}

/// Prints the plan's action counts as a table.
pub fn plan_summary(plan: &SyncPlan) {
    let rows = vec![
        SummaryRow {
            action: "Add",
            users: plan.users_to_add.len(),
            groups: plan.groups_to_add.len(),
        },
        SummaryRow {
            action: "Delete",
            users: plan.users_to_delete.len(),
            groups: plan.groups_to_delete.len(),
        },
        SummaryRow {
            action: "Modify",
            users: plan.users_to_modify.len(),
            groups: plan.groups_to_modify.len(),
        },
    ];
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

// ============================================================================
// Prompts
// ============================================================================

/// Reads a password from the terminal without echo.
pub fn prompt_password(prompt: &str) -> CliResult<String> {
    rpassword::prompt_password(prompt).map_err(CliError::Io)
}
