// Output rendering: console table, JSON export and CSV export. All three
// take the already-sorted non-follower list; mode selection happens in
// `main`.

use crate::api::UserInfo;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// Printed instead of an empty table when everything is reciprocal.
pub const NO_RESULTS_MESSAGE: &str = "Everyone you follow follows you back!";

/// Prints the result table, or the all-reciprocal message for an empty
/// list.
pub fn print_to_console(users: &[UserInfo]) {
    if users.is_empty() {
        println!("{}", style(NO_RESULTS_MESSAGE).green());
        return;
    }
    println!();
    println!(
        "{}",
        style(format!(
            "Found {} account(s) that don't follow you back:",
            users.len()
        ))
        .bold()
    );
    println!();
    print!("{}", render(users));
    println!();
}

/// Console body: the no-results message for an empty list, otherwise a
/// plain-text table with aligned username / full name / profile URL
/// columns.
fn render(users: &[UserInfo]) -> String {
    if users.is_empty() {
        return format!("{}\n", NO_RESULTS_MESSAGE);
    }
    let name_width = users
        .iter()
        .map(|u| u.username.chars().count())
        .chain(["Username".len()])
        .max()
        .unwrap_or(0);
    let full_width = users
        .iter()
        .map(|u| u.full_name.chars().count())
        .chain(["Full Name".len()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_width$}  {:<full_width$}  {}\n",
        "Username", "Full Name", "Profile URL"
    ));
    out.push_str(&format!(
        "{}  {}  {}\n",
        "-".repeat(name_width),
        "-".repeat(full_width),
        "-".repeat("Profile URL".len())
    ));
    for user in users {
        out.push_str(&format!(
            "{:<name_width$}  {:<full_width$}  {}\n",
            user.username, user.full_name, user.profile_url
        ));
    }
    out
}

/// Writes the list as pretty-printed JSON to `path`.
pub fn export_to_json(users: &[UserInfo], path: &Path) -> Result<()> {
    let data = serde_json::to_string_pretty(users).context("serializing results to JSON")?;
    std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Writes the list as CSV to `path`, one header row plus one row per
/// entry.
pub fn export_to_csv(users: &[UserInfo], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("writing {}", path.display()))?;
    writer.write_record(["username", "full_name", "profile_url", "user_id"])?;
    for user in users {
        writer.write_record([
            &user.username,
            &user.full_name,
            &user.profile_url,
            &user.user_id,
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
