// Interactive unfollow step: a multi-select over the non-follower list,
// a confirmation guard, then best-effort sequential unfollows. The
// functions are small and synchronous to make the flow easy to follow.

use crate::api::{IgClient, UserInfo};
use crate::error::IgError;
use anyhow::Result;
use console::style;
use dialoguer::{Confirm, MultiSelect};

/// What happened to each selected account.
#[derive(Debug, Default)]
pub struct UnfollowReport {
    pub unfollowed: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Presents the list for multi-select, confirms, and unfollows the chosen
/// accounts. Aborting the selection or declining the confirmation
/// performs no unfollow calls and is not an error.
pub fn run_interactive(client: &mut IgClient, users: &[UserInfo]) -> Result<()> {
    if users.is_empty() {
        return Ok(());
    }

    let items: Vec<String> = users.iter().map(list_item).collect();
    // `interact_opt` returns None when the user aborts with Esc
    let Some(selection) = MultiSelect::new()
        .with_prompt("Select accounts to unfollow (space to toggle, enter to confirm)")
        .items(&items)
        .interact_opt()?
    else {
        println!("Cancelled, nothing unfollowed.");
        return Ok(());
    };

    if selection.is_empty() {
        println!("No accounts selected.");
        return Ok(());
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("Unfollow {} account(s)?", selection.len()))
        .default(false)
        .interact()?;
    if !confirmed {
        println!("Cancelled, nothing unfollowed.");
        return Ok(());
    }

    let selected: Vec<&UserInfo> = selection.into_iter().map(|i| &users[i]).collect();
    let report = unfollow_all(client, &selected);

    for name in &report.unfollowed {
        println!("{} {}", style("Unfollowed").green(), name);
    }
    for (name, reason) in &report.failed {
        println!("{} {}: {}", style("Failed").red(), name, reason);
    }
    println!(
        "Done: {} unfollowed, {} failed.",
        report.unfollowed.len(),
        report.failed.len()
    );
    Ok(())
}

/// Unfollows each selected account in turn. A rejection of one entry is
/// recorded and the loop moves on; only a rate limit stops the remaining
/// items, since every further call would be rejected too.
pub fn unfollow_all(client: &mut IgClient, selected: &[&UserInfo]) -> UnfollowReport {
    let mut report = UnfollowReport::default();
    for user in selected {
        match client.unfollow(user) {
            Ok(()) => report.unfollowed.push(user.username.clone()),
            Err(err @ IgError::RateLimited) => {
                report.failed.push((user.username.clone(), err.to_string()));
                break;
            }
            Err(err) => report.failed.push((user.username.clone(), err.to_string())),
        }
    }
    report
}

/// One multi-select line: `username (full name)`, or just the username
/// when no full name is set.
fn list_item(user: &UserInfo) -> String {
    if user.full_name.is_empty() {
        user.username.clone()
    } else {
        format!("{} ({})", user.username, user.full_name)
    }
}
