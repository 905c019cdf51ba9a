// Entrypoint for the CLI application.
// - Keeps `main` linear: resolve credentials, log in, fetch both sets,
//   diff, report, then optionally offer the interactive unfollow step.
// - Login and fetch failures print a red message and exit non-zero.

use clap::Parser;
use console::style;
use dialoguer::Input;
use igcheck::api::{IgClient, UserInfo};
use igcheck::cli::Cli;
use igcheck::diff::non_followers;
use igcheck::output;
use igcheck::session::{SessionStore, SESSION_FILE};
use igcheck::ui;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    // a project-local .env can hold IG_USERNAME/IG_PASSWORD
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let (username, password) = cli.resolve_credentials()?;

    let store = SessionStore::new(SESSION_FILE);
    let mut client = IgClient::new(store)?;

    let progress = spinner("Logging in to Instagram...");
    let login = client.login(&username, &password, prompt_2fa_code);
    progress.finish_and_clear();
    if let Err(e) = login {
        eprintln!("{}", style(format!("Login failed: {}", e)).red());
        std::process::exit(1);
    }
    println!("{}", style("Logged in successfully!").green());

    let progress = spinner("Fetching followers and following...");
    let fetched = fetch_both_sets(&mut client);
    progress.finish_and_clear();
    let (following, followers) = match fetched {
        Ok(sets) => sets,
        Err(e) => {
            eprintln!("{}", style(format!("Error fetching data: {}", e)).red());
            std::process::exit(1);
        }
    };

    let users = non_followers(&following, &followers);

    if cli.json {
        let path = cli.output_path("json");
        output::export_to_json(&users, &path)?;
        println!(
            "{}",
            style(format!("Results exported to {}", path.display())).green()
        );
        output::print_to_console(&users);
    } else if cli.csv {
        let path = cli.output_path("csv");
        output::export_to_csv(&users, &path)?;
        println!(
            "{}",
            style(format!("Results exported to {}", path.display())).green()
        );
        output::print_to_console(&users);
    } else {
        output::print_to_console(&users);
    }

    if cli.interactive {
        ui::run_interactive(&mut client, &users)?;
    }
    Ok(())
}

type FollowSets = (
    HashMap<String, UserInfo>,
    HashMap<String, UserInfo>,
);

fn fetch_both_sets(client: &mut IgClient) -> igcheck::error::Result<FollowSets> {
    let following = client.fetch_following()?;
    let followers = client.fetch_followers()?;
    Ok((following, followers))
}

/// 2FA code prompt handed to the client; only invoked when Instagram asks
/// for a second factor during login.
fn prompt_2fa_code() -> std::io::Result<String> {
    Input::<String>::new()
        .with_prompt("Enter your 2FA verification code")
        .interact_text()
}

fn spinner(message: &str) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    progress.set_message(message.to_string());
    progress.enable_steady_tick(Duration::from_millis(80));
    progress
}
