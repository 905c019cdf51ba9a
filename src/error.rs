// Error types shared by the Instagram client and the interactive flow.
// The taxonomy mirrors the distinct outcomes the login and friendship
// endpoints can produce; `main` turns fatal variants into a red message
// and a non-zero exit.

use thiserror::Error;

/// Errors that can occur while talking to Instagram.
#[derive(Error, Debug)]
pub enum IgError {
    /// Wrong username or password, or a login the server rejected outright.
    #[error("invalid credentials, please check your username and password")]
    BadCredentials,

    /// The account has 2FA enabled. Recovered once by prompting for a code;
    /// a failed retry escalates to `BadCredentials`.
    #[error("two-factor authentication required")]
    TwoFactorRequired { identifier: String },

    /// Instagram demands manual verification. Not resolvable from the CLI;
    /// the user has to act in the official app.
    #[error("{0}")]
    ChallengeRequired(String),

    /// HTTP 429. Fatal for the run, the user should wait before retrying.
    #[error("rate limited by Instagram, wait a while before trying again")]
    RateLimited,

    /// A single unfollow request was rejected. Collected per item by the
    /// interactive step, never aborts the remaining entries.
    #[error("could not unfollow {username}: {reason}")]
    Unfollow { username: String, reason: String },

    /// Unexpected HTTP status outside the cases above.
    #[error("Instagram returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected response from Instagram: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IgError>;
