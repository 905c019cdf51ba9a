// Account client: a small blocking HTTP client for the handful of private
// Instagram web endpoints this tool needs (login, 2FA, follower/following
// pages, unfollow). It is intentionally synchronous; every call chain in
// the tool is one sequential request/response exchange.

use crate::error::{IgError, Result};
use crate::session::{Session, SessionStore};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{COOKIE, REFERER, SET_COOKIE};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Instagram's web origin. Tests point the client elsewhere.
const BASE_URL: &str = "https://www.instagram.com";

/// App id the web client sends on every API request.
const IG_APP_ID: &str = "936619743392459";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Users per friendship page; Instagram caps this at 200.
const PAGE_SIZE: u32 = 200;

/// A single Instagram account, as this tool cares about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: String,
    pub username: String,
    pub full_name: String,
    pub profile_url: String,
}

/// One user entry in a friendship page. `pk` arrives as a number on some
/// endpoints and a string on others, so it is kept flexible here and
/// normalised in `into_user_info`.
#[derive(Debug, Deserialize)]
struct ApiUser {
    pk: serde_json::Value,
    username: String,
    #[serde(default)]
    full_name: String,
}

impl ApiUser {
    fn into_user_info(self) -> UserInfo {
        UserInfo {
            user_id: id_to_string(&self.pk),
            profile_url: format!("https://instagram.com/{}", self.username),
            username: self.username,
            full_name: self.full_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FriendshipPage {
    #[serde(default)]
    users: Vec<ApiUser>,
    next_max_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    authenticated: bool,
    #[serde(rename = "userId")]
    user_id: Option<serde_json::Value>,
    #[serde(default)]
    two_factor_required: bool,
    two_factor_info: Option<TwoFactorInfo>,
    message: Option<String>,
    checkpoint_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwoFactorInfo {
    two_factor_identifier: String,
}

fn id_to_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Blocking client for the authenticated account. Holds the HTTP client,
/// the API origin and the current session; persists the session through
/// `SessionStore` as a side effect of login.
pub struct IgClient {
    http: Client,
    base_url: String,
    store: SessionStore,
    session: Option<Session>,
}

impl IgClient {
    /// Client against the real Instagram origin.
    pub fn new(store: SessionStore) -> Result<Self> {
        Self::with_base_url(BASE_URL, store)
    }

    /// Client against an explicit origin.
    pub fn with_base_url(base_url: &str, store: SessionStore) -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            session: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Logs in, reusing a stored session when one still works.
    ///
    /// `two_factor_code` is only invoked when Instagram asks for a second
    /// factor; the login is then retried exactly once with the code. A
    /// challenge (manual verification in the official app) is surfaced as
    /// `ChallengeRequired` and never resolved automatically. The refreshed
    /// session is written back to the store on success.
    pub fn login<F>(&mut self, username: &str, password: &str, two_factor_code: F) -> Result<()>
    where
        F: FnOnce() -> std::io::Result<String>,
    {
        if !self.try_resume()? {
            self.prime_csrf_token()?;
            match self.credential_login(username, password) {
                Ok(()) => {}
                Err(IgError::TwoFactorRequired { identifier }) => {
                    let code = two_factor_code()?;
                    self.two_factor_login(username, &identifier, code.trim())?;
                }
                Err(e) => return Err(e),
            }
        }
        if let Some(session) = &self.session {
            self.store.save(session).map_err(|e| {
                std::io::Error::new(
                    e.kind(),
                    format!("{}: {}", self.store.path().display(), e),
                )
            })?;
        }
        Ok(())
    }

    /// All accounts the logged-in user follows, keyed by user id.
    pub fn fetch_following(&mut self) -> Result<HashMap<String, UserInfo>> {
        self.fetch_friendships("following")
    }

    /// All accounts following the logged-in user, keyed by user id.
    pub fn fetch_followers(&mut self) -> Result<HashMap<String, UserInfo>> {
        self.fetch_friendships("followers")
    }

    /// Unfollows one account. The mutation is external and irreversible;
    /// remote rejection comes back as a per-item `Unfollow` error.
    pub fn unfollow(&mut self, user: &UserInfo) -> Result<()> {
        let path = format!("/api/v1/friendships/destroy/{}/", user.user_id);
        let response = self
            .post(&path)
            .form(&[("user_id", user.user_id.as_str())])
            .send()?;
        self.absorb_cookies(&response);
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(IgError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().unwrap_or_else(|_| "".into());
            return Err(IgError::Unfollow {
                username: user.username.clone(),
                reason: if text.is_empty() { status.to_string() } else { text },
            });
        }
        Ok(())
    }

    /// Attempts to reuse the stored session, verifying it with a cheap
    /// probe call. A rejected probe falls back to a credential login.
    fn try_resume(&mut self) -> Result<bool> {
        let Some(session) = self.store.load() else {
            return Ok(false);
        };
        self.session = Some(session);
        let response = self.get("/api/v1/accounts/current_user/").send()?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(IgError::RateLimited);
        }
        if response.status().is_success() {
            self.absorb_cookies(&response);
            Ok(true)
        } else {
            // stale or revoked session
            self.session = None;
            Ok(false)
        }
    }

    /// Fetches the landing page once so the csrf cookie the login
    /// endpoints require is in place.
    fn prime_csrf_token(&mut self) -> Result<()> {
        let response = self.get("/").send()?;
        self.absorb_cookies(&response);
        Ok(())
    }

    fn credential_login(&mut self, username: &str, password: &str) -> Result<()> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        // Browser-style plaintext envelope; accepted when the request
        // carries a valid csrf token.
        let enc_password = format!("#PWD_INSTAGRAM_BROWSER:0:{}:{}", timestamp, password);
        let params = [
            ("username", username),
            ("enc_password", &enc_password),
            ("queryParams", "{}"),
            ("optIntoOneTap", "false"),
        ];
        let response = self
            .post("/api/v1/web/accounts/login/ajax/")
            .form(&params)
            .send()?;
        self.handle_login_response(response)
    }

    fn two_factor_login(&mut self, username: &str, identifier: &str, code: &str) -> Result<()> {
        let params = [
            ("username", username),
            ("identifier", identifier),
            ("verificationCode", code),
        ];
        let response = self
            .post("/api/v1/web/accounts/login/ajax/two_factor/")
            .form(&params)
            .send()?;
        self.handle_login_response(response).map_err(|e| match e {
            // a rejected code comes back asking for 2FA again; escalate
            IgError::TwoFactorRequired { .. } => IgError::BadCredentials,
            other => other,
        })
    }

    fn handle_login_response(&mut self, response: Response) -> Result<()> {
        self.absorb_cookies(&response);
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(IgError::RateLimited);
        }
        let body: LoginResponse = response.json().map_err(|e| IgError::Parse(e.to_string()))?;
        if body.two_factor_required {
            let identifier = body
                .two_factor_info
                .map(|info| info.two_factor_identifier)
                .unwrap_or_default();
            return Err(IgError::TwoFactorRequired { identifier });
        }
        if body.message.as_deref() == Some("checkpoint_required") {
            let detail = body
                .checkpoint_url
                .map(|url| format!(" ({})", url))
                .unwrap_or_default();
            return Err(IgError::ChallengeRequired(format!(
                "Instagram challenge required{}. Please log in via the Instagram app \
                 to verify your account, then try again.",
                detail
            )));
        }
        if !body.authenticated {
            return Err(IgError::BadCredentials);
        }
        let session = self.session.get_or_insert_with(Session::default);
        if let Some(id) = body.user_id {
            session.user_id = id_to_string(&id);
        }
        Ok(())
    }

    /// Walks the paginated friendship endpoint (`followers` or
    /// `following`) to completion. Any page failure fails the whole fetch.
    fn fetch_friendships(&mut self, kind: &str) -> Result<HashMap<String, UserInfo>> {
        let user_id = self.user_id()?.to_string();
        let mut users = HashMap::new();
        let mut max_id: Option<String> = None;
        loop {
            let mut url = Url::parse(&format!(
                "{}/api/v1/friendships/{}/{}/",
                self.base_url, user_id, kind
            ))
            .map_err(|e| IgError::Parse(e.to_string()))?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("count", &PAGE_SIZE.to_string());
                // cursors are opaque and may contain reserved characters
                if let Some(cursor) = &max_id {
                    query.append_pair("max_id", cursor);
                }
            }
            let response = self.decorate(self.http.get(url)).send()?;
            self.absorb_cookies(&response);
            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(IgError::RateLimited);
            }
            if !status.is_success() {
                let text = response.text().unwrap_or_else(|_| "".into());
                return Err(IgError::Api {
                    status: status.as_u16(),
                    message: if text.is_empty() {
                        format!("{} fetch failed", kind)
                    } else {
                        text
                    },
                });
            }
            let page: FriendshipPage =
                response.json().map_err(|e| IgError::Parse(e.to_string()))?;
            for user in page.users {
                let info = user.into_user_info();
                users.insert(info.user_id.clone(), info);
            }
            match page.next_max_id {
                Some(cursor) => max_id = Some(cursor),
                None => break,
            }
        }
        Ok(users)
    }

    fn user_id(&self) -> Result<&str> {
        self.session
            .as_ref()
            .filter(|session| !session.user_id.is_empty())
            .map(|session| session.user_id.as_str())
            .ok_or_else(|| IgError::Parse("not logged in".into()))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.decorate(self.http.get(format!("{}{}", self.base_url, path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.decorate(self.http.post(format!("{}{}", self.base_url, path)))
    }

    /// Adds the headers every Instagram web API call expects, plus the
    /// session cookies and csrf token when present.
    fn decorate(&self, builder: RequestBuilder) -> RequestBuilder {
        let mut builder = builder
            .header("X-IG-App-ID", IG_APP_ID)
            .header("X-Requested-With", "XMLHttpRequest")
            .header(REFERER, format!("{}/", self.base_url));
        if let Some(session) = &self.session {
            if !session.cookies.is_empty() {
                builder = builder.header(COOKIE, session.cookie_header());
            }
            if !session.csrf_token.is_empty() {
                builder = builder.header("X-CSRFToken", session.csrf_token.clone());
            }
        }
        builder
    }

    /// Merges `Set-Cookie` headers into the session so rolled cookies
    /// survive into the persisted blob.
    fn absorb_cookies(&mut self, response: &Response) {
        let session = self.session.get_or_insert_with(Session::default);
        for value in response.headers().get_all(SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let Some(pair) = raw.split(';').next() else { continue };
            if let Some((name, val)) = pair.split_once('=') {
                if val.is_empty() || val == "\"\"" {
                    session.cookies.remove(name.trim());
                } else {
                    session
                        .cookies
                        .insert(name.trim().to_string(), val.to_string());
                }
            }
        }
        if let Some(token) = session.cookies.get("csrftoken") {
            session.csrf_token = token.clone();
        }
    }
}
