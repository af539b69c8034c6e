use crate::config::SessionConfig;
use crate::db::error::StoreError;
use crate::error::DomainError;
use crate::input::parser::parse_command;
use crate::models::account::Account;
use crate::net::line::{ConnResult, Connection};
use crate::services::AuthService;
use crate::state::registry::{ConnectionHandle, ConnectionRegistry};
use crate::state::session::SessionCtx;
use sparkfuse_core::{Username, UsernameError};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const PROMPT_USERNAME: &str = "Enter username:";
pub const PROMPT_PASSWORD: &str = "Enter password:";
pub const USERNAME_BLANK: &str = "Username cannot be blank.";
pub const USERNAME_INVALID: &str = "Username contains invalid characters.";
pub const PASSWORD_BLANK: &str = "Password cannot be blank.";
pub const LOGIN_OK: &str = "Login successful.";
pub const LOGIN_FAILED: &str = "Incorrect username or password.";
pub const ALREADY_CONNECTED: &str = "That account is already connected.";
pub const STORE_FAILURE: &str = "An error occurred. Please try again later.";
pub const UNRECOGNIZED: &str = "Unrecognized command. Type 'login' to login or 'register' to create a new account.";

pub const PROMPT_EMAIL: &str = "Enter email address for registration:";
pub const EMAIL_INVALID: &str = "Invalid or blank email format. Please enter a valid email address.";
pub const EMAIL_EXISTS: &str = "Email already exists. Did you forget your password?";
pub const PROMPT_NEW_USERNAME: &str = "Enter a username for registration:";
pub const NEW_USERNAME_BLANK: &str = "Username cannot be blank. Please enter a valid username.";
pub const NEW_USERNAME_INVALID: &str = "Username contains invalid characters. Please enter a valid username.";
pub const USERNAME_EXISTS: &str = "Username already exists. Please choose a different one.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(Username),
    Unauthenticated,
}

/// Drives the pre-session exchange: the `login` and `register` dialogues.
///
/// A successful login claims the username in the registry before reporting success. Every failure,
/// including store outages, ends as [`AuthOutcome::Unauthenticated`]; only a broken connection is an
/// error. There is no retry limit here, callers simply run the gate again.
pub struct AuthenticationGate {
    auth: Arc<AuthService>,
    registry: Arc<ConnectionRegistry>,
    handle: ConnectionHandle,
    config: Arc<SessionConfig>,
}

impl AuthenticationGate {
    pub async fn new(session: &SessionCtx) -> Self {
        Self {
            auth: session.app.auth.clone(),
            registry: session.app.registry.clone(),
            handle: session.handle.clone(),
            config: session.settings().await,
        }
    }

    pub fn registration_enabled(&self) -> bool {
        self.config.settings.registration
    }

    /// Full round: prompt, read the choice, run it.
    pub async fn run(&self, conn: &mut dyn Connection) -> ConnResult<AuthOutcome> {
        self.greet(conn).await?;
        let line = conn.recv().await?;
        self.attempt(&line, conn).await
    }

    pub async fn greet(&self, conn: &mut dyn Connection) -> ConnResult<()> {
        conn.send(self.config.greeting()).await
    }

    pub async fn attempt(&self, line: &str, conn: &mut dyn Connection) -> ConnResult<AuthOutcome> {
        let intent = parse_command(line);

        match intent.verb.as_str() {
            "login" => self.login(&intent.args, conn).await,
            "register" if self.registration_enabled() => {
                self.register(conn).await?;
                Ok(AuthOutcome::Unauthenticated)
            }
            _ => {
                conn.send(UNRECOGNIZED).await?;
                Ok(AuthOutcome::Unauthenticated)
            }
        }
    }

    async fn login(&self, args: &[String], conn: &mut dyn Connection) -> ConnResult<AuthOutcome> {
        let (raw_user, password) = match args {
            [user, pass] if self.config.settings.inline_login => (user.clone(), pass.clone()),
            _ => {
                conn.send(PROMPT_USERNAME).await?;
                let user = conn.recv().await?;
                if user.trim().is_empty() {
                    conn.send(USERNAME_BLANK).await?;
                    return Ok(AuthOutcome::Unauthenticated);
                }

                conn.send(PROMPT_PASSWORD).await?;
                let pass = conn.recv().await?;
                (user, pass)
            }
        };

        if password.trim().is_empty() {
            conn.send(PASSWORD_BLANK).await?;
            return Ok(AuthOutcome::Unauthenticated);
        }
        let username = match Username::try_from(raw_user.as_str()) {
            Ok(username) => username,
            Err(e) => {
                conn.send(match e {
                    UsernameError::Blank => USERNAME_BLANK,
                    UsernameError::ControlChar => USERNAME_INVALID,
                })
                .await?;
                return Ok(AuthOutcome::Unauthenticated);
            }
        };

        match self.auth.verify(username.as_str(), &password).await {
            Ok(true) => {}
            Ok(false) => {
                info!(user = %username, conn = %self.handle.id, "login rejected");
                conn.send(LOGIN_FAILED).await?;
                return Ok(AuthOutcome::Unauthenticated);
            }
            Err(e) => {
                error!(error = %e, user = %username, "credential lookup failed");
                conn.send(STORE_FAILURE).await?;
                return Ok(AuthOutcome::Unauthenticated);
            }
        }

        if self.registry.add(&username, self.handle.clone()).is_err() {
            warn!(user = %username, conn = %self.handle.id, "login refused, name already online");
            conn.send(ALREADY_CONNECTED).await?;
            return Ok(AuthOutcome::Unauthenticated);
        }

        // The session never learns about the name if this send fails, so undo the claim here.
        if let Err(e) = conn.send(LOGIN_OK).await {
            self.registry.remove(&username);
            return Err(e);
        }

        info!(user = %username, conn = %self.handle.id, "login successful");
        Ok(AuthOutcome::Authenticated(username))
    }

    /// The registration dialogue. Never logs the new user in; returns whether an account was made.
    pub async fn register(&self, conn: &mut dyn Connection) -> ConnResult<bool> {
        let email = loop {
            conn.send(PROMPT_EMAIL).await?;
            let email = conn.recv().await?;
            let email = email.trim();

            if Account::validate_email(email).is_err() {
                conn.send(EMAIL_INVALID).await?;
                continue;
            }

            match self.auth.email_taken(email).await {
                Ok(false) => break email.to_string(),
                Ok(true) => {
                    conn.send(EMAIL_EXISTS).await?;
                    return Ok(false);
                }
                Err(e) => return self.store_failure(conn, e).await,
            }
        };

        let username = loop {
            conn.send(PROMPT_NEW_USERNAME).await?;
            let username = match Username::try_from(conn.recv().await?.as_str()) {
                Ok(username) => username,
                Err(UsernameError::Blank) => {
                    conn.send(NEW_USERNAME_BLANK).await?;
                    continue;
                }
                Err(UsernameError::ControlChar) => {
                    conn.send(NEW_USERNAME_INVALID).await?;
                    continue;
                }
            };

            match self.auth.username_taken(username.as_str()).await {
                Ok(false) => break username,
                Ok(true) => {
                    conn.send(USERNAME_EXISTS).await?;
                    continue;
                }
                Err(e) => return self.store_failure(conn, e).await,
            }
        };

        let password = AuthService::generate_password();
        match self.auth.create_account(&email, username.as_str(), &password).await {
            Ok(_) => {
                info!(user = %username, "account registered");
                conn.send(&format!(
                    "Registration successful. Your username is '{username}' and your password is '{password}'."
                ))
                .await?;
                Ok(true)
            }
            // lost a race against a concurrent registration
            Err(DomainError::Store(StoreError::Duplicate("email"))) => {
                conn.send(EMAIL_EXISTS).await?;
                Ok(false)
            }
            Err(DomainError::Store(StoreError::Duplicate(_))) => {
                conn.send(USERNAME_EXISTS).await?;
                Ok(false)
            }
            Err(e) => self.store_failure(conn, e).await,
        }
    }

    async fn store_failure(&self, conn: &mut dyn Connection, e: DomainError) -> ConnResult<bool> {
        error!(error = %e, conn = %self.handle.id, "registration failed");
        conn.send(STORE_FAILURE).await?;
        Ok(false)
    }
}
