//! Account commands: login, signup, forgot-password, logout and theme.

use anyhow::{anyhow, Result};

use super::ui::{error, password_input, status, text_input};
use crate::api::AuthApi;
use crate::store::KeyValueStore;
use crate::views::{HeaderView, LoginView, SignupView};

/// Prompt for whatever credentials were not given on the command line.
/// Returns None if a prompt was cancelled.
fn collect_credentials(username: Option<String>) -> Result<Option<(String, String)>> {
    let username = match username {
        Some(u) => u,
        None => match text_input("username: ", None)? {
            Some(u) => u,
            None => return Ok(None),
        },
    };
    let Some(password) = password_input("password: ")? else {
        return Ok(None);
    };
    Ok(Some((username, password)))
}

/// Log in and store the session token.
pub fn run_login<A: AuthApi, S: KeyValueStore>(
    api: A,
    store: S,
    username: Option<String>,
) -> Result<()> {
    let Some((username, password)) = collect_credentials(username)? else {
        return Ok(());
    };

    let mut view = LoginView::new(api, store);
    view.username = username;
    view.password = password;

    if view.login()? {
        status("Logged in.");
        Ok(())
    } else {
        Err(anyhow!(view.error().unwrap_or("Login failed.").to_string()))
    }
}

/// Create an account. Signup does not log in.
pub fn run_signup<A: AuthApi>(api: A, username: Option<String>) -> Result<()> {
    let Some((username, password)) = collect_credentials(username)? else {
        return Ok(());
    };

    let mut view = SignupView::new(api);
    view.username = username;
    view.password = password;

    if view.signup() {
        status("Account created. Log in with 'notecmd login'.");
        Ok(())
    } else {
        Err(anyhow!(view.error().unwrap_or("Signup failed.").to_string()))
    }
}

/// Request a password reset link.
pub fn run_forgot_password<A: AuthApi, S: KeyValueStore>(
    api: A,
    store: S,
    email: Option<String>,
) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => match text_input("email: ", None)? {
            Some(e) => e,
            None => return Ok(()),
        },
    };

    let mut view = LoginView::new(api, store);
    view.show_forgot_password();
    if let Some(field) = view.forgot_email_mut() {
        *field = email;
    }

    let notice = view.submit_forgot_password();
    if notice.is_success() {
        status(notice.message());
        Ok(())
    } else {
        Err(anyhow!(notice.to_string()))
    }
}

pub fn run_logout<S: KeyValueStore>(store: S) -> Result<()> {
    let mut header = HeaderView::mount(store)?;
    if !header.is_authenticated() {
        status("Not logged in.");
        return Ok(());
    }
    header.logout()?;
    status("Logged out.");
    Ok(())
}

/// Set the dark-mode preference, or flip it when no value is given.
pub fn run_theme<S: KeyValueStore>(store: S, dark: Option<bool>) -> Result<()> {
    let mut header = HeaderView::mount(store)?;
    let enabled = match dark {
        Some(on) => {
            header.set_dark_mode(on)?;
            on
        }
        None => header.toggle_dark_mode()?,
    };
    status(if enabled { "Dark mode on." } else { "Dark mode off." });
    Ok(())
}

/// Print the login state the way the header shows it.
pub fn print_session<S: KeyValueStore>(store: S) -> Result<()> {
    let header = HeaderView::mount(store)?;
    if header.is_authenticated() {
        status("Logged in.");
    } else {
        error("Not logged in. Run 'notecmd login'.");
    }
    Ok(())
}
