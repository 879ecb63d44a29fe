//! Authentication commands.

use super::allowed;
use crate::app::App;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use echo_session::RouteAccess;
use echo_types::Identity;
use std::io::{self, Write};

fn prompt_email(email: Option<String>) -> Result<String> {
    if let Some(email) = email {
        return Ok(email.trim().to_string());
    }
    print!("Email: ");
    io::stdout().flush()?;
    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}

fn print_identity(identity: &Identity, format: &OutputFormat) {
    if format.is_json() {
        output::print_json(identity);
    } else {
        output::print_heading("Account");
        output::print_row("ID", &identity.id);
        output::print_row("Email", &identity.email);
        output::print_row("Created", &identity.created_at.to_rfc3339());
    }
}

/// Login with email and password.
pub async fn login(app: &App, email: Option<String>, format: &OutputFormat) -> Result<()> {
    if !allowed(app, RouteAccess::RequiresGuest, format) {
        return Ok(());
    }

    let email = prompt_email(email)?;
    if email.is_empty() {
        output::print_error("Email is required", format);
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(());
    }

    match app.session.login(&email, &password).await {
        Ok(identity) => {
            output::print_success(&format!("Logged in as {}", identity.email), format);
        }
        Err(e) => {
            output::print_error(&format!("Login failed: {}", e.user_message("Login failed")), format);
        }
    }
    Ok(())
}

/// Create an account.
pub async fn register(app: &App, email: Option<String>, format: &OutputFormat) -> Result<()> {
    if !allowed(app, RouteAccess::RequiresGuest, format) {
        return Ok(());
    }

    let email = prompt_email(email)?;
    if email.is_empty() {
        output::print_error("Email is required", format);
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password.is_empty() || password != confirm {
        output::print_error("Passwords are empty or do not match", format);
        return Ok(());
    }

    match app.session.register(&email, &password).await {
        Ok(identity) => {
            output::print_success(&format!("Registered and logged in as {}", identity.email), format);
        }
        Err(e) => {
            output::print_error(
                &format!("Registration failed: {}", e.user_message("Registration failed")),
                format,
            );
        }
    }
    Ok(())
}

/// Logout and clear session.
pub async fn logout(app: &App, format: &OutputFormat) -> Result<()> {
    if !app.context.is_authenticated() {
        output::print_success("Not logged in", format);
        return Ok(());
    }
    app.session.logout().await;
    output::print_success("Logged out successfully", format);
    Ok(())
}

/// Show the locally stored session without contacting the server.
pub fn status(app: &App, format: &OutputFormat) -> Result<()> {
    let session = app.context.snapshot();

    if format.is_json() {
        output::print_json(&serde_json::json!({
            "authenticated": session.is_authenticated,
            "phase": app.context.phase(),
            "user": session.identity,
        }));
        return Ok(());
    }

    output::print_heading("Session");
    output::print_row(
        "Authenticated",
        if session.is_authenticated { "yes" } else { "no" },
    );
    if let Some(identity) = &session.identity {
        output::print_row("User ID", &identity.id);
        output::print_row("Email", &identity.email);
    }
    Ok(())
}

/// Reload the signed-in user.
pub async fn whoami(app: &App, format: &OutputFormat) -> Result<()> {
    if !super::require_auth(app, format) {
        return Ok(());
    }
    match app.session.fetch_current_user().await {
        Ok(identity) => print_identity(&identity, format),
        Err(e) => output::print_error(&e.user_message("Failed to load account"), format),
    }
    Ok(())
}

/// Rotate the credential.
pub async fn refresh(app: &App, format: &OutputFormat) -> Result<()> {
    if !super::require_auth(app, format) {
        return Ok(());
    }
    match app.session.refresh_session().await {
        Ok(identity) => output::print_success(&format!("Session refreshed for {}", identity.email), format),
        Err(e) => output::print_error(&e.user_message("Failed to refresh session"), format),
    }
    Ok(())
}

/// Change the account password.
pub async fn change_password(app: &App, format: &OutputFormat) -> Result<()> {
    if !super::require_auth(app, format) {
        return Ok(());
    }

    let old_password = rpassword::prompt_password("Current password: ")?;
    let new_password = rpassword::prompt_password("New password: ")?;
    if new_password.is_empty() {
        output::print_error("New password is required", format);
        return Ok(());
    }

    match app.session.change_password(&old_password, &new_password).await {
        Ok(response) => output::print_success(&response.message, format),
        Err(e) => output::print_error(&e.user_message("Failed to change password"), format),
    }
    Ok(())
}

/// Request a password reset email.
pub async fn forgot_password(app: &App, email: &str, format: &OutputFormat) -> Result<()> {
    match app.session.request_password_reset(email).await {
        Ok(response) => output::print_success(&response.message, format),
        Err(e) => output::print_error(&e.user_message("Failed to request password reset"), format),
    }
    Ok(())
}
