//! Time capsule commands.

use super::require_auth;
use crate::app::App;
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use echo_http::HttpError;
use echo_types::{timestamp, CapsuleDraft, CapsulePatch, CapsuleStatus, MessageResponse, TimeCapsule};

/// Arguments of `capsules create`.
pub struct NewCapsule {
    pub title: String,
    pub content: String,
    pub unlock_date: Option<String>,
    pub unlock_condition: Option<String>,
    pub public: bool,
}

fn print_capsules(capsules: &[TimeCapsule], heading: &str, format: &OutputFormat) {
    if format.is_json() {
        output::print_json(&capsules);
        return;
    }
    output::print_heading(heading);
    if capsules.is_empty() {
        println!("  (none)");
        return;
    }
    for capsule in capsules {
        let gate = match (&capsule.unlock_date, &capsule.unlock_condition) {
            (Some(date), _) => format!("opens {}", date.format("%Y-%m-%d")),
            (None, Some(condition)) => format!("opens when: {}", condition),
            (None, None) => String::new(),
        };
        println!("  {:<38} {:<9} {} {}", capsule.id, capsule.status, capsule.title, gate);
    }
}

fn print_capsule(app: &App, capsule: &TimeCapsule, format: &OutputFormat) {
    if format.is_json() {
        output::print_json(capsule);
        return;
    }
    output::print_heading(&capsule.title);
    output::print_row("ID", &capsule.id);
    output::print_row("Status", capsule.status.as_str());
    output::print_row("Public", if capsule.is_public { "yes" } else { "no" });
    if let Some(date) = &capsule.unlock_date {
        output::print_row("Unlock date", &date.to_rfc3339());
    }
    if let Some(condition) = &capsule.unlock_condition {
        output::print_row("Condition", condition);
    }
    output::print_row(
        "Can unlock",
        if app.capsules.can_unlock(capsule) { "yes" } else { "no" },
    );
    if capsule.status != CapsuleStatus::Locked {
        println!();
        println!("{}", capsule.content);
    }
}

fn report_message(response: &MessageResponse, format: &OutputFormat) {
    if response.confirmed() {
        output::print_success(&response.message, format);
    } else {
        output::print_error(&response.message, format);
    }
}

fn report_failure(app: &App, error: &HttpError, format: &OutputFormat) {
    let message = app
        .capsules
        .error()
        .unwrap_or_else(|| error.user_message("Request failed"));
    output::print_error(&message, format);
}

/// List the caller's capsules.
pub async fn capsules_list(
    app: &App,
    status: Option<CapsuleStatus>,
    format: &OutputFormat,
) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }
    match app.capsules.fetch_mine(status).await {
        Ok(capsules) => {
            let heading = format!(
                "Your capsules ({} total, {} locked, {} unlocked)",
                app.capsules.my_capsule_count(),
                app.capsules.locked_capsules().len(),
                app.capsules.unlocked_capsules().len()
            );
            print_capsules(&capsules, &heading, format);
        }
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// List the public feed.
pub async fn capsules_public(app: &App, format: &OutputFormat) -> Result<()> {
    match app.capsules.fetch_public().await {
        Ok(capsules) => print_capsules(&capsules, "Public capsules", format),
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// Show one capsule.
pub async fn capsules_show(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }
    match app.capsules.fetch_one(id).await {
        Ok(capsule) => print_capsule(app, &capsule, format),
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// Create a capsule.
pub async fn capsules_create(app: &App, args: NewCapsule, format: &OutputFormat) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }

    let mut draft = CapsuleDraft::new(args.title, args.content).public(args.public);
    if let Some(raw) = args.unlock_date.as_deref() {
        match timestamp::parse(raw) {
            Some(date) => draft = draft.unlock_on(date),
            None => bail!("Unrecognized unlock date: {}", raw),
        }
    }
    if let Some(condition) = args.unlock_condition {
        draft = draft.unlock_when(condition);
    }

    match app.capsules.create(&draft).await {
        Ok(capsule) => print_capsule(app, &capsule, format),
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// Edit a capsule's title or content.
pub async fn capsules_update(
    app: &App,
    id: &str,
    title: Option<String>,
    content: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }

    let patch = CapsulePatch {
        title,
        content,
        ..Default::default()
    };
    if patch.is_empty() {
        output::print_error("Nothing to update; pass --title or --content", format);
        return Ok(());
    }

    match app.capsules.update(id, &patch).await {
        Ok(capsule) => print_capsule(app, &capsule, format),
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// Unlock a capsule.
pub async fn capsules_unlock(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }
    match app.capsules.unlock(id).await {
        Ok(response) => report_message(&response, format),
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// Publish a capsule.
pub async fn capsules_publish(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }
    match app.capsules.publish(id).await {
        Ok(response) => report_message(&response, format),
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// Delete a capsule.
pub async fn capsules_delete(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }
    match app.capsules.delete(id).await {
        Ok(response) => output::print_success(&response.message, format),
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}
