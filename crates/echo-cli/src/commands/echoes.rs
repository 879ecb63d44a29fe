//! Echo wall commands.

use super::require_auth;
use crate::app::App;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use echo_http::HttpError;
use echo_types::Echo;

fn print_echoes(app: &App, echoes: &[Echo], heading: &str, format: &OutputFormat) {
    if format.is_json() {
        output::print_json(&echoes);
        return;
    }
    output::print_heading(heading);
    if echoes.is_empty() {
        println!("  (none)");
        return;
    }
    for echo in echoes {
        let emotion = echo
            .emotion_tag
            .as_deref()
            .map(|tag| {
                format!(
                    "[{} / {}] ",
                    app.echoes.emotion_label(tag),
                    app.echoes.emotion_type(tag)
                )
            })
            .unwrap_or_default();
        let matched = if echo.is_matched { " (matched)" } else { "" };
        println!("  {} {}{}{}", echo.id, emotion, echo.content, matched);
    }
}

fn report_failure(app: &App, error: &HttpError, format: &OutputFormat) {
    let message = app
        .echoes
        .error()
        .unwrap_or_else(|| error.user_message("Request failed"));
    output::print_error(&message, format);
}

/// Labels are best effort; a failed catalog load only affects display.
async fn load_catalog(app: &App) {
    if let Err(e) = app.echoes.fetch_emotion_tags().await {
        tracing::debug!(error = %e, "Emotion catalog unavailable");
    }
}

/// Post an echo.
pub async fn echoes_post(
    app: &App,
    content: &str,
    emotion: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }
    match app.echoes.create_echo(content, emotion).await {
        Ok(echo) => {
            load_catalog(app).await;
            print_echoes(app, std::slice::from_ref(&echo), "Echo sent", format);
        }
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// List the caller's echoes.
pub async fn echoes_mine(app: &App, format: &OutputFormat) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }
    load_catalog(app).await;
    match app.echoes.fetch_mine().await {
        Ok(echoes) => {
            let heading = format!(
                "Your echoes ({} matched, {} waiting)",
                app.echoes.matched_echoes().len(),
                app.echoes.unmatched_echoes().len()
            );
            print_echoes(app, &echoes, &heading, format);
        }
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// List the caller's matches.
pub async fn echoes_matches(app: &App, format: &OutputFormat) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }
    match app.echoes.fetch_matches().await {
        Ok(matches) => {
            if format.is_json() {
                output::print_json(&matches);
                return Ok(());
            }
            output::print_heading(&format!("Matches ({})", app.echoes.match_count()));
            for m in &matches {
                let theirs = m
                    .matched_echo
                    .as_ref()
                    .map(|e| e.content.as_str())
                    .unwrap_or("(hidden)");
                println!("  {} <-> {}: {}", m.echo_id, m.matched_echo_id, theirs);
            }
        }
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// Show recent echoes.
pub async fn echoes_recent(app: &App, limit: Option<u32>, format: &OutputFormat) -> Result<()> {
    load_catalog(app).await;
    match app.echoes.fetch_recent(limit).await {
        Ok(echoes) => print_echoes(app, &echoes, "Recent echoes", format),
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// List emotion tags.
pub async fn echoes_emotions(app: &App, format: &OutputFormat) -> Result<()> {
    match app.echoes.fetch_emotion_tags().await {
        Ok(tags) => {
            if format.is_json() {
                output::print_json(&tags);
                return Ok(());
            }
            output::print_heading("Emotions");
            for tag in &tags {
                output::print_row(&tag.value, &format!("{} ({})", tag.label, tag.kind));
            }
        }
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}

/// Pair two echoes.
pub async fn echoes_match(
    app: &App,
    echo_id: &str,
    matched_echo_id: &str,
    format: &OutputFormat,
) -> Result<()> {
    if !require_auth(app, format) {
        return Ok(());
    }
    match app.echoes.create_manual_match(echo_id, matched_echo_id).await {
        Ok(response) => output::print_success(
            &format!("{} ({} matches)", response.message, app.echoes.match_count()),
            format,
        ),
        Err(e) => report_failure(app, &e, format),
    }
    Ok(())
}
