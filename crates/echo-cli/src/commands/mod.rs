//! CLI command implementations.

mod auth;
mod capsules;
mod echoes;

pub use auth::{
    change_password, forgot_password, login, logout, refresh, register, status, whoami,
};
pub use capsules::{
    capsules_create, capsules_delete, capsules_list, capsules_public, capsules_publish,
    capsules_show, capsules_unlock, capsules_update, NewCapsule,
};
pub use echoes::{
    echoes_emotions, echoes_match, echoes_matches, echoes_mine, echoes_post, echoes_recent,
};

use crate::app::App;
use crate::output::{self, OutputFormat};
use echo_session::{GuardDecision, RouteAccess};

/// Check the route guard before running a command.
///
/// Prints where the user should go instead and returns false when the
/// command may not run in the current session state.
fn allowed(app: &App, access: RouteAccess, format: &OutputFormat) -> bool {
    match app.context.check_route(access) {
        GuardDecision::Proceed => true,
        GuardDecision::Redirect(route) if route == app.context.routes().login => {
            output::print_error("Not logged in. Run 'echo login' first", format);
            false
        }
        GuardDecision::Redirect(_) => {
            let who = app
                .context
                .identity()
                .map(|i| i.email)
                .unwrap_or_else(|| "unknown".to_string());
            output::print_success(&format!("Already logged in as {}", who), format);
            false
        }
    }
}

fn require_auth(app: &App, format: &OutputFormat) -> bool {
    allowed(app, RouteAccess::RequiresAuth, format)
}
