//! Navigation guard for routes that depend on the session.

use echo_config::Config;

/// Access level a route declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteAccess {
    #[default]
    Public,
    /// Only reachable with a credential.
    RequiresAuth,
    /// Only reachable without one (login, register).
    RequiresGuest,
}

/// Outcome of [`check_route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

/// Entry points used for redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub login: String,
    pub home: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Routes {
    fn from(config: &Config) -> Self {
        Self {
            login: config.login_route.clone(),
            home: config.home_route.clone(),
        }
    }
}

/// Decide whether navigation to a route with `access` may proceed.
pub fn check_route(access: RouteAccess, is_authenticated: bool, routes: &Routes) -> GuardDecision {
    match access {
        RouteAccess::RequiresAuth if !is_authenticated => {
            GuardDecision::Redirect(routes.login.clone())
        }
        RouteAccess::RequiresGuest if is_authenticated => {
            GuardDecision::Redirect(routes.home.clone())
        }
        _ => GuardDecision::Proceed,
    }
}
