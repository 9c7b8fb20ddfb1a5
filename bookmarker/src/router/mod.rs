//! Navigation guard and controller.
//!
//! [`evaluate`] is a pure decision over a target location and the current
//! session; [`Navigator`] drives it, follows redirects and triggers the
//! session refreshes through [`NavigationHooks`].

mod errors;
mod guard;
mod location;
mod navigator;
mod redirect;
mod route;

pub use errors::RouterError;
pub use guard::{DenyReason, GuardOptions, NavigationDecision, SessionSnapshot, evaluate};
pub use location::Location;
pub use navigator::{CurrentRoute, MAX_REDIRECTS, NavigationHooks, NavigationOutcome, Navigator};
pub use redirect::{post_login_target, post_logout_target, post_register_target};
pub use route::{Route, RouteName};
