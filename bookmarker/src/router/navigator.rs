use std::fmt::Display;

use async_trait::async_trait;

use super::errors::RouterError;
use super::guard::{DenyReason, GuardOptions, NavigationDecision, SessionSnapshot, evaluate};
use super::location::Location;
use super::route::Route;

/// Upper bound on redirect hops within a single navigation.
pub const MAX_REDIRECTS: usize = 10;

/// What the navigator needs from the session side.
///
/// The refreshes run strictly in order (CSRF token, then user data) and only
/// when a navigation lands on a different route name than the current one.
/// If they change the session, the navigation is decided again from its
/// original target.
#[async_trait]
pub trait NavigationHooks: Send {
    type Error: Display + Send;

    fn session(&self) -> SessionSnapshot;

    /// Called for every hop, including redirects, so the last hop is
    /// available as the pending route.
    fn record_route(&mut self, location: &Location);

    async fn refresh_csrf_token(&mut self) -> Result<(), Self::Error>;

    async fn refresh_user_data(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentRoute {
    pub route: Route,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// Where the navigation ended.
    pub location: Location,
    pub route: Route,
    /// Hops that were redirected away from, in order.
    pub redirects: Vec<Location>,
    /// Whether the session refreshes ran.
    pub refreshed: bool,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    options: GuardOptions,
    current: Option<CurrentRoute>,
    max_redirects: usize,
}

impl Navigator {
    pub fn new(options: GuardOptions) -> Self {
        Self {
            options,
            current: None,
            max_redirects: MAX_REDIRECTS,
        }
    }

    pub fn options(&self) -> &GuardOptions {
        &self.options
    }

    pub fn current(&self) -> Option<&CurrentRoute> {
        self.current.as_ref()
    }

    pub async fn navigate<H: NavigationHooks>(
        &mut self,
        target: Location,
        hooks: &mut H,
    ) -> Result<NavigationOutcome, RouterError> {
        let mut redirects = Vec::new();
        let mut refreshed = false;
        let origin = target.clone();
        let mut location = target;

        loop {
            location = self.follow_redirects(location, hooks, &mut redirects)?;

            let Some(route) = Route::resolve(location.path(), self.options.share_links) else {
                return Err(RouterError::Denied {
                    target: location.to_string(),
                    reason: DenyReason::NotFound,
                });
            };

            let previous = self.current.as_ref().and_then(|c| c.route.name());
            let changed = previous != route.name();

            tracing::debug!(
                "Entering {} ({}), previous: {:?}",
                location,
                route.name().map_or("-", |n| n.as_str()),
                previous
            );
            self.current = Some(CurrentRoute {
                route: route.clone(),
                location: location.clone(),
            });

            if !changed {
                return Ok(NavigationOutcome {
                    location,
                    route,
                    redirects,
                    refreshed,
                });
            }

            let before = hooks.session();
            refresh_session(hooks).await;
            refreshed = true;

            if hooks.session() == before {
                return Ok(NavigationOutcome {
                    location,
                    route,
                    redirects,
                    refreshed,
                });
            }

            // The refreshed session may decide the original target differently,
            // e.g. a persisted "authenticated" flag whose server session expired.
            tracing::info!(
                "Session changed while entering {}, re-evaluating {}",
                location,
                origin
            );
            redirects.push(location);
            if redirects.len() > self.max_redirects {
                return Err(RouterError::TooManyRedirects {
                    target: origin.to_string(),
                    limit: self.max_redirects,
                });
            }
            location = origin.clone();
        }
    }

    fn follow_redirects<H: NavigationHooks>(
        &self,
        mut location: Location,
        hooks: &mut H,
        redirects: &mut Vec<Location>,
    ) -> Result<Location, RouterError> {
        loop {
            hooks.record_route(&location);
            match evaluate(&location, &hooks.session(), &self.options) {
                NavigationDecision::Allow => return Ok(location),
                NavigationDecision::RedirectTo(next) => {
                    tracing::debug!("Redirecting {} -> {}", location, next);
                    redirects.push(location);
                    if redirects.len() > self.max_redirects {
                        return Err(RouterError::TooManyRedirects {
                            target: next.to_string(),
                            limit: self.max_redirects,
                        });
                    }
                    location = next;
                }
                NavigationDecision::Deny(reason) => {
                    tracing::debug!("Navigation to {} denied: {:?}", location, reason);
                    return Err(RouterError::Denied {
                        target: location.to_string(),
                        reason,
                    });
                }
            }
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(GuardOptions::default())
    }
}

async fn refresh_session<H: NavigationHooks>(hooks: &mut H) {
    if let Err(e) = hooks.refresh_csrf_token().await {
        tracing::warn!("CSRF token refresh failed: {}", e);
    }
    if let Err(e) = hooks.refresh_user_data().await {
        tracing::debug!("User data refresh failed: {}", e);
    }
}
