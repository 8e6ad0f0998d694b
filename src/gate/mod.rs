//! Route guarding for staff-only content.
//!
//! The gate owns no authentication state. It observes a snapshot from an
//! injected provider once per render, classifies it, and produces a
//! render outcome plus (for the rejected states) a declarative redirect
//! through an injected navigator. Hosts re-invoke `render` whenever the
//! provider's state changes.

use serde_json::Value;

/// Route unauthenticated visitors are sent to when no other route is
/// given to the gate.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Opaque claims blob for an authenticated staff session. Owned by the
/// external auth provider; the gate only consumes presence/absence.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffIdentity(Value);

impl StaffIdentity {
    pub fn new(claims: Value) -> Self {
        Self(claims)
    }

    pub fn claims(&self) -> &Value {
        &self.0
    }
}

/// Snapshot of the external auth provider at one render.
#[derive(Debug, Clone, Default)]
pub struct AuthStatus {
    pub identity: Option<StaffIdentity>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Authentication status source. Implementations wrap whatever session
/// machinery the host runs; tests substitute a fixed snapshot.
pub trait AuthProvider {
    fn status(&self) -> AuthStatus;
}

/// Navigation primitive. `replace` asks the host to replace the current
/// history entry rather than push a new one.
pub trait Navigator {
    fn navigate(&self, route: &str, replace: bool);
}

/// The four states a snapshot can classify into. Dispatch is exhaustive
/// so a new state cannot go silently unhandled.
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    Loading,
    Errored(String),
    Unauthenticated,
    Authenticated,
}

impl GateState {
    /// Classify one snapshot. Precedence: an in-flight check beats a
    /// stale error, which beats whatever identity is present.
    pub fn classify(status: &AuthStatus) -> Self {
        if status.loading {
            return GateState::Loading;
        }
        if let Some(message) = &status.error {
            return GateState::Errored(message.clone());
        }
        match status.identity {
            Some(_) => GateState::Authenticated,
            None => GateState::Unauthenticated,
        }
    }
}

/// Structural description of the placeholder shown while the auth check
/// is in flight. Purely presentational; hosts decide how to paint it.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub header: bool,
    pub content_rows: usize,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self { header: true, content_rows: 3 }
    }
}

/// What the gate asks the host to render for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<C> {
    /// Placeholder while the check is in flight
    Skeleton(Skeleton),
    /// Error text, observable only until the issued redirect lands
    ErrorNotice(String),
    /// Nothing; the redirect has been issued
    Empty,
    /// The wrapped content, passed through unmodified
    Content(C),
}

impl<C> Rendered<C> {
    pub fn is_content(&self) -> bool {
        matches!(self, Rendered::Content(_))
    }
}

/// Wrapper that gates child content on staff authentication.
pub struct AccessGate {
    login_route: String,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_ROUTE)
    }
}

impl AccessGate {
    pub fn new(login_route: impl Into<String>) -> Self {
        Self { login_route: login_route.into() }
    }

    /// Evaluate one render pass.
    ///
    /// Loading renders the skeleton and touches nothing else. An error
    /// renders its message AND issues a replace-redirect in the same
    /// pass; whether the text is ever visible depends on how fast the
    /// host navigates. A missing identity redirects without error text.
    /// An authenticated snapshot passes `children` through unwrapped and
    /// never navigates.
    pub fn render<C>(&self, auth: &dyn AuthProvider, nav: &dyn Navigator, children: C) -> Rendered<C> {
        match GateState::classify(&auth.status()) {
            GateState::Loading => Rendered::Skeleton(Skeleton::default()),
            GateState::Errored(message) => {
                nav.navigate(&self.login_route, true);
                Rendered::ErrorNotice(message)
            }
            GateState::Unauthenticated => {
                nav.navigate(&self.login_route, true);
                Rendered::Empty
            }
            GateState::Authenticated => Rendered::Content(children),
        }
    }
}
