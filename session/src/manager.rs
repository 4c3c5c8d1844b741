//! Session manager: the single owner of storage, auth state and the guard.
//!
//! ARCHITECTURE
//! ============
//! One instance per page process, created at startup and handed to UI code
//! through context. Every token write goes through [`SessionStorage`], every
//! auth-state write goes through the methods here.
//!
//! CONCURRENCY
//! ===========
//! Single-threaded. Overlapping guard evaluations (two components mounting
//! in the same tick) share one in-flight identity future keyed by token, so
//! an empty auth state costs exactly one `/auth/me` call. Logout, reset and
//! a fresh login bump a generation counter; an identity result that
//! resolves under an older generation is dropped instead of being applied
//! to the newer session.

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::api::{self, IdentityApi, RequestAuth};
use crate::config::SessionConfig;
use crate::edge::{self, PathClass};
use crate::error::SessionError;
use crate::guard::{self, GuardState, Redirect};
use crate::role::Role;
use crate::state::AuthState;
use crate::storage::{CookieStore, KeyValueStore, SessionStorage};
use crate::token;
use crate::types::{LoginRequest, ProfilePatch, RegisterRequest, UserProfile};

type IdentityResult = Result<Option<UserProfile>, SessionError>;
type InflightIdentity = Shared<LocalBoxFuture<'static, IdentityResult>>;

pub struct SessionManager<A, P, C> {
    api: Rc<A>,
    storage: SessionStorage<P, C>,
    config: SessionConfig,
    state: RefCell<AuthState>,
    inflight: RefCell<Option<(String, InflightIdentity)>>,
    generation: Cell<u64>,
    initialized: Cell<bool>,
}

impl<A, P, C> SessionManager<A, P, C>
where
    A: IdentityApi + 'static,
    P: KeyValueStore,
    C: CookieStore,
{
    #[must_use]
    pub fn new(api: A, storage: SessionStorage<P, C>, config: SessionConfig) -> Self {
        Self {
            api: Rc::new(api),
            storage,
            config,
            state: RefCell::new(AuthState::default()),
            inflight: RefCell::new(None),
            generation: Cell::new(0),
            initialized: Cell::new(false),
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Reconcile the two storage locations and restore auth state from the
    /// cached profile. Runs once; later calls are no-ops until [`Self::reset`].
    pub fn init(&self) {
        if self.initialized.get() || !self.storage.is_available() {
            return;
        }
        self.initialized.set(true);
        self.storage.reconcile();

        let Some(token) = self.storage.get() else {
            return;
        };
        if self.is_expired(&token) {
            // Left for the guard, which purges and reports the expiry.
            return;
        }
        match self.storage.load_user() {
            Ok(Some(user)) => {
                tracing::debug!(user_id = user.id, "session restored from storage");
                *self.state.borrow_mut() = AuthState::authenticated(user, token);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "cached profile corrupt; clearing session");
                self.storage.clear();
            }
        }
    }

    /// Drop in-memory state and any in-flight identity fetch. Storage is
    /// left alone; the next [`Self::init`] restores from it.
    pub fn reset(&self) {
        self.bump_generation();
        *self.state.borrow_mut() = AuthState::default();
        self.initialized.set(false);
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> &SessionStorage<P, C> {
        &self.storage
    }

    /// Snapshot of the auth cache.
    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    #[must_use]
    pub fn is_supplier(&self) -> bool {
        self.role() == Some(Role::Supplier)
    }

    #[must_use]
    pub fn is_client(&self) -> bool {
        self.role() == Some(Role::Client)
    }

    // =========================================================================
    // AUTH STATE MUTATION
    // =========================================================================

    /// Cache `user` with `token` and mirror both into storage.
    pub fn set_auth(&self, user: UserProfile, token: String) {
        self.storage.set(&token);
        self.storage.save_user(&user);
        *self.state.borrow_mut() = AuthState::authenticated(user, token);
    }

    /// Merge `patch` into the cached user and re-persist it. No-op when
    /// logged out.
    pub fn update_user(&self, patch: ProfilePatch) {
        let updated = self.state.borrow_mut().update_user(patch).cloned();
        if let Some(user) = updated {
            self.storage.save_user(&user);
        }
    }

    /// End the session locally. Never calls the backend; safe to repeat.
    pub fn logout(&self) {
        self.bump_generation();
        self.clear_session();
        tracing::info!("logged out");
    }

    // =========================================================================
    // GUARD
    // =========================================================================

    /// Decide whether the page at `current_path` may render for the current
    /// session, optionally requiring `required_role`.
    pub async fn evaluate(&self, current_path: &str, required_role: Option<Role>) -> GuardState {
        if !self.storage.is_available() {
            return GuardState::Checking;
        }
        self.init();

        let Some(token) = self.storage.get() else {
            tracing::debug!(path = %current_path, "no session token");
            self.forget_cached_session();
            return GuardState::Redirecting(Redirect::login_returning_to(current_path));
        };

        if self.is_expired(&token) {
            tracing::info!(path = %current_path, "session token expired");
            self.clear_session();
            return GuardState::Redirecting(Redirect::expired());
        }

        if self.is_authenticated() && self.state.borrow().token() != Some(token.as_str()) {
            // Storage now holds a different session, e.g. written by another tab.
            tracing::debug!("stored token differs from cached session; refetching identity");
            self.forget_cached_session();
        }

        if !self.is_authenticated() {
            let generation = self.generation.get();
            let outcome = self.fetch_identity(&token).await;
            if self.generation.get() != generation {
                tracing::debug!("identity result superseded; discarding");
                return GuardState::Checking;
            }
            if let Some(redirect) = self.apply_identity(outcome, token) {
                return GuardState::Redirecting(redirect);
            }
        }

        let state = self.state.borrow();
        match state.user() {
            Some(user) if !guard::role_permits(required_role, user) => {
                tracing::debug!(role = %user.role, required = ?required_role, "role mismatch");
                GuardState::Redirecting(Redirect::Neutral)
            }
            Some(_) => GuardState::Authorized,
            None => GuardState::Checking,
        }
    }

    /// Where an already-authenticated visitor of a login/register page
    /// should be sent, if anywhere.
    #[must_use]
    pub fn auth_only_redirect(&self, current_path: &str, requested: Option<&str>) -> Option<String> {
        let rules = edge::EdgeRules::from_config(&self.config);
        if rules.classify(current_path) != PathClass::AuthOnly || !self.is_authenticated() {
            return None;
        }
        Some(guard::safe_return_path(requested))
    }

    fn apply_identity(&self, outcome: IdentityResult, token: String) -> Option<Redirect> {
        if self.is_authenticated() {
            // Another evaluation sharing the same fetch already applied it.
            return None;
        }
        let user = match outcome {
            Ok(Some(user)) => user,
            Ok(None) => {
                let Some(user) = token::fallback_profile(&token) else {
                    tracing::warn!("identity endpoint unavailable and token has no usable subject");
                    self.clear_session();
                    return Some(Redirect::login());
                };
                tracing::warn!(user_id = user.id, "identity endpoint unavailable; using token claims");
                user
            }
            Err(e) => {
                tracing::warn!(error = %e, "identity fetch failed; clearing session");
                self.clear_session();
                return Some(Redirect::login());
            }
        };
        self.set_auth(user, token);
        None
    }

    async fn fetch_identity(&self, token: &str) -> IdentityResult {
        let shared = {
            let mut slot = self.inflight.borrow_mut();
            match slot.as_ref() {
                Some((pending, fut)) if pending == token => fut.clone(),
                _ => {
                    let api = Rc::clone(&self.api);
                    let owned = token.to_owned();
                    let fut = async move { api.fetch_current_user(&owned).await }
                        .boxed_local()
                        .shared();
                    *slot = Some((token.to_owned(), fut.clone()));
                    fut
                }
            }
        };

        let outcome = shared.await;

        let mut slot = self.inflight.borrow_mut();
        if slot.as_ref().is_some_and(|(pending, _)| pending == token) {
            *slot = None;
        }
        outcome
    }

    // =========================================================================
    // LOGIN / REGISTER
    // =========================================================================

    /// Sign in and establish a session.
    ///
    /// The token is persisted before the identity lookup so navigation right
    /// after login finds a session even if `/auth/me` is slow or missing.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend error to show on the form, or
    /// [`SessionError::InvalidToken`] when neither the identity endpoint nor
    /// the token itself yields a profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        let request = LoginRequest::new(email, password)?;
        let response = self.api.login(&request).await.inspect_err(|e| {
            tracing::info!(error = %e, "login rejected");
        })?;
        let token = response.access_token;

        self.bump_generation();
        self.storage.set(&token);

        let user = match self.api.fetch_current_user(&token).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "identity fetch after login failed; using token claims");
                None
            }
        }
        .or_else(|| {
            token::fallback_profile(&token).map(|mut user| {
                user.email.clone_from(&request.email);
                user
            })
        });

        let Some(user) = user else {
            self.clear_session();
            return Err(SessionError::InvalidToken);
        };

        tracing::info!(user_id = user.id, role = %user.role, "logged in");
        self.set_auth(user.clone(), token);
        Ok(user)
    }

    /// Create an account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend error to show on the form.
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, SessionError> {
        request.validate()?;
        self.api.register(request).await
    }

    // =========================================================================
    // REQUEST POLICY
    // =========================================================================

    /// Credentials for an outgoing call to `endpoint`. An expired token is
    /// purged and the call refused; the redirect is omitted for login and
    /// register calls.
    pub fn authorize_request(&self, endpoint: &str) -> RequestAuth {
        let Some(token) = self.storage.get() else {
            return RequestAuth::Anonymous;
        };
        if self.is_expired(&token) {
            self.bump_generation();
            self.clear_session();
            let redirect = (!api::is_auth_endpoint(endpoint)).then(Redirect::expired);
            return RequestAuth::Refused { redirect };
        }
        RequestAuth::Bearer(token)
    }

    /// React to a 401 from `endpoint` while on `current_path`. Login and
    /// register failures are the form's business; anything else ends the
    /// session and, unless already on an auth page, asks for a redirect.
    pub fn handle_unauthorized(&self, endpoint: &str, current_path: &str) -> Option<Redirect> {
        if api::is_auth_endpoint(endpoint) {
            return None;
        }
        self.logout();
        let rules = edge::EdgeRules::from_config(&self.config);
        if rules.classify(current_path) == PathClass::AuthOnly {
            None
        } else {
            Some(Redirect::login_returning_to(current_path))
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn is_expired(&self, token: &str) -> bool {
        token::is_expired_at(token, token::now_millis(), self.config.expiry_buffer_ms)
    }

    fn clear_session(&self) {
        *self.state.borrow_mut() = AuthState::default();
        self.storage.clear();
    }

    /// Drop the in-memory session without touching storage.
    fn forget_cached_session(&self) {
        if self.is_authenticated() {
            self.bump_generation();
            *self.state.borrow_mut() = AuthState::default();
        }
    }

    fn bump_generation(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.inflight.borrow_mut().take();
    }
}
