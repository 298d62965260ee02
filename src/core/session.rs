//! Client-side session lifecycle.
//!
//! A [`SessionManager`] holds the current [`Session`] of one client, publishes every change
//! on a [`watch`] channel and can keep the session alive with a background refresh task.
//! It is an explicit object: create one per client and pass it where it is needed.

use crate::{
    core::auth::{AuthBackend, Session},
    errors::{Error, Result},
};
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

/// Default period between automatic refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// What caused the latest state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// State was seeded through [`SessionManager::initialize`]
    Initialized,
    /// A sign-in succeeded
    SignedIn,
    /// The session's expiry was extended
    TokenRefreshed,
    /// The session ended, explicitly or by expiring
    SignedOut,
}

/// Snapshot published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Current session, if signed in
    pub session: Option<Session>,
    /// Event that produced this snapshot
    pub last_event: SessionEvent,
}

/// Owns one client's session and its refresh task.
#[derive(Debug)]
pub struct SessionManager<B: AuthBackend> {
    backend: Arc<B>,
    state: Arc<watch::Sender<SessionState>>,
    refresh_interval: Duration,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl<B: AuthBackend> SessionManager<B> {
    /// Creates a signed-out manager.
    pub fn new(backend: Arc<B>, refresh_interval: Duration) -> Self {
        let (state, _) = watch::channel(SessionState {
            session: None,
            last_event: SessionEvent::SignedOut,
        });
        Self {
            backend,
            state: Arc::new(state),
            refresh_interval,
            refresh_task: Mutex::new(None),
        }
    }

    /// Seeds the state with a previously persisted session, or none.
    pub fn initialize(&self, session: Option<Session>) {
        self.state.send_replace(SessionState {
            session,
            last_event: SessionEvent::Initialized,
        });
    }

    /// Receives every future state change. The current state is visible immediately.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The session right now, if any.
    pub fn current(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    /// Signs in through the backend and publishes [`SessionEvent::SignedIn`].
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let session = self.backend.sign_in(email, password).await?;
        self.state.send_replace(SessionState {
            session: Some(session.clone()),
            last_event: SessionEvent::SignedIn,
        });
        Ok(session)
    }

    /// Ends the current session.
    ///
    /// Local state is cleared and [`SessionEvent::SignedOut`] published even when the
    /// backend call fails; that failure is still returned.
    pub async fn sign_out(&self) -> Result<()> {
        let token = self.state.borrow().session.as_ref().map(|s| s.token.clone());
        let result = match token {
            Some(token) => self.backend.sign_out(&token).await,
            None => Ok(()),
        };
        self.state.send_replace(SessionState {
            session: None,
            last_event: SessionEvent::SignedOut,
        });
        result
    }

    /// Refreshes the current session once. Returns `Ok(None)` when signed out.
    pub async fn refresh(&self) -> Result<Option<Session>> {
        refresh_once(self.backend.as_ref(), &self.state).await
    }

    /// Starts refreshing every `refresh_interval`, replacing any running refresh task.
    ///
    /// The first refresh happens one interval from now. A tick that finds no session does
    /// nothing; a failed refresh is logged and retried at the next tick.
    pub fn start_auto_refresh(&self) {
        let backend = Arc::clone(&self.backend);
        let state = Arc::clone(&self.state);
        let period = self.refresh_interval.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match refresh_once(backend.as_ref(), &state).await {
                    Ok(Some(session)) => {
                        debug!(expires_at = %session.expires_at, "Auto-refreshed session");
                    }
                    Ok(None) => {}
                    Err(Error::SessionExpired | Error::Unauthorized) => {
                        info!("Session ended during auto-refresh");
                    }
                    Err(e) => warn!(error = %e, "Session refresh failed; retrying at next tick"),
                }
            }
        });

        let mut slot = self
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Stops the refresh task. The last published state stays readable.
    pub fn teardown(&self) {
        let mut slot = self
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
            debug!("Stopped session auto-refresh");
        }
    }
}

impl<B: AuthBackend> Drop for SessionManager<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn refresh_once<B: AuthBackend>(
    backend: &B,
    state: &watch::Sender<SessionState>,
) -> Result<Option<Session>> {
    let token = state.borrow().session.as_ref().map(|s| s.token.clone());
    let Some(token) = token else {
        return Ok(None);
    };

    match backend.refresh(&token).await {
        Ok(session) => {
            // A sign-out or new sign-in while the call was in flight wins
            state.send_if_modified(|current| {
                if current.session.as_ref().map(|s| s.token.as_str()) != Some(token.as_str()) {
                    return false;
                }
                current.session = Some(session.clone());
                current.last_event = SessionEvent::TokenRefreshed;
                true
            });
            Ok(Some(session))
        }
        Err(e @ (Error::SessionExpired | Error::Unauthorized)) => {
            state.send_if_modified(|current| {
                if current.session.as_ref().map(|s| s.token.as_str()) != Some(token.as_str()) {
                    return false;
                }
                current.session = None;
                current.last_event = SessionEvent::SignedOut;
                true
            });
            Err(e)
        }
        Err(e) => Err(e),
    }
}
