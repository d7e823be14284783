use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use super::storage::{SessionStorage, TOKEN_KEY, USER_ID_KEY};
use super::token;

/// Source of the current instant for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

impl From<bool> for AuthState {
    fn from(authenticated: bool) -> Self {
        if authenticated {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }
}

/// Snapshot of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub is_authenticated: bool,
}

impl Credential {
    pub fn state(&self) -> AuthState {
        self.is_authenticated.into()
    }

    /// Expiry of the held token, if it decodes.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.as_deref().and_then(token::expires_at)
    }
}

/// Exclusive owner of the credential. Every mutation writes through to
/// storage before memory changes.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    clock: Arc<dyn Clock>,
    credential: Credential,
}

impl SessionStore {
    /// Hydrate the credential from storage.
    pub fn initialize(storage: Box<dyn SessionStorage>, clock: Arc<dyn Clock>) -> Result<Self> {
        let token = storage.get(TOKEN_KEY)?;
        let user_id = storage.get(USER_ID_KEY)?;
        let is_authenticated = !token::is_expired_at(token.as_deref(), clock.now());
        debug!(
            has_token = token.is_some(),
            has_user = user_id.is_some(),
            is_authenticated,
            "Session initialized"
        );

        Ok(Self {
            storage,
            clock,
            credential: Credential {
                token,
                user_id,
                is_authenticated,
            },
        })
    }

    pub fn set_token(&mut self, token: &str) -> Result<()> {
        self.storage.set(TOKEN_KEY, token)?;
        self.credential.is_authenticated = !token::is_expired_at(Some(token), self.clock.now());
        self.credential.token = Some(token.to_string());
        debug!(is_authenticated = self.credential.is_authenticated, "Token set");
        Ok(())
    }

    pub fn set_user(&mut self, user_id: &str) -> Result<()> {
        self.storage.set(USER_ID_KEY, user_id)?;
        self.credential.user_id = Some(user_id.to_string());
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_ID_KEY)?;
        self.credential = Credential::default();
        info!("Session cleared");
        Ok(())
    }

    /// Re-check the token against the clock and refresh the cached flag.
    pub fn is_authenticated(&mut self) -> bool {
        let valid = !token::is_expired_at(self.credential.token.as_deref(), self.clock.now());
        if self.credential.is_authenticated && !valid {
            info!("Session token expired");
        }
        self.credential.is_authenticated = valid;
        valid
    }

    /// The token to present, only while it is still valid.
    pub fn bearer_token(&mut self) -> Option<String> {
        if self.is_authenticated() {
            self.credential.token.clone()
        } else {
            None
        }
    }

    /// Last computed state, without re-checking expiry.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

/// Shared handle over the single `SessionStore`.
///
/// Clones share the store and the state channel, so every consumer sees the
/// same transitions. The lock is never held across network IO.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<Mutex<SessionStore>>,
    state_tx: Arc<watch::Sender<AuthState>>,
}

impl SessionContext {
    pub fn new(store: SessionStore) -> Self {
        let (state_tx, _) = watch::channel(store.credential().state());
        Self {
            store: Arc::new(Mutex::new(store)),
            state_tx: Arc::new(state_tx),
        }
    }

    /// Build a context from storage using the system clock.
    pub fn initialize(storage: Box<dyn SessionStorage>) -> Result<Self> {
        Ok(Self::new(SessionStore::initialize(storage, Arc::new(SystemClock))?))
    }

    /// Observe authentication transitions.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    pub async fn set_token(&self, token: &str) -> Result<()> {
        let mut store = self.store.lock().await;
        store.set_token(token)?;
        self.publish(store.credential().state());
        Ok(())
    }

    pub async fn set_user(&self, user_id: &str) -> Result<()> {
        self.store.lock().await.set_user(user_id)
    }

    pub async fn clear(&self) -> Result<()> {
        let mut store = self.store.lock().await;
        store.clear()?;
        self.publish(AuthState::Unauthenticated);
        Ok(())
    }

    pub async fn is_authenticated(&self) -> bool {
        let mut store = self.store.lock().await;
        let valid = store.is_authenticated();
        self.publish(valid.into());
        valid
    }

    pub async fn bearer_token(&self) -> Option<String> {
        let mut store = self.store.lock().await;
        let token = store.bearer_token();
        self.publish(token.is_some().into());
        token
    }

    /// Current credential, re-checked against the clock.
    pub async fn snapshot(&self) -> Credential {
        let mut store = self.store.lock().await;
        let valid = store.is_authenticated();
        self.publish(valid.into());
        store.credential().clone()
    }

    pub async fn user_id(&self) -> Option<String> {
        self.store.lock().await.credential().user_id.clone()
    }

    fn publish(&self, state: AuthState) {
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use chrono::{DateTime, Duration, Utc};

    use super::Clock;

    /// Clock that only moves when told to.
    pub struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }
}
