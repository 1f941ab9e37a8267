//! Session store — registration, login, profile and account lifecycle.

use std::sync::Arc;

use bizdir_core::error::DirectoryResult;
use bizdir_core::models::account::{Account, AccountRole, CreateAccount, UpdateProfile};
use bizdir_core::models::session::{SessionEvent, SessionUser};
use bizdir_core::repository::KeyValueStore;
use bizdir_db::DurableMirror;
use chrono::Utc;
use tokio::sync::{Mutex, broadcast, watch};
use tracing::{info, warn};
use uuid::Uuid;

use crate::activity::InFlight;
use crate::config::SessionConfig;
use crate::error::AuthError;
use crate::password::{self, require};

/// Owns the registered accounts and the current session.
///
/// Generic over the key-value backend so that the identity rules have
/// no dependency on any particular storage engine. One instance per
/// process; share it behind an [`Arc`].
pub struct SessionStore<K: KeyValueStore> {
    mirror: Arc<DurableMirror<K>>,
    config: SessionConfig,
    accounts: Mutex<Vec<Account>>,
    current: watch::Sender<Option<SessionUser>>,
    events: broadcast::Sender<SessionEvent>,
    in_flight: InFlight,
}

impl<K: KeyValueStore> SessionStore<K> {
    /// Load the account set and any persisted session.
    ///
    /// A persisted session whose account no longer exists is discarded.
    pub async fn open(
        mirror: Arc<DurableMirror<K>>,
        config: SessionConfig,
    ) -> DirectoryResult<Self> {
        let accounts = mirror.load_accounts().await?;
        let persisted = mirror.load_session().await?;

        let current = match persisted {
            Some(session) => match accounts.iter().find(|a| a.id == session.id) {
                Some(account) => Some(SessionUser::from(account)),
                None => {
                    warn!(account_id = %session.id, "Discarding session for unknown account");
                    mirror.clear_session().await?;
                    None
                }
            },
            None => None,
        };

        info!(
            accounts = accounts.len(),
            signed_in = current.is_some(),
            "Session store loaded"
        );

        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Ok(Self {
            mirror,
            config,
            accounts: Mutex::new(accounts),
            current: watch::Sender::new(current),
            events,
            in_flight: InFlight::default(),
        })
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    /// The signed-in account, without its password.
    pub fn current(&self) -> Option<SessionUser> {
        self.current.borrow().clone()
    }

    pub fn current_id(&self) -> Option<Uuid> {
        self.current.borrow().as_ref().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(SessionUser::is_admin)
    }

    /// Whether the signed-in account is `account_id`.
    pub fn is_owner(&self, account_id: Uuid) -> bool {
        self.current_id() == Some(account_id)
    }

    /// The signed-in account, or [`AuthError::NotSignedIn`].
    pub fn require_current(&self) -> DirectoryResult<SessionUser> {
        self.current().ok_or_else(|| AuthError::NotSignedIn.into())
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    /// Receive every identity change from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Observe the current session; the receiver always holds the latest value.
    pub fn watch(&self) -> watch::Receiver<Option<SessionUser>> {
        self.current.subscribe()
    }

    // -----------------------------------------------------------------------
    // Identity operations
    // -----------------------------------------------------------------------

    /// Create an account and sign it in.
    pub async fn register(&self, input: CreateAccount) -> DirectoryResult<SessionUser> {
        let _busy = self.in_flight.enter();
        self.simulate_latency().await;

        require("name", &input.name)?;
        require("email", &input.email)?;
        require("password", &input.password)?;

        let mut accounts = self.accounts.lock().await;
        if accounts.iter().any(|a| a.email == input.email) {
            warn!(email = %input.email, "Registration rejected: email in use");
            return Err(AuthError::DuplicateEmail(input.email).into());
        }

        let account = Account {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            role: AccountRole::User,
            password: input.password,
            created_at: Utc::now(),
        };

        let mut next = accounts.clone();
        next.push(account.clone());
        self.mirror.save_accounts(&next).await?;
        *accounts = next;

        let user = SessionUser::from(&account);
        self.sign_in(&user).await?;

        info!(account_id = %account.id, "Account registered");
        self.notify(SessionEvent::Registered {
            account_id: account.id,
        });
        Ok(user)
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> DirectoryResult<SessionUser> {
        let _busy = self.in_flight.enter();
        self.simulate_latency().await;

        let user = {
            let accounts = self.accounts.lock().await;
            let account = accounts
                .iter()
                .find(|a| a.email == email)
                .ok_or_else(|| AuthError::UnknownEmail(email.to_string()))?;

            if !password::verify_password(password, &account.password) {
                warn!(account_id = %account.id, "Login rejected: wrong password");
                return Err(AuthError::InvalidCredentials.into());
            }
            SessionUser::from(account)
        };

        self.sign_in(&user).await?;

        info!(account_id = %user.id, "Signed in");
        self.notify(SessionEvent::LoggedIn {
            account_id: user.id,
        });
        Ok(user)
    }

    /// Clear the current session. Never fails; a failure to clear the
    /// persisted slot is logged and the in-memory session is still cleared.
    pub async fn logout(&self) {
        let previous = self.current.send_replace(None);
        if let Err(e) = self.mirror.clear_session().await {
            warn!(error = %e, "Failed to clear persisted session");
        }
        if let Some(user) = previous {
            info!(account_id = %user.id, "Signed out");
            self.notify(SessionEvent::LoggedOut {
                account_id: user.id,
            });
        }
    }

    /// Change the signed-in account's name and email.
    pub async fn update_profile(&self, input: UpdateProfile) -> DirectoryResult<SessionUser> {
        let _busy = self.in_flight.enter();
        self.simulate_latency().await;

        let session = self.require_current()?;
        require("name", &input.name)?;
        require("email", &input.email)?;

        let mut accounts = self.accounts.lock().await;
        if accounts
            .iter()
            .any(|a| a.id != session.id && a.email == input.email)
        {
            return Err(AuthError::DuplicateEmail(input.email).into());
        }

        let mut next = accounts.clone();
        let account = next
            .iter_mut()
            .find(|a| a.id == session.id)
            .ok_or_else(|| AuthError::AccountMissing(session.id.to_string()))?;
        account.name = input.name;
        account.email = input.email;
        let user = SessionUser::from(&*account);

        self.mirror.save_accounts(&next).await?;
        *accounts = next;
        self.sign_in(&user).await?;

        info!(account_id = %user.id, "Profile updated");
        self.notify(SessionEvent::ProfileUpdated {
            account_id: user.id,
        });
        Ok(user)
    }

    /// Replace the signed-in account's password.
    pub async fn change_password(&self, current: &str, next: &str) -> DirectoryResult<()> {
        let _busy = self.in_flight.enter();
        self.simulate_latency().await;

        let session = self.require_current()?;
        require("current password", current)?;
        require("new password", next)?;

        let mut accounts = self.accounts.lock().await;
        let mut updated = accounts.clone();
        let account = updated
            .iter_mut()
            .find(|a| a.id == session.id)
            .ok_or_else(|| AuthError::AccountMissing(session.id.to_string()))?;

        if !password::verify_password(current, &account.password) {
            warn!(account_id = %session.id, "Password change rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }
        password::ensure_changed(current, next)?;
        account.password = next.to_string();

        self.mirror.save_accounts(&updated).await?;
        *accounts = updated;

        info!(account_id = %session.id, "Password changed");
        Ok(())
    }

    /// Request a password reset. Simulated: nothing is sent and no
    /// state changes.
    pub async fn forgot_password(&self, email: &str) -> DirectoryResult<()> {
        let _busy = self.in_flight.enter();
        self.simulate_latency().await;

        require("email", email)?;
        info!("Password reset requested");
        Ok(())
    }

    /// Delete the signed-in account together with every listing it owns.
    ///
    /// The account set, the listing set and the session slot are written
    /// in one batch.
    pub async fn delete_account(&self) -> DirectoryResult<()> {
        let _busy = self.in_flight.enter();
        self.simulate_latency().await;

        let session = self.require_current()?;

        let mut accounts = self.accounts.lock().await;
        let remaining: Vec<Account> = accounts
            .iter()
            .filter(|a| a.id != session.id)
            .cloned()
            .collect();

        let listings = self.mirror.load_listings().await?;
        let before = listings.len();
        let kept: Vec<_> = listings
            .into_iter()
            .filter(|l| l.owner_id != session.id)
            .collect();

        self.mirror.commit_account_removal(&remaining, &kept).await?;
        *accounts = remaining;
        self.current.send_replace(None);

        info!(
            account_id = %session.id,
            listings_removed = before - kept.len(),
            "Account deleted"
        );
        self.notify(SessionEvent::AccountDeleted {
            account_id: session.id,
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn sign_in(&self, user: &SessionUser) -> DirectoryResult<()> {
        self.mirror.save_session(user).await?;
        self.current.send_replace(Some(user.clone()));
        Ok(())
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    async fn simulate_latency(&self) {
        if !self.config.simulated_latency.is_zero() {
            tokio::time::sleep(self.config.simulated_latency).await;
        }
    }
}
