//! Directory store — listing CRUD with owner and visibility rules.

use std::collections::BTreeSet;
use std::sync::Arc;

use bizdir_auth::SessionStore;
use bizdir_auth::activity::InFlight;
use bizdir_core::error::{DirectoryError, DirectoryResult};
use bizdir_core::models::listing::{CreateListing, Listing, UpdateListing, Visibility};
use bizdir_core::models::session::{SessionEvent, SessionUser};
use bizdir_core::repository::{KeyValueStore, PaginatedResult, Pagination};
use bizdir_db::DurableMirror;
use chrono::Utc;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{Mutex, broadcast};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::DirectoryConfig;
use crate::query::{self, ListingQuery};
use crate::validation::{normalize_optional, normalize_tags, validate_listing};

/// Owns the listing set.
///
/// Every write re-derives the caller from the [`SessionStore`]; no
/// operation takes an owner id from its caller.
pub struct DirectoryStore<K: KeyValueStore> {
    mirror: Arc<DurableMirror<K>>,
    session: Arc<SessionStore<K>>,
    config: DirectoryConfig,
    listings: Mutex<Vec<Listing>>,
    session_events: Mutex<broadcast::Receiver<SessionEvent>>,
    in_flight: InFlight,
}

impl<K: KeyValueStore> DirectoryStore<K> {
    /// Load the listing set and start following session events.
    pub async fn open(
        mirror: Arc<DurableMirror<K>>,
        session: Arc<SessionStore<K>>,
        config: DirectoryConfig,
    ) -> DirectoryResult<Self> {
        let session_events = session.subscribe();
        let listings = mirror.load_listings().await?;

        info!(listings = listings.len(), "Directory store loaded");

        Ok(Self {
            mirror,
            session,
            config,
            listings: Mutex::new(listings),
            session_events: Mutex::new(session_events),
            in_flight: InFlight::default(),
        })
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn session(&self) -> &Arc<SessionStore<K>> {
        &self.session
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Every listing held in memory, private ones included.
    ///
    /// This is the raw internal view; use [`list_visible`](Self::list_visible)
    /// or [`browse`](Self::browse) for anything shown to a viewer.
    pub async fn list_all(&self) -> DirectoryResult<Vec<Listing>> {
        self.sync_with_session().await?;
        Ok(self.listings.lock().await.clone())
    }

    /// Public listings plus the viewer's own private ones.
    pub async fn list_visible(&self) -> DirectoryResult<Vec<Listing>> {
        self.sync_with_session().await?;
        let listings = self.listings.lock().await;
        Ok(query::visible_to(&listings, self.session.current_id()))
    }

    /// Look up one listing as the current viewer.
    pub async fn get_listing(&self, id: Uuid) -> DirectoryResult<Listing> {
        self.sync_with_session().await?;
        let listings = self.listings.lock().await;
        let listing = listings
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| DirectoryError::not_found("listing", id))?;

        if !listing.is_visible_to(self.session.current_id()) {
            return Err(DirectoryError::unauthorized("this listing is private"));
        }
        Ok(listing.clone())
    }

    /// The signed-in account's listings, private ones included.
    pub async fn list_owned(&self) -> DirectoryResult<Vec<Listing>> {
        let caller = self.session.require_current()?;
        self.sync_with_session().await?;
        let listings = self.listings.lock().await;
        Ok(listings
            .iter()
            .filter(|l| l.owner_id == caller.id)
            .cloned()
            .collect())
    }

    /// Distinct categories among the listings the viewer can see.
    pub async fn categories(&self) -> DirectoryResult<Vec<String>> {
        let visible = self.list_visible().await?;
        let categories: BTreeSet<String> = visible.into_iter().map(|l| l.category).collect();
        Ok(categories.into_iter().collect())
    }

    /// Search, filter, order and page the listings visible to the viewer.
    pub async fn browse(
        &self,
        query: &ListingQuery,
        pagination: Pagination,
    ) -> DirectoryResult<PaginatedResult<Listing>> {
        let visible = self.list_visible().await?;
        Ok(PaginatedResult::slice(query.apply(visible), pagination))
    }

    /// [`browse`](Self::browse) with the configured page size. Pages start at 1.
    pub async fn browse_page(
        &self,
        query: &ListingQuery,
        page: u64,
    ) -> DirectoryResult<PaginatedResult<Listing>> {
        self.browse(query, Pagination::page(page, self.config.page_size))
            .await
    }

    /// Up to `limit` public listings, newest first.
    pub async fn get_featured(&self, limit: usize) -> DirectoryResult<Vec<Listing>> {
        self.sync_with_session().await?;
        let public: Vec<Listing> = self
            .listings
            .lock()
            .await
            .iter()
            .filter(|l| l.visibility == Visibility::Public)
            .cloned()
            .collect();

        let mut featured = query::newest_first(public);
        featured.truncate(limit);
        Ok(featured)
    }

    /// [`get_featured`](Self::get_featured) with the configured limit.
    pub async fn featured(&self) -> DirectoryResult<Vec<Listing>> {
        self.get_featured(self.config.featured_limit).await
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create a listing owned by the signed-in account.
    pub async fn add_listing(&self, input: CreateListing) -> DirectoryResult<Listing> {
        let _busy = self.in_flight.enter();
        self.simulate_latency().await;

        let caller = self.session.require_current()?;
        self.sync_with_session().await?;

        let now = Utc::now();
        let listing = Listing {
            id: Uuid::new_v4(),
            owner_id: caller.id,
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            category: input.category.trim().to_string(),
            location: input.location.trim().to_string(),
            website: normalize_optional(input.website),
            contact_email: normalize_optional(input.contact_email),
            phone: normalize_optional(input.phone),
            tags: normalize_tags(input.tags),
            logo_reference: normalize_optional(input.logo_reference),
            visibility: input.visibility,
            created_at: now,
            updated_at: now,
        };
        validate_listing(&listing)?;

        let mut listings = self.listings.lock().await;
        let mut next = listings.clone();
        next.push(listing.clone());
        self.mirror.save_listings(&next).await?;
        *listings = next;

        info!(
            listing_id = %listing.id,
            account_id = %caller.id,
            private = listing.is_private(),
            "Listing added"
        );
        Ok(listing)
    }

    /// Shallow-merge `patch` into a listing owned by the signed-in account.
    pub async fn update_listing(
        &self,
        id: Uuid,
        patch: UpdateListing,
    ) -> DirectoryResult<Listing> {
        let _busy = self.in_flight.enter();
        self.simulate_latency().await;

        let caller = self.session.require_current()?;
        self.sync_with_session().await?;

        let mut listings = self.listings.lock().await;
        let index = owned_index(&listings, id, &caller, "update")?;

        let mut updated = listings[index].clone();
        apply_patch(&mut updated, patch);
        updated.updated_at = Utc::now();
        validate_listing(&updated)?;

        let mut next = listings.clone();
        next[index] = updated.clone();
        self.mirror.save_listings(&next).await?;
        *listings = next;

        info!(listing_id = %id, account_id = %caller.id, "Listing updated");
        Ok(updated)
    }

    /// Owner-only visibility toggle.
    pub async fn set_visibility(
        &self,
        id: Uuid,
        visibility: Visibility,
    ) -> DirectoryResult<Listing> {
        self.update_listing(id, UpdateListing::visibility(visibility))
            .await
    }

    /// Remove a listing owned by the signed-in account.
    pub async fn delete_listing(&self, id: Uuid) -> DirectoryResult<()> {
        let _busy = self.in_flight.enter();
        self.simulate_latency().await;

        let caller = self.session.require_current()?;
        self.sync_with_session().await?;

        let mut listings = self.listings.lock().await;
        let index = owned_index(&listings, id, &caller, "delete")?;

        let mut next = listings.clone();
        next.remove(index);
        self.mirror.save_listings(&next).await?;
        *listings = next;

        info!(listing_id = %id, account_id = %caller.id, "Listing deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Apply session events received since the last call. Account
    /// deletion removes that account's listings from memory; the
    /// durable set was already rewritten by the session store.
    async fn sync_with_session(&self) -> DirectoryResult<()> {
        let mut events = self.session_events.lock().await;
        loop {
            match events.try_recv() {
                Ok(SessionEvent::AccountDeleted { account_id }) => {
                    let mut listings = self.listings.lock().await;
                    let before = listings.len();
                    listings.retain(|l| l.owner_id != account_id);
                    info!(
                        account_id = %account_id,
                        dropped = before - listings.len(),
                        "Dropped listings of deleted account"
                    );
                }
                Ok(_) => {}
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(missed, "Session events lagged, reloading listings");
                    let reloaded = self.mirror.load_listings().await?;
                    *self.listings.lock().await = reloaded;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
            }
        }
    }

    async fn simulate_latency(&self) {
        if !self.config.simulated_latency.is_zero() {
            tokio::time::sleep(self.config.simulated_latency).await;
        }
    }
}

/// Position of listing `id`, provided `caller` owns it.
fn owned_index(
    listings: &[Listing],
    id: Uuid,
    caller: &SessionUser,
    action: &str,
) -> DirectoryResult<usize> {
    let index = listings
        .iter()
        .position(|l| l.id == id)
        .ok_or_else(|| DirectoryError::not_found("listing", id))?;

    if listings[index].owner_id != caller.id {
        warn!(
            listing_id = %id,
            account_id = %caller.id,
            action,
            "Rejected write by non-owner"
        );
        return Err(DirectoryError::unauthorized(format!(
            "not allowed to {action} this listing"
        )));
    }
    Ok(index)
}

/// Patch fields overwrite, everything else is kept. Id, owner and
/// creation time are not patchable.
fn apply_patch(listing: &mut Listing, patch: UpdateListing) {
    if let Some(name) = patch.name {
        listing.name = name.trim().to_string();
    }
    if let Some(description) = patch.description {
        listing.description = description.trim().to_string();
    }
    if let Some(category) = patch.category {
        listing.category = category.trim().to_string();
    }
    if let Some(location) = patch.location {
        listing.location = location.trim().to_string();
    }
    if let Some(website) = patch.website {
        listing.website = normalize_optional(website);
    }
    if let Some(contact_email) = patch.contact_email {
        listing.contact_email = normalize_optional(contact_email);
    }
    if let Some(phone) = patch.phone {
        listing.phone = normalize_optional(phone);
    }
    if let Some(tags) = patch.tags {
        listing.tags = normalize_tags(tags);
    }
    if let Some(logo_reference) = patch.logo_reference {
        listing.logo_reference = normalize_optional(logo_reference);
    }
    if let Some(visibility) = patch.visibility {
        listing.visibility = visibility;
    }
}
