//! Integration tests for the directory store.

use std::sync::Arc;
use std::time::Duration;

use bizdir_auth::{SessionConfig, SessionStore};
use bizdir_core::error::DirectoryError;
use bizdir_core::models::account::CreateAccount;
use bizdir_core::models::listing::{CreateListing, UpdateListing, Visibility};
use bizdir_core::repository::{KeyValueStore, Pagination};
use bizdir_db::{DurableMirror, MemoryStore, SurrealStore, connect_in_memory};
use bizdir_directory::seed::{sample_listings, seed_samples};
use bizdir_directory::{DirectoryConfig, DirectoryStore, ListingQuery, SortOrder};
use uuid::Uuid;

fn session_config() -> SessionConfig {
    SessionConfig {
        simulated_latency: Duration::ZERO,
        ..Default::default()
    }
}

fn directory_config() -> DirectoryConfig {
    DirectoryConfig {
        simulated_latency: Duration::ZERO,
        ..Default::default()
    }
}

async fn open<K: KeyValueStore>(backend: K) -> DirectoryStore<K> {
    let mirror = Arc::new(DurableMirror::new(backend));
    let session = Arc::new(
        SessionStore::open(mirror.clone(), session_config())
            .await
            .unwrap(),
    );
    DirectoryStore::open(mirror, session, directory_config())
        .await
        .unwrap()
}

async fn setup() -> DirectoryStore<MemoryStore> {
    open(MemoryStore::new()).await
}

fn signup(name: &str, email: &str) -> CreateAccount {
    CreateAccount {
        name: name.into(),
        email: email.into(),
        password: "hunter22".into(),
    }
}

fn business(name: &str, category: &str, location: &str) -> CreateListing {
    CreateListing {
        name: name.into(),
        description: format!("{name} serves customers across the region"),
        category: category.into(),
        location: location.into(),
        ..Default::default()
    }
}

fn private(mut input: CreateListing) -> CreateListing {
    input.visibility = Visibility::Private;
    input
}

// ---------------------------------------------------------------------------
// Creation and validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_listing_requires_a_session() {
    let dir = setup().await;

    let result = dir.add_listing(business("Acme", "Retail", "Boston")).await;
    assert!(matches!(result, Err(DirectoryError::Unauthenticated)));
    assert!(dir.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn add_listing_assigns_owner_from_session() {
    let dir = setup().await;
    let alice = dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();

    let listing = dir
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();

    assert_eq!(listing.owner_id, alice.id);
    assert_eq!(listing.created_at, listing.updated_at);
    assert_eq!(dir.list_all().await.unwrap(), vec![listing]);
}

#[tokio::test]
async fn add_listing_normalizes_optional_fields_and_tags() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();

    let mut input = business("  Acme  ", "Retail", "Boston");
    input.website = Some("   ".into());
    input.tags = vec![" shoes ".into(), "shoes".into(), "".into(), "bags".into()];

    let listing = dir.add_listing(input).await.unwrap();
    assert_eq!(listing.name, "Acme");
    assert!(listing.website.is_none());
    assert_eq!(listing.tags, vec!["shoes".to_string(), "bags".to_string()]);
}

#[tokio::test]
async fn invalid_listing_is_rejected_and_not_stored() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();

    let mut short = business("Acme", "Retail", "Boston");
    short.description = "too short".into();
    assert!(matches!(
        dir.add_listing(short).await,
        Err(DirectoryError::Validation { .. })
    ));

    let mut bad_site = business("Acme", "Retail", "Boston");
    bad_site.website = Some("ftp://acme.example".into());
    assert!(matches!(
        dir.add_listing(bad_site).await,
        Err(DirectoryError::Validation { .. })
    ));

    let no_category = business("Acme", "", "Boston");
    assert!(matches!(
        dir.add_listing(no_category).await,
        Err(DirectoryError::MissingInput { .. })
    ));

    assert!(dir.list_all().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[tokio::test]
async fn owner_can_update_listing() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();
    let listing = dir
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();

    let patch = UpdateListing {
        name: Some("Acme Outlet".into()),
        phone: Some(Some("555-0100".into())),
        ..Default::default()
    };
    let updated = dir.update_listing(listing.id, patch).await.unwrap();

    assert_eq!(updated.id, listing.id);
    assert_eq!(updated.owner_id, listing.owner_id);
    assert_eq!(updated.name, "Acme Outlet");
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    assert_eq!(updated.description, listing.description);
    assert_eq!(updated.created_at, listing.created_at);
    assert!(updated.updated_at >= listing.updated_at);
}

#[tokio::test]
async fn non_owner_update_is_rejected_and_leaves_listing_unchanged() {
    let dir = setup().await;
    let session = dir.session();
    session.register(signup("Alice", "alice@example.com")).await.unwrap();
    let listing = dir
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();
    session.logout().await;

    session.register(signup("Bob", "bob@example.com")).await.unwrap();
    let patch = UpdateListing {
        name: Some("Hijacked".into()),
        ..Default::default()
    };
    let result = dir.update_listing(listing.id, patch).await;
    assert!(matches!(result, Err(DirectoryError::Unauthorized { .. })));

    let stored = dir.list_all().await.unwrap();
    assert_eq!(stored, vec![listing]);
}

#[tokio::test]
async fn non_owner_delete_is_rejected() {
    let dir = setup().await;
    let session = dir.session();
    session.register(signup("Alice", "alice@example.com")).await.unwrap();
    let listing = dir
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();
    session.logout().await;
    session.register(signup("Bob", "bob@example.com")).await.unwrap();

    let result = dir.delete_listing(listing.id).await;
    assert!(matches!(result, Err(DirectoryError::Unauthorized { .. })));
    assert_eq!(dir.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_unknown_listing_is_not_found() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();

    let result = dir
        .update_listing(Uuid::new_v4(), UpdateListing::default())
        .await;
    assert!(matches!(result, Err(DirectoryError::NotFound { .. })));
}

#[tokio::test]
async fn writes_without_session_are_unauthenticated() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();
    let listing = dir
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();
    dir.session().logout().await;

    assert!(matches!(
        dir.delete_listing(listing.id).await,
        Err(DirectoryError::Unauthenticated)
    ));
    assert!(matches!(
        dir.set_visibility(listing.id, Visibility::Private).await,
        Err(DirectoryError::Unauthenticated)
    ));
}

#[tokio::test]
async fn owner_can_delete_listing() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();
    let keep = dir
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();
    let gone = dir
        .add_listing(business("Bolt", "Hardware", "Denver"))
        .await
        .unwrap();

    dir.delete_listing(gone.id).await.unwrap();

    assert_eq!(dir.list_all().await.unwrap(), vec![keep]);
    assert!(matches!(
        dir.delete_listing(gone.id).await,
        Err(DirectoryError::NotFound { .. })
    ));
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[tokio::test]
async fn private_listing_is_hidden_from_other_viewers() {
    let dir = setup().await;
    let session = dir.session();
    session.register(signup("Alice", "alice@example.com")).await.unwrap();
    let hidden = dir
        .add_listing(private(business("Artemis", "Healthcare", "Boston")))
        .await
        .unwrap();
    let shown = dir
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();

    assert_eq!(dir.list_visible().await.unwrap().len(), 2);
    assert_eq!(dir.get_listing(hidden.id).await.unwrap(), hidden);

    session.logout().await;
    assert_eq!(dir.list_visible().await.unwrap(), vec![shown.clone()]);
    assert!(matches!(
        dir.get_listing(hidden.id).await,
        Err(DirectoryError::Unauthorized { .. })
    ));
    assert_eq!(dir.get_listing(shown.id).await.unwrap(), shown);
    assert!(matches!(
        dir.get_listing(Uuid::new_v4()).await,
        Err(DirectoryError::NotFound { .. })
    ));

    // The raw view still holds both.
    assert_eq!(dir.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn set_visibility_toggles_listing() {
    let dir = setup().await;
    let session = dir.session();
    session.register(signup("Alice", "alice@example.com")).await.unwrap();
    let listing = dir
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();

    let hidden = dir
        .set_visibility(listing.id, Visibility::Private)
        .await
        .unwrap();
    assert!(hidden.is_private());
    assert!(dir.featured().await.unwrap().is_empty());

    let shown = dir
        .set_visibility(listing.id, Visibility::Public)
        .await
        .unwrap();
    assert!(!shown.is_private());
    assert_eq!(dir.featured().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_owned_includes_private_and_excludes_others() {
    let dir = setup().await;
    let session = dir.session();
    session.register(signup("Alice", "alice@example.com")).await.unwrap();
    let a1 = dir
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();
    let a2 = dir
        .add_listing(private(business("Artemis", "Healthcare", "Boston")))
        .await
        .unwrap();
    session.logout().await;

    assert!(matches!(
        dir.list_owned().await,
        Err(DirectoryError::Unauthenticated)
    ));

    session.register(signup("Bob", "bob@example.com")).await.unwrap();
    dir.add_listing(business("Bolt", "Hardware", "Denver"))
        .await
        .unwrap();
    session.logout().await;

    session.login("alice@example.com", "hunter22").await.unwrap();
    assert_eq!(dir.list_owned().await.unwrap(), vec![a1, a2]);
}

// ---------------------------------------------------------------------------
// Featured
// ---------------------------------------------------------------------------

#[tokio::test]
async fn featured_is_public_newest_first_and_capped() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();
    for name in ["One", "Two", "Three", "Four", "Five", "Six"] {
        dir.add_listing(business(name, "Retail", "Boston"))
            .await
            .unwrap();
    }
    dir.add_listing(private(business("Secret", "Retail", "Boston")))
        .await
        .unwrap();

    let featured = dir.featured().await.unwrap();
    let names: Vec<&str> = featured.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Six", "Five", "Four", "Three"]);
    assert!(featured.iter().all(|l| !l.is_private()));

    assert_eq!(dir.get_featured(10).await.unwrap().len(), 6);
    assert!(dir.get_featured(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn private_listing_is_never_featured_even_for_owner() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();
    dir.add_listing(private(business("Artemis", "Healthcare", "Boston")))
        .await
        .unwrap();

    assert!(dir.featured().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Browse
// ---------------------------------------------------------------------------

#[tokio::test]
async fn browse_searches_filters_and_pages() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();
    for i in 0..10 {
        dir.add_listing(business(&format!("Shop {i:02}"), "Retail", "Boston"))
            .await
            .unwrap();
    }
    let mut tagged = business("Bolt", "Hardware", "Denver");
    tagged.tags = vec!["Tools".into()];
    dir.add_listing(tagged).await.unwrap();
    dir.session().logout().await;

    let first = dir.browse_page(&ListingQuery::default(), 1).await.unwrap();
    assert_eq!(first.items.len(), 8);
    assert_eq!(first.total, 11);
    assert_eq!(first.total_pages(), 2);

    let second = dir.browse_page(&ListingQuery::default(), 2).await.unwrap();
    assert_eq!(second.items.len(), 3);

    let by_tag = dir
        .browse(&ListingQuery::search("tools"), Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_tag.total, 1);
    assert_eq!(by_tag.items[0].name, "Bolt");

    let query = ListingQuery {
        locations: vec!["Boston".into()],
        sort: SortOrder::NameDesc,
        ..Default::default()
    };
    let boston = dir.browse(&query, Pagination::page(1, 3)).await.unwrap();
    assert_eq!(boston.total, 10);
    let names: Vec<&str> = boston.items.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Shop 09", "Shop 08", "Shop 07"]);
}

#[tokio::test]
async fn browse_hides_own_private_when_asked() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();
    dir.add_listing(private(business("Artemis", "Healthcare", "Boston")))
        .await
        .unwrap();
    dir.add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();

    let all = dir
        .browse(&ListingQuery::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 2);

    let public_only = ListingQuery {
        include_private: false,
        ..Default::default()
    };
    let result = dir.browse(&public_only, Pagination::default()).await.unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].name, "Acme");
}

#[tokio::test]
async fn categories_are_distinct_and_respect_visibility() {
    let dir = setup().await;
    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();
    dir.add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();
    dir.add_listing(business("Bolt", "Retail", "Denver"))
        .await
        .unwrap();
    dir.add_listing(private(business("Artemis", "Healthcare", "Boston")))
        .await
        .unwrap();

    assert_eq!(
        dir.categories().await.unwrap(),
        vec!["Healthcare".to_string(), "Retail".to_string()]
    );

    dir.session().logout().await;
    assert_eq!(dir.categories().await.unwrap(), vec!["Retail".to_string()]);
}

// ---------------------------------------------------------------------------
// Account deletion and persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deleting_account_removes_its_listings_from_directory() {
    let dir = setup().await;
    let session = dir.session();

    session.register(signup("Bob", "bob@example.com")).await.unwrap();
    let bobs = dir
        .add_listing(business("Bolt", "Hardware", "Denver"))
        .await
        .unwrap();
    session.logout().await;

    let alice = session.register(signup("Alice", "alice@example.com")).await.unwrap();
    dir.add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();
    dir.add_listing(private(business("Artemis", "Healthcare", "Boston")))
        .await
        .unwrap();

    session.delete_account().await.unwrap();

    let remaining = dir.list_all().await.unwrap();
    assert!(remaining.iter().all(|l| l.owner_id != alice.id));
    assert_eq!(remaining, vec![bobs]);
}

#[tokio::test]
async fn listings_survive_restart() {
    let backend = MemoryStore::new();
    let first = open(backend.clone()).await;
    first
        .session()
        .register(signup("Alice", "alice@example.com"))
        .await
        .unwrap();
    let listing = first
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();
    drop(first);

    let second = open(backend).await;
    assert!(second.session().is_authenticated());
    assert_eq!(second.list_all().await.unwrap(), vec![listing]);
}

#[tokio::test]
async fn directory_over_surreal_backend() {
    let db = connect_in_memory("test", "directory").await.unwrap();
    let dir = open(SurrealStore::new(db)).await;

    dir.session().register(signup("Alice", "alice@example.com")).await.unwrap();
    let listing = dir
        .add_listing(business("Acme", "Retail", "Boston"))
        .await
        .unwrap();
    let hidden = dir
        .set_visibility(listing.id, Visibility::Private)
        .await
        .unwrap();

    assert_eq!(dir.list_all().await.unwrap(), vec![hidden]);

    dir.session().delete_account().await.unwrap();
    assert!(dir.list_all().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Loading flag and seed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn is_loading_while_write_in_flight() {
    let mirror = Arc::new(DurableMirror::new(MemoryStore::new()));
    let session = Arc::new(
        SessionStore::open(mirror.clone(), session_config())
            .await
            .unwrap(),
    );
    let config = DirectoryConfig {
        simulated_latency: Duration::from_millis(50),
        ..Default::default()
    };
    let dir = DirectoryStore::open(mirror, session.clone(), config)
        .await
        .unwrap();
    session.register(signup("Alice", "alice@example.com")).await.unwrap();

    assert!(!dir.is_loading());
    let (added, observed) = tokio::join!(
        dir.add_listing(business("Acme", "Retail", "Boston")),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            dir.is_loading()
        }
    );
    added.unwrap();
    assert!(observed);
    assert!(!dir.is_loading());
}

#[tokio::test]
async fn seed_populates_empty_directory_once() {
    let dir = setup().await;
    let owner = signup("Sample Owner", "samples@example.com");

    let added = seed_samples(&dir, owner.clone()).await.unwrap();
    assert_eq!(added, sample_listings().len());
    assert!(!dir.session().is_authenticated());

    // Anonymous viewers see only the public samples.
    let visible = dir.list_visible().await.unwrap();
    assert_eq!(visible.len(), 6);
    assert_eq!(dir.featured().await.unwrap().len(), 4);

    let again = seed_samples(&dir, owner).await.unwrap();
    assert_eq!(again, 0);
    assert_eq!(dir.list_all().await.unwrap().len(), 8);
}
