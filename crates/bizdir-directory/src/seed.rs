//! Sample listings for an empty directory.

use bizdir_core::error::{DirectoryError, DirectoryResult};
use bizdir_core::models::account::CreateAccount;
use bizdir_core::models::listing::{CreateListing, Visibility};
use bizdir_core::repository::KeyValueStore;
use tracing::{info, warn};

use crate::service::DirectoryStore;

fn sample(
    name: &str,
    description: &str,
    category: &str,
    location: &str,
    visibility: Visibility,
    tags: &[&str],
) -> CreateListing {
    CreateListing {
        name: name.into(),
        description: description.into(),
        category: category.into(),
        location: location.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        visibility,
        ..Default::default()
    }
}

pub fn sample_listings() -> Vec<CreateListing> {
    use Visibility::{Private, Public};
    vec![
        sample(
            "TechNova Solutions",
            "Leading provider of innovative software solutions for enterprise businesses, specializing in AI-driven analytics and cloud infrastructure.",
            "Technology",
            "San Francisco, CA",
            Public,
            &["Software", "AI", "Cloud"],
        ),
        sample(
            "Green Earth Consulting",
            "Environmental consulting firm helping businesses implement sustainable practices and reduce their carbon footprint through practical strategies.",
            "Consulting",
            "Portland, OR",
            Public,
            &["Sustainability", "Environment", "Green"],
        ),
        sample(
            "Horizon Financial",
            "Comprehensive financial services for startups and growing businesses, offering tailored solutions for funding, investment, and financial planning.",
            "Finance",
            "New York, NY",
            Public,
            &["Investment", "Planning", "Funding"],
        ),
        sample(
            "Artemis Healthcare",
            "Innovative healthcare provider focused on telemedicine and digital health solutions for patients and healthcare professionals worldwide.",
            "Healthcare",
            "Boston, MA",
            Private,
            &["Telemedicine", "Digital Health"],
        ),
        sample(
            "GlobalTrade Partners",
            "International trade facilitation services specializing in logistics, customs clearance, and supply chain management for businesses of all sizes.",
            "Logistics",
            "Miami, FL",
            Public,
            &["Import", "Export", "Logistics"],
        ),
        sample(
            "Quantum Manufacturing",
            "Precision manufacturing company producing high-quality components for aerospace, automotive, and electronics industries with advanced technologies.",
            "Manufacturing",
            "Detroit, MI",
            Public,
            &["Precision", "Components", "Advanced"],
        ),
        sample(
            "EcoEnergy Solutions",
            "Renewable energy solutions provider helping businesses transition to sustainable energy sources with solar, wind, and energy storage solutions.",
            "Energy",
            "Austin, TX",
            Public,
            &["Renewable", "Solar", "Sustainable"],
        ),
        sample(
            "DigitalX Marketing",
            "Full-service digital marketing agency specializing in SEO, content marketing, social media, and PPC campaigns for growing businesses.",
            "Marketing",
            "Chicago, IL",
            Private,
            &["Digital", "SEO", "Content"],
        ),
    ]
}

/// Populate an empty directory with [`sample_listings`], owned by
/// `owner` (registered if new, signed in otherwise). The seeding
/// session is signed out afterwards.
///
/// Skipped when the directory already has listings or someone is
/// signed in. Returns the number of listings added.
pub async fn seed_samples<K: KeyValueStore>(
    directory: &DirectoryStore<K>,
    owner: CreateAccount,
) -> DirectoryResult<usize> {
    let session = directory.session();
    if session.is_authenticated() {
        warn!("Skipping sample listings: a session is active");
        return Ok(0);
    }
    if !directory.list_all().await?.is_empty() {
        return Ok(0);
    }

    let email = owner.email.clone();
    let password = owner.password.clone();
    match session.register(owner).await {
        Ok(_) => {}
        Err(DirectoryError::DuplicateEmail { .. }) => {
            session.login(&email, &password).await?;
        }
        Err(e) => return Err(e),
    }

    let mut added = 0;
    let mut outcome = Ok(());
    for listing in sample_listings() {
        if let Err(e) = directory.add_listing(listing).await {
            outcome = Err(e);
            break;
        }
        added += 1;
    }
    session.logout().await;
    outcome?;

    info!(added, "Seeded sample listings");
    Ok(added)
}
