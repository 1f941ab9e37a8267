//! Search, filter and ordering over a listing set.
//!
//! Everything here is pure: callers pass in the listings the viewer is
//! already allowed to see.

use std::cmp::Ordering;

use bizdir_core::models::listing::Listing;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Insertion order.
    #[default]
    Default,
    NameAsc,
    NameDesc,
    /// Most recently created first.
    Newest,
}

/// Browse criteria. Empty `categories` / `locations` mean "all".
#[derive(Debug, Clone)]
pub struct ListingQuery {
    /// Case-insensitive substring matched against name, description,
    /// category, location and tags.
    pub text: Option<String>,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    /// When false, the viewer's own private listings are hidden as well.
    pub include_private: bool,
    pub sort: SortOrder,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            text: None,
            categories: Vec::new(),
            locations: Vec::new(),
            include_private: true,
            sort: SortOrder::Default,
        }
    }
}

impl ListingQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if !self.include_private && listing.is_private() {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(&listing.category) {
            return false;
        }
        if !self.locations.is_empty() && !self.locations.contains(&listing.location) {
            return false;
        }
        match self.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => matches_text(listing, &text.to_lowercase()),
            _ => true,
        }
    }

    /// Filter then order.
    pub fn apply(&self, listings: Vec<Listing>) -> Vec<Listing> {
        let filtered: Vec<Listing> = listings.into_iter().filter(|l| self.matches(l)).collect();
        sort_listings(filtered, self.sort)
    }
}

fn matches_text(listing: &Listing, needle: &str) -> bool {
    [
        &listing.name,
        &listing.description,
        &listing.category,
        &listing.location,
    ]
    .into_iter()
    .chain(listing.tags.iter())
    .any(|field| field.to_lowercase().contains(needle))
}

pub fn sort_listings(mut listings: Vec<Listing>, order: SortOrder) -> Vec<Listing> {
    match order {
        SortOrder::Default => listings,
        SortOrder::NameAsc => {
            listings.sort_by(compare_names);
            listings
        }
        SortOrder::NameDesc => {
            listings.sort_by(|a, b| compare_names(b, a));
            listings
        }
        SortOrder::Newest => newest_first(listings),
    }
}

fn compare_names(a: &Listing, b: &Listing) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Order by creation time, newest first. Listings created at the same
/// instant keep reverse insertion order, so the later one still wins.
pub fn newest_first(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.reverse();
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    listings
}

/// Only what `viewer` is allowed to read, in insertion order.
pub fn visible_to(listings: &[Listing], viewer: Option<Uuid>) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| l.is_visible_to(viewer))
        .cloned()
        .collect()
}
