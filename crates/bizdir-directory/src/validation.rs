//! Listing field rules.

use bizdir_core::error::{DirectoryError, DirectoryResult};
use bizdir_core::models::listing::Listing;

pub const NAME_MIN: usize = 2;
pub const DESCRIPTION_MIN: usize = 10;
pub const LOCATION_MIN: usize = 2;

/// Check a fully built listing (after creation or after a patch).
pub fn validate_listing(listing: &Listing) -> DirectoryResult<()> {
    min_length("name", &listing.name, NAME_MIN)?;
    min_length("description", &listing.description, DESCRIPTION_MIN)?;
    min_length("category", &listing.category, 1)?;
    min_length("location", &listing.location, LOCATION_MIN)?;

    if let Some(website) = &listing.website {
        validate_website(website)?;
    }
    if let Some(email) = &listing.contact_email {
        validate_email(email)?;
    }
    Ok(())
}

fn min_length(field: &str, value: &str, min: usize) -> DirectoryResult<()> {
    let length = value.trim().chars().count();
    if length == 0 {
        return Err(DirectoryError::missing(field));
    }
    if length < min {
        return Err(DirectoryError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(())
}

fn validate_website(url: &str) -> DirectoryResult<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(()),
        _ => Err(DirectoryError::validation(format!(
            "website must be an http(s) URL, got '{url}'"
        ))),
    }
}

fn validate_email(email: &str) -> DirectoryResult<()> {
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(DirectoryError::validation(format!(
            "contact email '{email}' is not a valid address"
        ))),
    }
}

/// Trim an optional text field; blank becomes `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim tags, drop blanks and keep the first occurrence of duplicates.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
