//! Listing (business) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_reference: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    /// Whether `viewer` (the signed-in account id, if any) may read this
    /// listing. Private listings are readable only by their owner.
    pub fn is_visible_to(&self, viewer: Option<Uuid>) -> bool {
        match self.visibility {
            Visibility::Public => true,
            Visibility::Private => viewer == Some(self.owner_id),
        }
    }
}

/// Input for creating a listing. The owner is taken from the active
/// session, never from the caller.
#[derive(Debug, Clone, Default)]
pub struct CreateListing {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub tags: Vec<String>,
    pub logo_reference: Option<String>,
    pub visibility: Visibility,
}

/// Shallow patch: `None` leaves a field untouched.
///
/// Optional fields use `Some(Some(val))` = set, `Some(None)` = clear.
#[derive(Debug, Clone, Default)]
pub struct UpdateListing {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub website: Option<Option<String>>,
    pub contact_email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub logo_reference: Option<Option<String>>,
    pub visibility: Option<Visibility>,
}

impl UpdateListing {
    pub fn visibility(visibility: Visibility) -> Self {
        Self {
            visibility: Some(visibility),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(visibility: Visibility, owner_id: Uuid) -> Listing {
        let now = Utc::now();
        Listing {
            id: Uuid::new_v4(),
            owner_id,
            name: "TechNova Solutions".into(),
            description: "Enterprise software and analytics".into(),
            category: "Technology".into(),
            location: "San Francisco, CA".into(),
            website: None,
            contact_email: None,
            phone: None,
            tags: vec!["AI".into()],
            logo_reference: None,
            visibility,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn public_listing_is_visible_to_everyone() {
        let owner = Uuid::new_v4();
        let l = listing(Visibility::Public, owner);
        assert!(l.is_visible_to(None));
        assert!(l.is_visible_to(Some(Uuid::new_v4())));
        assert!(l.is_visible_to(Some(owner)));
    }

    #[test]
    fn private_listing_is_visible_only_to_owner() {
        let owner = Uuid::new_v4();
        let l = listing(Visibility::Private, owner);
        assert!(!l.is_visible_to(None));
        assert!(!l.is_visible_to(Some(Uuid::new_v4())));
        assert!(l.is_visible_to(Some(owner)));
    }

    #[test]
    fn missing_optional_fields_deserialize_with_defaults() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "ownerId": Uuid::new_v4(),
            "name": "Green Earth",
            "description": "Environmental consulting",
            "category": "Consulting",
            "location": "Portland, OR",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });

        let l: Listing = serde_json::from_value(json).unwrap();
        assert_eq!(l.visibility, Visibility::Public);
        assert!(l.tags.is_empty());
        assert!(l.website.is_none());
    }
}
