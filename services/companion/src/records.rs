//! services/companion/src/records.rs
//!
//! The persisted JSON shapes of every entity, and their conversion to and from
//! the pure domain types.
//!
//! Field names follow the documents the app has always written (camelCase,
//! creation instants under `createdAt`). Converting a record into its entity is
//! the schema check at the load boundary: a record that deserializes but breaks
//! a domain invariant is rejected there.

use chrono::{DateTime, NaiveDate, Utc};
use mindcare_core::domain::{
    AdminResource, AdminService, BookingRequest, Comment, CommunityPost, CounselingBooking,
    Entity, JournalEntry, MoodEntry, Profile, Rating, ServiceOffering,
};
use mindcare_core::ids::EntryId;
use mindcare_core::validation::ValidationError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A serde shape stored as one element of an ordered collection.
pub trait Record: Serialize + DeserializeOwned {
    type Entity: Entity + Clone;

    fn into_entity(self) -> Result<Self::Entity, ValidationError>;

    fn from_entity(entity: &Self::Entity) -> Self;
}

fn checked<E: Entity>(entity: E) -> Result<E, ValidationError> {
    entity.validate()?;
    Ok(entity)
}

//=========================================================================================
// Mood entries
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodRecord {
    pub id: u64,
    pub mood: String,
    pub rating: u8,
    #[serde(default)]
    pub note: String,
    pub date: DateTime<Utc>,
}

impl Record for MoodRecord {
    type Entity = MoodEntry;

    fn into_entity(self) -> Result<MoodEntry, ValidationError> {
        checked(MoodEntry {
            id: EntryId::new(self.id),
            mood: self.mood.parse()?,
            rating: Rating::new(self.rating)?,
            note: self.note,
            date: self.date,
        })
    }

    fn from_entity(entry: &MoodEntry) -> Self {
        Self {
            id: entry.id.get(),
            mood: entry.mood.as_str().to_string(),
            rating: entry.rating.get(),
            note: entry.note.clone(),
            date: entry.date,
        }
    }
}

//=========================================================================================
// Journal entries
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalRecord {
    pub id: u64,
    pub content: String,
    pub date: NaiveDate,
}

impl Record for JournalRecord {
    type Entity = JournalEntry;

    fn into_entity(self) -> Result<JournalEntry, ValidationError> {
        checked(JournalEntry {
            id: EntryId::new(self.id),
            content: self.content,
            date: self.date,
        })
    }

    fn from_entity(entry: &JournalEntry) -> Self {
        Self {
            id: entry.id.get(),
            content: entry.content.clone(),
            date: entry.date,
        }
    }
}

//=========================================================================================
// Community posts
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: u64,
    pub author: String,
    pub text: String,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub author_email: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
}

impl Record for PostRecord {
    type Entity = CommunityPost;

    fn into_entity(self) -> Result<CommunityPost, ValidationError> {
        checked(CommunityPost {
            id: EntryId::new(self.id),
            title: self.title,
            content: self.content,
            category: self.category.parse()?,
            author: self.author,
            author_email: self.author_email,
            likes: self.likes,
            comments: self
                .comments
                .into_iter()
                .map(|c| Comment {
                    id: EntryId::new(c.id),
                    author: c.author,
                    text: c.text,
                    created_at: c.created_at,
                })
                .collect(),
            created_at: self.created_at,
        })
    }

    fn from_entity(post: &CommunityPost) -> Self {
        Self {
            id: post.id.get(),
            title: post.title.clone(),
            content: post.content.clone(),
            category: post.category.label().to_string(),
            author: post.author.clone(),
            author_email: post.author_email.clone(),
            likes: post.likes,
            comments: post
                .comments
                .iter()
                .map(|c| CommentRecord {
                    id: c.id.get(),
                    author: c.author.clone(),
                    text: c.text.clone(),
                    created_at: c.created_at,
                })
                .collect(),
            created_at: post.created_at,
        }
    }
}

//=========================================================================================
// Counseling bookings
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
}

impl From<ServiceRecord> for ServiceOffering {
    fn from(r: ServiceRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            duration: r.duration,
            price: r.price,
            description: r.description,
        }
    }
}

impl From<&ServiceOffering> for ServiceRecord {
    fn from(s: &ServiceOffering) -> Self {
        Self {
            id: s.id,
            title: s.title.clone(),
            duration: s.duration.clone(),
            price: s.price.clone(),
            description: s.description.clone(),
        }
    }
}

/// The form fields sit at the top level of the document, next to `service`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: u64,
    pub service: ServiceRecord,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default = "pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

fn pending() -> String {
    "Pending".to_string()
}

impl Record for BookingRecord {
    type Entity = CounselingBooking;

    fn into_entity(self) -> Result<CounselingBooking, ValidationError> {
        checked(CounselingBooking {
            id: EntryId::new(self.id),
            service: self.service.into(),
            request: BookingRequest {
                name: self.name,
                email: self.email,
                phone: self.phone,
                date: self.date,
                time: self.time,
                reason: self.reason,
            },
            status: self.status.parse()?,
            created_at: self.created_at,
        })
    }

    fn from_entity(booking: &CounselingBooking) -> Self {
        let request = &booking.request;
        Self {
            id: booking.id.get(),
            service: (&booking.service).into(),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            date: request.date.clone(),
            time: request.time.clone(),
            reason: request.reason.clone(),
            status: booking.status.as_str().to_string(),
            created_at: booking.created_at,
        }
    }
}

//=========================================================================================
// Admin-managed items
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResourceRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
}

impl Record for AdminResourceRecord {
    type Entity = AdminResource;

    fn into_entity(self) -> Result<AdminResource, ValidationError> {
        checked(AdminResource {
            id: EntryId::new(self.id),
            title: self.title,
            description: self.description,
            category: self.category,
            url: self.url,
            created_at: self.created_at,
        })
    }

    fn from_entity(r: &AdminResource) -> Self {
        Self {
            id: r.id.get(),
            title: r.title.clone(),
            description: r.description.clone(),
            category: r.category.clone(),
            url: r.url.clone(),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminServiceRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub price: String,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
}

impl Record for AdminServiceRecord {
    type Entity = AdminService;

    fn into_entity(self) -> Result<AdminService, ValidationError> {
        checked(AdminService {
            id: EntryId::new(self.id),
            title: self.title,
            description: self.description,
            duration: self.duration,
            price: self.price,
            created_at: self.created_at,
        })
    }

    fn from_entity(s: &AdminService) -> Self {
        Self {
            id: s.id.get(),
            title: s.title.clone(),
            description: s.description.clone(),
            duration: s.duration.clone(),
            price: s.price.clone(),
            created_at: s.created_at,
        }
    }
}

//=========================================================================================
// Profile (a single document, not a collection)
//=========================================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub gender: String,
}

impl From<ProfileRecord> for Profile {
    fn from(r: ProfileRecord) -> Self {
        Self {
            name: r.name,
            email: r.email,
            phone: r.phone,
            age: r.age,
            gender: r.gender,
        }
    }
}

impl From<&Profile> for ProfileRecord {
    fn from(p: &Profile) -> Self {
        Self {
            name: p.name.clone(),
            email: p.email.clone(),
            phone: p.phone.clone(),
            age: p.age.clone(),
            gender: p.gender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use mindcare_core::domain::{BookingStatus, Mood, PostCategory};
    use serde_json::json;

    #[test]
    fn mood_document_from_the_browser_loads() {
        let record: MoodRecord = serde_json::from_value(json!({
            "id": 1729330000000u64,
            "mood": "happy",
            "rating": 8,
            "note": "",
            "date": "2026-10-19T09:15:00.000Z"
        }))
        .unwrap();
        let entry = record.into_entity().unwrap();
        assert_eq!(entry.mood, Mood::Happy);
        assert_eq!(entry.rating.get(), 8);
        assert_eq!(entry.id, EntryId::new(1729330000000));
    }

    #[test]
    fn out_of_range_rating_is_rejected_at_load() {
        let record: MoodRecord = serde_json::from_value(json!({
            "id": 1, "mood": "sad", "rating": 11, "date": "2026-10-19T09:15:00Z"
        }))
        .unwrap();
        assert_matches!(
            record.into_entity(),
            Err(ValidationError::OutOfRange { field: "rating", .. })
        );
    }

    #[test]
    fn post_accepts_legacy_date_field_and_writes_created_at() {
        let record: PostRecord = serde_json::from_value(json!({
            "id": 7,
            "title": "Exam week",
            "content": "Any tips?",
            "category": "Study Stress",
            "author": "sam",
            "authorEmail": "sam@uni.edu",
            "likes": 2,
            "comments": [{"id": 8, "author": "jo", "text": "Breathe", "createdAt": "2026-10-19T10:00:00Z"}],
            "date": "2026-10-19T09:00:00Z"
        }))
        .unwrap();
        let post = record.into_entity().unwrap();
        assert_eq!(post.category, PostCategory::StudyStress);
        assert_eq!(post.comments.len(), 1);

        let written = serde_json::to_value(PostRecord::from_entity(&post)).unwrap();
        assert!(written.get("createdAt").is_some());
        assert_eq!(written["authorEmail"], "sam@uni.edu");
    }

    #[test]
    fn booking_flattens_form_fields_and_defaults_status() {
        let record: BookingRecord = serde_json::from_value(json!({
            "id": 3,
            "service": {"id": 1, "title": "Individual Therapy Session", "duration": "50 minutes",
                        "price": "Free for Students", "description": "One-on-one"},
            "name": "Sam", "email": "sam@uni.edu", "phone": "555-0100",
            "date": "2026-11-02", "time": "10:00", "reason": "",
            "createdAt": "2026-10-19T09:00:00Z"
        }))
        .unwrap();
        let booking = record.into_entity().unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.request.phone, "555-0100");

        let written = serde_json::to_value(BookingRecord::from_entity(&booking)).unwrap();
        assert_eq!(written["status"], "Pending");
        assert_eq!(written["service"]["title"], "Individual Therapy Session");
        assert_eq!(written["time"], "10:00");
    }

    #[test]
    fn partial_profile_fills_blanks() {
        let record: ProfileRecord = serde_json::from_value(json!({"name": "Sam"})).unwrap();
        let profile = Profile::from(record);
        assert_eq!(profile.name, "Sam");
        assert_eq!(profile.gender, "");
    }
}
