//! crates/mindcare_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage or serialization format; the
//! service crate maps them to and from their persisted JSON documents.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::ids::EntryId;
use crate::validation::{require, ValidationError};

//=========================================================================================
// Entity contract
//=========================================================================================

/// An item stored in one of the ordered collections.
pub trait Entity {
    fn id(&self) -> EntryId;

    fn set_id(&mut self, id: EntryId);

    /// Checks the invariants that must hold whenever the entity is persisted.
    fn validate(&self) -> Result<(), ValidationError>;
}

macro_rules! impl_entity_id {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> EntryId {
                    self.id
                }

                fn set_id(&mut self, id: EntryId) {
                    self.id = id;
                }

                fn validate(&self) -> Result<(), ValidationError> {
                    self.check()
                }
            }
        )+
    };
}

//=========================================================================================
// Session
//=========================================================================================

/// The signed-in state, as seen by the navigation guard and the views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user_email: Option<String>,
    pub is_admin: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The name shown as author of posts and comments.
    pub fn display_name(&self) -> String {
        author_name(self.user_email.as_deref())
    }
}

/// The local part of an email address, or `Anonymous` when there is none.
pub fn author_name(email: Option<&str>) -> String {
    match email {
        Some(email) if !email.is_empty() => email.split('@').next().unwrap_or(email).to_string(),
        _ => ANONYMOUS.to_string(),
    }
}

pub const ANONYMOUS: &str = "Anonymous";

// Placeholder rule with no access-control value: an email mentioning "admin" sees the admin panel.
pub fn looks_like_admin(email: Option<&str>) -> bool {
    email.is_some_and(|e| e.contains("admin"))
}

//=========================================================================================
// Mood tracking
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Happy, Mood::Neutral, Mood::Sad];

    /// The stored form of the mood.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Neutral => "Neutral",
            Self::Sad => "Sad",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                field: "mood",
                value: s.to_string(),
            })
    }
}

/// A mood rating on the 1 to 10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::OutOfRange {
                field: "rating",
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
                value: i64::from(value),
            })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    /// The slider's starting position.
    fn default() -> Self {
        Self(5)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntry {
    pub id: EntryId,
    pub mood: Mood,
    pub rating: Rating,
    pub note: String,
    pub date: DateTime<Utc>,
}

impl MoodEntry {
    fn check(&self) -> Result<(), ValidationError> {
        Rating::new(self.rating.get()).map(|_| ())
    }
}

/// The mood form as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMoodEntry {
    pub mood: Mood,
    pub rating: Rating,
    pub note: String,
}

//=========================================================================================
// Journal
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: EntryId,
    pub content: String,
    pub date: NaiveDate,
}

impl JournalEntry {
    fn check(&self) -> Result<(), ValidationError> {
        require("content", &self.content)
    }
}

//=========================================================================================
// Community board
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PostCategory {
    #[default]
    General,
    AnxietySupport,
    DepressionSupport,
    StudyStress,
    WellnessTips,
    SuccessStories,
}

impl PostCategory {
    pub const ALL: [PostCategory; 6] = [
        PostCategory::General,
        PostCategory::AnxietySupport,
        PostCategory::DepressionSupport,
        PostCategory::StudyStress,
        PostCategory::WellnessTips,
        PostCategory::SuccessStories,
    ];

    /// The stored and displayed name of the category.
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::AnxietySupport => "Anxiety Support",
            Self::DepressionSupport => "Depression Support",
            Self::StudyStress => "Study Stress",
            Self::WellnessTips => "Wellness Tips",
            Self::SuccessStories => "Success Stories",
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PostCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                field: "category",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: EntryId,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityPost {
    pub id: EntryId,
    pub title: String,
    pub content: String,
    pub category: PostCategory,
    pub author: String,
    pub author_email: String,
    pub likes: u32,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl CommunityPost {
    fn check(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("content", &self.content)?;
        self.comments
            .iter()
            .try_for_each(|comment| require("comment", &comment.text))
    }
}

/// The new-post form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: PostCategory,
}

//=========================================================================================
// Counseling
//=========================================================================================

/// A bookable counseling service. Bookings keep a copy of the service as it was
/// when selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOffering {
    pub id: u64,
    pub title: String,
    pub duration: String,
    pub price: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Pending, Self::Confirmed, Self::Cancelled]
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                field: "status",
                value: s.to_string(),
            })
    }
}

/// The booking form. `date` and `time` are kept exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub reason: String,
}

impl BookingRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        require("date", &self.date)?;
        require("time", &self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounselingBooking {
    pub id: EntryId,
    pub service: ServiceOffering,
    pub request: BookingRequest,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl CounselingBooking {
    fn check(&self) -> Result<(), ValidationError> {
        require("service", &self.service.title).map_err(|_| ValidationError::ServiceNotSelected)?;
        self.request.validate()
    }
}

//=========================================================================================
// Admin-managed content
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAdminResource {
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminResource {
    pub id: EntryId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl AdminResource {
    fn check(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("category", &self.category)?;
        require("description", &self.description)?;
        require("url", &self.url)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAdminService {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminService {
    pub id: EntryId,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub price: String,
    pub created_at: DateTime<Utc>,
}

impl AdminService {
    fn check(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("duration", &self.duration)?;
        require("price", &self.price)?;
        require("description", &self.description)
    }
}

impl_entity_id!(
    MoodEntry,
    JournalEntry,
    CommunityPost,
    CounselingBooking,
    AdminResource,
    AdminService,
);

//=========================================================================================
// Profile
//=========================================================================================

/// The student's profile. Every field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub gender: String,
}
