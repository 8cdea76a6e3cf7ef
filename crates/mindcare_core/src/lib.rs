pub mod assessment;
pub mod catalog;
pub mod domain;
pub mod ids;
pub mod ports;
pub mod stats;
pub mod validation;

pub use assessment::{score, score_total, AnswerSheet, AssessmentResult, Band};
pub use domain::{
    AdminResource, AdminService, BookingRequest, BookingStatus, Comment, CommunityPost,
    CounselingBooking, Entity, JournalEntry, Mood, MoodEntry, NewAdminResource, NewAdminService,
    NewMoodEntry, NewPost, PostCategory, Profile, Rating, ServiceOffering, Session,
};
pub use ids::EntryId;
pub use ports::{KeyValueStore, PortError, PortResult, Revision, Snapshot};
pub use validation::{FieldErrors, SignInForm, ValidationError};
