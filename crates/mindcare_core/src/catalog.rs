//! crates/mindcare_core/src/catalog.rs
//!
//! Static content: the counseling team, the bookable services and the
//! resource directory.

use crate::domain::ServiceOffering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counselor {
    pub id: u64,
    pub name: &'static str,
    pub specialization: &'static str,
    pub experience: &'static str,
    pub availability: &'static str,
}

pub const COUNSELORS: [Counselor; 3] = [
    Counselor {
        id: 1,
        name: "Dr. Aravind",
        specialization: "Anxiety & Stress Management",
        experience: "10+ years",
        availability: "Mon-Fri, 9 AM - 5 PM",
    },
    Counselor {
        id: 2,
        name: "Dr. Anirudh",
        specialization: "Depression & Mood Disorders",
        experience: "8+ years",
        availability: "Tue-Sat, 10 AM - 6 PM",
    },
    Counselor {
        id: 3,
        name: "Dr. Charan",
        specialization: "Student Counseling",
        experience: "12+ years",
        availability: "Mon-Thu, 8 AM - 4 PM",
    },
];

// (id, title, duration, price, description)
const SERVICES: [(u64, &str, &str, &str, &str); 3] = [
    (
        1,
        "Individual Therapy Session",
        "50 minutes",
        "Free for Students",
        "One-on-one virtual counseling session with a licensed therapist.",
    ),
    (
        2,
        "Group Therapy Session",
        "60 minutes",
        "Free for Students",
        "Join a small group session with peers facing similar challenges.",
    ),
    (
        3,
        "Crisis Support Session",
        "30 minutes",
        "Free",
        "Immediate support for urgent mental health concerns.",
    ),
];

/// The services a student can book.
pub fn counseling_services() -> Vec<ServiceOffering> {
    SERVICES
        .iter()
        .map(|&(id, title, duration, price, description)| ServiceOffering {
            id,
            title: title.to_string(),
            duration: duration.to_string(),
            price: price.to_string(),
            description: description.to_string(),
        })
        .collect()
}

pub fn find_service(id: u64) -> Option<ServiceOffering> {
    counseling_services().into_iter().find(|s| s.id == id)
}

//=========================================================================================
// Resource directory
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Article,
    Video,
    Podcast,
    Support,
}

impl ResourceKind {
    pub fn section_title(self) -> &'static str {
        match self {
            Self::Article => "Articles & Guides",
            Self::Video => "Videos",
            Self::Podcast => "Podcasts",
            Self::Support => "Support Services",
        }
    }
}

/// One entry of the directory. `detail` holds the kind-specific line: the
/// category of an article, a video's duration, a podcast's episode count, or a
/// support line's contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub kind: ResourceKind,
    pub title: &'static str,
    pub description: &'static str,
    pub detail: &'static str,
    pub url: &'static str,
}

const fn entry(
    kind: ResourceKind,
    title: &'static str,
    description: &'static str,
    detail: &'static str,
    url: &'static str,
) -> DirectoryEntry {
    DirectoryEntry {
        kind,
        title,
        description,
        detail,
        url,
    }
}

pub const RESOURCE_DIRECTORY: [DirectoryEntry; 12] = [
    entry(
        ResourceKind::Article,
        "Building Resilience in Students",
        "Strategies to develop emotional resilience and cope with academic and personal challenges.",
        "Self-Improvement",
        "https://www.apa.org/topics/resilience",
    ),
    entry(
        ResourceKind::Article,
        "Sleep and Mental Health",
        "The connection between sleep quality and mental wellbeing, with tips for better sleep.",
        "Wellness",
        "https://www.sleepfoundation.org/mental-health",
    ),
    entry(
        ResourceKind::Article,
        "Social Media and Mental Health",
        "Understanding the impact of social media on mental health and how to use it mindfully.",
        "Digital Wellness",
        "https://www.mcleanhospital.org/essential/it-or-not-social-medias-affecting-your-mental-health",
    ),
    entry(
        ResourceKind::Video,
        "Mindfulness Meditation for Beginners",
        "A 10-minute guided meditation to help you relax and reduce stress.",
        "10 min",
        "https://www.youtube.com/results?search_query=mindfulness+meditation+for+beginners",
    ),
    entry(
        ResourceKind::Video,
        "Breathing Exercises for Anxiety",
        "Learn simple breathing techniques to calm your mind during anxious moments.",
        "5 min",
        "https://www.youtube.com/results?search_query=breathing+exercises+for+anxiety",
    ),
    entry(
        ResourceKind::Video,
        "Building Healthy Study Habits",
        "Tips and strategies for maintaining balance while studying.",
        "15 min",
        "https://www.youtube.com/results?search_query=healthy+study+habits+for+students",
    ),
    entry(
        ResourceKind::Podcast,
        "The Mental Health Podcast",
        "Weekly discussions about mental health topics relevant to students.",
        "50+ episodes",
        "https://www.spotify.com/us/podcasts/",
    ),
    entry(
        ResourceKind::Podcast,
        "Mindful Moments",
        "Short daily episodes with mindfulness tips and guided practices.",
        "Daily",
        "https://www.spotify.com/us/podcasts/",
    ),
    entry(
        ResourceKind::Podcast,
        "Student Success Stories",
        "Inspiring stories from students who overcame mental health challenges.",
        "30+ episodes",
        "https://www.spotify.com/us/podcasts/",
    ),
    entry(
        ResourceKind::Support,
        "Crisis Text Line",
        "Text HOME to 741741 for 24/7 crisis support",
        "Text: 741741",
        "https://www.crisistextline.org/",
    ),
    entry(
        ResourceKind::Support,
        "National Suicide Prevention Lifeline",
        "24/7 free and confidential support for people in distress",
        "Call: 988",
        "https://988lifeline.org/",
    ),
    entry(
        ResourceKind::Support,
        "Student Counseling Services",
        "On-campus mental health services available to all students",
        "Contact your school",
        "https://www.mentalhealth.gov/get-help/immediate-help",
    ),
];

pub fn resources_of(kind: ResourceKind) -> impl Iterator<Item = &'static DirectoryEntry> {
    RESOURCE_DIRECTORY.iter().filter(move |e| e.kind == kind)
}
