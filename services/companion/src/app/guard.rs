//! services/companion/src/app/guard.rs
//!
//! Decides whether a session may see a route, and which links the navigation
//! bar shows.

use mindcare_core::domain::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    SignIn,
    SignUp,
    Dashboard,
    MoodTracker,
    Journal,
    Resources,
    Counseling,
    Community,
    Assessment,
    Admin,
    Profile,
}

impl Route {
    pub const ALL: [Route; 11] = [
        Route::SignIn,
        Route::SignUp,
        Route::Dashboard,
        Route::MoodTracker,
        Route::Journal,
        Route::Resources,
        Route::Counseling,
        Route::Community,
        Route::Assessment,
        Route::Admin,
        Route::Profile,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::SignIn => "/login",
            Self::SignUp => "/signup",
            Self::Dashboard => "/",
            Self::MoodTracker => "/mood-tracker",
            Self::Journal => "/journal",
            Self::Resources => "/resources",
            Self::Counseling => "/counseling",
            Self::Community => "/community",
            Self::Assessment => "/assessment",
            Self::Admin => "/admin",
            Self::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Routes reachable without signing in.
    pub fn is_public(self) -> bool {
        matches!(self, Self::SignIn | Self::SignUp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Anonymous sessions only reach the public routes; a signed-in user opening
/// the sign-in page is sent to the dashboard instead.
pub fn guard(route: Route, session: &Session) -> GuardDecision {
    match (session.is_authenticated, route) {
        (false, route) if route.is_public() => GuardDecision::Allow,
        (false, _) => GuardDecision::Redirect(Route::SignIn),
        (true, Route::SignIn) => GuardDecision::Redirect(Route::Dashboard),
        (true, _) => GuardDecision::Allow,
    }
}

/// Like `guard`, for a raw path. Unknown paths fall back to the page the
/// session would land on anyway.
pub fn guard_path(path: &str, session: &Session) -> GuardDecision {
    match Route::from_path(path) {
        Some(route) => guard(route, session),
        None if session.is_authenticated => GuardDecision::Redirect(Route::Dashboard),
        None => GuardDecision::Redirect(Route::SignIn),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
}

const NAV_ITEMS: [NavItem; 7] = [
    NavItem {
        route: Route::Dashboard,
        label: "Dashboard",
    },
    NavItem {
        route: Route::MoodTracker,
        label: "Mood Tracker",
    },
    NavItem {
        route: Route::Journal,
        label: "Journal",
    },
    NavItem {
        route: Route::Resources,
        label: "Resources",
    },
    NavItem {
        route: Route::Counseling,
        label: "Counseling",
    },
    NavItem {
        route: Route::Community,
        label: "Community",
    },
    NavItem {
        route: Route::Assessment,
        label: "Assessment",
    },
];

/// The navigation bar's links. The admin link only shows for admin sessions;
/// it hides the link and grants nothing.
pub fn navigation_items(session: &Session) -> Vec<NavItem> {
    let mut items = NAV_ITEMS.to_vec();
    if session.is_admin {
        items.push(NavItem {
            route: Route::Admin,
            label: "Admin",
        });
    }
    items
}
