//! services/companion/src/app/mod.rs
//!
//! Application wiring: the session, the navigation guard and the shared state.

pub mod guard;
pub mod session;
pub mod state;

pub use guard::{guard, guard_path, navigation_items, GuardDecision, NavItem, Route};
pub use session::SessionContext;
pub use state::{AppState, Dashboard};
