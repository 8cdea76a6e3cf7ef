//! services/companion/src/bin/companion.rs
//!
//! Opens the record store in the configured data directory and reports what
//! it holds. Useful for checking a data directory after an upgrade.

use companion_lib::{app::AppState, config::Config, error::AppError, telemetry::init_tracing};
use mindcare_core::domain::Profile;
use tracing::info;

fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    init_tracing(&config)?;
    info!("Configuration loaded. Opening record store...");

    // --- 2. Open the Record Store ---
    let state = AppState::open(config)?;

    // --- 3. Report ---
    let dashboard = state.dashboard();
    info!(
        signed_in = dashboard.session.is_authenticated,
        email = dashboard.session.user_email.as_deref().unwrap_or("-"),
        admin = dashboard.session.is_admin,
        "Session"
    );
    info!(
        moods = dashboard.mood_count,
        average = ?dashboard.mood.average,
        trend = ?dashboard.mood.trend,
        journal_entries = dashboard.journal_count,
        posts = state.community.posts().len(),
        bookings = state.counseling.bookings().len(),
        admin_resources = state.admin_resources.list().len(),
        admin_services = state.admin_services.list().len(),
        "Stored records"
    );
    if state.profile.load() == Profile::default() {
        info!("No profile saved yet");
    }
    Ok(())
}
