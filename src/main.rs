//! Campus Events
//!
//! Main application entry point: loads settings, hydrates the engine from
//! the configured store and reports what it holds.

use tracing::{info, warn};

use campus_events::{
    services::ServiceFactory,
    utils::{helpers::format_seats, logging},
    Settings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::from_file(path)?,
        None => Settings::new()?,
    };
    settings.validate()?;

    // Held until exit so the file writer flushes
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", campus_events::info());

    let services = ServiceFactory::new(settings).await?;
    let stats = services.initialize().await?;
    info!(
        events = stats.events,
        active = stats.active_events,
        cancelled = stats.cancelled_events,
        registrations = stats.registrations,
        interested = stats.interested,
        favorites = stats.favorites,
        "Engine ready"
    );

    for event in services.engine.list_events_by_date().await {
        info!(
            event_id = %event.id,
            title = %event.title,
            date = %event.date,
            status = %event.status,
            seats = %format_seats(event.remaining_seats, event.capacity),
            "Event"
        );
    }

    match services.session.current_user().await {
        Some(user) => info!(user_id = %user.id, is_admin = user.is_admin, "Session restored"),
        None => warn!("No user signed in"),
    }

    Ok(())
}
