//! campus-rs server entry point.

use std::sync::Arc;
use std::time::Duration;

use campus_api::{AppState, app};
use campus_common::Config;
use campus_core::{
    AnnouncementService, ComplaintService, DepartmentTimetableService, LostFoundService,
    TimetableLayout, TimetableService, UserService,
};
use campus_db::repositories::{
    AnnouncementRepository, ComplaintRepository, DepartmentTimetableRepository,
    LostFoundRepository, PersonalTimetableRepository, UserRepository,
};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting campus-rs server...");

    let config = Config::load()?;

    let db = campus_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    campus_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let lost_found_repo = LostFoundRepository::new(Arc::clone(&db));
    let timetable_repo = PersonalTimetableRepository::new(Arc::clone(&db));
    let department_timetable_repo = DepartmentTimetableRepository::new(Arc::clone(&db));
    let announcement_repo = AnnouncementRepository::new(Arc::clone(&db));
    let complaint_repo = ComplaintRepository::new(Arc::clone(&db));

    // Services
    let user_service = UserService::new(user_repo, config.auth.allow_registration);
    let lost_found_service = LostFoundService::new(lost_found_repo, config.lost_found.expiry_days);
    let timetable_service =
        TimetableService::new(timetable_repo, TimetableLayout::from(config.timetable));
    let department_timetable_service = DepartmentTimetableService::new(department_timetable_repo);
    let announcement_service = AnnouncementService::new(announcement_repo);
    let complaint_service = ComplaintService::new(complaint_repo);

    match &config.admin {
        Some(seed) => {
            if let Some(admin) = user_service.seed_admin(seed).await? {
                info!(user_id = %admin.id, email = %admin.email, "Seeded admin account");
            }
        }
        None => warn!("No [admin] section configured; no admin account will be seeded"),
    }

    let state = AppState {
        user_service,
        lost_found_service,
        timetable_service,
        department_timetable_service,
        announcement_service,
        complaint_service,
    };

    let router = app(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                ))),
        );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
