use std::sync::Arc;

use barber_booking::adapters::http::{build_router, BookingHandlers, ChatHandlers, RouterSettings};
use barber_booking::adapters::{
    PostgresAppointmentStore, PostgresCatalog, PostgresClientDirectory, RedisConversationStore,
    SystemClock,
};
use barber_booking::application::{
    CheckConflictHandler, ConversationLocks, CreateBookingHandler, DialogueManager,
    ListClientAppointmentsHandler, QueryAvailabilityHandler, RegisterClientHandler, Scheduler,
    UpdateAppointmentStatusHandler,
};
use barber_booking::config::AppConfig;
use barber_booking::ports::{Clock, ConversationStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);
    tracing::info!(
        environment = ?config.server.environment,
        timezone = %config.business.timezone,
        "Starting barber booking service"
    );

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let redis = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = tokio::time::timeout(
        config.redis.timeout(),
        redis.get_multiplexed_tokio_connection(),
    )
    .await??;

    let business = &config.business;
    let calendar = business.calendar()?;
    let account_id = business.account()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let catalog = Arc::new(PostgresCatalog::new(pool.clone()));
    let clients = Arc::new(PostgresClientDirectory::new(pool.clone()));
    let appointments = Arc::new(PostgresAppointmentStore::new(pool.clone()));
    let conversations: Arc<dyn ConversationStore> = Arc::new(
        RedisConversationStore::new(
            redis_conn,
            clock.clone(),
            business.conversation_ttl(),
            business.greeting_ttl(),
        )
        .with_key_prefix(config.redis.key_prefix.clone()),
    );

    let scheduler = Scheduler::new(
        catalog.clone(),
        catalog,
        appointments.clone(),
        clock.clone(),
        calendar,
        business.slot_computer(),
    );

    let booking = BookingHandlers::new(
        Arc::new(
            CreateBookingHandler::new(scheduler.clone(), clients.clone())
                .with_horizon_months(business.booking_horizon_months),
        ),
        Arc::new(RegisterClientHandler::new(clients.clone(), clock.clone(), account_id.clone())),
        Arc::new(QueryAvailabilityHandler::new(scheduler.clone())),
        Arc::new(CheckConflictHandler::new(scheduler.clone())),
        Arc::new(ListClientAppointmentsHandler::new(scheduler.clone(), clients.clone())),
        Arc::new(UpdateAppointmentStatusHandler::new(appointments)),
        calendar,
    );

    let dialogue = DialogueManager::new(
        scheduler,
        conversations.clone(),
        clients,
        account_id,
        ConversationLocks::new(),
    )
    .with_horizon_months(business.booking_horizon_months)
    .with_slot_hints(business.slot_hints);
    let chat = ChatHandlers::new(Arc::new(dialogue), calendar);

    spawn_expiry_sweep(conversations, business.expiry_sweep());

    let settings = RouterSettings {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.server.cors_origins_list(),
    };
    let app = build_router(booking, chat, &settings);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Periodically evicts idle conversations.
fn spawn_expiry_sweep(conversations: Arc<dyn ConversationStore>, period: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match conversations.expire().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Expired idle conversations"),
                Err(e) => tracing::warn!(error = %e, "Conversation expiry sweep failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
