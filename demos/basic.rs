//! Basic example of the sloc service locator.
//!
//! Run with `RUST_LOG=sloc=debug` to watch registrations and resolutions.

use std::sync::Arc;

use sloc::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// === Define your services ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

struct Config {
    database_url: String,
    debug: bool,
}

struct Database {
    url: String,
    logger: Arc<dyn Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

/// Finds its own dependencies through the registry that builds it.
struct UserRepository {
    db: Arc<Database>,
    slot: ServiceSlot,
}

impl Construct for UserRepository {
    fn construct(services: &Services) -> Result<Self> {
        let db = services.resolve_as::<Database>(ServiceKey::of::<Database>())?;
        Ok(UserRepository {
            db,
            slot: ServiceSlot::bound(services),
        })
    }
}

impl Injectable for UserRepository {
    fn slot(&self) -> &ServiceSlot {
        &self.slot
    }
}

impl UserRepository {
    fn find_user(&self, id: u64) -> Result<String> {
        let logger = self.services()?.resolve_as::<Arc<dyn Logger>>("logger")?;
        logger.log(&format!("Looking up user {id}"));
        Ok(self.db.query(&format!("SELECT * FROM users WHERE id = {id}")))
    }
}

struct InfrastructureModule;

impl ServiceModule for InfrastructureModule {
    fn register(&self, registry: &Registry) {
        // Logger — singleton, stored as a trait object
        registry.register_singleton(
            "logger",
            Provider::factory(|| Ok(Arc::new(ConsoleLogger) as Arc<dyn Logger>)),
        );

        // Database — singleton, depends on Config + Logger
        registry.register_singleton(
            ServiceKey::of::<Database>(),
            Provider::with_services(|services: &Services| {
                let config = services.resolve_as::<Config>(ServiceKey::of::<Config>())?;
                let logger = services.resolve_as::<Arc<dyn Logger>>("logger")?;
                Ok(Database {
                    url: config.database_url.clone(),
                    logger: Arc::clone(&*logger),
                })
            }),
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sloc=info")))
        .init();

    let registry = Registry::builder()
        .literal(
            ServiceKey::of::<Config>(),
            Config {
                database_url: "postgres://localhost/myapp".to_string(),
                debug: true,
            },
        )
        .literal("Hello", "World")
        .build()?;
    registry.install(&InfrastructureModule);

    println!("{registry:?}");

    let config = registry.resolve_as::<Config>(ServiceKey::of::<Config>())?;
    println!("Config: database_url={}, debug={}", config.database_url, config.debug);

    let hello = registry.resolve_as::<&str>("Hello")?;
    println!("Hello, {hello}!");

    // Not registered: constructed on the spot, a new one every time
    let repo = registry.get::<UserRepository>()?;
    println!("{}", repo.find_user(42)?);

    let again = registry.get::<UserRepository>()?;
    info!(
        same_repository = Arc::ptr_eq(&repo, &again),
        same_database = Arc::ptr_eq(&repo.db, &again.db),
        "Resolved twice"
    );

    if let Err(err) = registry.resolve("Helo") {
        println!("{err}");
    }

    Ok(())
}
