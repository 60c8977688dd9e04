use std::sync::Arc;

use clap::Parser;
use cmd::config::Args;
use cmd::config::Config;
use cmd::config::Settings;
use cmd::error::Result;
use daycare_gen::loader::Loader;
use daycare_gen::store::MemoryStore;
use daycare_gen::store::MongoStore;
use daycare_gen::store::Store;
use daycare_gen::COLLECTION_EVENTS;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let dotenv = match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(err) if err.not_found() => None,
        Err(err) => return Err(err.into()),
    };

    let cfg: Config = Settings::load(&args)?.try_into()?;
    cmd::tracing::init(cfg.log_level)?;

    let version = env!("CARGO_PKG_VERSION");
    info!("daycare-gen v{version}");
    if let Some(path) = dotenv {
        debug!("loaded environment from {path:?}");
    }
    debug!("connection: {:?}", cfg.connection);
    debug!("loader: {:?}", cfg.loader);

    let rng = match cfg.seed {
        Some(seed) => {
            info!("using seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let (store, memory): (Arc<dyn Store>, Option<Arc<MemoryStore>>) = if cfg.dry_run {
        info!("dry run, nothing will be written to {}", cfg.connection.database);
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn Store> = memory.clone();
        (store, Some(memory))
    } else {
        let store: Arc<dyn Store> = Arc::new(MongoStore::connect(&cfg.connection).await?);
        (store, None)
    };

    let summary = Loader::new(cfg.loader, store, rng).run().await?;
    info!(
        "inserted {} children, {} staff, {} events in {} batches",
        summary.children, summary.staff, summary.events, summary.batches
    );
    if let Some(memory) = memory {
        debug!("{} events held in memory", memory.len(COLLECTION_EVENTS)?);
    }

    Ok(())
}
