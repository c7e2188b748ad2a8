use clap::Parser;
use std::sync::Arc;
use tracing::info;

use foremast_service::{
    api::{self, AppState},
    config::{Settings, StoreBackend},
    logging,
    store::{DocumentStore, ElasticStore, MemoryStore},
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();
    logging::init_logger(settings.log_format);

    // The store must be reachable before the service accepts traffic.
    let store: Arc<dyn DocumentStore> = match settings.store {
        StoreBackend::Elastic => {
            info!("Waiting for elasticsearch at {}", settings.elastic_url);
            Arc::new(
                ElasticStore::connect(&settings.elastic_url, &settings.index, settings.retry_delay())
                    .await?,
            )
        }
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Arc::new(MemoryStore::new())
        }
    };

    api::serve(&settings.listen_addr(), AppState::new(store)).await
}
