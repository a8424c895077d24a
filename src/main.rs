use std::sync::Arc;

use places::config::Config;
use places::db::PgStore;
use places::engine::Engine;
use places::error::Error;
use places::external::LocationIq;
use places::images::ImageStore;
use places::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let store = PgStore::new(&config.database_url, config.max_connections).await?;
    let geocoder = LocationIq::new(&config.location_iq_base_url, &config.location_iq_api_key);
    let images = ImageStore::new(&config.upload_dir);

    let engine = Engine::new(Arc::new(store), Arc::new(geocoder), images)?;

    serve(&config, engine).await
}
