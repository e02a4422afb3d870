use std::sync::Arc;

use actix_web::{App, HttpServer, middleware};

use signassist::auth::session;
use signassist::config::AppConfig;
use signassist::configure_app;
use signassist::store::{ComplaintStore, MemoryStore, PgStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env file is fine; real environment variables win.
    let _ = dotenvy::dotenv();
    env_logger::init();

    let config = Arc::new(AppConfig::from_env());

    let store: Arc<dyn ComplaintStore> = match &config.database_url {
        Some(url) => {
            let pg = PgStore::connect(url, config.db_max_connections)
                .await
                .map_err(std::io::Error::other)?;
            pg.migrate().await.map_err(std::io::Error::other)?;
            log::info!("Storing complaints in Postgres");
            Arc::new(pg)
        }
        None => {
            log::warn!("No DATABASE_URL set, complaints are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let secret_key = config.session_key();
    let bind_addr = config.bind_addr.clone();

    log::info!("Starting {} at http://{bind_addr}", config.app_name);

    HttpServer::new(move || {
        let store = Arc::clone(&store);
        let config = Arc::clone(&config);
        App::new()
            .wrap(session::middleware(secret_key.clone()))
            .wrap(middleware::Logger::default())
            .configure(move |cfg| configure_app(cfg, store, config))
    })
    .bind(bind_addr)?
    .run()
    .await
}
