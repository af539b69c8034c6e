use anyhow::Context;
use clap::Parser;
use sparkfuse_server::config::{Config, StoreKind};
use sparkfuse_server::contexts::ContextKind;
use sparkfuse_server::db::Db;
use sparkfuse_server::db::repo::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
use sparkfuse_server::net::{server, tls};
use sparkfuse_server::services::AuthService;
use sparkfuse_server::{AppCtx, ConnectionRegistry, SettingsProvider};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "sparkfuse", version, about = "Text session server")]
struct Args {
    /// Configuration file; defaults apply when it does not exist
    #[arg(long, short, default_value = "sparkfuse.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let cfg = Config::from_env(&args.config)?;

    let store: Arc<dyn CredentialStore> = match cfg.database.store {
        StoreKind::Memory => {
            tracing::warn!("using in-memory credential store, accounts are lost on restart");
            Arc::new(MemoryCredentialStore::new())
        }
        StoreKind::Postgres => {
            // Setup database and run migrations if needed
            let db = Db::new(&cfg.database.url)?;
            db.init().await.context("running database migrations")?;
            Arc::new(PgCredentialStore::new(Arc::new(db)))
        }
    };

    if ContextKind::from_name(&cfg.settings.start_context).is_none() {
        tracing::warn!(
            start_context = %cfg.settings.start_context,
            "start_context does not name a context; sessions will stay in auth after login"
        );
    }

    let acceptor = match &cfg.server.tls {
        Some(tls_cfg) => Some(tls::load_tls(tls_cfg).context("loading TLS material")?),
        None => None,
    };

    let config_path = args.config.exists().then(|| args.config.clone());
    let settings = Arc::new(SettingsProvider::new(config_path, cfg.session_config()));
    let app = Arc::new(AppCtx::new(
        Arc::new(ConnectionRegistry::new()),
        Arc::new(AuthService::new(store)),
        settings,
    ));

    let addr: SocketAddr = cfg.server.tcp_addr.parse()?;
    server::serve(addr, acceptor, app).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, prelude::*};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,sparkfuse_server=debug"))
        .unwrap();

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
