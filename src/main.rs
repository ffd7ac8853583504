use auth_service::Bootstrap;
use auth_service::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let bootstrap = match Bootstrap::initialize(std::env::args_os()) {
        Ok(bootstrap) => bootstrap,
        // --help, --version and usage errors print and exit the clap way
        Err(e) => match e.downcast_ref::<clap::Error>() {
            Some(clap_err) => clap_err.exit(),
            None => return Err(e),
        },
    };

    let config = bootstrap.config().clone();
    config.validate()?;
    init_tracing(&config);
    config.print_summary();

    bootstrap
        .register_authentication()
        .register_authorization()
        .register_distributed_cache(config.redis_connection.as_deref())
        .run()
        .await
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
