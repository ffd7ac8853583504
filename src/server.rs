//! Process bootstrap: configuration, service registration and the HTTP
//! server lifecycle.
//!
//! ```rust,ignore
//! let bootstrap = Bootstrap::initialize(std::env::args_os())?;
//! let connection = bootstrap.config().redis_connection.clone();
//!
//! bootstrap
//!     .register_authentication()
//!     .register_authorization()
//!     .register_distributed_cache(connection.as_deref())
//!     .run()
//!     .await?;
//! ```

use crate::application::services::{Authentication, Authorization};
use crate::config::{Args, Config};
use crate::infrastructure::cache::{DistributedCache, NullCache, RedisCache};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use std::ffi::OsString;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

/// Builder for the running service.
///
/// Lifecycle: not started → listening ([`Bootstrap::run`]) → terminated
/// (shutdown signal).
pub struct Bootstrap {
    config: Config,
    authentication: Option<Authentication>,
    authorization: Option<Authorization>,
    cache: Option<Arc<dyn DistributedCache>>,
}

impl Bootstrap {
    /// Builds the configuration context from process arguments, the `.env`
    /// file and the environment.
    ///
    /// The first item of `args` is the program name.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be parsed (unknown flag,
    /// missing value) or `--help`/`--version` was requested.
    pub fn initialize<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        dotenvy::dotenv().ok();

        let args = Args::try_parse_from(args)?;
        let config = Config::from_env().apply_args(args);

        Ok(Self::from_config(config))
    }

    /// Starts from an already loaded configuration.
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            authentication: None,
            authorization: None,
            cache: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Enables authentication with no schemes.
    ///
    /// No credential is ever verified; every request is anonymous.
    pub fn register_authentication(self) -> Self {
        self.register_authentication_with(|_| {})
    }

    /// Enables authentication, letting `configure` add schemes.
    pub fn register_authentication_with(
        mut self,
        configure: impl FnOnce(&mut Authentication),
    ) -> Self {
        let mut authentication = self.authentication.take().unwrap_or_default();
        configure(&mut authentication);
        self.authentication = Some(authentication);
        self
    }

    /// Enables authorization with no policies.
    ///
    /// Every request passes.
    pub fn register_authorization(self) -> Self {
        self.register_authorization_with(|_| {})
    }

    /// Enables authorization, letting `configure` add policies.
    pub fn register_authorization_with(
        mut self,
        configure: impl FnOnce(&mut Authorization),
    ) -> Self {
        let mut authorization = self.authorization.take().unwrap_or_default();
        configure(&mut authorization);
        self.authorization = Some(authorization);
        self
    }

    /// Registers the distributed cache client.
    ///
    /// A non-empty connection string yields a [`RedisCache`] that connects on
    /// first use; nothing is validated or contacted here. `None` or an empty
    /// string yields a [`NullCache`].
    pub fn register_distributed_cache(mut self, connection_string: Option<&str>) -> Self {
        let cache: Arc<dyn DistributedCache> = match connection_string.map(str::trim) {
            Some(connection) if !connection.is_empty() => {
                info!("Cache registered (Redis, connects on first use)");
                Arc::new(RedisCache::new(
                    connection,
                    self.config.redis_instance_name.clone(),
                ))
            }
            _ => {
                warn!("ConnectionStrings:RedisConnection is not set. Using NullCache.");
                Arc::new(NullCache::new())
            }
        };

        self.cache = Some(cache);
        self
    }

    /// Assembles the shared state from the registered services.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or authorization was not
    /// registered, since the pipeline always installs both layers.
    pub fn state(&self) -> Result<AppState> {
        let authentication = self.authentication.clone().context(
            "Authentication is not registered; call register_authentication before run",
        )?;
        let authorization = self.authorization.clone().context(
            "Authorization is not registered; call register_authorization before run",
        )?;
        let cache: Arc<dyn DistributedCache> = match &self.cache {
            Some(cache) => cache.clone(),
            None => Arc::new(NullCache::new()),
        };

        Ok(AppState::new(authentication, authorization, cache))
    }

    /// Builds the router with middleware installed.
    pub fn router(&self) -> Result<Router> {
        Ok(app_router(self.state()?))
    }

    /// Binds the configured address and serves until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Services are missing (see [`Bootstrap::state`])
    /// - The listen address is invalid or already bound
    /// - The server fails at runtime
    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address '{}'", self.config.listen_addr))?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router()?;

        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error")?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            redis_connection: None,
            redis_instance_name: String::new(),
            listen_addr: "127.0.0.1:0".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }

    #[test]
    fn test_state_requires_authentication() {
        let bootstrap = Bootstrap::from_config(test_config()).register_authorization();

        let err = bootstrap.state().err().unwrap();
        assert!(err.to_string().contains("Authentication is not registered"));
    }

    #[test]
    fn test_state_requires_authorization() {
        let bootstrap = Bootstrap::from_config(test_config()).register_authentication();

        let err = bootstrap.state().err().unwrap();
        assert!(err.to_string().contains("Authorization is not registered"));
    }

    #[test]
    fn test_default_registrations_are_empty() {
        let state = Bootstrap::from_config(test_config())
            .register_authentication()
            .register_authorization()
            .state()
            .unwrap();

        assert!(state.authentication.schemes().is_empty());
        assert_eq!(state.authorization.policy_count(), 0);
    }

    #[test]
    fn test_registrations_accumulate() {
        let state = Bootstrap::from_config(test_config())
            .register_authentication()
            .register_authorization_with(|a| {
                a.add_policy("first", Default::default());
            })
            .register_authorization_with(|a| {
                a.add_policy("second", Default::default());
            })
            .state()
            .unwrap();

        assert_eq!(state.authorization.policy_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_listen_address_fails_run() {
        let mut config = test_config();
        config.listen_addr = "not-an-address".to_string();

        let result = Bootstrap::from_config(config)
            .register_authentication()
            .register_authorization()
            .run()
            .await;

        assert!(result.is_err());
    }
}
