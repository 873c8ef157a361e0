//! Connection setup.

use crate::error::{RosterError, RosterResult};
use tokio_postgres::{Client, Config, NoTls};

/// Where and as whom to connect.
///
/// `username`/`password` override whatever the URL carries.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConnectOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Parse the URL and apply the credential overrides.
    pub fn pg_config(&self) -> RosterResult<Config> {
        let mut config: Config = self
            .url
            .parse()
            .map_err(|e: tokio_postgres::Error| RosterError::Connection(e.to_string()))?;
        if let Some(user) = self.username.as_deref().filter(|u| !u.is_empty()) {
            config.user(user);
        }
        if let Some(password) = self.password.as_deref() {
            config.password(password);
        }
        Ok(config)
    }
}

/// Open a single connection.
///
/// The connection driver is spawned onto the current tokio runtime and logs
/// when it terminates with an error.
pub async fn connect(options: &ConnectOptions) -> RosterResult<Client> {
    let config = options.pg_config()?;
    let (client, connection) = config
        .connect(NoTls)
        .await
        .map_err(|e| RosterError::Connection(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(
                target: "roster.connection",
                error = %e,
                "connection closed with error"
            );
        }
    });

    tracing::info!(
        target: "roster.connection",
        host = ?config.get_hosts().first(),
        dbname = config.get_dbname().unwrap_or("-"),
        "connected"
    );
    Ok(client)
}
