use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::{DbEngine, REDACTED};

/// Connection fields for one engine, serialized as a flat object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConnectionParams {
    Network {
        host: String,
        port: u16,
        username: String,
        password: String,
    },
    /// File-based engines; `database` is the path of the database file.
    File { database: String },
}

impl ConnectionParams {
    fn network(host: &str, port: u16, username: &str) -> Self {
        ConnectionParams::Network {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: String::new(),
        }
    }

    /// Copy with a non-empty password replaced by [`REDACTED`].
    pub fn redacted(&self) -> Self {
        match self {
            ConnectionParams::Network {
                host,
                port,
                username,
                password,
            } if !password.is_empty() => ConnectionParams::Network {
                host: host.clone(),
                port: *port,
                username: username.clone(),
                password: REDACTED.to_string(),
            },
            other => other.clone(),
        }
    }
}

static DEFAULT_CONNECTION_PARAMS: Lazy<BTreeMap<DbEngine, ConnectionParams>> = Lazy::new(|| {
    DbEngine::ALL
        .into_iter()
        .map(|engine| {
            let params = match engine {
                DbEngine::Mysql => ConnectionParams::network("localhost", 3306, "root"),
                DbEngine::Postgresql => ConnectionParams::network("localhost", 5432, "postgres"),
                DbEngine::Sqlite => ConnectionParams::File {
                    database: "/path/to/database.db".to_string(),
                },
            };
            (engine, params)
        })
        .collect()
});

/// The process-wide defaults table, keyed by engine.
pub fn default_connection_params() -> &'static BTreeMap<DbEngine, ConnectionParams> {
    &DEFAULT_CONNECTION_PARAMS
}

pub fn defaults_for(engine: DbEngine) -> &'static ConnectionParams {
    // the table is built from DbEngine::ALL so every engine has an entry
    &DEFAULT_CONNECTION_PARAMS[&engine]
}

/// Supported engines paired with their display names.
pub fn supported_databases() -> impl Iterator<Item = (DbEngine, &'static str)> {
    DbEngine::ALL
        .into_iter()
        .map(|engine| (engine, engine.display_name()))
}
