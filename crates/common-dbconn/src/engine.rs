use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DbConnError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbEngine {
    Mysql,
    Postgresql,
    Sqlite,
}

impl DbEngine {
    pub const ALL: [DbEngine; 3] = [DbEngine::Mysql, DbEngine::Postgresql, DbEngine::Sqlite];

    /// Identifier used as the table key and in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            DbEngine::Mysql => "mysql",
            DbEngine::Postgresql => "postgresql",
            DbEngine::Sqlite => "sqlite",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DbEngine::Mysql => "MySQL",
            DbEngine::Postgresql => "PostgreSQL",
            DbEngine::Sqlite => "SQLite",
        }
    }
}

impl fmt::Display for DbEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbEngine {
    type Err = DbConnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(DbEngine::Mysql),
            "postgresql" => Ok(DbEngine::Postgresql),
            "sqlite" => Ok(DbEngine::Sqlite),
            _ => Err(DbConnError::UnknownEngine(s.to_string())),
        }
    }
}
