//! Shared command context
//!
//! Resolves the configuration file and database path from the global flags
//! and opens the SQLite-backed loan store for commands that need it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use loandesk_cache::{DatabasePool, SqliteKeyValueStore};
use loandesk_core::{config::Config, ports::IKeyValueStore};
use loandesk_loans::LoanStore;

/// Configuration and paths resolved from the command line
#[derive(Debug)]
pub struct AppContext {
    pub config_path: PathBuf,
    pub config: Config,
    /// Whether `config_path` was given explicitly with `--config`
    pub explicit_config: bool,
    database: PathBuf,
}

impl AppContext {
    /// Loads the configuration and resolves the database path
    ///
    /// A missing default config file falls back to defaults; an explicit
    /// `--config` path must exist and parse.
    pub fn load(config: Option<&str>, db: Option<&str>) -> Result<Self> {
        let explicit_config = config.is_some();
        let config_path = config
            .map(|p| expand_home(Path::new(p)))
            .unwrap_or_else(Config::default_path);

        let config = if explicit_config {
            Config::load(&config_path).with_context(|| {
                format!("Failed to load configuration from {}", config_path.display())
            })?
        } else {
            Config::load_or_default(&config_path)
        };

        let database = match db {
            Some(path) => expand_home(Path::new(path)),
            None => expand_home(&config.storage.database),
        };

        Ok(Self {
            config_path,
            config,
            explicit_config,
            database,
        })
    }

    /// The SQLite file commands read and write
    pub fn database_path(&self) -> &Path {
        &self.database
    }

    /// Opens the database and builds the loan store over it
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the database cannot be opened.
    pub async fn open_storage(&self) -> Result<Storage> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            bail!("Invalid configuration: {}", messages.join("; "));
        }

        let pool = DatabasePool::new(&self.database)
            .await
            .with_context(|| format!("Failed to open database at {}", self.database.display()))?;
        let kv: Arc<dyn IKeyValueStore> = Arc::new(SqliteKeyValueStore::new(pool.pool().clone()));
        let loans = LoanStore::with_keys(
            kv,
            &self.config.storage.loans_key,
            &self.config.storage.audit_key,
        );

        tracing::debug!(database = %self.database.display(), "Loan store opened");
        Ok(Storage { loans, pool })
    }
}

/// An open database and the loan store on top of it
pub struct Storage {
    pub loans: LoanStore,
    pool: DatabasePool,
}

impl Storage {
    /// Closes the database, flushing pending writes
    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Closes the database, then hands back the result of the last operation
    pub async fn finish<T>(self, result: T) -> T {
        self.close().await;
        result
    }
}

/// Replaces a leading `~` with the user's home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
