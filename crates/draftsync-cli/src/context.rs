//! Wiring shared by every command
//!
//! Loads configuration, builds the store, gateway, engine and lifecycle
//! manager, and derives the session from the configured access token.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use draftsync_core::config::Config;
use draftsync_core::domain::{Draft, DraftRef, RemoteId, Session, SessionId};
use draftsync_remote::HttpRemoteGateway;
use draftsync_store::JsonFileStore;
use draftsync_sync::{DraftLifecycleManager, SyncEngine};
use tracing::{debug, info};

/// Loads the configuration file
///
/// An explicitly given path must exist and parse. The default path falls
/// back to built-in defaults when missing.
pub fn load_config(explicit: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    match explicit {
        Some(path) => {
            let config = Config::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            Ok((config, path))
        }
        None => {
            let path = Config::default_path();
            Ok((Config::load_or_default(&path), path))
        }
    }
}

/// Everything a command needs to run
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub session: Session,
    pub manager: DraftLifecycleManager,
}

impl AppContext {
    /// Validates `config` and wires the adapters
    pub fn new(config: Config, config_path: PathBuf) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            bail!(
                "Invalid configuration in {}: {}",
                config_path.display(),
                details.join("; ")
            );
        }

        let access_token = config.access_token();
        let session = match access_token {
            Some(_) => Session::Authenticated(SessionId::new()),
            None => Session::Anonymous,
        };

        let store = Arc::new(JsonFileStore::new(config.store.path.clone()));
        let gateway = Arc::new(HttpRemoteGateway::from_config(&config.remote, access_token));
        let engine = Arc::new(SyncEngine::new(gateway, store, &config));

        info!(
            config_path = %config_path.display(),
            store = %config.store.path.display(),
            authenticated = session.is_authenticated(),
            "Loaded configuration"
        );

        Ok(Self {
            config,
            config_path,
            session,
            manager: DraftLifecycleManager::new(engine),
        })
    }

    /// Resolves an identifier typed by the user
    ///
    /// Local IDs win over remote IDs. An unknown ID is taken as a remote ID
    /// when signed in, so server-only drafts can still be addressed.
    pub fn resolve(&self, raw: &str) -> Result<DraftRef> {
        if let Some(draft_ref) = self.manager.resolve(raw) {
            debug!(%draft_ref, "Resolved draft reference");
            return Ok(draft_ref);
        }
        if self.session.is_authenticated() {
            let remote_id = RemoteId::new(raw).with_context(|| format!("Invalid draft ID '{raw}'"))?;
            return Ok(DraftRef::Remote(remote_id));
        }
        bail!("No draft with ID '{raw}'")
    }

    /// Finds a draft held locally
    pub fn find(&self, raw: &str) -> Result<Draft> {
        let draft_ref = self.resolve(raw)?;
        self.manager
            .find(&draft_ref)
            .with_context(|| format!("No local draft with ID '{raw}'"))
    }

    pub fn export_directory(&self) -> &Path {
        &self.config.export.directory
    }
}
