//! Scan orchestration -- assembly, version ownership, and the periodic tick loop.
//!
//! The [`Orchestrator`] is the central coordinator of `glassbox-daemon`.
//! It loads configuration, wires the plugin manager and transformer
//! registry, owns the version counter, and drives the scan pipeline:
//! fetch -> transform -> node phase -> edge phase.
//!
//! # Startup Sequence
//!
//! 1. Install uniqueness constraints for every known label (fatal on failure)
//! 2. Seed the version counter from the latest persisted `Metadata` version
//! 3. Run one immediate scan tick (failure is logged, not fatal)
//! 4. Enter the periodic scan loop
//!
//! # Per-Tick Protocol
//!
//! 1. Increment the patch version
//! 2. Write `Metadata(v)` and chain it to `Metadata(v-1)` (failure aborts
//!    the tick; the version is spent and never rolled back)
//! 3. Fetch all active plugins concurrently, each under a timeout
//! 4. Per provider, in config order: transform, then write every node,
//!    then write every edge. Node and edge phases never interleave --
//!    edge resolution MATCHes the full node set of the same version.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::MissedTickBehavior;

use glassbox_core::config::GlassboxConfig;
use glassbox_core::error::GlassboxError;
use glassbox_core::model::ComponentType;
use glassbox_core::plugin::PluginManager;
use glassbox_core::transform::TransformerRegistry;
use glassbox_core::version::VersionManager;
use glassbox_graph_store::{GraphRepository, GraphStoreConfig, Neo4jRepository};
use glassbox_kubernetes::{KubernetesPlugin, KubernetesTransformer};
use glassbox_openstack::{OpenStackPlugin, OpenStackTransformer};

/// The main daemon orchestrator.
///
/// Exclusively owns the version counter. The plugin manager owns the
/// active plugin instances; the repository owns the store driver.
pub struct Orchestrator {
    /// Loaded and validated configuration.
    config: GlassboxConfig,
    /// Constructor registry and active plugin set (read-only after startup).
    plugins: PluginManager,
    /// Prefix-keyed transformer registry.
    transformers: TransformerRegistry,
    /// Versioned graph store.
    repository: Arc<dyn GraphRepository>,
    /// Snapshot version counter.
    versions: VersionManager,
}

impl Orchestrator {
    /// Load configuration from a file and build the orchestrator.
    pub async fn build(config_path: &Path) -> Result<Self> {
        let config = GlassboxConfig::load(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
        Self::build_from_config(config).await
    }

    /// Build from an already-loaded configuration.
    ///
    /// Connects to the graph store and registers the built-in provider
    /// plugins and transformers.
    pub async fn build_from_config(config: GlassboxConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        let store_config = GraphStoreConfig {
            uri: config.graph.uri(),
            user: config.graph.user.clone(),
            password: config.graph.password.clone(),
            query_timeout_secs: config.scanner.query_timeout_secs,
        };
        let repository = Neo4jRepository::connect(&store_config)
            .await
            .map_err(|e| anyhow::anyhow!("graph store connection failed: {}", e))?;

        Self::assemble(
            config,
            default_plugin_manager()?,
            default_transformer_registry()?,
            Arc::new(repository),
        )
        .await
    }

    /// Assemble from explicit dependencies.
    ///
    /// Initializes the active plugin set from config and seeds the
    /// version counter from the store. Tests call this with their own
    /// registries and an in-memory repository.
    pub async fn assemble(
        config: GlassboxConfig,
        mut plugins: PluginManager,
        transformers: TransformerRegistry,
        repository: Arc<dyn GraphRepository>,
    ) -> Result<Self> {
        let active = plugins.init_from_config(&config.providers).await;
        tracing::info!(active_plugins = active, "plugin manager initialized");

        let latest = match repository.latest_version().await {
            Ok(latest) => latest,
            Err(e) => {
                tracing::warn!(error = %e, "could not fetch latest version, seeding fresh");
                None
            }
        };
        let versions = VersionManager::seeded(latest);
        tracing::info!(version = versions.current(), "version counter seeded");

        Ok(Self {
            config,
            plugins,
            transformers,
            repository,
            versions,
        })
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &GlassboxConfig {
        &self.config
    }

    /// The version the counter currently points at.
    pub fn current_version(&self) -> &str {
        self.versions.current()
    }

    /// Run a single scan tick. Exposed for tests and one-shot use.
    pub async fn scan_once(&mut self) -> Result<(), GlassboxError> {
        self.scan_tick().await
    }

    /// Install constraints, run the initial scan, and enter the scan loop.
    ///
    /// Blocks until SIGTERM or SIGINT. A signal received mid-tick drops
    /// the in-flight tick, aborting its remaining writes.
    pub async fn run(&mut self) -> Result<()> {
        use tokio::signal::unix::{SignalKind, signal};

        let pid_file = (!self.config.general.pid_file.is_empty())
            .then(|| PathBuf::from(&self.config.general.pid_file));
        if let Some(path) = &pid_file {
            write_pid_file(path)?;
        }

        // Constraint setup must succeed before any scan runs.
        if let Err(e) = self.repository.setup_constraints().await {
            if let Some(path) = &pid_file {
                remove_pid_file(path);
            }
            return Err(anyhow::anyhow!("constraint setup failed: {}", e));
        }

        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

        // Initial scan. Failure is logged but does not abort startup.
        if let Err(e) = self.scan_tick().await {
            tracing::error!(error = %e, "initial scan failed");
        }

        let period = Duration::from_secs(self.config.scanner.interval_secs);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await; // the immediate first tick is the initial scan above

        tracing::info!(
            interval_secs = self.config.scanner.interval_secs,
            "entering scan loop"
        );

        let signal_name = loop {
            tokio::select! {
                _ = interval.tick() => {
                    tokio::select! {
                        result = tokio::time::timeout(period, self.scan_tick()) => match result {
                            Err(_) => tracing::warn!(
                                "scan tick exceeded the scan interval, aborting remaining work"
                            ),
                            Ok(Err(e)) => tracing::error!(error = %e, "scan tick failed"),
                            Ok(Ok(())) => {}
                        },
                        _ = sigterm.recv() => break "SIGTERM",
                        _ = sigint.recv() => break "SIGINT",
                    }
                }
                _ = sigterm.recv() => break "SIGTERM",
                _ = sigint.recv() => break "SIGINT",
            }
        };
        tracing::info!(signal = signal_name, "shutdown signal received");

        if let Some(path) = &pid_file {
            remove_pid_file(path);
        }
        Ok(())
    }

    /// One iteration of the scan pipeline.
    async fn scan_tick(&mut self) -> Result<(), GlassboxError> {
        self.versions.increment();
        let version = self.versions.current().to_owned();
        let timestamp = scan_timestamp();
        tracing::info!(version = %version, "scan tick started");

        // A metadata write failure aborts the tick. The version is spent.
        self.repository
            .create_metadata_node(&version, &timestamp)
            .await
            .map_err(GlassboxError::from)?;

        // Fetch all providers concurrently, each under its own timeout.
        let fetch_timeout = Duration::from_secs(self.config.scanner.fetch_timeout_secs);
        let fetches = self.plugins.active().map(|(name, plugin)| {
            let fetch = plugin.fetch_data();
            async move { (name, tokio::time::timeout(fetch_timeout, fetch).await) }
        });
        let fetched = futures::future::join_all(fetches).await;

        // Write section: serialized per provider, in config order.
        for (provider, result) in fetched {
            let raw = match result {
                Err(_) => {
                    tracing::warn!(
                        provider,
                        timeout_secs = fetch_timeout.as_secs(),
                        "plugin fetch timed out, skipping for this tick"
                    );
                    continue;
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        provider,
                        error = %e,
                        "plugin fetch failed, skipping for this tick"
                    );
                    continue;
                }
                Ok(Ok(raw)) => raw,
            };

            let outcome = self.transformers.transform_data(&raw);
            for (key, error) in &outcome.skipped {
                tracing::warn!(provider, key = %key, error = %error, "transform entry skipped");
            }
            tracing::debug!(
                provider,
                components = outcome.components.len(),
                "transformation complete"
            );

            // Node phase: every component becomes a fresh node at this version.
            for component in &outcome.components {
                match self.repository.create_component(&version, component).await {
                    Ok(node_uuid) => {
                        if component.component_type == ComponentType::Project {
                            if let Err(e) = self
                                .repository
                                .link_project_to_metadata(&version, &node_uuid)
                                .await
                            {
                                tracing::error!(
                                    provider,
                                    version = %version,
                                    id = %component.id,
                                    error = %e,
                                    "failed to link project to metadata"
                                );
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            provider,
                            version = %version,
                            component_type = %component.component_type,
                            id = %component.id,
                            error = %e,
                            "failed to store component"
                        );
                    }
                }
            }

            // Edge phase: runs only after the full node set for this
            // provider exists at this version.
            for component in &outcome.components {
                if component.relationships.is_empty() {
                    continue;
                }
                if let Err(e) = self
                    .repository
                    .create_relationships(&version, component)
                    .await
                {
                    tracing::error!(
                        provider,
                        version = %version,
                        component_type = %component.component_type,
                        id = %component.id,
                        error = %e,
                        "failed to create relationships"
                    );
                }
            }

            tracing::info!(provider, version = %version, "provider snapshot stored");
        }

        tracing::info!(version = %version, "scan tick finished");
        Ok(())
    }
}

/// Constructor registry with the built-in providers.
pub fn default_plugin_manager() -> Result<PluginManager> {
    let mut plugins = PluginManager::new();
    plugins
        .register_constructor(glassbox_openstack::PROVIDER_NAME, || {
            Box::new(OpenStackPlugin::new())
        })
        .map_err(|e| anyhow::anyhow!("plugin registration failed: {}", e))?;
    plugins
        .register_constructor(glassbox_kubernetes::PROVIDER_NAME, || {
            Box::new(KubernetesPlugin::new())
        })
        .map_err(|e| anyhow::anyhow!("plugin registration failed: {}", e))?;
    Ok(plugins)
}

/// Transformer registry with the built-in prefixes.
pub fn default_transformer_registry() -> Result<TransformerRegistry> {
    let mut transformers = TransformerRegistry::new();
    transformers
        .register("os", Box::new(OpenStackTransformer::new()))
        .map_err(|e| anyhow::anyhow!("transformer registration failed: {}", e))?;
    transformers
        .register("k8s", Box::new(KubernetesTransformer::new()))
        .map_err(|e| anyhow::anyhow!("transformer registration failed: {}", e))?;
    Ok(transformers)
}

/// Wall-clock timestamp stamped onto `Metadata` nodes.
fn scan_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Write the current process PID to a file.
///
/// Uses `create_new` so a stale or concurrent instance is detected
/// atomically instead of being overwritten.
fn write_pid_file(path: &Path) -> Result<()> {
    use std::fs::{self, OpenOptions};
    use std::io::{ErrorKind, Write};

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pid = std::process::id();
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let existing = fs::read_to_string(path).unwrap_or_else(|_| "unknown".to_owned());
            return Err(anyhow::anyhow!(
                "PID file {} already exists with PID: {}. Is another instance running?",
                path.display(),
                existing.trim()
            ));
        }
        Err(e) => return Err(e.into()),
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    writeln!(file, "{}", pid)?;
    tracing::info!(pid = pid, path = %path.display(), "PID file written");
    Ok(())
}

/// Remove the PID file on daemon shutdown.
///
/// Logs a warning but does not fail if the file cannot be removed.
fn remove_pid_file(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove PID file");
    } else {
        tracing::info!(path = %path.display(), "PID file removed");
    }
}
