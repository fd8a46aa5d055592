use crate::config::EnvConfig;
use anyhow::{Context, Result};
use libloc::Database;
use std::{path::Path, sync::Arc};
use tracing::trace;

/// Builds the template environment used for rendering map pages. Templates
/// are compiled into the binary so that rendering does not depend on the
/// working directory at runtime.
fn template_engine() -> Result<minijinja::Environment<'static>, minijinja::Error> {
    let mut jinja = minijinja::Environment::new();
    jinja.add_template("map.html", include_str!("../templates/map.html"))?;
    jinja.add_template(
        "map_placeholder.html",
        include_str!("../templates/map_placeholder.html"),
    )?;
    Ok(jinja)
}

#[derive(Debug)]
pub struct SharedState {
    pub db: Database,
    pub tmpl: minijinja::Environment<'static>,
    pub config: EnvConfig,
}

impl SharedState {
    pub async fn new(config: EnvConfig) -> Result<Self> {
        trace!("Creating shared app state");
        let db = Database::open(&config.database)
            .await
            .with_context(|| format!("Unable to open database {}", &config.database))?;
        Ok(Self {
            db,
            tmpl: template_engine().context("Failed to compile builtin templates")?,
            config,
        })
    }

    /// The path of the single map artifact slot
    pub fn map_path(&self) -> &Path {
        &self.config.map_file
    }

    #[cfg(test)]
    pub fn test(pool: sqlx::Pool<sqlx::Sqlite>) -> Self {
        use std::sync::atomic::{AtomicUsize, Ordering};

        // each test gets its own artifact slot so that parallel tests don't
        // observe each other's writes
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let map_file =
            std::env::temp_dir().join(format!("locweb-test-map-{}-{n}.html", std::process::id()));

        Self {
            db: Database::from(pool),
            tmpl: template_engine().expect("builtin templates failed to compile"),
            config: EnvConfig {
                listen: crate::config::ListenConfig {
                    host: "127.0.0.1".to_string(),
                    port: 8080,
                },
                database: "test-database.sqlite".to_string(),
                map_file,
                coordinate_limits: false,
            },
        }
    }
}

pub type AppState = Arc<SharedState>;
