use anyhow::Context;
use clap::{Parser, Subcommand};
use rowforge_core::config::RowforgeConfig;
use rowforge_core::descriptor::{EntityDescriptor, FieldKind};
use rowforge_core::record::Record;
use rowforge_web::{AppState, WebServer};
use serde_json::{Value, json};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rowforge", version, about = "Rowforge grid admin server")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the admin server
    Serve {
        /// Path to the YAML configuration
        #[arg(long, default_value = "rowforge.yaml")]
        config: PathBuf,

        /// Seed every store with a few demo records
        #[arg(long, default_value_t = false)]
        seed: bool,
    },

    /// Load and check a configuration file without serving
    Check {
        #[arg(long, default_value = "rowforge.yaml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve { config, seed } => {
            let config = RowforgeConfig::load(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            let state = AppState::new(config.clone());
            if seed {
                seed_demo(&state, &config)?;
            }
            WebServer::new(config.server.clone(), state).run().await?;
        }
        Command::Check { config } => {
            let path = config;
            let config = RowforgeConfig::load(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            println!(
                "{}: ok ({} entities, {} grids, {} users)",
                path.display(),
                config.entities.len(),
                config.grids.len(),
                config.users.len()
            );
        }
    }

    Ok(())
}

/// Write two sample records into every entity store so a fresh server has
/// something to click on.
fn seed_demo(state: &AppState, config: &RowforgeConfig) -> anyhow::Result<()> {
    let registry = config.registry();
    for grid in &config.grids {
        let Some(store) = state.store(&grid.entity) else {
            continue;
        };
        if !store.is_empty() {
            continue;
        }
        let Some(descriptor) = registry.get(&grid.entity) else {
            continue;
        };
        for n in 1..=2 {
            let mut record = Record::blank(descriptor);
            for field in &descriptor.fields {
                if record.get(&field.name).is_some() {
                    continue;
                }
                record.set(&field.name, sample_value(descriptor, &field.kind, n));
            }
            store
                .write(&mut record)
                .context("seeding demo records")?;
            tracing::info!(entity = %grid.entity, id = record.id, "seeded record");
        }
    }
    Ok(())
}

fn sample_value(descriptor: &EntityDescriptor, kind: &FieldKind, n: usize) -> Value {
    match kind {
        FieldKind::Text | FieldKind::Textarea => {
            json!(format!("Sample {} {}", descriptor.singular_name(), n))
        }
        FieldKind::Int => json!(n),
        FieldKind::Float => json!(n as f64),
        FieldKind::Bool => json!(false),
        FieldKind::Datetime => json!("2026-01-01T00:00:00Z"),
        FieldKind::Select { options } => {
            json!(options.first().cloned().unwrap_or_default())
        }
    }
}
