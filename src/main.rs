//! Form Engine CLI
//!
//! Loads a form definition (initial values, schema, pending edits), applies
//! the edits through a form engine and submits it. Valid values are printed
//! as JSON on stdout; field errors go to stderr with a non-zero exit code.

use anyhow::{anyhow, Context, Result};
use form_engine::{submit_fn, EngineConfig, FormDefinition, FormEngine, FormOptions, SubmitOutcome};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = EngineConfig::load().unwrap_or_else(|err| {
        eprintln!("Warning: ignoring unreadable config: {err:#}");
        EngineConfig::default()
    });

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: form-engine <definition.json>"))?;
    let definition = FormDefinition::load(&path)
        .with_context(|| format!("Failed to load form definition {}", path.display()))?;

    let engine = FormEngine::new(
        FormOptions::new(
            definition.initial_values,
            definition.schema,
            submit_fn(|values| async move { Ok(values) }),
        )
        .with_messages(config.messages()),
    );

    for change in definition.changes {
        engine
            .set(&change.path, change.value)
            .with_context(|| format!("Failed to apply change to `{}`", change.path))?;
    }

    match engine.submit(None).await? {
        SubmitOutcome::Submitted(values) => {
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        SubmitOutcome::Rejected(errors) => {
            for (path, message) in errors.iter() {
                eprintln!("{path}: {message}");
            }
            std::process::exit(1);
        }
        SubmitOutcome::Ignored => {
            tracing::warn!("submit was ignored");
        }
    }

    Ok(())
}
