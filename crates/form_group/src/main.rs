mod cli;

use clap::Parser;
use color_eyre::Result;
use form_group::node::{div, text};
use form_group::{CustomFieldRegistry, FieldBucket, PanelDefinition, config};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::cli::{Cli, Cmd};

fn init_logging() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    match Cli::parse().cmd {
        Cmd::Render { definition, values } => {
            let definition = PanelDefinition::load(&definition)?;
            let mut state = definition.initial_state();
            if let Some(path) = values {
                for (key, value) in config::load_values(&path)? {
                    state.set(&key, value);
                }
                // overrides are the baseline, not edits
                state.commit();
            }

            let view = definition.to_panel(Default::default()).render(&mut state);
            if !view.failures.is_empty() {
                info!(failed = view.failures.len(), "some fields rendered as errors");
            }
            println!("{}", view.node.to_html());
        }
        Cmd::Classify { types, custom } => {
            let mut registry = CustomFieldRegistry::new();
            for key in custom {
                let label = key.clone();
                registry.register(key, move |_| div().child(text(label.clone())).into());
            }
            for field_type in types {
                println!("{field_type}\t{}", FieldBucket::classify(&field_type, &registry));
            }
        }
    }
    Ok(())
}
