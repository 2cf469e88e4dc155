// src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "form_group", version, about = "Render settings panel definitions")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Render a panel definition (.toml or .json) to HTML
    Render {
        definition: PathBuf,
        /// Setting values overriding the definition's [values] table
        #[arg(long)]
        values: Option<PathBuf>,
    },
    /// Print the rendering path chosen for each type token
    Classify {
        #[arg(required = true)]
        types: Vec<String>,
        /// Treat these tokens as registered custom field types
        #[arg(long = "custom")]
        custom: Vec<String>,
    },
}
