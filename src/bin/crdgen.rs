//! # CRD Generator
//!
//! Generates the `EtcdProxy` CustomResourceDefinition YAML from the Rust type definitions.
//!
//! ## Usage
//!
//! ```bash
//! # Print the CRD
//! cargo run --bin crdgen > config/crd/etcdproxy.yaml
//!
//! # Write it to a file
//! cargo run --bin crdgen -- --output config/crd/etcdproxy.yaml
//!
//! # Generate and apply directly
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use etcdproxy_controller::crd::EtcdProxy;
use kube::core::CustomResourceExt;
use std::path::PathBuf;

/// Print the EtcdProxy CustomResourceDefinition
#[derive(Parser)]
#[command(name = "crdgen", about = "Generate the EtcdProxy CRD YAML", long_about = None)]
struct Cli {
    /// Write the CRD to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let yaml = serde_yaml::to_string(&EtcdProxy::crd())
        .context("Failed to serialize CRD to YAML")?;

    let document = format!(
        "# This file is auto-generated by crdgen\n# DO NOT EDIT THIS FILE MANUALLY\n---\n{yaml}"
    );

    match cli.output {
        Some(path) => std::fs::write(&path, document)
            .with_context(|| format!("Failed to write CRD to {}", path.display()))?,
        None => print!("{document}"),
    }

    Ok(())
}
