//! sls-config CLI
//!
//! Entry point for the `sls-config` command-line tool.

use clap::{Parser, Subcommand};
use sls_config::{resolve, resolve_all, EffectiveConfig, ServiceManifest};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "sls-config")]
#[command(about = "Resolve effective serverless function configuration", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the effective configuration for one function or all
    Resolve {
        /// Path to the service manifest (default: service.yml)
        #[arg(long, short = 'm')]
        manifest: Option<PathBuf>,

        /// Function name (default: resolve every function)
        #[arg(long, short = 'f')]
        function: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate the service manifest
    Validate {
        /// Path to the service manifest (default: service.yml)
        #[arg(long, short = 'm')]
        manifest: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            manifest,
            function,
            json,
        } => {
            run_resolve(manifest, function, json);
        }
        Commands::Validate { manifest } => {
            run_validate(manifest);
        }
    }
}

fn manifest_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from("service.yml"))
}

fn load_manifest(path: Option<PathBuf>) -> ServiceManifest {
    let path = manifest_path(path);
    match ServiceManifest::from_file(&path) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run_resolve(manifest: Option<PathBuf>, function: Option<String>, json: bool) {
    let manifest = load_manifest(manifest);

    match function {
        Some(name) => {
            let function = match manifest.function(&name) {
                Ok(function) => function,
                Err(e) => {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            };
            let config = resolve(&manifest.provider, function)
                .named(&manifest.service, &name)
                .with_source_digest(manifest.source_digest.clone());
            print_config(&config, json);
        }
        None => {
            let configs = resolve_all(&manifest);
            if json {
                match serde_json::to_string_pretty(&configs) {
                    Ok(output) => println!("{}", output),
                    Err(e) => {
                        eprintln!("error: JSON serialization failed: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                for config in configs.values() {
                    print_human(config);
                    println!();
                }
            }
        }
    }
}

fn run_validate(manifest: Option<PathBuf>) {
    let path = manifest_path(manifest);
    match ServiceManifest::from_file(&path) {
        Ok(manifest) => {
            println!(
                "OK: '{}' valid ({} function(s))",
                manifest.service,
                manifest.functions.len()
            );
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn print_config(config: &EffectiveConfig, json: bool) {
    if json {
        match config.to_json() {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("error: JSON serialization failed: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_human(config);
    }
}

fn print_human(config: &EffectiveConfig) {
    if let Some(name) = &config.deployed_name {
        println!("{}", name);
    }
    println!("  handler:          {}", config.handler);
    println!("  runtime:          {}", config.runtime);
    println!("  memorySize:       {} MB", config.memory_size);
    println!("  timeout:          {} s", config.timeout);
    println!("  stage:            {}", config.stage);
    println!("  region:           {}", config.region);
    println!("  versionFunctions: {}", config.version_functions);
    if let Some(description) = &config.description {
        println!("  description:      {}", description);
    }
    if let Some(role) = &config.role {
        println!("  role:             {}", role);
    }
    if let Some(vpc) = &config.vpc {
        println!(
            "  vpc:              {} subnet(s), {} security group(s)",
            vpc.subnet_ids.len(),
            vpc.security_group_ids.len()
        );
    }
    if !config.environment.is_empty() {
        println!("  environment:");
        for (key, value) in &config.environment {
            println!("    {} = {}", key, value);
        }
    }
    if !config.tags.is_empty() {
        println!("  tags:");
        for (key, value) in &config.tags {
            println!("    {} = {}", key, value);
        }
    }
    if !config.iam_role_statements.is_empty() {
        println!(
            "  iamRoleStatements: {} statement(s)",
            config.iam_role_statements.len()
        );
    }
}
