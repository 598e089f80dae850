//! Trauma Tree - command-line access to the envelope crypto and timeline filter.
//!
//! Useful for inspecting exported trees and checking envelopes by hand.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use trauma_tree::config::CliSettings;
use trauma_tree::crypto::{
    decrypt, derive_key_with_params, encrypt, generate_salt, hash_passphrase, parse_envelope,
    DerivedKey,
};
use trauma_tree::filter::{derive_groups, TimelineFilter, TimelineFilterState};
use trauma_tree::TreeData;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "trauma-tree")]
#[command(author, version, long_about = None)]
#[command(about = "Envelope encryption and timeline filtering for trauma trees")]
struct Cli {
    /// Settings file (default: ./trauma-tree.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh base64 salt
    Salt,

    /// Print the SHA-256 fingerprint of a passphrase
    Hash,

    /// Encrypt text into an envelope
    Encrypt {
        /// Base64 salt (default: from settings)
        #[arg(long)]
        salt: Option<String>,

        /// Input file to encrypt
        #[arg(long, conflicts_with = "data")]
        input: Option<PathBuf>,

        /// String data to encrypt
        #[arg(long, conflicts_with = "input")]
        data: Option<String>,
    },

    /// Decrypt an envelope back to text
    Decrypt {
        /// Base64 salt (default: from settings)
        #[arg(long)]
        salt: Option<String>,

        /// File holding the envelope JSON
        #[arg(long, conflicts_with = "data")]
        input: Option<PathBuf>,

        /// Envelope JSON
        #[arg(long, conflicts_with = "input")]
        data: Option<String>,
    },

    /// List the person groups derived from a tree
    Groups {
        /// Decrypted tree JSON
        tree: PathBuf,
    },

    /// Compute dimmed entities for a tree and filter state
    Filter {
        /// Decrypted tree JSON
        tree: PathBuf,

        /// Filter state JSON (default: no filters)
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings_path = cli.config.unwrap_or_else(CliSettings::default_path);
    let settings = CliSettings::load(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;
    init_logging(&settings);

    match cli.command {
        Commands::Salt => {
            println!("{}", generate_salt());
            Ok(())
        }
        Commands::Hash => {
            let passphrase = prompt_passphrase("Passphrase: ")?;
            println!("{}", hash_passphrase(&passphrase));
            Ok(())
        }
        Commands::Encrypt { salt, input, data } => {
            cmd_encrypt(&settings, salt.as_deref(), input, data)
        }
        Commands::Decrypt { salt, input, data } => {
            cmd_decrypt(&settings, salt.as_deref(), input, data)
        }
        Commands::Groups { tree } => cmd_groups(&tree),
        Commands::Filter { tree, state } => cmd_filter(&tree, state.as_deref()),
    }
}

fn init_logging(settings: &CliSettings) {
    let fallback = settings.log_level.as_deref().unwrap_or("warn");
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .try_init();
}

fn prompt_passphrase(prompt: &str) -> anyhow::Result<String> {
    match rpassword::prompt_password(prompt) {
        Ok(passphrase) => Ok(passphrase),
        Err(_) => {
            eprint!("{}", prompt);
            io::stderr().flush()?;
            let mut passphrase = String::new();
            io::stdin().read_line(&mut passphrase)?;
            Ok(passphrase.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}

fn read_input(input: Option<PathBuf>, data: Option<String>) -> anyhow::Result<String> {
    Ok(match (input, data) {
        (Some(path), None) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, Some(s)) => s,
        (None, None) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        (Some(_), Some(_)) => unreachable!(),
    })
}

fn unlock(settings: &CliSettings, salt: Option<&str>) -> anyhow::Result<DerivedKey> {
    let Some(salt) = salt.or(settings.salt.as_deref()) else {
        bail!("no salt given: pass --salt or set \"salt\" in the settings file");
    };
    let passphrase = prompt_passphrase("Passphrase: ")?;
    Ok(derive_key_with_params(&passphrase, salt, &settings.kdf_params())?)
}

fn cmd_encrypt(
    settings: &CliSettings,
    salt: Option<&str>,
    input: Option<PathBuf>,
    data: Option<String>,
) -> anyhow::Result<()> {
    let plaintext = read_input(input, data)?;
    let key = unlock(settings, salt)?;

    let blob = encrypt(&plaintext, &key)?;
    println!("{}", serde_json::to_string(&blob)?);
    Ok(())
}

fn cmd_decrypt(
    settings: &CliSettings,
    salt: Option<&str>,
    input: Option<PathBuf>,
    data: Option<String>,
) -> anyhow::Result<()> {
    let envelope = read_input(input, data)?;
    let blob = parse_envelope(envelope.trim())?;
    let key = unlock(settings, salt)?;

    let plaintext = decrypt(&blob, &key).map_err(|e| {
        if e.is_decrypt_error() {
            anyhow::anyhow!("wrong passphrase or damaged envelope ({})", e)
        } else {
            e.into()
        }
    })?;
    io::stdout().write_all(plaintext.as_bytes())?;
    Ok(())
}

fn cmd_groups(tree_path: &Path) -> anyhow::Result<()> {
    let tree = TreeData::load(tree_path)
        .with_context(|| format!("loading tree from {}", tree_path.display()))?;

    for (key, members) in derive_groups(&tree) {
        let members: Vec<&str> = members.iter().map(String::as_str).collect();
        println!("{:<20} {}", key, members.join(", "));
    }
    Ok(())
}

fn cmd_filter(tree_path: &Path, state_path: Option<&Path>) -> anyhow::Result<()> {
    let tree = TreeData::load(tree_path)
        .with_context(|| format!("loading tree from {}", tree_path.display()))?;
    let state: TimelineFilterState = match state_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing filter state {}", path.display()))?
        }
        None => TimelineFilterState::default(),
    };

    let filter = TimelineFilter::with_state(&tree, state);
    let dim = filter.dim_sets(&tree);
    let output = serde_json::json!({
        "filter_mode": filter.state().filter_mode,
        "active_filter_count": filter.active_filter_count(),
        "dim_sets": &*dim,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
