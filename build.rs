//! Build script for the relay.
//!
//! Copies the `.env.example` template into the local data directory the relay
//! reads its `.env` from, so a fresh install has a configuration template next
//! to the place it is expected:
//! - Linux: `~/.local/share/tunerelay/.env.example`
//! - macOS: `~/Library/Application Support/tunerelay/.env.example`
//! - Windows: `%LOCALAPPDATA%/tunerelay/.env.example`
//!
//! A missing template or an unwritable data directory only produces a cargo
//! warning.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("tunerelay");

    if env_example_path.is_file() {
        let copied = fs::create_dir_all(&out_dir)
            .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")));
        if let Err(e) = copied {
            println!(
                "cargo:warning=could not copy .env.example to {}: {}",
                out_dir.display(),
                e
            );
        }
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
