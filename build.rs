//! Build script for monthlywrap.
//!
//! Copies the `.env.example` configuration template into the user's local
//! data directory so a fresh install has a template next to where
//! [`config::load_env`] looks for the real `.env`.
//!
//! - Linux: `~/.local/share/monthlywrap/.env.example`
//! - macOS: `~/Library/Application Support/monthlywrap/.env.example`
//! - Windows: `%LOCALAPPDATA%/monthlywrap/.env.example`
//!
//! A missing template only produces a cargo warning; directory or write
//! failures abort the build.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("monthlywrap");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
