//! Tricrypt CLI - Command line interface for envelope operations.
//!
//! Encrypts a text message into a single-line envelope and back. Envelopes
//! and plaintext go to stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use zeroize::Zeroizing;

use tricrypt_cipher::{CipherConfig, Envelope, SecureCipher, LAYER_COUNT};
use tricrypt_common::Error;
use tricrypt_crypto::KdfParams;

#[derive(Parser)]
#[command(name = "tricrypt")]
#[command(about = "Tricrypt - Three-layer password encryption for text messages")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// KDF strength: "standard", "moderate", or "interactive".
    #[arg(short, long, global = true, default_value = "standard")]
    strength: String,

    /// JSON configuration file (overrides --strength).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a message.
    Encrypt {
        /// Message to encrypt (read from stdin if omitted).
        message: Option<String>,

        /// Read the password from this environment variable instead of prompting.
        #[arg(long)]
        password_env: Option<String>,
    },

    /// Decrypt an envelope.
    Decrypt {
        /// Envelope to decrypt (read from stdin if omitted).
        envelope: Option<String>,

        /// Read the password from this environment variable instead of prompting.
        #[arg(long)]
        password_env: Option<String>,
    },

    /// Check an envelope's structure without decrypting it.
    Inspect {
        /// Envelope to inspect (read from stdin if omitted).
        envelope: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Encrypt {
            message,
            password_env,
        } => {
            let cipher = build_cipher(&cli.strength, cli.config.as_deref())?;
            cmd_encrypt(&cipher, message, password_env.as_deref())
        }

        Commands::Decrypt {
            envelope,
            password_env,
        } => {
            let cipher = build_cipher(&cli.strength, cli.config.as_deref())?;
            cmd_decrypt(&cipher, envelope, password_env.as_deref())
        }

        Commands::Inspect { envelope } => cmd_inspect(envelope),
    }
}

/// Map a strength name to KDF parameters.
fn kdf_params_for_strength(strength: &str) -> Result<KdfParams> {
    match strength {
        "standard" => Ok(KdfParams::standard()),
        "moderate" => Ok(KdfParams::moderate()),
        "interactive" => Ok(KdfParams::interactive()),
        _ => anyhow::bail!("Invalid strength. Use: standard, moderate, or interactive"),
    }
}

/// Build the cipher from a config file or a strength preset.
fn build_cipher(strength: &str, config_path: Option<&Path>) -> Result<SecureCipher> {
    let config = match config_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            CipherConfig::from_json(&json).context("Invalid configuration")?
        }
        None => CipherConfig::new(kdf_params_for_strength(strength)?),
    };

    info!(
        master_iterations = config.kdf.master_iterations,
        layer_iterations = config.kdf.layer_iterations,
        "Using KDF parameters"
    );
    SecureCipher::new(config).context("Invalid configuration")
}

/// Drop one trailing line ending left by terminals and pipes.
fn strip_line_ending(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

/// Use the argument if given, otherwise read all of stdin.
fn read_input(arg: Option<String>, what: &str) -> Result<Zeroizing<String>> {
    if let Some(value) = arg {
        return Ok(Zeroizing::new(value));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .with_context(|| format!("Failed to read {} from stdin", what))?;
    Ok(Zeroizing::new(strip_line_ending(buffer)))
}

/// Prompt for password securely.
fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    let password = rpassword::prompt_password(prompt).context("Failed to read password")?;
    Ok(Zeroizing::new(password))
}

/// Read the password from the named variable, or prompt for it.
fn read_password(password_env: Option<&str>, confirm: bool) -> Result<Zeroizing<String>> {
    if let Some(var) = password_env {
        let password = std::env::var(var)
            .with_context(|| format!("Environment variable {} is not set", var))?;
        return Ok(Zeroizing::new(password));
    }

    let password = prompt_password("Enter password: ")?;
    if confirm {
        let again = prompt_password("Confirm password: ")?;
        if *password != *again {
            anyhow::bail!("Passwords do not match");
        }
    }
    Ok(password)
}

/// Encrypt a message and print the envelope.
fn cmd_encrypt(cipher: &SecureCipher, message: Option<String>, password_env: Option<&str>) -> Result<()> {
    let message = read_input(message, "message")?;
    let password = read_password(password_env, true)?;

    info!("Encrypting message");
    let envelope = cipher
        .encrypt(&message, &password)
        .context("Encryption failed")?;

    println!("{}", envelope);
    Ok(())
}

/// Decrypt an envelope and print the plaintext.
fn cmd_decrypt(cipher: &SecureCipher, envelope: Option<String>, password_env: Option<&str>) -> Result<()> {
    let envelope = read_input(envelope, "envelope")?;
    let password = read_password(password_env, false)?;

    info!("Decrypting envelope");
    let plaintext = match cipher.decrypt(&envelope, &password) {
        Ok(plaintext) => Zeroizing::new(plaintext),
        Err(Error::Decrypt(e)) => anyhow::bail!("Decryption failed: {}", e),
        Err(e) => return Err(e).context("Decryption failed"),
    };

    println!("{}", *plaintext);
    Ok(())
}

/// Print an envelope's structure.
fn cmd_inspect(envelope: Option<String>) -> Result<()> {
    let text = read_input(envelope, "envelope")?;
    let envelope = Envelope::parse(&text).context("Malformed envelope")?;

    println!("Envelope structure:");
    println!("  Master salt: {} bytes", envelope.master_salt.as_bytes().len());
    for (index, layer) in envelope.layers.iter().enumerate() {
        println!(
            "  Layer {}: salt {} bytes, nonce {} bytes, tag {} bytes",
            index + 1,
            layer.salt.as_bytes().len(),
            layer.nonce.len(),
            layer.tag.len()
        );
    }
    println!("  Layers: {}", LAYER_COUNT);
    println!("  Ciphertext: {} bytes", envelope.ciphertext_len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_presets() {
        assert_eq!(kdf_params_for_strength("standard").unwrap(), KdfParams::standard());
        assert_eq!(kdf_params_for_strength("moderate").unwrap(), KdfParams::moderate());
        assert_eq!(
            kdf_params_for_strength("interactive").unwrap(),
            KdfParams::interactive()
        );
        assert!(kdf_params_for_strength("extreme").is_err());
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("envelope\n".to_string()), "envelope");
        assert_eq!(strip_line_ending("envelope\r\n".to_string()), "envelope");
        assert_eq!(strip_line_ending("two\n\n".to_string()), "two\n");
        assert_eq!(strip_line_ending("none".to_string()), "none");
    }

    #[test]
    fn test_build_cipher_from_strength() {
        let cipher = build_cipher("interactive", None).unwrap();
        assert_eq!(cipher.config().kdf, KdfParams::interactive());
        assert!(build_cipher("bogus", None).is_err());
    }
}
