//! ALFA PassVault - CLI
//!
//! Command-line front end for the crypto core.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use alfa_passvault::{
    generate, score, CharClass, CipherEngine, CipherRecord, MasterSecret, PasswordPolicy,
    VaultConfig, VaultSession,
};

#[derive(Parser)]
#[command(name = "alfa-pass")]
#[command(author = "Karen Tonoyan")]
#[command(version = alfa_passvault::VERSION)]
#[command(about = "ALFA PassVault - client-side password vault crypto")]
struct Cli {
    /// JSON config file (defaults, then ALFA_PASSVAULT_PBKDF2_ITERATIONS)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random password
    Generate {
        /// Password length
        #[arg(short, long, default_value_t = 20)]
        length: usize,

        /// Character classes (empty = alphanumeric)
        #[arg(short = 'k', long, value_enum, value_delimiter = ',', default_values_t = [ClassArg::Lower, ClassArg::Upper, ClassArg::Digit, ClassArg::Symbol])]
        classes: Vec<ClassArg>,

        /// Skip look-alike characters
        #[arg(long)]
        no_ambiguous: bool,
    },

    /// Score a password
    Score {
        password: String,
    },

    /// Encrypt a field
    Encrypt {
        plaintext: String,

        /// Master secret (prompted for when omitted)
        #[arg(short, long)]
        secret: Option<String>,

        /// Write the record here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Emit the legacy `iv:salt` packed form
        #[arg(long)]
        packed: bool,
    },

    /// Decrypt a record file
    Decrypt {
        record: PathBuf,

        /// Master secret (prompted for when omitted)
        #[arg(short, long)]
        secret: Option<String>,
    },

    /// Unlock a session against an optional sample record
    Unlock {
        /// Sample record (omit for an empty vault)
        record: Option<PathBuf>,

        /// Master secret (prompted for when omitted)
        #[arg(short, long)]
        secret: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassArg {
    Lower,
    Upper,
    Digit,
    Symbol,
}

impl From<ClassArg> for CharClass {
    fn from(arg: ClassArg) -> Self {
        match arg {
            ClassArg::Lower => CharClass::Lower,
            ClassArg::Upper => CharClass::Upper,
            ClassArg::Digit => CharClass::Digit,
            ClassArg::Symbol => CharClass::Symbol,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => VaultConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => VaultConfig::from_env()?,
    };
    let engine = CipherEngine::new(&config)?;

    match cli.command {
        Commands::Generate {
            length,
            classes,
            no_ambiguous,
        } => {
            let policy = PasswordPolicy {
                length,
                classes: classes.into_iter().map(CharClass::from).collect(),
                exclude_ambiguous: no_ambiguous,
            };
            let password = generate(&policy)?;
            let report = score(&password);
            println!("{}", password);
            println!("strength: {} ({}/100)", report.label.as_str(), report.value);
        }

        Commands::Score { password } => {
            let report = score(&password);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Encrypt {
            plaintext,
            secret,
            out,
            packed,
        } => {
            let secret = read_secret(secret)?;
            let record = engine.encrypt(plaintext.as_bytes(), &secret)?;
            let json = if packed {
                serde_json::to_string_pretty(&record.to_packed())?
            } else {
                record.to_json()?
            };

            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("✅ Record written to: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Decrypt { record: path, secret } => {
            let record = CipherRecord::load(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let secret = read_secret(secret)?;
            let plaintext = engine.decrypt(&record, &secret)?;
            println!("{}", String::from_utf8_lossy(&plaintext));
        }

        Commands::Unlock { record, secret } => {
            let sample = record
                .as_ref()
                .map(|path| {
                    CipherRecord::load(path).with_context(|| format!("reading {}", path.display()))
                })
                .transpose()?;

            let session = VaultSession::with_engine(engine);
            session.unlock(read_secret(secret)?, sample.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&session.status())?);
            session.lock();
        }
    }

    Ok(())
}

/// Take the secret from `--secret` or prompt for it without echo
fn read_secret(arg: Option<String>) -> Result<MasterSecret> {
    let password = match arg {
        Some(password) => password,
        None => rpassword::prompt_password("Master secret: ").context("reading master secret")?,
    };
    Ok(MasterSecret::from_password(password))
}
