//! Configuration module for the vault bootstrap tool

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    pubkey::Pubkey,
    signature::Keypair,
    signer::keypair::keypair_from_seed,
};
use staking_sdk::{LedgerConfig, ProgramConfig};
use std::{fs, path::PathBuf, str::FromStr, time::Duration};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Solana RPC URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Path to the authority keypair, signer and fee payer of every transaction
    #[serde(default = "default_keypair_path")]
    pub keypair_path: String,

    /// Staking program ID
    pub program_id: String,

    /// Reward token mint
    pub reward_mint: String,

    /// Commitment level transactions are confirmed at
    #[serde(default = "default_commitment")]
    pub commitment: String,

    #[serde(default = "default_skip_preflight")]
    pub skip_preflight: bool,

    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeoutConfig {
    /// Per-request RPC timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Time allowed for a transaction to reach the commitment, in seconds
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,

    /// Signature status polling interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            confirm_timeout_secs: default_confirm_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from file or environment variables
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Load from .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("Could not load .env file: {}", e);
        }

        let config = if let Some(path) = config_path {
            Self::from_file(path)?
        } else {
            Self::from_env()?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {}", path))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let var_or = |name: &str, default: String| std::env::var(name).unwrap_or(default);

        Ok(Config {
            rpc_url: var_or("RPC_URL", default_rpc_url()),
            keypair_path: var_or("KEYPAIR_PATH", default_keypair_path()),
            program_id: std::env::var("PROGRAM_ID")
                .context("PROGRAM_ID environment variable is required")?,
            reward_mint: std::env::var("REWARD_MINT")
                .context("REWARD_MINT environment variable is required")?,
            commitment: var_or("COMMITMENT", default_commitment()),
            skip_preflight: var_or("SKIP_PREFLIGHT", default_skip_preflight().to_string())
                .parse()
                .context("Invalid SKIP_PREFLIGHT")?,
            timeouts: TimeoutConfig {
                request_timeout_secs: var_or(
                    "REQUEST_TIMEOUT_SECS",
                    default_request_timeout_secs().to_string(),
                )
                .parse()
                .context("Invalid REQUEST_TIMEOUT_SECS")?,
                confirm_timeout_secs: var_or(
                    "CONFIRM_TIMEOUT_SECS",
                    default_confirm_timeout_secs().to_string(),
                )
                .parse()
                .context("Invalid CONFIRM_TIMEOUT_SECS")?,
                poll_interval_ms: var_or("POLL_INTERVAL_MS", default_poll_interval_ms().to_string())
                    .parse()
                    .context("Invalid POLL_INTERVAL_MS")?,
            },
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.rpc_url.starts_with("http") {
            bail!("RPC URL must start with http or https");
        }

        let keypair_path = self.keypair_path();
        if !keypair_path.exists() {
            bail!("Keypair file does not exist: {}", keypair_path.display());
        }

        self.program_config()?;
        self.commitment_config()?;

        if self.timeouts.confirm_timeout_secs == 0 {
            bail!("confirm_timeout_secs must be greater than zero");
        }
        if self.timeouts.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn program_config(&self) -> Result<ProgramConfig> {
        let program_id = Pubkey::from_str(&self.program_id).context("Invalid program ID")?;
        let reward_mint = Pubkey::from_str(&self.reward_mint).context("Invalid reward mint")?;
        Ok(ProgramConfig::new(program_id, reward_mint))
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig> {
        let commitment = CommitmentLevel::from_str(&self.commitment)
            .map_err(|e| anyhow!("Invalid commitment {:?}: {}", self.commitment, e))?;
        Ok(CommitmentConfig { commitment })
    }

    pub fn ledger_config(&self) -> Result<LedgerConfig> {
        Ok(LedgerConfig {
            rpc_url: self.rpc_url.clone(),
            commitment: self.commitment_config()?,
            skip_preflight: self.skip_preflight,
            request_timeout: Duration::from_secs(self.timeouts.request_timeout_secs),
            confirm_timeout: Duration::from_secs(self.timeouts.confirm_timeout_secs),
            poll_interval: Duration::from_millis(self.timeouts.poll_interval_ms),
        })
    }

    /// Keypair path with `~` expanded
    pub fn keypair_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.keypair_path).into_owned())
    }

    /// Load the authority keypair from the configured path.
    ///
    /// Accepts the CLI's JSON byte array or 64 raw bytes. The keypair is
    /// rebuilt from the 32-byte secret seed; the stored public half is ignored.
    pub fn load_keypair(&self) -> Result<Keypair> {
        let path = self.keypair_path();
        let mut keypair_data = fs::read(&path)
            .with_context(|| format!("Failed to read keypair file: {}", path.display()))?;
        decode_keypair(&mut keypair_data)
    }
}

/// Rebuild a keypair from file contents. `data` is zeroed on every path.
fn decode_keypair(data: &mut Vec<u8>) -> Result<Keypair> {
    let parsed = if data.len() == 64 {
        Ok(std::mem::take(data))
    } else {
        serde_json::from_slice::<Vec<u8>>(data).context("Failed to parse keypair JSON")
    };
    data.fill(0);
    let mut secret = parsed?;

    let keypair = if secret.len() < 32 {
        Err(anyhow!("Keypair file holds {} bytes, expected at least 32", secret.len()))
    } else {
        keypair_from_seed(&secret[..32]).map_err(|e| anyhow!("Invalid keypair: {}", e))
    };
    secret.fill(0);
    keypair
}

// Default values
fn default_rpc_url() -> String { "https://api.devnet.solana.com".to_string() }
fn default_keypair_path() -> String { "~/.config/solana/id.json".to_string() }
fn default_commitment() -> String { "confirmed".to_string() }
fn default_skip_preflight() -> bool { true }
fn default_request_timeout_secs() -> u64 { 30 }
fn default_confirm_timeout_secs() -> u64 { 60 }
fn default_poll_interval_ms() -> u64 { 500 }
