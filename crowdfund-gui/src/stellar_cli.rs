//! Collaborators backed by the `stellar` command line tool.
//!
//! The CLI already knows how to simulate contract calls, build transaction
//! envelopes, sign with stored keys and submit to Soroban RPC. Each operation
//! here is one CLI invocation:
//!
//! | Operation         | Command                                                |
//! |-------------------|--------------------------------------------------------|
//! | connect wallet    | `stellar keys address <identity>`                      |
//! | contract read     | `stellar contract invoke ... --send=no -- <fn>`        |
//! | build donation    | `stellar contract invoke ... --build-only -- donate`   |
//! | sign              | `stellar tx sign --sign-with-key <identity>`           |
//! | hash              | `stellar tx hash`                                      |
//! | send and confirm  | `stellar tx send`                                      |
//!
//! Child processes are killed when their future is dropped, so aborting a read
//! task also stops the CLI call behind it.

use std::process::Stdio;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::watch;

use crowdfund::{
    AccountId, ClientError, ClientParams, ContractClient, ContractClientFactory, NetworkConfig,
    SubmissionPipeline, SubmitError, SubmittedTransaction, UnsignedTransaction, WalletError,
    WalletProvider, WalletSession,
};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to start {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{bin} exited with {code:?}: {stderr}")]
    Failed {
        bin: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Handle to the `stellar` executable.
#[derive(Debug, Clone)]
pub struct StellarCli {
    bin: String,
}

impl StellarCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Run the CLI with `args`, optionally feeding `stdin`, and return trimmed stdout.
    pub async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<String, CliError> {
        log::debug!("→ {} {}", self.bin, args.join(" "));

        let mut child = Command::new(&self.bin)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CliError::Spawn {
                bin: self.bin.clone(),
                source,
            })?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input.as_bytes()).await?;
            pipe.write_all(b"\n").await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(CliError::Failed {
                bin: self.bin.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Wallet provider
// ============================================================================

/// Wallet backed by a `stellar keys` identity.
pub struct StellarCliWallet {
    cli: StellarCli,
    identity: String,
    session_tx: watch::Sender<WalletSession>,
}

impl StellarCliWallet {
    pub fn new(cli: StellarCli, identity: impl Into<String>) -> Self {
        let (session_tx, _) = watch::channel(WalletSession::disconnected());
        Self {
            cli,
            identity: identity.into(),
            session_tx,
        }
    }
}

#[async_trait]
impl WalletProvider for StellarCliWallet {
    fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.session_tx.subscribe()
    }

    async fn connect(&self) -> Result<WalletSession, WalletError> {
        let out = self
            .cli
            .run(&args(["keys", "address", &self.identity]), None)
            .await
            .map_err(|e| WalletError::Unavailable(e.to_string()))?;
        let address = AccountId::from_string(&out)?;
        log::info!("🔑 Identity '{}' resolved to {}", self.identity, address);

        let session = WalletSession::connected(address);
        self.session_tx.send_replace(session.clone());
        Ok(session)
    }

    async fn disconnect(&self) {
        self.session_tx.send_replace(WalletSession::disconnected());
    }
}

// ============================================================================
// Contract client
// ============================================================================

/// Crowdfunding contract client that shells out to `stellar contract invoke`.
pub struct StellarCliContract {
    cli: StellarCli,
    params: ClientParams,
}

impl StellarCliContract {
    pub fn new(cli: StellarCli, params: ClientParams) -> Self {
        Self { cli, params }
    }

    fn invoke_args(&self, mode: &str, function: &str, fn_args: &[String]) -> Vec<String> {
        let network = &self.params.network;
        let mut out = args([
            "contract",
            "invoke",
            "--id",
            &network.contract_id,
            "--source-account",
            self.params.public_key.as_str(),
            "--rpc-url",
            &network.rpc_url,
            "--network-passphrase",
            &network.passphrase,
            mode,
            "--",
            function,
        ]);
        out.extend(fn_args.iter().cloned());
        out
    }

    async fn read(&self, function: &str) -> Result<String, ClientError> {
        self.cli
            .run(&self.invoke_args("--send=no", function, &[]), None)
            .await
            .map_err(|e| ClientError::call(function, e.to_string()))
    }
}

/// Parse a simulated return value printed as JSON (`"500000000"` or `50`).
pub fn parse_number<T: FromStr>(function: &str, raw: &str) -> Result<T, ClientError> {
    raw.trim()
        .trim_matches('"')
        .parse()
        .map_err(|_| ClientError::invalid_result(function, raw))
}

pub fn parse_bool(function: &str, raw: &str) -> Result<bool, ClientError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ClientError::invalid_result(function, raw)),
    }
}

#[async_trait]
impl ContractClient for StellarCliContract {
    async fn get_total_raised(&self) -> Result<i128, ClientError> {
        parse_number("get_total_raised", &self.read("get_total_raised").await?)
    }

    async fn get_goal(&self) -> Result<i128, ClientError> {
        parse_number("get_goal", &self.read("get_goal").await?)
    }

    async fn get_deadline(&self) -> Result<u64, ClientError> {
        parse_number("get_deadline", &self.read("get_deadline").await?)
    }

    async fn is_goal_reached(&self) -> Result<bool, ClientError> {
        parse_bool("is_goal_reached", &self.read("is_goal_reached").await?)
    }

    async fn is_ended(&self) -> Result<bool, ClientError> {
        parse_bool("is_ended", &self.read("is_ended").await?)
    }

    async fn get_progress_percentage(&self) -> Result<u32, ClientError> {
        parse_number(
            "get_progress_percentage",
            &self.read("get_progress_percentage").await?,
        )
    }

    async fn donate(
        &self,
        donor: &AccountId,
        amount: i128,
    ) -> Result<UnsignedTransaction, ClientError> {
        let fn_args = args([
            "--donor",
            donor.as_str(),
            "--amount",
            &amount.to_string(),
        ]);
        let xdr = self
            .cli
            .run(&self.invoke_args("--build-only", "donate", &fn_args), None)
            .await
            .map_err(|e| ClientError::call("donate", e.to_string()))?;

        if xdr.is_empty() || xdr.contains(char::is_whitespace) {
            return Err(ClientError::invalid_result("donate", xdr));
        }
        Ok(UnsignedTransaction { xdr })
    }
}

/// Creates [`StellarCliContract`]s. No process is started until the first call.
pub struct StellarCliFactory {
    cli: StellarCli,
}

impl StellarCliFactory {
    pub fn new(cli: StellarCli) -> Self {
        Self { cli }
    }
}

impl ContractClientFactory for StellarCliFactory {
    fn create(&self, params: ClientParams) -> Arc<dyn ContractClient> {
        Arc::new(StellarCliContract::new(self.cli.clone(), params))
    }
}

// ============================================================================
// Submission pipeline
// ============================================================================

/// Signs with a `stellar keys` identity and submits through Soroban RPC.
pub struct StellarCliPipeline {
    cli: StellarCli,
    identity: String,
    network: NetworkConfig,
}

impl StellarCliPipeline {
    pub fn new(cli: StellarCli, identity: impl Into<String>, network: NetworkConfig) -> Self {
        Self {
            cli,
            identity: identity.into(),
            network,
        }
    }

    fn network_args(&self) -> Vec<String> {
        args([
            "--rpc-url",
            &self.network.rpc_url,
            "--network-passphrase",
            &self.network.passphrase,
        ])
    }
}

/// Inspect `stellar tx send` output for an on-chain failure.
///
/// The CLI prints the final transaction response as JSON. Anything that is not
/// JSON, or has no failing status, counts as confirmed since the command itself
/// exited successfully.
pub fn check_send_output(hash: &str, out: &str) -> Result<(), SubmitError> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(out) else {
        return Ok(());
    };
    match value.get("status").and_then(|s| s.as_str()) {
        Some(status @ ("FAILED" | "ERROR")) => Err(SubmitError::Rejected {
            hash: hash.to_string(),
            reason: status.to_string(),
        }),
        _ => Ok(()),
    }
}

#[async_trait]
impl SubmissionPipeline for StellarCliPipeline {
    async fn submit(&self, tx: UnsignedTransaction) -> Result<SubmittedTransaction, SubmitError> {
        let mut sign_args = args(["tx", "sign", "--sign-with-key", &self.identity]);
        sign_args.extend(self.network_args());
        let signed = self
            .cli
            .run(&sign_args, Some(&tx.xdr))
            .await
            .map_err(|e| SubmitError::Sign(e.to_string()))?;

        let hash_args = args([
            "tx",
            "hash",
            "--network-passphrase",
            &self.network.passphrase,
        ]);
        let hash = self
            .cli
            .run(&hash_args, Some(&signed))
            .await
            .map_err(|e| SubmitError::Sign(e.to_string()))?;
        log::info!("📤 Sending transaction {}", hash);

        let mut send_args = args(["tx", "send"]);
        send_args.extend(self.network_args());
        let out = self
            .cli
            .run(&send_args, Some(&signed))
            .await
            .map_err(|e| SubmitError::Send(e.to_string()))?;

        check_send_output(&hash, &out)?;
        Ok(SubmittedTransaction { hash })
    }
}
