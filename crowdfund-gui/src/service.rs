//! Background service task: single `select!` loop owning every collaborator.
//!
//! The service receives [`UiEvent`]s from the UI thread, watches the wallet
//! provider for session changes, and sends [`ServiceEvent`]s back. Contract
//! reads run as tasks in a [`JoinSet`] tagged with the client generation they
//! were started for, so a read that outlives its client is dropped instead of
//! overwriting newer state. Within a generation each kind of read carries a
//! sequence number and only the most recently started one is applied.
//! Wallet connects and donations run as their own tasks, so the loop keeps
//! serving reads and cancellation while they are pending. Cancelling the token
//! aborts everything in flight.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crowdfund::{
    parse_xlm, resolve_client, AccountId, BalanceSource, CampaignStatus, CampaignUpdate,
    ClientError, ContractClient, ContractClientFactory, NativeBalance, NetworkConfig,
    RefreshGroup, SubmissionPipeline, SubmittedTransaction, WalletError, WalletProvider,
    WalletSession,
};

use crate::events::{DonationStage, ServiceEvent, UiEvent};

/// External collaborators the controller drives.
#[derive(Clone)]
pub struct Collaborators {
    pub wallet: Arc<dyn WalletProvider>,
    pub balances: Arc<dyn BalanceSource>,
    pub contracts: Arc<dyn ContractClientFactory>,
    pub pipeline: Arc<dyn SubmissionPipeline>,
    pub network: NetworkConfig,
}

/// Result of one background read.
#[derive(Debug)]
enum ReadOutput {
    /// `None` when the status read failed and prior values should stay.
    Campaign(Option<CampaignUpdate>),
    Balance(NativeBalance),
}

/// What a background read refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ReadKey {
    Campaign(RefreshGroup),
    Balance,
}

/// Identifies one started read.
#[derive(Debug, Clone, Copy)]
struct ReadTag {
    generation: u64,
    key: ReadKey,
    seq: u64,
}

type ReadSet = JoinSet<(ReadTag, ReadOutput)>;

#[derive(Debug)]
enum DonationOutcome {
    Confirmed(SubmittedTransaction),
    Failed { stage: DonationStage, reason: String },
}

/// Run the service loop until the cancellation token fires.
pub async fn run(
    token: CancellationToken,
    mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    svc_tx: mpsc::UnboundedSender<ServiceEvent>,
    collab: Collaborators,
) {
    let mut session_rx = collab.wallet.subscribe();
    let mut wallet_open = true;
    let mut reads = ReadSet::new();
    let mut donation: Option<JoinHandle<DonationOutcome>> = None;
    let mut connecting: Option<JoinHandle<Result<WalletSession, WalletError>>> = None;

    let mut state = ServiceState::new(svc_tx, collab);
    let initial = session_rx.borrow_and_update().clone();
    state.set_session(initial, &mut reads);

    log::info!(
        "🚀 Service loop started ({}, contract {})",
        state.collab.network.network,
        state.collab.network.contract_id
    );

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                log::info!("🛑 Service loop shutting down");
                break;
            }

            changed = session_rx.changed(), if wallet_open => {
                match changed {
                    Ok(()) => {
                        let session = session_rx.borrow_and_update().clone();
                        if session != state.session {
                            state.set_session(session, &mut reads);
                        }
                    }
                    Err(_) => {
                        log::warn!("Wallet provider closed its session channel");
                        wallet_open = false;
                    }
                }
            }

            Some(joined) = reads.join_next() => {
                match joined {
                    Ok((tag, output)) if state.is_current(&tag) => {
                        state.handle_read(output, &mut reads);
                    }
                    Ok((tag, _)) => {
                        log::debug!(
                            "Discarding superseded {:?} read (generation {}, seq {})",
                            tag.key,
                            tag.generation,
                            tag.seq
                        );
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => log::error!("Read task failed: {}", e),
                }
            }

            outcome = async {
                match donation.as_mut() {
                    Some(handle) => handle.await,
                    None => std::future::pending().await,
                }
            } => {
                donation = None;
                let outcome = outcome.unwrap_or_else(|e| DonationOutcome::Failed {
                    stage: DonationStage::Submit,
                    reason: format!("donation task ended unexpectedly: {}", e),
                });
                state.finish_donation(outcome, &mut reads);
            }

            result = async {
                match connecting.as_mut() {
                    Some(handle) => handle.await,
                    None => std::future::pending().await,
                }
            } => {
                connecting = None;
                match result {
                    // The new session arrives through the watch channel.
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => {
                        log::warn!("Wallet connect failed: {}", e);
                        state.send(ServiceEvent::Error(e.to_string()));
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => log::error!("Wallet connect task failed: {}", e),
                }
            }

            event = ui_rx.recv() => {
                let Some(event) = event else {
                    log::info!("UI channel closed, stopping service");
                    break;
                };
                match event {
                    UiEvent::Shutdown => break,

                    UiEvent::ConnectWallet => {
                        if connecting.is_some() {
                            log::debug!("Wallet connect already in flight");
                        } else {
                            let wallet = state.collab.wallet.clone();
                            connecting =
                                Some(tokio::spawn(async move { wallet.connect().await }));
                        }
                    }

                    UiEvent::DisconnectWallet => {
                        if let Some(handle) = connecting.take() {
                            handle.abort();
                        }
                        state.collab.wallet.disconnect().await;
                    }

                    UiEvent::Refresh => {
                        state.refresh_all(&mut reads);
                    }

                    UiEvent::Donate { amount } => {
                        if donation.is_some() {
                            log::debug!("Donation already in flight, ignoring submit");
                        } else {
                            donation = state.start_donation(&amount);
                        }
                    }
                }
            }
        }
    }

    reads.abort_all();
    if let Some(handle) = donation.take() {
        handle.abort();
    }
    if let Some(handle) = connecting.take() {
        handle.abort();
    }
}

/// Mutable service-side state: the resolved client and its generation.
struct ServiceState {
    svc_tx: mpsc::UnboundedSender<ServiceEvent>,
    collab: Collaborators,
    session: WalletSession,
    client: Option<Arc<dyn ContractClient>>,
    /// Bumped on every client change.
    generation: u64,
    /// Last total seen, to retrigger the status read when it moves.
    last_total: i128,
    /// Sequence number of the most recently started read of each kind.
    latest: HashMap<ReadKey, u64>,
    next_seq: u64,
}

impl ServiceState {
    fn new(svc_tx: mpsc::UnboundedSender<ServiceEvent>, collab: Collaborators) -> Self {
        Self {
            svc_tx,
            collab,
            session: WalletSession::disconnected(),
            client: None,
            generation: 0,
            last_total: 0,
            latest: HashMap::new(),
            next_seq: 0,
        }
    }

    fn send(&self, event: ServiceEvent) {
        let _ = self.svc_tx.send(event);
    }

    /// Re-resolve the contract client for a new session and restart reads.
    fn set_session(&mut self, session: WalletSession, reads: &mut ReadSet) {
        reads.abort_all();
        self.latest.clear();
        self.generation += 1;
        self.client = resolve_client(
            &session,
            &self.collab.network,
            self.collab.contracts.as_ref(),
        );
        self.session = session;

        match self.session.address() {
            Some(address) => log::info!("🔗 Wallet connected: {}", address),
            None => log::info!("🔌 Wallet disconnected"),
        }

        self.send(ServiceEvent::SessionChanged {
            session: self.session.clone(),
            has_client: self.client.is_some(),
        });
        self.refresh_all(reads);
    }

    /// Start a new read of `key`, superseding any earlier one still running.
    fn tag(&mut self, key: ReadKey) -> ReadTag {
        self.next_seq += 1;
        self.latest.insert(key, self.next_seq);
        ReadTag {
            generation: self.generation,
            key,
            seq: self.next_seq,
        }
    }

    fn is_current(&self, tag: &ReadTag) -> bool {
        tag.generation == self.generation && self.latest.get(&tag.key) == Some(&tag.seq)
    }

    fn refresh_all(&mut self, reads: &mut ReadSet) {
        for group in RefreshGroup::ALL {
            self.spawn_refresh(group, reads);
        }
        self.spawn_balance(reads);
    }

    fn spawn_refresh(&mut self, group: RefreshGroup, reads: &mut ReadSet) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let tag = self.tag(ReadKey::Campaign(group));
        reads.spawn(async move {
            let update = refresh(client.as_ref(), group).await;
            (tag, ReadOutput::Campaign(update))
        });
    }

    fn spawn_balance(&mut self, reads: &mut ReadSet) {
        let Some(address) = self.session.address().cloned() else {
            return;
        };
        let balances = self.collab.balances.clone();
        let tag = self.tag(ReadKey::Balance);
        reads.spawn(async move {
            let balance = balances.fetch(&address).await.unwrap_or_else(|e| {
                log::warn!("Balance fetch for {} failed: {}", address, e);
                NativeBalance::Unavailable
            });
            (tag, ReadOutput::Balance(balance))
        });
    }

    fn handle_read(&mut self, output: ReadOutput, reads: &mut ReadSet) {
        match output {
            ReadOutput::Campaign(Some(update)) => {
                if let CampaignUpdate::Total(total) = update {
                    if total != self.last_total {
                        self.last_total = total;
                        self.spawn_refresh(RefreshGroup::Status, reads);
                    }
                }
                self.send(ServiceEvent::Campaign(update));
            }
            ReadOutput::Campaign(None) => {}
            ReadOutput::Balance(balance) => {
                self.send(ServiceEvent::BalanceUpdated(balance));
            }
        }
    }

    /// Check the submit guard, validate the amount and spawn the donation.
    ///
    /// Guard violations are silent: nothing is sent and nothing changes.
    fn start_donation(&self, amount: &str) -> Option<JoinHandle<DonationOutcome>> {
        let client = self.client.clone()?;
        let donor = self.session.address()?.clone();
        if amount.trim().is_empty() {
            return None;
        }

        let stroops = match parse_xlm(amount) {
            Ok(stroops) => stroops,
            Err(e) => {
                log::warn!("Rejected donation amount {:?}: {}", amount, e);
                self.send(ServiceEvent::DonationRejected(e));
                return None;
            }
        };

        self.send(ServiceEvent::DonationStarted { stroops });
        let pipeline = self.collab.pipeline.clone();
        Some(tokio::spawn(donate(client, pipeline, donor, stroops)))
    }

    fn finish_donation(&mut self, outcome: DonationOutcome, reads: &mut ReadSet) {
        match outcome {
            DonationOutcome::Confirmed(tx) => {
                log::info!("✅ Donation confirmed: {}", tx.hash);
                self.send(ServiceEvent::DonationConfirmed { hash: tx.hash });
                self.spawn_refresh(RefreshGroup::Total, reads);
                self.spawn_balance(reads);
            }
            DonationOutcome::Failed { stage, reason } => {
                self.send(ServiceEvent::DonationFailed { stage, reason });
            }
        }
    }
}

/// Run one refresh group against the client.
///
/// Total, goal and deadline fall back to 0 on failure. The status read keeps
/// prior values on failure, so it yields `None`.
async fn refresh(client: &dyn ContractClient, group: RefreshGroup) -> Option<CampaignUpdate> {
    match group {
        RefreshGroup::Total => Some(CampaignUpdate::Total(
            client.get_total_raised().await.unwrap_or_else(|e| {
                log::warn!("Error fetching total raised: {}", e);
                0
            }),
        )),
        RefreshGroup::Goal => Some(CampaignUpdate::Goal(client.get_goal().await.unwrap_or_else(
            |e| {
                log::warn!("Error fetching goal: {}", e);
                0
            },
        ))),
        RefreshGroup::Deadline => Some(CampaignUpdate::Deadline(
            client.get_deadline().await.unwrap_or_else(|e| {
                log::warn!("Error fetching deadline: {}", e);
                0
            }),
        )),
        RefreshGroup::Status => match fetch_status(client).await {
            Ok(status) => Some(CampaignUpdate::Status(status)),
            Err(e) => {
                log::warn!("Error fetching campaign status: {}", e);
                None
            }
        },
    }
}

async fn fetch_status(client: &dyn ContractClient) -> Result<CampaignStatus, ClientError> {
    let is_goal_reached = client.is_goal_reached().await?;
    let is_ended = client.is_ended().await?;
    let progress_percentage = client.get_progress_percentage().await?;
    Ok(CampaignStatus {
        is_goal_reached,
        is_ended,
        progress_percentage,
    })
}

/// Build the donate transaction and hand it to the pipeline.
async fn donate(
    client: Arc<dyn ContractClient>,
    pipeline: Arc<dyn SubmissionPipeline>,
    donor: AccountId,
    stroops: i128,
) -> DonationOutcome {
    log::info!("💸 Donating {} stroops from {}", stroops, donor);

    let tx = match client.donate(&donor, stroops).await {
        Ok(tx) => tx,
        Err(e) => {
            log::error!("Failed to create donation transaction: {}", e);
            return DonationOutcome::Failed {
                stage: DonationStage::Build,
                reason: e.to_string(),
            };
        }
    };

    match pipeline.submit(tx).await {
        Ok(submitted) => DonationOutcome::Confirmed(submitted),
        Err(e) => {
            log::error!("Donation failed: {}", e);
            DonationOutcome::Failed {
                stage: DonationStage::Submit,
                reason: e.to_string(),
            }
        }
    }
}
