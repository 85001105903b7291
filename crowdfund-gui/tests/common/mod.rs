//! Scripted collaborators and a harness around `service::run`.
//!
//! Events coming back from the service are applied to an [`AppState`] exactly
//! the way the UI does it, so tests assert on what would be rendered.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;

use crowdfund::{
    AccountId, BalanceError, BalanceSource, ClientError, ClientParams, ContractClient,
    ContractClientFactory, NativeBalance, NetworkConfig, SubmissionPipeline, SubmitError,
    SubmittedTransaction, UnsignedTransaction, WalletError, WalletProvider, WalletSession,
};
use crowdfund_gui::events::{ServiceEvent, UiEvent};
use crowdfund_gui::service::{self, Collaborators};
use crowdfund_gui::state::AppState;

pub const ALICE: &str = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";
pub const BOB: &str = "GA3D5KRYM6CB7OWQ6TWYRR3Z4T7GNZLKERYNZGGA5SOAOPIFY6YQHES5";
pub const CONTRACT_ID: &str = "CC3CBCAAYVNQQMBGDBTA7A7EIIMTLIWRW6S5STVE4TE2ETMWZ3RDZTRC";

pub fn account(s: &str) -> AccountId {
    AccountId::from_string(s).unwrap()
}

// ============================================================================
// Wallet
// ============================================================================

pub struct ScriptedWallet {
    tx: watch::Sender<WalletSession>,
    connect_to: Option<AccountId>,
    connect_delay: Option<Duration>,
}

impl ScriptedWallet {
    pub fn new(initial: WalletSession, connect_to: Option<AccountId>) -> Arc<Self> {
        let (tx, _) = watch::channel(initial);
        Arc::new(Self {
            tx,
            connect_to,
            connect_delay: None,
        })
    }

    /// Disconnected wallet whose connect takes `delay` before answering.
    pub fn slow_connect(connect_to: &str, delay: Duration) -> Arc<Self> {
        let (tx, _) = watch::channel(WalletSession::disconnected());
        Arc::new(Self {
            tx,
            connect_to: Some(account(connect_to)),
            connect_delay: Some(delay),
        })
    }

    pub fn connected(address: &str) -> Arc<Self> {
        Self::new(WalletSession::connected(account(address)), None)
    }

    pub fn disconnected() -> Arc<Self> {
        Self::new(WalletSession::disconnected(), None)
    }

    /// Simulate the user switching accounts in the wallet.
    pub fn switch_to(&self, session: WalletSession) {
        self.tx.send_replace(session);
    }
}

#[async_trait]
impl WalletProvider for ScriptedWallet {
    fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.tx.subscribe()
    }

    async fn connect(&self) -> Result<WalletSession, WalletError> {
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        let address = self
            .connect_to
            .clone()
            .ok_or_else(|| WalletError::Unavailable("no account".into()))?;
        let session = WalletSession::connected(address);
        self.tx.send_replace(session.clone());
        Ok(session)
    }

    async fn disconnect(&self) {
        self.tx.send_replace(WalletSession::disconnected());
    }
}

// ============================================================================
// Contract
// ============================================================================

/// Values and failure switches for a [`ScriptedContract`].
#[derive(Debug, Clone, Default)]
pub struct ContractScript {
    pub total: i128,
    pub goal: i128,
    pub deadline: u64,
    pub goal_reached: bool,
    pub ended: bool,
    pub progress: u32,
    pub fail_total: bool,
    pub fail_goal: bool,
    pub fail_deadline: bool,
    pub fail_status: bool,
    pub fail_donate: bool,
    /// Applied to every read before it answers.
    pub read_delay: Option<Duration>,
    /// Answers for upcoming total reads as `(delay, total)`, consumed in call
    /// order before falling back to `total`.
    pub scripted_totals: VecDeque<(Duration, i128)>,
}

impl ContractScript {
    /// Active campaign at 50 of 100 XLM.
    pub fn halfway() -> Self {
        Self {
            total: 500_000_000,
            goal: 1_000_000_000,
            deadline: 4_102_444_800,
            progress: 50,
            ..Self::default()
        }
    }
}

#[derive(Default)]
pub struct ScriptedContract {
    pub script: Mutex<ContractScript>,
    pub donate_calls: Mutex<Vec<(AccountId, i128)>>,
    pub reads: AtomicUsize,
}

impl ScriptedContract {
    pub fn new(script: ContractScript) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            ..Self::default()
        })
    }

    pub fn update(&self, f: impl FnOnce(&mut ContractScript)) {
        f(&mut self.script.lock().unwrap());
    }

    pub fn total(&self) -> i128 {
        self.script.lock().unwrap().total
    }

    pub fn donate_calls(&self) -> Vec<(AccountId, i128)> {
        self.donate_calls.lock().unwrap().clone()
    }

    async fn read<T>(
        &self,
        function: &str,
        pick: impl FnOnce(&ContractScript) -> (bool, T),
    ) -> Result<T, ClientError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let delay = self.script.lock().unwrap().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let (fail, value) = pick(&self.script.lock().unwrap());
        if fail {
            Err(ClientError::call(function, "simulation failed"))
        } else {
            Ok(value)
        }
    }
}

#[async_trait]
impl ContractClient for ScriptedContract {
    async fn get_total_raised(&self) -> Result<i128, ClientError> {
        let scripted = self.script.lock().unwrap().scripted_totals.pop_front();
        if let Some((delay, total)) = scripted {
            self.reads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            return Ok(total);
        }
        self.read("get_total_raised", |s| (s.fail_total, s.total))
            .await
    }

    async fn get_goal(&self) -> Result<i128, ClientError> {
        self.read("get_goal", |s| (s.fail_goal, s.goal)).await
    }

    async fn get_deadline(&self) -> Result<u64, ClientError> {
        self.read("get_deadline", |s| (s.fail_deadline, s.deadline))
            .await
    }

    async fn is_goal_reached(&self) -> Result<bool, ClientError> {
        self.read("is_goal_reached", |s| (s.fail_status, s.goal_reached))
            .await
    }

    async fn is_ended(&self) -> Result<bool, ClientError> {
        self.read("is_ended", |s| (s.fail_status, s.ended)).await
    }

    async fn get_progress_percentage(&self) -> Result<u32, ClientError> {
        self.read("get_progress_percentage", |s| (s.fail_status, s.progress))
            .await
    }

    async fn donate(
        &self,
        donor: &AccountId,
        amount: i128,
    ) -> Result<UnsignedTransaction, ClientError> {
        self.donate_calls
            .lock()
            .unwrap()
            .push((donor.clone(), amount));
        if self.script.lock().unwrap().fail_donate {
            return Err(ClientError::call("donate", "simulation failed"));
        }
        Ok(UnsignedTransaction {
            xdr: format!("donate:{}:{}", donor, amount),
        })
    }
}

/// Hands out one scripted contract per wallet address.
#[derive(Default)]
pub struct ScriptedFactory {
    clients: HashMap<String, Arc<ScriptedContract>>,
    pub created: AtomicUsize,
}

impl ScriptedFactory {
    pub fn with(mut self, address: &str, contract: Arc<ScriptedContract>) -> Self {
        self.clients.insert(address.to_string(), contract);
        self
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ContractClientFactory for ScriptedFactory {
    fn create(&self, params: ClientParams) -> Arc<dyn ContractClient> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.clients
            .get(params.public_key.as_str())
            .cloned()
            .unwrap_or_default()
    }
}

// ============================================================================
// Balances and submission
// ============================================================================

#[derive(Default)]
pub struct ScriptedBalances {
    balances: Mutex<HashMap<String, NativeBalance>>,
    pub fetches: AtomicUsize,
}

impl ScriptedBalances {
    pub fn set(&self, address: &str, balance: &str) {
        self.balances
            .lock()
            .unwrap()
            .insert(address.to_string(), NativeBalance::Known(balance.to_string()));
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceSource for ScriptedBalances {
    async fn fetch(&self, address: &AccountId) -> Result<NativeBalance, BalanceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(address.as_str())
            .cloned()
            .unwrap_or_default())
    }
}

/// Pipeline that "confirms" by crediting the amount to the scripted contract.
pub struct ScriptedPipeline {
    contract: Arc<ScriptedContract>,
    pub fail_with: Option<String>,
    pub delay: Option<Duration>,
    pub submitted: Mutex<Vec<String>>,
}

impl ScriptedPipeline {
    pub fn new(contract: Arc<ScriptedContract>) -> Self {
        Self {
            contract,
            fail_with: None,
            delay: None,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionPipeline for ScriptedPipeline {
    async fn submit(&self, tx: UnsignedTransaction) -> Result<SubmittedTransaction, SubmitError> {
        self.submitted.lock().unwrap().push(tx.xdr.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.fail_with {
            return Err(SubmitError::Send(reason.clone()));
        }

        let amount: i128 = tx
            .xdr
            .rsplit(':')
            .next()
            .and_then(|a| a.parse().ok())
            .ok_or_else(|| SubmitError::Sign(format!("bad envelope {}", tx.xdr)))?;
        self.contract.update(|s| s.total += amount);

        let n = self.submitted.lock().unwrap().len();
        Ok(SubmittedTransaction {
            hash: format!("hash-{}", n),
        })
    }
}

// ============================================================================
// Harness
// ============================================================================

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(150);

pub struct Harness {
    pub ui_tx: mpsc::UnboundedSender<UiEvent>,
    svc_rx: mpsc::UnboundedReceiver<ServiceEvent>,
    pub token: CancellationToken,
    pub handle: JoinHandle<()>,
    pub state: AppState,
    /// Debug rendering of every event received, in order.
    pub seen: Vec<String>,
}

impl Harness {
    pub fn start(
        wallet: Arc<ScriptedWallet>,
        balances: Arc<ScriptedBalances>,
        contracts: Arc<ScriptedFactory>,
        pipeline: Arc<ScriptedPipeline>,
    ) -> Self {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (svc_tx, svc_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        let collab = Collaborators {
            wallet,
            balances,
            contracts,
            pipeline,
            network: NetworkConfig::testnet(CONTRACT_ID),
        };
        let handle = tokio::spawn(service::run(token.clone(), ui_rx, svc_tx, collab));

        Self {
            ui_tx,
            svc_rx,
            token,
            handle,
            state: AppState::default(),
            seen: Vec::new(),
        }
    }

    pub fn send(&self, event: UiEvent) {
        self.ui_tx.send(event).unwrap();
    }

    /// Type an amount and press donate, as the view does.
    pub fn donate(&mut self, amount: &str) {
        self.state.set_amount(amount);
        self.send(UiEvent::Donate {
            amount: self.state.amount_input.clone(),
        });
    }

    fn record(&mut self, event: ServiceEvent) {
        self.seen.push(format!("{:?}", event));
        self.state.apply(event);
    }

    /// Apply events until none arrive for a short while.
    pub async fn settle(&mut self) {
        while let Ok(Some(event)) = timeout(QUIET, self.svc_rx.recv()).await {
            self.record(event);
        }
    }

    /// Apply events until `pred` holds, then settle.
    pub async fn wait_until(&mut self, what: &str, pred: impl Fn(&AppState) -> bool) {
        let deadline = Instant::now() + WAIT;
        while !pred(&self.state) {
            let left = deadline.saturating_duration_since(Instant::now());
            match timeout(left, self.svc_rx.recv()).await {
                Ok(Some(event)) => self.record(event),
                Ok(None) => panic!("service stopped while waiting for {}", what),
                Err(_) => panic!("timed out waiting for {}; seen {:#?}", what, self.seen),
            }
        }
        self.settle().await;
    }

    pub fn saw(&self, prefix: &str) -> bool {
        self.seen.iter().any(|e| e.starts_with(prefix))
    }
}
