//! Per-account session.
//!
//! # Responsibilities
//! - Authenticate with a wallet signature and hold the bearer token
//! - Onboard the node, check in, fetch stats, all through the retry wrapper
//! - After startup, re-run check-in and stats on a fixed interval until shutdown
//!
//! # Design Decisions
//! - Token lives in an `ArcSwapOption`; readers never block the refresher
//! - Authenticated calls without a token report 401, which routes them
//!   through the same refresh path as an expired token
//! - Steady-state failures are logged and the next tick runs regardless

use arc_swap::ArcSwapOption;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{Instrument, Span};

use crate::api::{
    ApiError, NodeStats, StatsEnvelope, VerifyResponse, CHECK_IN_PATH, NODE_STATS_PATH,
    ONBOARD_PATH, VERIFY_PATH,
};
use crate::config::schema::MAX_SCHEDULE_SECS;
use crate::config::FleetConfig;
use crate::credentials::PrivateKey;
use crate::http::{ApiRequest, Transport};
use crate::resilience::{RetryExecutor, RetryPolicy};
use crate::session::state::{SessionState, StateCell};
use crate::wallet::{Wallet, WalletError};

pub const OP_AUTHENTICATE: &str = "authenticate";
pub const OP_ONBOARD: &str = "onboard";
pub const OP_CHECK_IN: &str = "check_in";
pub const OP_FETCH_STATS: &str = "fetch_stats";

/// Per-session knobs derived from the fleet configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub sign_message: String,
    pub retry: RetryPolicy,
    pub checkin_interval: Duration,
}

impl From<&FleetConfig> for SessionSettings {
    fn from(config: &FleetConfig) -> Self {
        Self {
            sign_message: config.api.sign_message.clone(),
            retry: RetryPolicy::from(&config.retries),
            checkin_interval: Duration::from_secs(config.schedule.checkin_interval_secs),
        }
    }
}

/// Result of the onboarding call.
#[derive(Debug, Clone, PartialEq)]
pub enum OnboardOutcome {
    /// The API accepted the registration.
    Onboarded(Value),
    /// The API refused with a client error; the node is already registered.
    AlreadyOnboarded { status: u16 },
}

/// One account's lifecycle against the remote API.
pub struct AccountSession<T> {
    index: usize,
    wallet: Wallet,
    address: String,
    transport: T,
    settings: SessionSettings,
    retry: RetryExecutor,
    token: ArcSwapOption<String>,
    state: StateCell,
    span: Span,
}

impl<T: Transport> AccountSession<T> {
    /// Build a session for the account at `index`.
    pub fn new(
        index: usize,
        key: &PrivateKey,
        transport: T,
        settings: SessionSettings,
    ) -> Result<Self, WalletError> {
        let wallet = Wallet::from_key(key)?;
        let address = wallet.address().to_string();
        let span = tracing::info_span!("account", index, address = %address);

        Ok(Self {
            index,
            wallet,
            address,
            transport,
            retry: RetryExecutor::new(settings.retry.clone()),
            settings,
            token: ArcSwapOption::empty(),
            state: StateCell::new(),
            span,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Checksummed wallet address.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    pub fn has_token(&self) -> bool {
        self.token.load().is_some()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sign the login message and exchange it for a bearer token.
    #[tracing::instrument(name = "authenticate", parent = &self.span, skip_all)]
    pub async fn authenticate(&self) -> Result<(), ApiError> {
        let signed = self.wallet.sign_login(&self.settings.sign_message).await?;
        let request = ApiRequest::post(VERIFY_PATH).json(json!({
            "address": self.address,
            "msg": signed.message,
            "signature": signed.signature,
        }));

        let response: VerifyResponse = self
            .retry
            .run(OP_AUTHENTICATE, || self.send(request.clone()))
            .await?;
        let token = response
            .into_token()
            .ok_or_else(|| ApiError::Decode("verify response carried no token".to_string()))?;

        self.token.store(Some(Arc::new(token)));
        self.state.advance(SessionState::Authenticated);
        tracing::info!("Authenticated");
        Ok(())
    }

    /// Register the node. A client-error answer means it is already registered.
    #[tracing::instrument(name = "onboard", parent = &self.span, skip_all)]
    pub async fn onboard(&self) -> Result<OnboardOutcome, ApiError> {
        let request = ApiRequest::post(ONBOARD_PATH).json(self.address_body());

        let outcome = match self.call_authed::<Value>(OP_ONBOARD, request).await {
            Ok(result) => {
                tracing::info!("Node onboarded");
                OnboardOutcome::Onboarded(result)
            }
            Err(ApiError::Client { status, body }) => {
                tracing::info!(status, response = %body, "Node already onboarded");
                OnboardOutcome::AlreadyOnboarded { status }
            }
            Err(err) => return Err(err),
        };

        self.state.advance(SessionState::Onboarded);
        Ok(outcome)
    }

    #[tracing::instrument(name = "check_in", parent = &self.span, skip_all)]
    pub async fn check_in(&self) -> Result<Value, ApiError> {
        let request = ApiRequest::post(CHECK_IN_PATH).json(self.address_body());
        let result = self.call_authed(OP_CHECK_IN, request).await?;
        tracing::info!("Checked in");
        Ok(result)
    }

    #[tracing::instrument(name = "fetch_stats", parent = &self.span, skip_all)]
    pub async fn fetch_stats(&self) -> Result<NodeStats, ApiError> {
        let request = ApiRequest::get(NODE_STATS_PATH).query("address", self.address.as_str());
        let envelope: StatsEnvelope = self.call_authed(OP_FETCH_STATS, request).await?;
        Ok(envelope.data)
    }

    /// Onboard, then run one check-in cycle.
    pub async fn run_routine(&self) -> Result<NodeStats, ApiError> {
        self.onboard().await?;
        self.run_cycle().await
    }

    /// Check in, fetch stats and log them.
    pub async fn run_cycle(&self) -> Result<NodeStats, ApiError> {
        self.check_in().await?;
        let stats = self.fetch_stats().await?;
        tracing::info!(
            parent: &self.span,
            has_node = stats.has_node,
            points = stats.points,
            "{}",
            stats.summary()
        );
        Ok(stats)
    }

    /// Authenticate and run the routine, then schedule the recurring cycle.
    ///
    /// On failure the session is marked `Failed` and no task is spawned.
    pub async fn start(
        self: &Arc<Self>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<JoinHandle<()>, ApiError> {
        let startup = async {
            self.authenticate().await?;
            self.run_routine().await
        };

        match startup.await {
            Ok(_) => {
                self.state.advance(SessionState::SteadyState);
                tracing::info!(
                    parent: &self.span,
                    interval_secs = self.settings.checkin_interval.as_secs(),
                    "Steady state reached, check-in scheduled"
                );
                let session = Arc::clone(self);
                let span = self.span.clone();
                Ok(tokio::spawn(session.run_steady(shutdown).instrument(span)))
            }
            Err(err) => {
                self.state.fail();
                tracing::error!(parent: &self.span, error = %err, "Session startup failed");
                Err(err)
            }
        }
    }

    async fn run_steady(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        let period = self.settings.checkin_interval.clamp(
            Duration::from_secs(1),
            Duration::from_secs(MAX_SCHEDULE_SECS),
        );
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.recv() => break,
            }

            // A cycle in backoff must not hold up shutdown.
            tokio::select! {
                result = self.run_cycle() => {
                    if let Err(err) = result {
                        tracing::error!(error = %err, "Scheduled check-in failed, retrying next interval");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown during scheduled check-in, abandoning cycle");
                    break;
                }
            }
        }

        tracing::info!("Stopping scheduled check-ins");
    }

    fn address_body(&self) -> Value {
        json!({ "address": self.address })
    }

    async fn send<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        self.transport.send(request).await?.json()
    }

    async fn send_authed<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let token = self
            .token
            .load_full()
            .ok_or_else(|| ApiError::Unauthorized("no bearer token yet".to_string()))?;
        self.send(request.bearer(token)).await
    }

    async fn call_authed<R: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: ApiRequest,
    ) -> Result<R, ApiError> {
        self.retry
            .run_with_refresh(
                operation,
                || self.authenticate(),
                || self.send_authed(request.clone()),
            )
            .await
    }
}

impl<T> std::fmt::Debug for AccountSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSession")
            .field("index", &self.index)
            .field("address", &self.address)
            .field("state", &self.state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ApiResponse, TransportError};
    use crate::lifecycle::Shutdown;
    use crate::observability::logging::capture::capture_logs;
    use std::sync::Mutex;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    /// Answers from a queue per path; falls back to 200 `{}`.
    #[derive(Default)]
    struct QueueTransport {
        replies: Mutex<Vec<(&'static str, u16, &'static str)>>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl QueueTransport {
        fn reply(self, path: &'static str, status: u16, body: &'static str) -> Self {
            self.replies.lock().unwrap().push((path, status, body));
            self
        }

        fn paths(&self) -> Vec<String> {
            self.seen.lock().unwrap().iter().map(|r| r.path.clone()).collect()
        }
    }

    impl Transport for QueueTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            let mut replies = self.replies.lock().unwrap();
            let position = replies.iter().position(|(path, _, _)| *path == request.path);
            Ok(match position {
                Some(i) => {
                    let (_, status, body) = replies.remove(i);
                    ApiResponse::new(status, body)
                }
                None => ApiResponse::new(200, "{}"),
            })
        }
    }

    fn session(transport: QueueTransport) -> AccountSession<QueueTransport> {
        let settings = SessionSettings::from(&FleetConfig::default());
        AccountSession::new(0, &PrivateKey::new(TEST_PRIVATE_KEY), transport, settings).unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_stores_token() {
        let session = session(QueueTransport::default().reply(VERIFY_PATH, 200, r#"{"token":"t1"}"#));

        session.authenticate().await.unwrap();

        assert!(session.has_token());
        assert_eq!(session.state(), SessionState::Authenticated);
        let seen = session.transport().seen.lock().unwrap();
        let body = seen[0].body.as_ref().unwrap();
        assert_eq!(body["address"], json!(session.address()));
        assert_eq!(body["msg"], json!(FleetConfig::default().api.sign_message));
        assert!(body["signature"].as_str().unwrap().starts_with("0x"));
        assert!(seen[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_missing_token_is_decode_error() {
        let session = session(QueueTransport::default().reply(VERIFY_PATH, 200, r#"{"ok":true}"#));

        let err = session.authenticate().await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(session.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_check_in_without_token_authenticates_first() {
        let session = session(QueueTransport::default().reply(VERIFY_PATH, 200, r#"{"token":"t1"}"#));

        session.check_in().await.unwrap();

        assert_eq!(session.transport().paths(), vec![VERIFY_PATH, CHECK_IN_PATH]);
        let seen = session.transport().seen.lock().unwrap();
        assert_eq!(seen[1].bearer.as_deref().map(String::as_str), Some("t1"));
    }

    #[tokio::test]
    async fn test_onboard_conflict_is_accepted() {
        let session = session(
            QueueTransport::default()
                .reply(VERIFY_PATH, 200, r#"{"token":"t1"}"#)
                .reply(ONBOARD_PATH, 409, r#"{"message":"node already exists"}"#),
        );
        session.authenticate().await.unwrap();

        let outcome = session.onboard().await.unwrap();

        assert_eq!(outcome, OnboardOutcome::AlreadyOnboarded { status: 409 });
        assert_eq!(session.state(), SessionState::Onboarded);
    }

    #[tokio::test]
    async fn test_fetch_stats_sends_address_query() {
        let session = session(
            QueueTransport::default()
                .reply(VERIFY_PATH, 200, r#"{"token":"t1"}"#)
                .reply(NODE_STATS_PATH, 200, r#"{"data":{"has_node":true,"points":42}}"#),
        );
        session.authenticate().await.unwrap();

        let stats = session.fetch_stats().await.unwrap();

        assert!(stats.has_node);
        assert_eq!(stats.points, 42.0);
        let seen = session.transport().seen.lock().unwrap();
        assert_eq!(
            seen[1].query,
            vec![("address".to_string(), session.address().to_string())]
        );
    }

    #[tokio::test]
    async fn test_run_cycle_logs_points() {
        let (_guard, logs) = capture_logs();
        let session = session(
            QueueTransport::default()
                .reply(VERIFY_PATH, 200, r#"{"token":"t1"}"#)
                .reply(NODE_STATS_PATH, 200, r#"{"data":{"has_node":true,"points":42}}"#),
        );
        session.authenticate().await.unwrap();

        session.run_cycle().await.unwrap();

        assert!(logs.contents().contains("Points: 42"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_interval_keeps_steady_task_alive() {
        let transport = QueueTransport::default()
            .reply(VERIFY_PATH, 200, r#"{"token":"t1"}"#)
            .reply(NODE_STATS_PATH, 200, r#"{"data":{"points":1}}"#);
        let mut settings = SessionSettings::from(&FleetConfig::default());
        settings.checkin_interval = Duration::MAX;
        let session = Arc::new(
            AccountSession::new(0, &PrivateKey::new(TEST_PRIVATE_KEY), transport, settings).unwrap(),
        );
        let shutdown = Shutdown::new();

        let handle = session.start(shutdown.subscribe()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!handle.is_finished());

        shutdown.trigger();
        handle.await.unwrap();
    }
}
