//! Fleet runner.
//!
//! # Responsibilities
//! - Build one transport and one session per account
//! - Start sessions one after another with a linear stagger
//! - Count started and failed sessions; keep the steady-state handles
//!
//! # Design Decisions
//! - Transport construction is injected so sessions can run against any
//!   `Transport`, including scripted ones
//! - Shutdown during the stagger stops launching further sessions

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::FleetConfig;
use crate::credentials::ProxyEndpoint;
use crate::fleet::AccountSpec;
use crate::http::{Transport, TransportError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::session::{AccountSession, SessionSettings};

/// Outcome of fleet startup.
pub struct FleetReport<T> {
    pub started: usize,
    pub failed: usize,
    /// Every session that was built, in account order.
    pub sessions: Vec<Arc<AccountSession<T>>>,
    /// Recurring tasks of sessions that reached steady state.
    pub handles: Vec<JoinHandle<()>>,
}

impl<T> FleetReport<T> {
    /// Wait for every recurring task. Panics and cancellations are logged.
    pub async fn join_all(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "Session task ended abnormally");
            }
        }
    }
}

pub struct FleetRunner {
    config: FleetConfig,
}

impl FleetRunner {
    pub fn new(config: FleetConfig) -> Self {
        Self { config }
    }

    fn stagger(&self) -> Duration {
        Duration::from_secs(self.config.schedule.stagger_secs)
    }

    /// Start every account in order.
    ///
    /// Account `i` is launched after sleeping `i * stagger`, and its startup
    /// is awaited before the next account is considered.
    pub async fn run<T, F>(
        &self,
        accounts: Vec<AccountSpec>,
        make_transport: F,
        shutdown: &Shutdown,
    ) -> FleetReport<T>
    where
        T: Transport,
        F: Fn(Option<&ProxyEndpoint>) -> Result<T, TransportError>,
    {
        let total = accounts.len();
        let mut report = FleetReport {
            started: 0,
            failed: 0,
            sessions: Vec::with_capacity(total),
            handles: Vec::with_capacity(total),
        };
        let mut stop = shutdown.subscribe();

        tracing::info!(
            accounts = total,
            stagger_secs = self.config.schedule.stagger_secs,
            "Starting fleet"
        );

        for (position, account) in accounts.into_iter().enumerate() {
            let delay = self.stagger().saturating_mul(position as u32);
            if !delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = stop.recv() => {
                        tracing::info!(
                            remaining = total - position,
                            "Shutdown during startup, not launching remaining accounts"
                        );
                        break;
                    }
                }
            }

            let transport = match make_transport(account.proxy.as_ref()) {
                Ok(transport) => transport,
                Err(err) => {
                    tracing::error!(account = account.index, error = %err, "Cannot build transport");
                    report.failed += 1;
                    continue;
                }
            };

            let settings = SessionSettings::from(&self.config);
            let session = match AccountSession::new(account.index, &account.key, transport, settings) {
                Ok(session) => Arc::new(session),
                Err(err) => {
                    tracing::error!(account = account.index, error = %err, "Cannot load wallet");
                    report.failed += 1;
                    continue;
                }
            };

            tracing::info!(
                account = account.index,
                address = %session.address(),
                proxy = %account.proxy.as_ref().map(ToString::to_string).unwrap_or_else(|| "none".to_string()),
                "Launching session"
            );

            match session.start(shutdown.subscribe()).await {
                Ok(handle) => {
                    report.started += 1;
                    report.handles.push(handle);
                }
                Err(_) => report.failed += 1,
            }
            report.sessions.push(session);
        }

        metrics::record_fleet_sessions(report.started, report.failed);
        tracing::info!(
            started = report.started,
            failed = report.failed,
            "Fleet startup complete"
        );
        report
    }
}
