use crate::error::BootstrapError;
use crate::handler::NoteMcpHandler;
use crate::serve;
use crate::transport::ListenerConfig;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Final outcome of a launch, consumed by the entry points to pick the
/// process exit code. An operator interrupt is a normal stop, not a
/// failure.
#[derive(Debug)]
pub enum LaunchOutcome {
    Stopped,
    Failed(BootstrapError),
}

impl LaunchOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchOutcome::Stopped => 0,
            LaunchOutcome::Failed(_) => 1,
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, LaunchOutcome::Stopped)
    }
}

/// Source of operator interrupts. A trait so the shutdown path is
/// testable without delivering real signals to the test process.
#[async_trait]
pub trait InterruptSource: Send {
    /// Resolves when the next interrupt arrives.
    async fn recv(&mut self);
}

/// ctrl-c everywhere, plus SIGTERM on unix.
pub struct OsInterrupts {
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
}

impl OsInterrupts {
    #[cfg(unix)]
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            sigterm: tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {})
    }
}

#[async_trait]
impl InterruptSource for OsInterrupts {
    async fn recv(&mut self) {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = self.sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

/// Owns the blocking run phase: starts the server over the listener,
/// waits for it to finish or for an operator interrupt, and translates
/// either into a `LaunchOutcome`. Exactly one server instance runs per
/// process; restart policy belongs to an external supervisor.
pub struct Supervisor {
    shutdown: CancellationToken,
    grace_period: Duration,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            shutdown: CancellationToken::new(),
            grace_period: Duration::from_secs(5),
        }
    }

    /// How long a graceful close may take after the first interrupt
    /// before the process terminates anyway.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub async fn run(self, handler: NoteMcpHandler, listener: ListenerConfig) -> LaunchOutcome {
        let interrupts = match OsInterrupts::new() {
            Ok(interrupts) => interrupts,
            Err(e) => {
                return LaunchOutcome::Failed(BootstrapError::StartupFailed(format!(
                    "cannot install signal handlers: {e}"
                )));
            }
        };
        let serve_fut = serve::serve(handler, listener, self.shutdown.child_token());
        self.supervise(serve_fut, interrupts).await
    }

    /// Run loop with a pluggable interrupt source. The first interrupt
    /// starts a graceful close bounded by the grace period; a second
    /// interrupt terminates without further cleanup. Both paths are a
    /// normal stop.
    pub async fn supervise<F, I>(self, serve_fut: F, mut interrupts: I) -> LaunchOutcome
    where
        F: Future<Output = Result<(), BootstrapError>>,
        I: InterruptSource,
    {
        tokio::pin!(serve_fut);
        info!("server running");

        tokio::select! {
            result = &mut serve_fut => Self::outcome_of(result),
            _ = interrupts.recv() => {
                info!("interrupt received; shutting down");
                self.shutdown.cancel();

                tokio::select! {
                    result = &mut serve_fut => {
                        if let Err(e) = result {
                            warn!(error = %e, "server reported an error while closing");
                        }
                        info!("server stopped");
                        LaunchOutcome::Stopped
                    }
                    _ = interrupts.recv() => {
                        warn!("second interrupt; terminating without further cleanup");
                        LaunchOutcome::Stopped
                    }
                    _ = tokio::time::sleep(self.grace_period) => {
                        warn!("grace period elapsed; terminating");
                        LaunchOutcome::Stopped
                    }
                }
            }
        }
    }

    fn outcome_of(result: Result<(), BootstrapError>) -> LaunchOutcome {
        match result {
            Ok(()) => {
                info!("server finished");
                LaunchOutcome::Stopped
            }
            Err(e) => {
                error!(error = %e, "server failed");
                LaunchOutcome::Failed(e)
            }
        }
    }
}
