//! Session supervision: one foreground operation, one background status task.
//!
//! A session moves through four states:
//!
//! ```text
//!   Idle ──spawn status task──► Running ──operation returned──► Draining
//!                                                                  │
//!                                       status task joined ◄───────┘
//!                                                │
//!                                              Done
//! ```
//!
//! The status task is cancelled only after the operation has returned, and
//! [`supervise`] does not return until the status task has finished.  There
//! is no timeout on the join; a [`StatusTask`] must exit promptly once its
//! lifetime is cancelled.
//!
//! # Outcome
//!
//! | Operation | Status task | Result                     |
//! |-----------|-------------|----------------------------|
//! | `Err(e)`  | anything    | `Err(e)`                   |
//! | `Ok`      | `Ok`        | `Ok`                       |
//! | `Ok`      | `Err`/panic | `Err(Error::Drain(..))`    |

use anyhow::{Result, anyhow};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Error;

/// A background unit of work bound to a cancellable lifetime.
pub trait StatusTask: Send + 'static {
    /// Run until `lifetime` is cancelled, then return.
    fn run(self, lifetime: CancellationToken) -> impl Future<Output = Result<()>> + Send;
}

/// Supervisor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Running,
    Draining,
    Done,
}

#[derive(Debug)]
struct Session {
    state: State,
}

impl Session {
    const fn new() -> Self {
        Self { state: State::Idle }
    }

    fn advance(&mut self, next: State) {
        debug_assert!(
            matches!(
                (self.state, next),
                (State::Idle, State::Running)
                    | (State::Running, State::Draining)
                    | (State::Draining, State::Done)
            ),
            "illegal session transition {:?} -> {next:?}",
            self.state
        );
        debug!(from = ?self.state, to = ?next, "session");
        self.state = next;
    }
}

/// Run `operation` to completion while `task` runs in the background.
///
/// `task` is spawned on the tokio runtime with its own lifetime; `operation`
/// is awaited on the calling task.  See the module docs for how the two
/// results are combined.
pub async fn supervise<T, F>(task: T, operation: F) -> Result<()>
where
    T: StatusTask,
    F: Future<Output = Result<()>>,
{
    let mut session = Session::new();

    let lifetime = CancellationToken::new();
    let handle = tokio::spawn(task.run(lifetime.clone()));
    session.advance(State::Running);

    let outcome = operation.await;
    session.advance(State::Draining);
    lifetime.cancel();

    let drained = match handle.await {
        Ok(result) => result,
        Err(join) => Err(anyhow!("status task aborted: {join}")),
    };
    session.advance(State::Done);

    match (outcome, drained) {
        (Err(e), Err(drain)) => {
            debug!(error = %format!("{drain:#}"), "discarding status task failure");
            Err(e)
        },
        (Err(e), Ok(())) => Err(e),
        (Ok(()), Err(drain)) => {
            warn!(error = %format!("{drain:#}"), "status task failed during shutdown");
            Err(Error::Drain(drain.into()).into())
        },
        (Ok(()), Ok(())) => Ok(()),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
