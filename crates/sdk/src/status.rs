//! Pipeline status: one-way observability for the transfer pipeline.
//!
//! Every pipeline step publishes a [`PipelineStatus`] on a
//! `tokio::sync::watch` channel. The channel is observation only -- the
//! pipeline never reads it back, so its logic is testable without an
//! attached observer, and a UI can poll or await changes without
//! touching protocol state.

use std::fmt;

use tokio::sync::watch;

// ---------------------------------------------------------------------------
// PipelineStatus
// ---------------------------------------------------------------------------

/// The step a transfer pipeline is currently executing.
///
/// Steps are strictly sequential with no branching back; [`Failed`]
/// is reachable from any step and [`Done`] only from `Submit`.
///
/// [`Failed`]: PipelineStatus::Failed
/// [`Done`]: PipelineStatus::Done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    /// Constructed, not yet started.
    Init,
    /// Resolving sender and change public keys to accounts.
    Derive,
    /// Requesting required signers and metadata options.
    Preprocess,
    /// Fetching source balance and nonce from the node.
    Metadata,
    /// Computing change and assembling the four operations.
    BuildOperations,
    /// Requesting unsigned transaction bytes and signing payloads.
    Payloads,
    /// Sanity-checking the unsigned transaction against intent.
    ParseUnsigned,
    /// Hashing and one-time signing the unsigned bytes.
    Sign,
    /// Merging the signature into signed transaction bytes.
    Combine,
    /// Verifying the signed bytes still encode the intent.
    ParseSigned,
    /// Broadcasting the signed transaction.
    Submit,
    /// Submitted; the pipeline is spent.
    Done,
    /// Terminally failed; the pipeline is spent.
    Failed,
}

impl PipelineStatus {
    /// Whether the pipeline has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Init => "ready",
            Self::Derive => "deriving source and change accounts",
            Self::Preprocess => "requesting construction options",
            Self::Metadata => "fetching source balance",
            Self::BuildOperations => "building transfer operations",
            Self::Payloads => "requesting signing payloads",
            Self::ParseUnsigned => "verifying unsigned transaction",
            Self::Sign => "signing",
            Self::Combine => "combining signature",
            Self::ParseSigned => "verifying signed transaction",
            Self::Submit => "submitting",
            Self::Done => "submitted",
            Self::Failed => "failed",
        };
        f.write_str(text)
    }
}

// ---------------------------------------------------------------------------
// StatusEmitter
// ---------------------------------------------------------------------------

/// Sending half of the status channel.
///
/// Publishing never fails and never blocks: with no subscribers the
/// value is simply retained for the next `subscribe()`.
#[derive(Debug, Clone)]
pub(crate) struct StatusEmitter {
    tx: watch::Sender<PipelineStatus>,
}

impl StatusEmitter {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(PipelineStatus::Init);
        Self { tx }
    }

    /// Publish a new status.
    pub(crate) fn set(&self, status: PipelineStatus) {
        tracing::debug!(status = %status, "pipeline_status");
        self.tx.send_replace(status);
    }

    /// A receiver observing every subsequent transition.
    pub(crate) fn subscribe(&self) -> watch::Receiver<PipelineStatus> {
        self.tx.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(PipelineStatus::Done.is_terminal());
        assert!(PipelineStatus::Failed.is_terminal());
        assert!(!PipelineStatus::Sign.is_terminal());
        assert!(!PipelineStatus::Init.is_terminal());
    }

    #[test]
    fn emitter_retains_latest_without_subscribers() {
        let emitter = StatusEmitter::new();
        emitter.set(PipelineStatus::Derive);
        emitter.set(PipelineStatus::Metadata);
        let rx = emitter.subscribe();
        assert_eq!(*rx.borrow(), PipelineStatus::Metadata);
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(PipelineStatus::Metadata.to_string(), "fetching source balance");
        assert_eq!(PipelineStatus::Done.to_string(), "submitted");
    }
}
