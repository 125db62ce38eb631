//! Payment gateway abstraction.
//!
//! Checkout never talks to a real payment network. [`SimulatedGateway`] waits
//! for a fixed delay and approves every charge; the [`PaymentGateway`] trait
//! is the seam where a real processor would plug in.
//!
//! Every charge runs on its own tokio task ([`PendingPayment::spawn`]) and can
//! be abandoned through a [`CancelHandle`] when the shopper leaves checkout.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use balance_guru_core::Price;

/// Ways a charge can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The processor refused the card.
    #[error("Card declined: {reason}")]
    Declined { reason: String },

    /// The processor could not be reached, or the charge task died.
    #[error("Payment network error: {0}")]
    Network(String),

    /// The shopper abandoned checkout before the charge settled.
    #[error("Payment cancelled")]
    Cancelled,
}

/// A charge to be made for one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Identifies the checkout attempt this charge belongs to.
    pub attempt_id: Uuid,
    pub amount: Price,
    pub cardholder: String,
    /// Last four card digits, for logs and receipts.
    pub card_last_four: String,
}

/// Proof of a successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub attempt_id: Uuid,
    pub transaction_id: Uuid,
    pub amount: Price,
    pub processed_at: DateTime<Utc>,
}

/// Boxed future returned by [`PaymentGateway::charge`].
pub type ChargeFuture = Pin<Box<dyn Future<Output = Result<PaymentReceipt, PaymentError>> + Send>>;

/// Payment processor.
pub trait PaymentGateway: Send + Sync {
    /// Charge the shopper.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` if the charge does not go through.
    fn charge(&self, request: PaymentRequest) -> ChargeFuture;
}

/// Gateway that approves every charge after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Creates an Arc-wrapped instance for sharing.
    #[must_use]
    pub fn shared(delay: Duration) -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new(delay))
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl PaymentGateway for SimulatedGateway {
    fn charge(&self, request: PaymentRequest) -> ChargeFuture {
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;

            let receipt = PaymentReceipt {
                attempt_id: request.attempt_id,
                transaction_id: Uuid::new_v4(),
                amount: request.amount,
                processed_at: Utc::now(),
            };

            tracing::info!(
                attempt_id = %receipt.attempt_id,
                transaction_id = %receipt.transaction_id,
                amount = %receipt.amount,
                card = %request.card_last_four,
                "Simulated payment approved"
            );

            Ok(receipt)
        })
    }
}

// =============================================================================
// Cancellation
// =============================================================================

/// Cancels an in-flight charge.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Receiving side of a [`CancelHandle`].
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelHandle {
    /// Create a connected handle and signal.
    #[must_use]
    pub fn new() -> (Self, CancelSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancelSignal { rx })
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl CancelSignal {
    /// Resolves once cancellation is requested. Never resolves if the handle
    /// is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Run a charge, resolving to [`PaymentError::Cancelled`] if `signal` fires
/// first.
///
/// # Errors
///
/// Returns the gateway's error, or `PaymentError::Cancelled`.
pub async fn charge_with_cancel(
    gateway: &dyn PaymentGateway,
    request: PaymentRequest,
    mut signal: CancelSignal,
) -> Result<PaymentReceipt, PaymentError> {
    let attempt_id = request.attempt_id;
    tokio::select! {
        result = gateway.charge(request) => result,
        () = signal.cancelled() => {
            tracing::info!(%attempt_id, "Payment cancelled");
            Err(PaymentError::Cancelled)
        }
    }
}

/// A charge running on its own task.
#[derive(Debug)]
pub struct PendingPayment {
    attempt_id: Uuid,
    cancel: CancelHandle,
    task: JoinHandle<Result<PaymentReceipt, PaymentError>>,
}

impl PendingPayment {
    /// Spawn the charge on the current tokio runtime.
    #[must_use]
    pub fn spawn(gateway: Arc<dyn PaymentGateway>, request: PaymentRequest) -> Self {
        let attempt_id = request.attempt_id;
        let (cancel, signal) = CancelHandle::new();
        let task =
            tokio::spawn(async move { charge_with_cancel(gateway.as_ref(), request, signal).await });

        Self {
            attempt_id,
            cancel,
            task,
        }
    }

    #[must_use]
    pub const fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the charge to settle.
    ///
    /// # Errors
    ///
    /// Returns the charge's error. A panicked task is reported as
    /// `PaymentError::Network`.
    pub async fn wait(self) -> Result<PaymentReceipt, PaymentError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(attempt_id = %self.attempt_id, error = %e, "Payment task failed");
                Err(PaymentError::Network(e.to_string()))
            }
        }
    }
}
