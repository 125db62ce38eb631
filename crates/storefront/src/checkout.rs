//! Checkout flow state machine.
//!
//! Checkout is linear: shipping, then payment, then confirmation. A flow is
//! created fresh each time the shopper enters checkout and is dropped when
//! they leave; nothing here outlives the visit.
//!
//! The flow itself never awaits. Submitting payment returns a
//! [`PaymentRequest`] for the caller to run; the result comes back through
//! [`CheckoutFlow::complete_payment`] or [`CheckoutFlow::fail_payment`].

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use uuid::Uuid;

use balance_guru_core::{CheckoutStep, Email, StepProgress};

use crate::cart::CartStore;
use crate::error::{add_breadcrumb, Result, StorefrontError};
use crate::order::{new_order_id, OrderNumber};
use crate::payment::{PaymentReceipt, PaymentRequest};
use crate::pricing::OrderTotals;

/// Country preselected on the shipping form.
pub const DEFAULT_COUNTRY: &str = "United States";

// =============================================================================
// Form Data
// =============================================================================

/// Shipping form. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for ShippingInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl ShippingInfo {
    /// Check that every field is filled in and the email is well formed.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::MissingField` naming the first blank field,
    /// or `StorefrontError::InvalidEmail`.
    pub fn validate(&self) -> Result<Email> {
        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("country", &self.country),
        ];
        require_all(&fields)?;

        Ok(Email::parse(&self.email)?)
    }
}

/// Payment form. Consumed when payment starts; card details are never
/// logged or stored.
pub struct PaymentInfo {
    card_number: SecretString,
    pub expiry: String,
    cvc: SecretString,
    pub cardholder: String,
}

impl PaymentInfo {
    #[must_use]
    pub fn new(
        card_number: impl Into<String>,
        expiry: impl Into<String>,
        cvc: impl Into<String>,
        cardholder: impl Into<String>,
    ) -> Self {
        Self {
            card_number: SecretString::from(card_number.into()),
            expiry: expiry.into(),
            cvc: SecretString::from(cvc.into()),
            cardholder: cardholder.into(),
        }
    }

    /// Last four digits of the card number.
    #[must_use]
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .expose_secret()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let skip = digits.len().saturating_sub(4);
        digits.into_iter().skip(skip).collect()
    }

    /// Check that every field is filled in. The card is not checked against
    /// any payment network.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::MissingField` naming the first blank field.
    pub fn validate(&self) -> Result<()> {
        require_all(&[
            ("card_number", self.card_number.expose_secret()),
            ("expiry", self.expiry.as_str()),
            ("cvc", self.cvc.expose_secret()),
            ("cardholder", self.cardholder.as_str()),
        ])
    }
}

impl std::fmt::Debug for PaymentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentInfo")
            .field("card_number", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("cvc", &"[REDACTED]")
            .field("cardholder", &self.cardholder)
            .finish()
    }
}

fn require_all<S: AsRef<str>>(fields: &[(&'static str, S)]) -> Result<()> {
    match fields.iter().find(|(_, value)| value.as_ref().trim().is_empty()) {
        Some((name, _)) => Err(StorefrontError::MissingField(*name)),
        None => Ok(()),
    }
}

// =============================================================================
// Flow
// =============================================================================

/// Where "Back" leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// Leave checkout for the shop.
    ExitToShop,
    /// Stay in checkout at this step.
    Step(CheckoutStep),
}

/// Details of a confirmed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub order_id: Uuid,
    pub order_number: OrderNumber,
    /// Address the confirmation is addressed to.
    pub email: Email,
    pub totals: OrderTotals,
    pub transaction_id: Uuid,
    pub placed_at: DateTime<Utc>,
}

#[derive(Debug)]
struct PaymentAttempt {
    attempt_id: Uuid,
    totals: OrderTotals,
    email: Email,
}

/// One visit to checkout.
#[derive(Debug, Default)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    shipping: ShippingInfo,
    email: Option<Email>,
    processing: Option<PaymentAttempt>,
    confirmation: Option<Confirmation>,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Shipping details entered so far.
    #[must_use]
    pub const fn shipping(&self) -> &ShippingInfo {
        &self.shipping
    }

    #[must_use]
    pub const fn is_processing(&self) -> bool {
        self.processing.is_some()
    }

    /// ID of the payment currently being processed.
    #[must_use]
    pub fn attempt_id(&self) -> Option<Uuid> {
        self.processing.as_ref().map(|attempt| attempt.attempt_id)
    }

    #[must_use]
    pub const fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    /// Each step with how the progress indicator should draw it.
    #[must_use]
    pub fn progress(&self) -> [(CheckoutStep, StepProgress); 3] {
        CheckoutStep::ALL.map(|step| (step, self.step.progress_of(step)))
    }

    /// True when the shopper should be sent back to the shop: the cart is
    /// empty and the order has not been confirmed.
    #[must_use]
    pub fn requires_redirect(&self, cart: &CartStore) -> bool {
        cart.is_empty() && self.step != CheckoutStep::Confirmation
    }

    /// Submit the shipping form and move to payment.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::WrongStep` outside the shipping step, or a
    /// validation error. The flow is unchanged on error.
    #[tracing::instrument(skip_all)]
    pub fn submit_shipping(&mut self, info: ShippingInfo) -> Result<()> {
        self.expect_step(CheckoutStep::Shipping)?;
        let email = info.validate()?;

        self.shipping = info;
        self.email = Some(email);
        self.step = CheckoutStep::Payment;

        tracing::info!(step = %self.step, "Shipping details accepted");
        add_breadcrumb("checkout", "Shipping submitted", Some(&[("step", "payment")]));
        Ok(())
    }

    /// Go back one step.
    ///
    /// From shipping or confirmation this leaves checkout. From payment it
    /// returns to shipping with the entered details kept.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::PaymentInProgress` while a payment is
    /// processing.
    pub fn back(&mut self) -> Result<BackOutcome> {
        if self.is_processing() {
            return Err(StorefrontError::PaymentInProgress);
        }

        match self.step {
            CheckoutStep::Shipping | CheckoutStep::Confirmation => Ok(BackOutcome::ExitToShop),
            CheckoutStep::Payment => {
                self.step = CheckoutStep::Shipping;
                tracing::info!(step = %self.step, "Returned to shipping");
                Ok(BackOutcome::Step(self.step))
            }
        }
    }

    /// Submit the payment form and start processing.
    ///
    /// Returns the charge to run. The flow stays at the payment step with
    /// `is_processing` set until the charge is reported back.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::WrongStep` outside the payment step,
    /// `StorefrontError::PaymentInProgress` if a charge is already running,
    /// or a validation error.
    #[tracing::instrument(skip_all, fields(total = %totals.total))]
    pub fn begin_payment(
        &mut self,
        payment: PaymentInfo,
        totals: OrderTotals,
    ) -> Result<PaymentRequest> {
        self.expect_step(CheckoutStep::Payment)?;
        if self.is_processing() {
            return Err(StorefrontError::PaymentInProgress);
        }
        payment.validate()?;
        let email = self
            .email
            .clone()
            .ok_or(StorefrontError::MissingField("email"))?;

        let request = PaymentRequest {
            attempt_id: Uuid::new_v4(),
            amount: totals.total,
            cardholder: payment.cardholder.trim().to_string(),
            card_last_four: payment.last_four(),
        };

        self.processing = Some(PaymentAttempt {
            attempt_id: request.attempt_id,
            totals,
            email,
        });

        tracing::info!(attempt_id = %request.attempt_id, "Processing payment");
        Ok(request)
    }

    /// Apply a successful charge: clear the cart and confirm the order.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::StalePayment` if the receipt is not for the
    /// payment currently processing; the flow and cart are left untouched.
    #[tracing::instrument(skip_all, fields(attempt_id = %receipt.attempt_id))]
    pub fn complete_payment(
        &mut self,
        receipt: &PaymentReceipt,
        order_number: OrderNumber,
        cart: &mut CartStore,
    ) -> Result<&Confirmation> {
        let attempt = self.take_attempt(receipt.attempt_id)?;

        cart.clear_cart();
        self.step = CheckoutStep::Confirmation;

        tracing::info!(
            step = %self.step,
            order_number = %order_number,
            total = %attempt.totals.total,
            "Order confirmed"
        );
        add_breadcrumb(
            "checkout",
            "Order confirmed",
            Some(&[("order_number", order_number.as_str())]),
        );

        Ok(self.confirmation.insert(Confirmation {
            order_id: new_order_id(),
            order_number,
            email: attempt.email,
            totals: attempt.totals,
            transaction_id: receipt.transaction_id,
            placed_at: receipt.processed_at,
        }))
    }

    /// Abandon a failed charge and return to the payment form.
    ///
    /// Returns false if `attempt_id` is not the payment currently
    /// processing, in which case nothing changes.
    pub fn fail_payment(&mut self, attempt_id: Uuid) -> bool {
        match self.take_attempt(attempt_id) {
            Ok(_) => {
                tracing::warn!(%attempt_id, "Payment failed, returned to payment form");
                true
            }
            Err(_) => false,
        }
    }

    fn take_attempt(&mut self, attempt_id: Uuid) -> Result<PaymentAttempt> {
        match self.processing.take() {
            Some(attempt) if attempt.attempt_id == attempt_id => Ok(attempt),
            other => {
                self.processing = other;
                Err(StorefrontError::StalePayment(attempt_id))
            }
        }
    }

    fn expect_step(&self, expected: CheckoutStep) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(StorefrontError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }
}
