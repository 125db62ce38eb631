//! Shopper session.
//!
//! [`StorefrontSession`] owns everything one shopper touches: the cart, the
//! current checkout visit and the payment running for it. It plays the part
//! of the page handlers, turning shopper actions into state changes and
//! queuing [`StorefrontEvent`]s for the UI.

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use balance_guru_core::ProductId;

use crate::cart::{CartStore, LineKey};
use crate::catalog::{Catalog, Product, RELATED_PRODUCTS_LIMIT};
use crate::checkout::{BackOutcome, CheckoutFlow, Confirmation, PaymentInfo, ShippingInfo};
use crate::config::StorefrontConfig;
use crate::contact::{ContactForm, ContactService};
use crate::error::{add_breadcrumb, Result, StorefrontError};
use crate::events::{Notification, Route, StorefrontEvent};
use crate::order::OrderNumber;
use crate::payment::{PaymentGateway, PendingPayment, SimulatedGateway};
use crate::pricing::OrderTotals;

/// State for one shopper.
pub struct StorefrontSession {
    config: StorefrontConfig,
    catalog: Catalog,
    gateway: Arc<dyn PaymentGateway>,
    contact: ContactService,
    cart: CartStore,
    checkout: Option<CheckoutFlow>,
    pending: Option<PendingPayment>,
    events: Vec<StorefrontEvent>,
}

impl std::fmt::Debug for StorefrontSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontSession")
            .field("products", &self.catalog.len())
            .field("cart", &self.cart)
            .field("checkout", &self.checkout)
            .field("pending", &self.pending)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl StorefrontSession {
    /// Create a session using the simulated payment gateway.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let gateway = SimulatedGateway::shared(config.payment_delay);
        let contact = ContactService::new(config.contact_delay);

        Self {
            config,
            catalog,
            gateway,
            contact,
            cart: CartStore::new(),
            checkout: None,
            pending: None,
            events: Vec::new(),
        }
    }

    /// Create a session with the catalog named by the configuration, or the
    /// built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Catalog` if the catalog cannot be loaded.
    pub fn from_config(config: StorefrontConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin()?,
        };
        Ok(Self::new(config, catalog))
    }

    /// Replace the payment gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = gateway;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// The current checkout visit, if any.
    #[must_use]
    pub const fn checkout(&self) -> Option<&CheckoutFlow> {
        self.checkout.as_ref()
    }

    /// Totals for the current cart.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::compute(&self.cart, self.config.pricing)
    }

    /// Drain queued events, oldest first.
    pub fn take_events(&mut self) -> Vec<StorefrontEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: StorefrontEvent) {
        self.events.push(event);
    }

    // =========================================================================
    // Catalog and Cart
    // =========================================================================

    /// Open a product page.
    ///
    /// Returns the product and up to four related products.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::UnknownProduct` if the ID is not in the
    /// catalog.
    pub fn view_product(&mut self, id: &ProductId) -> Result<(&Product, Vec<&Product>)> {
        let product = self
            .catalog
            .find(id)
            .ok_or_else(|| StorefrontError::UnknownProduct(id.clone()))?;
        self.events
            .push(StorefrontEvent::Navigate(Route::Product(id.clone())));

        let related = self.catalog.related(product, RELATED_PRODUCTS_LIMIT);
        Ok((product, related))
    }

    /// Add a catalog product to the cart and open the cart sidebar.
    ///
    /// A missing size or color takes the product page's preselected option.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::UnknownProduct`,
    /// `StorefrontError::InvalidOption` or `StorefrontError::InvalidQuantity`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn add_to_cart(
        &mut self,
        id: &ProductId,
        quantity: i64,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<()> {
        let product = self
            .catalog
            .find(id)
            .ok_or_else(|| StorefrontError::UnknownProduct(id.clone()))?;

        let selection = product.select(size, color)?;
        self.cart
            .add_to_cart(product, quantity, selection.size, selection.color)?;
        self.cart.set_open(true);

        self.events.push(StorefrontEvent::Notify(Notification::added_to_cart(
            quantity,
            &product.title,
        )));
        self.events.push(StorefrontEvent::CartUpdated);
        Ok(())
    }

    /// Set a line's quantity; zero or below removes it.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::InvalidQuantity` if the quantity does not
    /// fit a cart line.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> Result<()> {
        self.cart.update_quantity(key, quantity)?;
        self.emit(StorefrontEvent::CartUpdated);
        self.enforce_checkout_guard();
        Ok(())
    }

    pub fn remove_from_cart(&mut self, key: &LineKey) {
        self.cart.remove_from_cart(key);
        self.emit(StorefrontEvent::CartUpdated);
        self.enforce_checkout_guard();
    }

    pub fn set_cart_open(&mut self, open: bool) {
        self.cart.set_open(open);
        self.emit(StorefrontEvent::CartUpdated);
    }

    pub fn toggle_cart(&mut self) {
        self.cart.toggle_open();
        self.emit(StorefrontEvent::CartUpdated);
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Enter checkout with a fresh flow. An empty cart sends the shopper to
    /// the shop instead.
    #[instrument(skip(self))]
    pub fn begin_checkout(&mut self) {
        self.cart.set_open(false);
        self.emit(StorefrontEvent::CartUpdated);
        self.discard_checkout();

        if self.cart.is_empty() {
            tracing::info!("Checkout requested with empty cart, redirecting to shop");
            self.emit(StorefrontEvent::Navigate(Route::Shop));
            return;
        }

        self.checkout = Some(CheckoutFlow::new());
        tracing::info!(items = self.cart.item_count(), "Entered checkout");
        add_breadcrumb("checkout", "Entered checkout", None);
        self.emit(StorefrontEvent::Navigate(Route::Checkout));
    }

    /// The "Back" button.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NoCheckout` outside checkout, or
    /// `StorefrontError::PaymentInProgress`.
    pub fn checkout_back(&mut self) -> Result<()> {
        let outcome = self.active_flow()?.back()?;
        if outcome == BackOutcome::ExitToShop {
            self.discard_checkout();
            self.emit(StorefrontEvent::Navigate(Route::Shop));
        }
        Ok(())
    }

    /// Submit the shipping form.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NoCheckout` outside checkout, or the flow's
    /// step and validation errors.
    pub fn submit_shipping(&mut self, info: ShippingInfo) -> Result<()> {
        self.active_flow()?.submit_shipping(info)
    }

    /// Submit the payment form and start the charge in the background.
    ///
    /// Returns the attempt ID. Call [`Self::finish_payment`] to apply the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NoCheckout` outside checkout,
    /// `StorefrontError::PaymentInProgress`, or the flow's step and
    /// validation errors.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[instrument(skip_all)]
    pub fn pay(&mut self, payment: PaymentInfo) -> Result<Uuid> {
        let totals = self.totals();
        let request = self.active_flow()?.begin_payment(payment, totals)?;
        let attempt_id = request.attempt_id;

        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
        self.pending = Some(PendingPayment::spawn(Arc::clone(&self.gateway), request));
        Ok(attempt_id)
    }

    /// Wait for the running charge and apply its result.
    ///
    /// Returns `None` when the result no longer belongs to the live checkout
    /// (the shopper left or restarted checkout); such results are dropped
    /// and the cart is untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NoCheckout` if no charge is running, or
    /// `StorefrontError::Payment` if the charge failed. A failed charge
    /// returns the flow to the payment form.
    pub async fn finish_payment(&mut self) -> Result<Option<Confirmation>> {
        let pending = self.pending.take().ok_or(StorefrontError::NoCheckout)?;
        let attempt_id = pending.attempt_id();
        let result = pending.wait().await;

        let Some(flow) = self
            .checkout
            .as_mut()
            .filter(|flow| flow.attempt_id() == Some(attempt_id))
        else {
            tracing::debug!(%attempt_id, "Discarding payment result for abandoned checkout");
            return Ok(None);
        };

        match result {
            Ok(receipt) => {
                let order_number = OrderNumber::generate(&self.config.order_prefix);
                let confirmation = flow
                    .complete_payment(&receipt, order_number, &mut self.cart)?
                    .clone();

                self.events.push(StorefrontEvent::CartUpdated);
                self.events
                    .push(StorefrontEvent::Notify(Notification::order_confirmed()));
                Ok(Some(confirmation))
            }
            Err(e) => {
                flow.fail_payment(attempt_id);
                self.events
                    .push(StorefrontEvent::Notify(Notification::payment_failed(
                        &e.to_string(),
                    )));
                Err(e.into())
            }
        }
    }

    /// Submit the payment form and wait for the result.
    ///
    /// # Errors
    ///
    /// As [`Self::pay`] and [`Self::finish_payment`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub async fn submit_payment(&mut self, payment: PaymentInfo) -> Result<Option<Confirmation>> {
        self.pay(payment)?;
        self.finish_payment().await
    }

    /// Navigate away from checkout. Cancels any running charge; the cart is
    /// kept.
    pub fn leave_checkout(&mut self) {
        self.discard_checkout();
    }

    /// The "Continue Shopping" button on the confirmation page.
    pub fn continue_shopping(&mut self) {
        self.discard_checkout();
        self.emit(StorefrontEvent::Navigate(Route::Home));
    }

    fn active_flow(&mut self) -> Result<&mut CheckoutFlow> {
        self.enforce_checkout_guard();
        self.checkout.as_mut().ok_or(StorefrontError::NoCheckout)
    }

    /// Send the shopper to the shop if checkout is open on an empty cart.
    fn enforce_checkout_guard(&mut self) {
        let redirect = self
            .checkout
            .as_ref()
            .is_some_and(|flow| flow.requires_redirect(&self.cart));

        if redirect {
            tracing::info!("Cart emptied during checkout, redirecting to shop");
            self.discard_checkout();
            self.emit(StorefrontEvent::Navigate(Route::Shop));
        }
    }

    fn discard_checkout(&mut self) {
        let Some(flow) = self.checkout.take() else {
            return;
        };

        if let Some(pending) = &self.pending
            && flow.attempt_id() == Some(pending.attempt_id())
        {
            pending.cancel();
        }
        tracing::info!(step = %flow.step(), "Left checkout");
    }

    // =========================================================================
    // Contact
    // =========================================================================

    /// Send the contact form.
    ///
    /// # Errors
    ///
    /// Returns a validation error; nothing is queued in that case.
    pub async fn submit_contact(&mut self, form: &ContactForm) -> Result<()> {
        let notification = self.contact.submit(form).await?;
        self.emit(StorefrontEvent::Notify(notification));
        Ok(())
    }
}
