//! Order lifecycle controller
//!
//! Reconciles the three asynchronous triggers that move an order: the
//! storefront creating it, the owner replying over WhatsApp, and the
//! M-Pesa callback reporting a payment result. Every mutation goes through
//! the repository's guarded transition, so a trigger that arrives late or
//! twice falls out as a status mismatch instead of corrupting state.
//!
//! ```text
//! POST /api/orders ──────────> PENDING_OWNER_APPROVAL
//!                                │
//! owner reply "NO"  ─────────────┼──> REJECTED
//! owner reply "YES <eta>" ───────┤
//!                                ├──> APPROVED          (AS_IS, cash)
//!                                └──> PAYMENT_PENDING   (CLEANED)
//!                                       │
//! M-Pesa callback, ResultCode 0 ────────┴──> PAYMENT_COMPLETED
//! ```

use crate::gateways::{NotificationGateway, PaymentGateway, PushPaymentAck};
use crate::orders::notify;
use crate::orders::reply::{self, DEFAULT_ETA, OwnerDecision};
use crate::orders::repository::{OrderRepository, TransitionOutcome};
use shared::order::{DeliveryMode, OrderChanges, OrderPayload, OrderRecord, OrderStatus};
use shared::util::{generate_order_id, now_millis, to_intl_phone};
use shared::{AppError, AppResult, ErrorCode};
use std::sync::Arc;

pub struct OrderLifecycle {
    repository: Arc<dyn OrderRepository>,
    notifier: Arc<dyn NotificationGateway>,
    payments: Arc<dyn PaymentGateway>,
    owner_number: String,
    default_cleaning_fee: i64,
}

impl OrderLifecycle {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        notifier: Arc<dyn NotificationGateway>,
        payments: Arc<dyn PaymentGateway>,
        owner_number: String,
        default_cleaning_fee: i64,
    ) -> Self {
        Self {
            repository,
            notifier,
            payments,
            owner_number,
            default_cleaning_fee,
        }
    }

    /// Validate and store a new order, then alert the owner
    pub async fn create_order(&self, payload: OrderPayload) -> AppResult<OrderRecord> {
        let missing = payload.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::missing_fields(missing));
        }
        if payload.base_price.is_some_and(|p| p < 0) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "basePrice must be non-negative",
            ));
        }
        if payload.cleaning_fee.is_some_and(|f| f < 0) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "cleaningFee must be non-negative",
            ));
        }

        let now = now_millis();
        let cleaning_fee = payload.effective_cleaning_fee(self.default_cleaning_fee);
        // missing_fields() guarantees these are present
        let base_price = payload.base_price.unwrap_or_default();
        let delivery_mode = payload.delivery_mode.unwrap_or_default();

        let order = OrderRecord {
            id: generate_order_id(),
            customer_name: payload.customer_name.trim().to_string(),
            phone: to_intl_phone(&payload.phone),
            location: payload.location.trim().to_string(),
            item_id: payload.item_id.trim().to_string(),
            item_name: payload.item_name.trim().to_string(),
            base_price,
            quantity: payload.quantity.trim().to_string(),
            delivery_mode,
            cleaning_fee,
            total: payload.total_price(self.default_cleaning_fee),
            status: OrderStatus::PendingOwnerApproval,
            created_at: now,
            updated_at: now,
            eta: None,
            payment_request_id: None,
        };
        self.repository.save(order.clone());
        tracing::info!(order_id = %order.id, total = order.total, "Order created");

        if let Err(e) =
            notify::send_new_order_alert(self.notifier.as_ref(), &self.owner_number, &order).await
        {
            tracing::warn!(order_id = %order.id, error = %e, "Owner alert failed");
        }

        Ok(order)
    }

    /// Apply an owner reply to the most recently created pending order.
    ///
    /// Returns the order the reply landed on, or `None` when nothing was
    /// awaiting approval.
    pub async fn handle_owner_reply(&self, text: &str) -> AppResult<Option<OrderRecord>> {
        let decision = reply::parse_owner_reply(text);

        let Some(pending) = self.repository.latest_pending() else {
            tracing::info!("Owner reply with no pending orders");
            if let Err(e) =
                notify::send_no_pending_notice(self.notifier.as_ref(), &self.owner_number).await
            {
                tracing::warn!(error = %e, "No pending orders notice failed");
            }
            return Ok(None);
        };

        let updated = if decision.approved {
            self.approve(&pending, decision).await?
        } else {
            self.reject(&pending).await?
        };
        Ok(Some(updated))
    }

    async fn approve(
        &self,
        pending: &OrderRecord,
        decision: OwnerDecision,
    ) -> AppResult<OrderRecord> {
        let eta = decision.eta.unwrap_or_else(|| DEFAULT_ETA.to_string());
        let next = match pending.delivery_mode {
            DeliveryMode::Cleaned => OrderStatus::PaymentPending,
            DeliveryMode::AsIs => OrderStatus::Approved,
        };

        match self.repository.transition(
            &pending.id,
            OrderStatus::PendingOwnerApproval,
            &OrderChanges::status(next).with_eta(eta),
        ) {
            TransitionOutcome::Applied(order) => {
                tracing::info!(order_id = %order.id, status = ?order.status, "Order approved");
                let sent = match order.delivery_mode {
                    DeliveryMode::Cleaned => {
                        notify::send_approval_payment_prompt(self.notifier.as_ref(), &order).await
                    }
                    DeliveryMode::AsIs => {
                        notify::send_approval_confirmation(self.notifier.as_ref(), &order).await
                    }
                };
                if let Err(e) = sent {
                    tracing::warn!(order_id = %order.id, error = %e, "Approval notice failed");
                }
                if let Err(e) = notify::send_approval_applied_notice(
                    self.notifier.as_ref(),
                    &self.owner_number,
                    &order,
                )
                .await
                {
                    tracing::warn!(order_id = %order.id, error = %e, "Approval applied notice failed");
                }
                Ok(order)
            }
            TransitionOutcome::StatusMismatch(order) => {
                tracing::info!(
                    order_id = %order.id,
                    status = ?order.status,
                    "Approval ignored, order no longer pending"
                );
                Ok(order)
            }
            TransitionOutcome::NotFound => Err(AppError::order_not_found(&pending.id)),
        }
    }

    async fn reject(&self, pending: &OrderRecord) -> AppResult<OrderRecord> {
        match self.repository.transition(
            &pending.id,
            OrderStatus::PendingOwnerApproval,
            &OrderChanges::status(OrderStatus::Rejected),
        ) {
            TransitionOutcome::Applied(order) => {
                tracing::info!(order_id = %order.id, "Order rejected");
                if let Err(e) =
                    notify::send_rejection_notice(self.notifier.as_ref(), &order).await
                {
                    tracing::warn!(order_id = %order.id, error = %e, "Rejection notice failed");
                }
                if let Err(e) = notify::send_rejection_applied_notice(
                    self.notifier.as_ref(),
                    &self.owner_number,
                    &order,
                )
                .await
                {
                    tracing::warn!(order_id = %order.id, error = %e, "Rejection applied notice failed");
                }
                Ok(order)
            }
            TransitionOutcome::StatusMismatch(order) => {
                tracing::info!(
                    order_id = %order.id,
                    status = ?order.status,
                    "Rejection ignored, order no longer pending"
                );
                Ok(order)
            }
            TransitionOutcome::NotFound => Err(AppError::order_not_found(&pending.id)),
        }
    }

    /// Ask the payment gateway to push a payment prompt to the customer.
    ///
    /// The order must be in `PAYMENT_PENDING`. A gateway failure leaves the
    /// order status untouched so the push can simply be retried.
    pub async fn initiate_push_payment(&self, order_id: &str) -> AppResult<PushPaymentAck> {
        let order = self
            .repository
            .get(order_id)
            .ok_or_else(|| AppError::order_not_found(order_id))?;
        if order.status != OrderStatus::PaymentPending {
            return Err(AppError::order_not_payable(order_id, order.status));
        }

        let description = format!("SeasideSeafood Order {}", order.id);
        let ack = self
            .payments
            .initiate_push(&order.phone, order.total, &order.id, &description)
            .await
            .map_err(|e| {
                tracing::warn!(order_id = %order.id, error = %e, "Push payment initiation failed");
                AppError::from(e)
            })?;

        match self.repository.transition(
            order_id,
            OrderStatus::PaymentPending,
            &OrderChanges::default().with_payment_request_id(ack.request_id.clone()),
        ) {
            TransitionOutcome::Applied(_) => {}
            TransitionOutcome::StatusMismatch(current) => {
                tracing::warn!(
                    order_id = %current.id,
                    status = ?current.status,
                    "Order left PAYMENT_PENDING during push initiation"
                );
            }
            TransitionOutcome::NotFound => return Err(AppError::order_not_found(order_id)),
        }

        tracing::info!(order_id = order_id, request_id = %ack.request_id, "Push payment initiated");
        Ok(ack)
    }

    /// Settle an asynchronous payment result.
    ///
    /// Never fails: the gateway gets its acknowledgement no matter what we
    /// make of the callback. A duplicate success report finds the order
    /// already completed and changes nothing; a failure report leaves the
    /// order in `PAYMENT_PENDING` so the push can be retried.
    pub async fn handle_payment_callback(
        &self,
        request_id: &str,
        result_code: i64,
        result_desc: &str,
    ) -> Option<OrderRecord> {
        let Some(order) = self.repository.find_by_payment_request(request_id) else {
            tracing::warn!(request_id = request_id, "Payment callback for unknown request");
            return None;
        };

        if result_code == 0 {
            match self.repository.transition(
                &order.id,
                OrderStatus::PaymentPending,
                &OrderChanges::status(OrderStatus::PaymentCompleted),
            ) {
                TransitionOutcome::Applied(updated) => {
                    tracing::info!(order_id = %updated.id, "Payment completed");
                    if let Err(e) =
                        notify::send_payment_confirmation(self.notifier.as_ref(), &updated).await
                    {
                        tracing::warn!(order_id = %updated.id, error = %e, "Payment confirmation failed");
                    }
                    if let Err(e) = notify::send_payment_received_notice(
                        self.notifier.as_ref(),
                        &self.owner_number,
                        &updated,
                    )
                    .await
                    {
                        tracing::warn!(order_id = %updated.id, error = %e, "Payment received notice failed");
                    }
                    Some(updated)
                }
                TransitionOutcome::StatusMismatch(current) => {
                    tracing::info!(
                        order_id = %current.id,
                        status = ?current.status,
                        "Duplicate payment callback ignored"
                    );
                    Some(current)
                }
                TransitionOutcome::NotFound => None,
            }
        } else {
            if order.status != OrderStatus::PaymentPending {
                tracing::info!(
                    order_id = %order.id,
                    status = ?order.status,
                    "Late payment failure ignored"
                );
                return Some(order);
            }
            tracing::warn!(order_id = %order.id, result_code, result_desc, "Payment failed");
            if let Err(e) =
                notify::send_payment_failure_notice(self.notifier.as_ref(), &order, result_desc)
                    .await
            {
                tracing::warn!(order_id = %order.id, error = %e, "Payment failure notice failed");
            }
            if let Err(e) = notify::send_payment_failure_alert(
                self.notifier.as_ref(),
                &self.owner_number,
                &order,
                result_desc,
            )
            .await
            {
                tracing::warn!(order_id = %order.id, error = %e, "Payment failure alert failed");
            }
            // Status unchanged so the push can be retried
            Some(order)
        }
    }
}
