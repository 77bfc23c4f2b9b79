//! End-to-end order lifecycle tests
//!
//! Drives the lifecycle controller through the same trigger sequences the
//! HTTP layer would, with recording fakes in place of WhatsApp and M-Pesa.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use seaside_server::gateways::{GatewayError, NotificationGateway, PaymentGateway, PushPaymentAck};
use seaside_server::orders::{DEFAULT_ETA, InMemoryOrderRepository, OrderLifecycle, OrderRepository};
use shared::ErrorCode;
use shared::order::{DeliveryMode, OrderPayload, OrderStatus};

const OWNER: &str = "254700000001";
const CUSTOMER: &str = "254722000111";

// ========================================================================
// Gateway fakes
// ========================================================================

/// Records every message instead of sending it
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn sent_to(&self, number: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == number)
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationGateway for RecordingNotifier {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

/// Hands out sequential request IDs (ws_1, ws_2, ...) and records pushes
#[derive(Default)]
struct StubPayments {
    calls: Mutex<Vec<(String, i64, String)>>,
    next_id: AtomicUsize,
    fail: AtomicBool,
}

impl StubPayments {
    fn pushes(&self) -> Vec<(String, i64, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for StubPayments {
    async fn initiate_push(
        &self,
        phone: &str,
        amount: i64,
        reference: &str,
        _description: &str,
    ) -> Result<PushPaymentAck, GatewayError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }
        self.calls
            .lock()
            .unwrap()
            .push((phone.to_string(), amount, reference.to_string()));
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PushPaymentAck {
            request_id: format!("ws_{n}"),
            customer_message: Some("Success. Request accepted for processing".to_string()),
        })
    }
}

// ========================================================================
// Harness
// ========================================================================

struct Harness {
    repository: Arc<InMemoryOrderRepository>,
    notifier: Arc<RecordingNotifier>,
    payments: Arc<StubPayments>,
    lifecycle: OrderLifecycle,
}

fn harness() -> Harness {
    let repository = Arc::new(InMemoryOrderRepository::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let payments = Arc::new(StubPayments::default());
    let lifecycle = OrderLifecycle::new(
        repository.clone(),
        notifier.clone(),
        payments.clone(),
        OWNER.to_string(),
        300,
    );
    Harness {
        repository,
        notifier,
        payments,
        lifecycle,
    }
}

fn cleaned_payload() -> OrderPayload {
    OrderPayload {
        customer_name: "Amina".to_string(),
        phone: "0722000111".to_string(),
        location: "Nyali Beach Road".to_string(),
        item_id: "red-snapper".to_string(),
        item_name: "Red Snapper".to_string(),
        base_price: Some(600),
        quantity: "1 kg".to_string(),
        delivery_mode: Some(DeliveryMode::Cleaned),
        cleaning_fee: None,
    }
}

fn as_is_payload() -> OrderPayload {
    OrderPayload {
        delivery_mode: Some(DeliveryMode::AsIs),
        ..cleaned_payload()
    }
}

// ========================================================================
// Scenarios
// ========================================================================

#[tokio::test]
async fn test_create_computes_total_and_alerts_owner() {
    let h = harness();
    let order = h.lifecycle.create_order(cleaned_payload()).await.unwrap();

    assert_eq!(order.total, 900);
    assert_eq!(order.cleaning_fee, 300);
    assert_eq!(order.status, OrderStatus::PendingOwnerApproval);
    assert_eq!(order.phone, CUSTOMER);

    let owner_msgs = h.notifier.sent_to(OWNER);
    assert_eq!(owner_msgs.len(), 1);
    assert!(owner_msgs[0].contains("NEW ORDER ALERT"));
    assert!(owner_msgs[0].contains(&order.id));
    assert!(owner_msgs[0].contains("KSh 900"));
    assert!(owner_msgs[0].contains("Reply YES"));
}

#[tokio::test]
async fn test_cleaned_order_full_payment_flow() {
    let h = harness();
    let order = h.lifecycle.create_order(cleaned_payload()).await.unwrap();

    // Owner approves with an estimate
    let updated = h
        .lifecycle
        .handle_owner_reply("YES 20 mins")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, order.id);
    assert_eq!(updated.status, OrderStatus::PaymentPending);
    assert_eq!(updated.eta.as_deref(), Some("20 MINS"));

    // Push payment goes out and the request ID is stored on the order
    let ack = h.lifecycle.initiate_push_payment(&order.id).await.unwrap();
    assert_eq!(ack.request_id, "ws_1");
    assert_eq!(
        h.repository
            .get(&order.id)
            .unwrap()
            .payment_request_id
            .as_deref(),
        Some("ws_1")
    );
    assert_eq!(
        h.payments.pushes(),
        vec![(CUSTOMER.to_string(), 900, order.id.clone())]
    );

    // Gateway reports success
    let settled = h
        .lifecycle
        .handle_payment_callback("ws_1", 0, "Success")
        .await
        .unwrap();
    assert_eq!(settled.status, OrderStatus::PaymentCompleted);

    // Owner heard three times (alert + reply receipt + payment), customer
    // twice (prompt + receipt)
    let owner = h.notifier.sent_to(OWNER);
    assert_eq!(owner.len(), 3);
    assert!(owner[1].contains("updated successfully"));
    assert!(owner[1].contains(&order.id));
    let customer = h.notifier.sent_to(CUSTOMER);
    assert_eq!(customer.len(), 2);
    assert!(customer[0].contains("M-Pesa prompt"));
    assert!(customer[0].contains("20 MINS"));
    assert!(customer[1].contains("Payment received"));
}

#[tokio::test]
async fn test_duplicate_success_callback_is_ignored() {
    let h = harness();
    let order = h.lifecycle.create_order(cleaned_payload()).await.unwrap();
    h.lifecycle.handle_owner_reply("YES 20 mins").await.unwrap();
    h.lifecycle.initiate_push_payment(&order.id).await.unwrap();

    let first = h
        .lifecycle
        .handle_payment_callback("ws_1", 0, "Success")
        .await
        .unwrap();
    let sends_after_first = h.notifier.count();

    // The gateway retries the same callback
    let second = h
        .lifecycle
        .handle_payment_callback("ws_1", 0, "Success")
        .await
        .unwrap();

    assert_eq!(second.status, OrderStatus::PaymentCompleted);
    assert_eq!(second.updated_at, first.updated_at);
    assert_eq!(h.notifier.count(), sends_after_first);
}

#[tokio::test]
async fn test_as_is_order_approved_with_default_eta() {
    let h = harness();
    let order = h.lifecycle.create_order(as_is_payload()).await.unwrap();
    assert_eq!(order.total, 600);
    assert_eq!(order.cleaning_fee, 0);

    let updated = h
        .lifecycle
        .handle_owner_reply("yes")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Approved);
    assert_eq!(updated.eta.as_deref(), Some(DEFAULT_ETA));

    let customer = h.notifier.sent_to(CUSTOMER);
    assert_eq!(customer.len(), 1);
    assert!(customer[0].contains("cash on delivery"));
    assert!(customer[0].contains(DEFAULT_ETA));

    // Owner gets exactly one receipt confirming the reply was applied
    let owner = h.notifier.sent_to(OWNER);
    assert_eq!(owner.len(), 2);
    assert_eq!(
        owner
            .iter()
            .filter(|m| m.contains("updated successfully"))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_rejection_notifies_both_parties() {
    let h = harness();
    let order = h.lifecycle.create_order(cleaned_payload()).await.unwrap();

    let updated = h
        .lifecycle
        .handle_owner_reply("NO")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Rejected);

    let customer = h.notifier.sent_to(CUSTOMER);
    assert_eq!(customer.len(), 1);
    assert!(customer[0].contains("cannot fulfil"));
    assert_eq!(
        h.repository.get(&order.id).unwrap().status,
        OrderStatus::Rejected
    );

    // Owner gets exactly one receipt for the rejection
    let owner = h.notifier.sent_to(OWNER);
    assert_eq!(owner.len(), 2);
    assert!(owner[1].contains(&order.id));
    assert!(owner[1].contains("marked as out of stock"));
}

#[tokio::test]
async fn test_reply_lands_on_most_recent_pending() {
    let h = harness();
    let first = h.lifecycle.create_order(cleaned_payload()).await.unwrap();
    let second = h
        .lifecycle
        .create_order(OrderPayload {
            customer_name: "Brian".to_string(),
            phone: "0733000222".to_string(),
            ..cleaned_payload()
        })
        .await
        .unwrap();

    let updated = h
        .lifecycle
        .handle_owner_reply("YES 1 hour")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, second.id);

    assert_eq!(
        h.repository.get(&second.id).unwrap().status,
        OrderStatus::PaymentPending
    );
    assert_eq!(
        h.repository.get(&first.id).unwrap().status,
        OrderStatus::PendingOwnerApproval
    );
}

#[tokio::test]
async fn test_callback_for_unknown_request_changes_nothing() {
    let h = harness();
    let order = h.lifecycle.create_order(cleaned_payload()).await.unwrap();
    let sends_before = h.notifier.count();

    let result = h
        .lifecycle
        .handle_payment_callback("ws_404", 0, "Success")
        .await;
    assert!(result.is_none());
    assert_eq!(h.notifier.count(), sends_before);
    assert_eq!(
        h.repository.get(&order.id).unwrap().status,
        OrderStatus::PendingOwnerApproval
    );
}

#[tokio::test]
async fn test_failed_payment_keeps_order_payable() {
    let h = harness();
    let order = h.lifecycle.create_order(cleaned_payload()).await.unwrap();
    h.lifecycle.handle_owner_reply("YES 20 mins").await.unwrap();
    h.lifecycle.initiate_push_payment(&order.id).await.unwrap();

    let after_failure = h
        .lifecycle
        .handle_payment_callback("ws_1", 1032, "Request cancelled by user")
        .await
        .unwrap();
    assert_eq!(after_failure.status, OrderStatus::PaymentPending);

    // Both parties hear about the failure
    let customer = h.notifier.sent_to(CUSTOMER);
    assert!(customer.last().unwrap().contains("did not go through"));
    assert!(
        h.notifier
            .sent_to(OWNER)
            .last()
            .unwrap()
            .contains("Payment failed")
    );

    // Retry gets a fresh request ID and completes the order
    let ack = h.lifecycle.initiate_push_payment(&order.id).await.unwrap();
    assert_eq!(ack.request_id, "ws_2");
    let settled = h
        .lifecycle
        .handle_payment_callback("ws_2", 0, "Success")
        .await
        .unwrap();
    assert_eq!(settled.status, OrderStatus::PaymentCompleted);
}

#[tokio::test]
async fn test_push_rejected_while_awaiting_approval() {
    let h = harness();
    let order = h.lifecycle.create_order(cleaned_payload()).await.unwrap();

    let err = h
        .lifecycle
        .initiate_push_payment(&order.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotPayable);
    assert!(h.payments.pushes().is_empty());
}

#[tokio::test]
async fn test_gateway_failure_leaves_status_unchanged() {
    let h = harness();
    let order = h.lifecycle.create_order(cleaned_payload()).await.unwrap();
    h.lifecycle.handle_owner_reply("YES 20 mins").await.unwrap();

    h.payments.fail.store(true, Ordering::SeqCst);
    let err = h
        .lifecycle
        .initiate_push_payment(&order.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NetworkError);

    let stored = h.repository.get(&order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::PaymentPending);
    assert!(stored.payment_request_id.is_none());

    // Retry once the gateway recovers
    h.payments.fail.store(false, Ordering::SeqCst);
    assert!(h.lifecycle.initiate_push_payment(&order.id).await.is_ok());
}

#[tokio::test]
async fn test_reply_with_nothing_pending_notifies_owner() {
    let h = harness();
    let result = h.lifecycle.handle_owner_reply("YES").await.unwrap();
    assert!(result.is_none());

    let owner = h.notifier.sent_to(OWNER);
    assert_eq!(owner.len(), 1);
    assert!(owner[0].contains("No orders are awaiting approval"));
}
