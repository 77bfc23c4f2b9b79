//! Outbound order notifications
//!
//! One function per message, talking to whatever [`NotificationGateway`]
//! is wired in. Every send is best-effort: callers log failures and never
//! let a failed message abort an order transition.

use crate::gateways::{GatewayError, NotificationGateway};
use shared::order::{DeliveryMode, OrderRecord};
use shared::util::format_kes;

use super::reply::DEFAULT_ETA;

fn mode_label(mode: DeliveryMode) -> &'static str {
    match mode {
        DeliveryMode::AsIs => "As-is (whole)",
        DeliveryMode::Cleaned => "Cleaned & gutted",
    }
}

fn eta_label(order: &OrderRecord) -> &str {
    order.eta.as_deref().unwrap_or(DEFAULT_ETA)
}

/// Tell the owner a new order needs a decision
pub async fn send_new_order_alert(
    notifier: &dyn NotificationGateway,
    owner: &str,
    order: &OrderRecord,
) -> Result<(), GatewayError> {
    let body = format!(
        "🐟 NEW ORDER ALERT\n\n\
         Order: {}\n\
         Customer: {}\n\
         Phone: {}\n\
         Location: {}\n\
         Item: {} ({})\n\
         Preparation: {}\n\
         Total: {}\n\n\
         Reply YES <eta> to approve or NO to reject.",
        order.id,
        order.customer_name,
        order.phone,
        order.location,
        order.item_name,
        order.quantity,
        mode_label(order.delivery_mode),
        format_kes(order.total),
    );
    notifier.send_text(owner, &body).await?;
    tracing::info!(to = owner, order_id = %order.id, "New order alert sent");
    Ok(())
}

/// Tell the customer a cleaned order was approved and payment is coming
pub async fn send_approval_payment_prompt(
    notifier: &dyn NotificationGateway,
    order: &OrderRecord,
) -> Result<(), GatewayError> {
    let body = format!(
        "✅ Great news {}! Your order {} is confirmed.\n\n\
         {} ({}), cleaned & gutted.\n\
         Total: {} (includes {} cleaning fee)\n\
         Delivery estimate: {}\n\n\
         💰 You will receive an M-Pesa prompt on your phone shortly. \
         Enter your PIN to complete payment.",
        order.customer_name,
        order.id,
        order.item_name,
        order.quantity,
        format_kes(order.total),
        format_kes(order.cleaning_fee),
        eta_label(order),
    );
    notifier.send_text(&order.phone, &body).await?;
    tracing::info!(to = %order.phone, order_id = %order.id, "Payment prompt sent");
    Ok(())
}

/// Tell the customer an as-is order was approved, cash on delivery
pub async fn send_approval_confirmation(
    notifier: &dyn NotificationGateway,
    order: &OrderRecord,
) -> Result<(), GatewayError> {
    let body = format!(
        "✅ Great news {}! Your order {} is confirmed.\n\n\
         {} ({}), delivered as-is.\n\
         Total: {}, payable in cash on delivery.\n\
         Delivery estimate: {}",
        order.customer_name,
        order.id,
        order.item_name,
        order.quantity,
        format_kes(order.total),
        eta_label(order),
    );
    notifier.send_text(&order.phone, &body).await?;
    tracing::info!(to = %order.phone, order_id = %order.id, "Approval confirmation sent");
    Ok(())
}

/// Confirm to the owner that their approval was applied
pub async fn send_approval_applied_notice(
    notifier: &dyn NotificationGateway,
    owner: &str,
    order: &OrderRecord,
) -> Result<(), GatewayError> {
    let body = format!("✅ Order {} updated successfully!", order.id);
    notifier.send_text(owner, &body).await?;
    tracing::info!(to = owner, order_id = %order.id, "Approval applied notice sent");
    Ok(())
}

/// Tell the customer the owner turned the order down
pub async fn send_rejection_notice(
    notifier: &dyn NotificationGateway,
    order: &OrderRecord,
) -> Result<(), GatewayError> {
    let body = format!(
        "❌ Sorry {}, we cannot fulfil your order {} right now. \
         Nothing has been charged. Please try again later or contact us directly.",
        order.customer_name, order.id,
    );
    notifier.send_text(&order.phone, &body).await?;
    tracing::info!(to = %order.phone, order_id = %order.id, "Rejection notice sent");
    Ok(())
}

/// Confirm to the owner that the rejection was recorded
pub async fn send_rejection_applied_notice(
    notifier: &dyn NotificationGateway,
    owner: &str,
    order: &OrderRecord,
) -> Result<(), GatewayError> {
    let body = format!("❌ Order {} marked as out of stock.", order.id);
    notifier.send_text(owner, &body).await?;
    tracing::info!(to = owner, order_id = %order.id, "Rejection applied notice sent");
    Ok(())
}

/// Tell the customer their payment went through
pub async fn send_payment_confirmation(
    notifier: &dyn NotificationGateway,
    order: &OrderRecord,
) -> Result<(), GatewayError> {
    let body = format!(
        "🎉 Payment received! Thank you {}.\n\n\
         Your order {} is being prepared.\n\
         Delivery estimate: {}",
        order.customer_name,
        order.id,
        eta_label(order),
    );
    notifier.send_text(&order.phone, &body).await?;
    tracing::info!(to = %order.phone, order_id = %order.id, "Payment confirmation sent");
    Ok(())
}

/// Tell the owner the money arrived
pub async fn send_payment_received_notice(
    notifier: &dyn NotificationGateway,
    owner: &str,
    order: &OrderRecord,
) -> Result<(), GatewayError> {
    let body = format!(
        "💰 PAYMENT RECEIVED\n\n\
         Order: {}\n\
         Customer: {}\n\
         Amount: {}\n\n\
         Prepare the order for delivery.",
        order.id,
        order.customer_name,
        format_kes(order.total),
    );
    notifier.send_text(owner, &body).await?;
    tracing::info!(to = owner, order_id = %order.id, "Payment received notice sent");
    Ok(())
}

/// Tell the customer the payment attempt failed but the order is held
pub async fn send_payment_failure_notice(
    notifier: &dyn NotificationGateway,
    order: &OrderRecord,
    reason: &str,
) -> Result<(), GatewayError> {
    let body = format!(
        "Your M-Pesa payment for order {} did not go through ({}). \
         Your order is still reserved and we will send a new payment request shortly.",
        order.id, reason,
    );
    notifier.send_text(&order.phone, &body).await?;
    tracing::info!(to = %order.phone, order_id = %order.id, "Payment failure notice sent");
    Ok(())
}

/// Tell the owner a payment attempt failed
pub async fn send_payment_failure_alert(
    notifier: &dyn NotificationGateway,
    owner: &str,
    order: &OrderRecord,
    reason: &str,
) -> Result<(), GatewayError> {
    let body = format!(
        "⚠️ Payment failed for order {} ({}): {}. \
         The order is still awaiting payment.",
        order.id, order.customer_name, reason,
    );
    notifier.send_text(owner, &body).await?;
    tracing::info!(to = owner, order_id = %order.id, "Payment failure alert sent");
    Ok(())
}

/// Tell the owner their reply had nothing to act on
pub async fn send_no_pending_notice(
    notifier: &dyn NotificationGateway,
    owner: &str,
) -> Result<(), GatewayError> {
    notifier
        .send_text(owner, "No orders are awaiting approval right now.")
        .await?;
    tracing::info!(to = owner, "No pending orders notice sent");
    Ok(())
}
