//! Stored order record and inbound order payload
//!
//! Wire format is camelCase JSON to stay compatible with the web storefront,
//! so every struct here carries a `rename_all` attribute.

use super::status::{DeliveryMode, OrderStatus};
use serde::{Deserialize, Serialize};

/// A stored order
///
/// `total` is denormalized at creation time: `base_price` plus the cleaning
/// fee when the delivery mode is `CLEANED`. Monetary amounts are whole
/// Kenyan shillings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Order ID (assigned by server)
    pub id: String,
    pub customer_name: String,
    /// Customer phone in international format (254...)
    pub phone: String,
    /// Delivery location as free text
    pub location: String,
    pub item_id: String,
    pub item_name: String,
    /// Item price in whole shillings
    pub base_price: i64,
    /// Free-text quantity ("2 kg", "3 pieces")
    pub quantity: String,
    pub delivery_mode: DeliveryMode,
    /// Cleaning fee in whole shillings, zero unless `CLEANED`
    pub cleaning_fee: i64,
    /// Total charge in whole shillings
    pub total: i64,
    pub status: OrderStatus,
    /// Creation time in unix milliseconds
    pub created_at: i64,
    /// Last mutation time in unix milliseconds
    pub updated_at: i64,
    /// Delivery estimate quoted by the owner on approval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    /// Correlation key for the pending push payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_request_id: Option<String>,
}

impl OrderRecord {
    /// Merge a partial update into this record
    ///
    /// Timestamp stamping is the repository's job, not done here.
    pub fn apply(&mut self, changes: &OrderChanges) {
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(eta) = &changes.eta {
            self.eta = Some(eta.clone());
        }
        if let Some(request_id) = &changes.payment_request_id {
            self.payment_request_id = Some(request_id.clone());
        }
    }
}

/// Inbound order creation payload
///
/// All fields are optional at the serde level so that validation can report
/// every missing field at once instead of failing on the first one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub item_name: String,
    pub base_price: Option<i64>,
    #[serde(default)]
    pub quantity: String,
    pub delivery_mode: Option<DeliveryMode>,
    /// Overrides the configured cleaning fee when present
    pub cleaning_fee: Option<i64>,
}

impl OrderPayload {
    /// List the required fields missing from this payload, in wire-format
    /// (camelCase) names
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.customer_name.trim().is_empty() {
            missing.push("customerName");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        if self.location.trim().is_empty() {
            missing.push("location");
        }
        if self.item_id.trim().is_empty() {
            missing.push("itemId");
        }
        if self.item_name.trim().is_empty() {
            missing.push("itemName");
        }
        if self.base_price.is_none() {
            missing.push("basePrice");
        }
        if self.delivery_mode.is_none() {
            missing.push("deliveryMode");
        }
        missing
    }

    /// Cleaning fee to charge: the payload override or `default_fee` when
    /// the mode is `CLEANED`, zero otherwise
    pub fn effective_cleaning_fee(&self, default_fee: i64) -> i64 {
        match self.delivery_mode {
            Some(DeliveryMode::Cleaned) => self.cleaning_fee.unwrap_or(default_fee),
            _ => 0,
        }
    }

    /// Total charge: base price plus the effective cleaning fee
    pub fn total_price(&self, default_fee: i64) -> i64 {
        self.base_price.unwrap_or_default() + self.effective_cleaning_fee(default_fee)
    }
}

/// Partial update merged into a stored order
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub status: Option<OrderStatus>,
    pub eta: Option<String>,
    pub payment_request_id: Option<String>,
}

impl OrderChanges {
    /// Start a change set that moves the order to `status`
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_eta(mut self, eta: impl Into<String>) -> Self {
        self.eta = Some(eta.into());
        self
    }

    pub fn with_payment_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.payment_request_id = Some(request_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> OrderPayload {
        OrderPayload {
            customer_name: "Jane".to_string(),
            phone: "0712345678".to_string(),
            location: "Nyali".to_string(),
            item_id: "tilapia-large".to_string(),
            item_name: "Large Tilapia".to_string(),
            base_price: Some(600),
            quantity: "2 pieces".to_string(),
            delivery_mode: Some(DeliveryMode::Cleaned),
            cleaning_fee: None,
        }
    }

    #[test]
    fn test_missing_fields_complete_payload() {
        assert!(payload().missing_fields().is_empty());
    }

    #[test]
    fn test_missing_fields_reports_all() {
        let p = OrderPayload {
            customer_name: "   ".to_string(),
            ..OrderPayload::default()
        };
        assert_eq!(
            p.missing_fields(),
            vec![
                "customerName",
                "phone",
                "location",
                "itemId",
                "itemName",
                "basePrice",
                "deliveryMode"
            ]
        );
    }

    #[test]
    fn test_total_cleaned_uses_default_fee() {
        assert_eq!(payload().total_price(300), 900);
    }

    #[test]
    fn test_total_cleaned_fee_override() {
        let p = OrderPayload {
            cleaning_fee: Some(150),
            ..payload()
        };
        assert_eq!(p.total_price(300), 750);
    }

    #[test]
    fn test_total_as_is_ignores_fee() {
        let p = OrderPayload {
            delivery_mode: Some(DeliveryMode::AsIs),
            cleaning_fee: Some(150),
            ..payload()
        };
        assert_eq!(p.effective_cleaning_fee(300), 0);
        assert_eq!(p.total_price(300), 600);
    }

    #[test]
    fn test_payload_deserialize_camel_case() {
        let json = r#"{
            "customerName": "Jane",
            "phone": "0712345678",
            "location": "Nyali",
            "itemId": "tilapia-large",
            "itemName": "Large Tilapia",
            "basePrice": 600,
            "quantity": "2 pieces",
            "deliveryMode": "CLEANED"
        }"#;
        let p: OrderPayload = serde_json::from_str(json).unwrap();
        assert_eq!(p.customer_name, "Jane");
        assert_eq!(p.base_price, Some(600));
        assert_eq!(p.delivery_mode, Some(DeliveryMode::Cleaned));
        assert!(p.missing_fields().is_empty());
    }

    #[test]
    fn test_apply_merges_changes() {
        let mut record = OrderRecord {
            id: "ORD-1".to_string(),
            customer_name: "Jane".to_string(),
            phone: "254712345678".to_string(),
            location: "Nyali".to_string(),
            item_id: "tilapia-large".to_string(),
            item_name: "Large Tilapia".to_string(),
            base_price: 600,
            quantity: "2 pieces".to_string(),
            delivery_mode: DeliveryMode::Cleaned,
            cleaning_fee: 300,
            total: 900,
            status: OrderStatus::PendingOwnerApproval,
            created_at: 1,
            updated_at: 1,
            eta: None,
            payment_request_id: None,
        };

        record.apply(
            &OrderChanges::status(OrderStatus::PaymentPending).with_eta("20 MINS"),
        );
        assert_eq!(record.status, OrderStatus::PaymentPending);
        assert_eq!(record.eta.as_deref(), Some("20 MINS"));
        assert!(record.payment_request_id.is_none());

        // Fields absent from a change set are left alone
        record.apply(&OrderChanges::default().with_payment_request_id("ws_1"));
        assert_eq!(record.status, OrderStatus::PaymentPending);
        assert_eq!(record.eta.as_deref(), Some("20 MINS"));
        assert_eq!(record.payment_request_id.as_deref(), Some("ws_1"));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = OrderRecord {
            id: "ORD-1".to_string(),
            customer_name: "Jane".to_string(),
            phone: "254712345678".to_string(),
            location: "Nyali".to_string(),
            item_id: "tilapia-large".to_string(),
            item_name: "Large Tilapia".to_string(),
            base_price: 600,
            quantity: "2 pieces".to_string(),
            delivery_mode: DeliveryMode::AsIs,
            cleaning_fee: 0,
            total: 600,
            status: OrderStatus::Approved,
            created_at: 1,
            updated_at: 2,
            eta: Some("30-45 minutes".to_string()),
            payment_request_id: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"customerName\":\"Jane\""));
        assert!(json.contains("\"basePrice\":600"));
        assert!(json.contains("\"status\":\"APPROVED\""));
        assert!(json.contains("\"deliveryMode\":\"AS_IS\""));
        // None fields are omitted
        assert!(!json.contains("paymentRequestId"));
    }
}
