//! WebAssembly module for the Wedding Marketplace admin dashboard
//!
//! Provides client-side computation for:
//! - Provider status derivation and the actions offered per status
//! - Pending-approval counter deltas
//! - Payment commission splits
//! - Service category field lists for the detail modal

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

fn parse_status(status: &str) -> Result<ProviderStatus, JsValue> {
    status.parse::<ProviderStatus>().map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&e));
        JsValue::from_str(&e)
    })
}

/// Derive a provider's moderation status from its stored columns
#[wasm_bindgen]
pub fn derive_provider_status(visible: bool, accept: Option<bool>) -> String {
    derive_status(visible, accept).to_string()
}

/// Actions ("approve", "reject", "reset") offered for a displayed status
#[wasm_bindgen]
pub fn available_provider_actions(status: &str) -> Result<js_sys::Array, JsValue> {
    let status = parse_status(status)?;
    Ok(available_actions(status)
        .iter()
        .map(|action| JsValue::from_str(action_name(*action)))
        .collect())
}

fn action_name(action: Transition) -> &'static str {
    match action {
        Transition::Approve => "approve",
        Transition::Reject => "reject",
        Transition::Reset => "reset",
    }
}

/// Change to the pending-approval counter when a provider moves between statuses
#[wasm_bindgen]
pub fn pending_counter_delta(previous: &str, next: &str) -> Result<i32, JsValue> {
    let delta = PendingDelta::between(parse_status(previous)?, parse_status(next)?);
    Ok(match delta {
        PendingDelta::Decrement => -1,
        PendingDelta::Increment => 1,
        PendingDelta::Unchanged => 0,
    })
}

/// Platform commission for a reservation amount
#[wasm_bindgen]
pub fn calculate_commission(amount: f64) -> f64 {
    let split = CommissionSplit::of(Decimal::try_from(amount).unwrap_or(Decimal::ZERO));
    split.commission.to_string().parse().unwrap_or(0.0)
}

/// Amount paid out to the provider after commission
#[wasm_bindgen]
pub fn calculate_net_amount(amount: f64) -> f64 {
    let split = CommissionSplit::of(Decimal::try_from(amount).unwrap_or(Decimal::ZERO));
    split.net_amount.to_string().parse().unwrap_or(0.0)
}

/// Detail table fields shown for a provider type, empty for unknown types
#[wasm_bindgen]
pub fn service_detail_fields(owner_type: &str) -> js_sys::Array {
    ServiceCategory::parse(owner_type)
        .map(|category| category.schema().fields)
        .unwrap_or(&[])
        .iter()
        .map(|field| JsValue::from_str(field))
        .collect()
}

/// Heading of the detail modal for a provider type
#[wasm_bindgen]
pub fn service_category_label(owner_type: &str) -> Option<String> {
    ServiceCategory::parse(owner_type).map(|category| category.schema().label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_provider_status() {
        assert_eq!(derive_provider_status(true, Some(true)), "Active");
        assert_eq!(derive_provider_status(false, Some(false)), "Rejected");
        assert_eq!(derive_provider_status(false, None), "Pending");
        assert_eq!(derive_provider_status(true, None), "Pending");
    }

    #[test]
    fn test_commission_split() {
        assert!((calculate_commission(1000.0) - 150.0).abs() < 0.001);
        assert!((calculate_net_amount(1000.0) - 850.0).abs() < 0.001);
        assert_eq!(calculate_commission(0.0), 0.0);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(action_name(Transition::Approve), "approve");
        assert_eq!(action_name(Transition::Reset), "reset");
    }

    #[test]
    fn test_category_label() {
        assert!(service_category_label("hall").is_some());
        assert_eq!(service_category_label("florist"), None);
    }
}
