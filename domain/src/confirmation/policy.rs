//! Confirmation policy - which tools need a human decision before running

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stripe tools that create invoices or move money.
pub const DEFAULT_GATED_TOOLS: &[&str] = &[
    "Stripe_CreateInvoice",
    "Stripe_CreateInvoiceItem",
    "Stripe_FinalizeInvoice",
    "Stripe_CreatePaymentLink",
];

/// Set of tool names for which explicit human approval is mandatory.
///
/// Configured once per session and read-only afterwards. Absence from the
/// set means the tool is auto-approved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationPolicy {
    gated: BTreeSet<String>,
}

impl ConfirmationPolicy {
    /// Policy that gates nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Policy that gates [`DEFAULT_GATED_TOOLS`]
    pub fn stripe_defaults() -> Self {
        DEFAULT_GATED_TOOLS.iter().copied().collect()
    }

    pub fn with_tool(mut self, tool_name: impl Into<String>) -> Self {
        self.gated.insert(tool_name.into());
        self
    }

    pub fn requires_confirmation(&self, tool_name: &str) -> bool {
        self.gated.contains(tool_name)
    }

    pub fn gated_tools(&self) -> impl Iterator<Item = &str> {
        self.gated.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.gated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gated.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ConfirmationPolicy {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            gated: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let policy = ConfirmationPolicy::empty().with_tool("Stripe_CreateInvoice");

        assert!(policy.requires_confirmation("Stripe_CreateInvoice"));
        assert!(!policy.requires_confirmation("Stripe_RetrieveBalance"));
        // Exact match only
        assert!(!policy.requires_confirmation("stripe_createinvoice"));
    }

    #[test]
    fn test_empty_policy_gates_nothing() {
        let policy = ConfirmationPolicy::empty();
        assert!(policy.is_empty());
        assert!(!policy.requires_confirmation("Stripe_CreateInvoice"));
    }

    #[test]
    fn test_stripe_defaults() {
        let policy = ConfirmationPolicy::stripe_defaults();
        assert_eq!(policy.len(), DEFAULT_GATED_TOOLS.len());
        assert!(policy.requires_confirmation("Stripe_FinalizeInvoice"));
        assert!(!policy.requires_confirmation("Stripe_ListInvoices"));
    }

    #[test]
    fn test_deserializes_from_list() {
        let policy: ConfirmationPolicy =
            serde_json::from_str(r#"["Stripe_CreatePrice", "Stripe_CreatePrice"]"#).unwrap();
        assert_eq!(policy.len(), 1);
        assert_eq!(policy.gated_tools().collect::<Vec<_>>(), vec!["Stripe_CreatePrice"]);
    }
}
