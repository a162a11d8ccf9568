//! Agent definition handed to the runtime

use serde::{Deserialize, Serialize};

pub const DEFAULT_AGENT_NAME: &str = "stripe_agent";

/// Default system instructions for the Stripe management agent.
pub const DEFAULT_INSTRUCTIONS: &str = "# Introduction
Welcome to the Stripe Management AI Agent! This agent is designed to help you interact with Stripe's API for various operations, such as managing customers, creating products, handling invoices, and processing payments. Whether you're looking to create a new customer, generate invoices, or retrieve balance information, this agent will guide you through the processes seamlessly.

# Instructions
1. Understand the user's request and identify the specific actions they want to perform using the provided Stripe tools.
2. Retrieve necessary parameters and data as needed, validating user inputs.
3. Sequentially execute the tools required for the identified workflows, ensuring proper error handling and user feedback.
4. Return the results of each operation clearly, including any relevant information for the user.

# Workflows
## Workflow 1: Create a Customer
1. Use **Stripe_CreateCustomer** to create a new customer with provided name and email.
2. Return the customer ID.

## Workflow 2: Create a Product
1. Use **Stripe_CreateProduct** with provided name and description to create a new product.
2. Return the product ID.

## Workflow 3: Create a Price for a Product
1. Use **Stripe_CreatePrice** with provided product ID, unit amount, and currency to create a new price.
2. Return the price ID.

## Workflow 4: Create an Invoice
1. Use **Stripe_CreateInvoice** with the customer ID to create an invoice.
2. Return the invoice ID.

## Workflow 5: Add an Invoice Item
1. Use **Stripe_CreateInvoiceItem** with the customer ID, price ID, and invoice ID to add an item to the invoice.

## Workflow 6: Finalize an Invoice
1. Use **Stripe_FinalizeInvoice** with the invoice ID to finalize the invoice.

## Workflow 7: Retrieve Customer Invoices
1. Use **Stripe_ListInvoices** with the customer ID to list all associated invoices.
2. Return the invoices' details.

## Workflow 8: Create a Payment Link
1. Use **Stripe_CreatePaymentLink** with the price ID and desired quantity to generate a payment link.
2. Return the payment link URL.

## Workflow 9: Retrieve Balance
1. Use **Stripe_RetrieveBalance** to get the current balance from Stripe.

## Workflow 10: Create a Billing Portal Session
1. Use **Stripe_CreateBillingPortalSession** with the customer ID and optional return URL.
2. Return the session URL for the billing portal.";

/// What the runtime needs to know about the agent, besides its tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub name: String,
    pub instructions: String,
    /// Model identifier passed to the LLM provider
    pub model: String,
    /// Upper bound on model round-trips within one turn
    pub max_iterations: usize,
}

impl AgentDefinition {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_AGENT_NAME.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            model: model.into(),
            max_iterations: 10,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let agent = AgentDefinition::new("gpt-4o-mini");
        assert_eq!(agent.name, DEFAULT_AGENT_NAME);
        assert_eq!(agent.max_iterations, 10);
        assert!(agent.instructions.contains("Stripe_RetrieveBalance"));
    }

    #[test]
    fn test_builder() {
        let agent = AgentDefinition::new("gpt-4o")
            .with_name("billing")
            .with_instructions("Be brief.")
            .with_max_iterations(3);

        assert_eq!(agent.name, "billing");
        assert_eq!(agent.instructions, "Be brief.");
        assert_eq!(agent.max_iterations, 3);
    }
}
