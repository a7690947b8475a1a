//! External integrations for the lead qualifier
//!
//! Currently a single one: delivery of finished leads to a CRM webhook.

pub mod integrations;

pub use integrations::{
    CrmIntegration, CrmLeadPayload, DeliveryReport, DeliveryStatus, IntegrationError,
    StubCrmIntegration, WebhookCrm, WebhookEnvelope, LEAD_SOURCE,
};
