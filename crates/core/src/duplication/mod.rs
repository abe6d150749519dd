//! Template event duplication
//!
//! Ports describe what the remote event store must offer, `plan` computes each
//! new event's fields and `service` drives a batch through the gateway.

pub mod plan;
pub mod ports;
pub mod service;

pub use plan::{plan_instance, InstancePlan, NameFormat};
pub use ports::EventGateway;
pub use service::{DuplicationMode, DuplicationReport, DuplicationService, InstanceFailure};
