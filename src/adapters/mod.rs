// Adapters layer: concrete broker and operator implementations.

pub mod amqp;
pub mod console;
pub mod dry_run;

pub use amqp::AmqpBroker;
pub use console::ConsoleOperator;
pub use dry_run::{AutoConfirm, DryRunBroker};
