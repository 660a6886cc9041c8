pub mod engine;
pub mod filter;
pub mod gate;
pub mod pipeline;
pub mod publisher;
pub mod reader;

pub use crate::domain::model::{ConfirmationOutcome, RawRecord, RunReport, Termination};
pub use crate::domain::ports::{Broker, MessageGenerator, Operator};
pub use crate::utils::error::Result;
