pub mod document;
pub mod event;

pub use document::{Document, DocumentResponse, DocumentStatus};
pub use event::{StatusEvent, StatusEventPayload};
