//! Ready-made host values for callers that do not bring their own
//! framework types: the CLI, tests and simple embedders.

mod application;
mod request;

pub use application::SimpleApplication;
pub use request::SimpleRequest;
