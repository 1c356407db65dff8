mod client;
mod generative;
mod language;

pub use client::{ServiceError, ServiceResult};
pub use generative::GenerativeClient;
pub use language::LanguageClient;
