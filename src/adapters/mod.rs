// Adapters layer: concrete implementations for external systems (http, storage, document decoding, prompts).

pub mod decode;
pub mod http;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod prompt;
pub mod storage;
