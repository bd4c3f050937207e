pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod gemini;
pub mod generator;
pub mod metrics;
pub mod transport;

pub use error::{GenerationError, ModelFailure};
pub use fetcher::{fetch_with_retry, RetryPolicy};
pub use generator::{GeneratorSettings, SiteGenerator};
pub use transport::{HttpTransport, MockTransport, ReqwestTransport, TransportResponse};
