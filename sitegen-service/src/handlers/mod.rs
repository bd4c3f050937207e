pub mod generate;
pub mod health;
pub mod metrics;

pub use generate::generate_site;
pub use health::health_check;
pub use self::metrics::metrics;
