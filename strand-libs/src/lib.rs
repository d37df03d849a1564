pub use anyhow;
pub use once_cell;
pub use parking_lot;
pub use rand;
pub use serde;
pub use serde_yaml;
pub use thiserror;
pub use tracing;
pub use tracing_subscriber;
