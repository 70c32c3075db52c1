pub mod config;
pub mod context;
pub mod settings;

// Re-exports for convenience
pub use config::{ConfigDocument, ConfigEntry, UnmatchedPolicy};
pub use context::{ContextValue, RuntimeContext};
pub use settings::BlockSettings;
