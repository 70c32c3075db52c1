//! placard-core: the announcements block pipeline.
//!
//! Three stages with everything else in support:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Authored markup (one block)                 │
//! └──────────────────────────────────────────────────────────────┘
//!                              │  extract (once, at init)
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │           AnnouncementRecord set (immutable, ordered)        │
//! └──────────────────────────────────────────────────────────────┘
//!                              │  per runtime message:
//!                              │  fetch config → filter → render
//!                              ▼
//!                    Replacement HTML for the block
//! ```

pub mod condition;
pub mod dismiss;
pub mod extract;
pub mod filter;
pub mod markup;
pub mod remote;
pub mod render;
pub mod session;
pub mod settings;
pub mod template;


// Re-exports for convenience
pub use condition::{Operator, evaluate};
pub use dismiss::{DismissalStore, FileDismissalStore, MemoryDismissalStore};
pub use extract::{AnnouncementRecord, ButtonSpec, extract_announcements, extract_from_markup};
pub use filter::filter_active;
pub use remote::{ConfigSource, FetchError, HttpConfigSource, StaticConfigSource};
pub use render::render_block;
pub use session::{AnnouncementSession, RuntimeMessage, SessionError, run};
pub use settings::{SettingsError, load_settings};
pub use template::TemplateResolver;
