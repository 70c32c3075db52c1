//! Message-driven announcement session.
//!
//! A session owns the records the extractor produced (threaded in as a
//! value; there is no process-wide announcement state) and turns each
//! inbound runtime message into a fresh fetch-filter-render pass:
//!
//! ```text
//! RuntimeMessage ──► origin policy ──► gate key ──► fetch config
//!                                                       │
//!                          rendered HTML ◄── render ◄── filter
//! ```
//!
//! Messages are independent: a failure is scoped to the message that
//! triggered it and never disturbs the record set or a previously
//! published render.

use crate::dismiss::DismissalStore;
use crate::extract::{AnnouncementRecord, extract_from_markup};
use crate::filter::filter_active;
use crate::remote::{ConfigSource, FetchError};
use crate::render::render_block;
use crate::template::TemplateResolver;
use placard_types::{BlockSettings, RuntimeContext};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// One inbound cross-frame message: reported origin plus payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeMessage {
    #[serde(default)]
    pub origin: Option<String>,
    pub context: RuntimeContext,
}

impl RuntimeMessage {
    pub fn new(context: RuntimeContext) -> Self {
        Self {
            origin: None,
            context,
        }
    }

    pub fn with_origin(origin: &str, context: RuntimeContext) -> Self {
        Self {
            origin: Some(origin.to_string()),
            context,
        }
    }
}

/// A configured announcements block, ready to process messages.
pub struct AnnouncementSession {
    records: Vec<AnnouncementRecord>,
    settings: BlockSettings,
    resolver: TemplateResolver,
    dismissals: Option<Box<dyn DismissalStore>>,
}

impl AnnouncementSession {
    pub fn new(records: Vec<AnnouncementRecord>, settings: BlockSettings) -> Self {
        Self {
            records,
            settings,
            resolver: TemplateResolver::new(),
            dismissals: None,
        }
    }

    /// Extract records from authored markup and build a session.
    pub fn from_markup(html: &str, settings: BlockSettings) -> Self {
        Self::new(extract_from_markup(html), settings)
    }

    pub fn with_resolver(mut self, resolver: TemplateResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Inject the dismissal capability (implies dismissals are enabled).
    pub fn with_dismissals(mut self, store: Box<dyn DismissalStore>) -> Self {
        self.dismissals = Some(store);
        self.settings.dismissals_enabled = true;
        self
    }

    /// The immutable extracted record set.
    pub fn records(&self) -> &[AnnouncementRecord] {
        &self.records
    }

    /// Record the reader dismissing an announcement.
    pub fn dismiss(&mut self, id: i64) {
        if let Some(store) = self.dismissals.as_deref_mut() {
            store.dismiss(id);
        }
    }

    /// Process one runtime message.
    ///
    /// Returns `Ok(None)` when the message is dropped by policy (origin
    /// not allowed, gate key absent); `Ok(Some(html))` with the
    /// replacement markup otherwise. A fetch failure is an error scoped
    /// to this message; the caller keeps its previous render.
    pub async fn handle_message<S: ConfigSource>(
        &self,
        msg: &RuntimeMessage,
        source: &S,
    ) -> Result<Option<String>, SessionError> {
        if !self.origin_allowed(msg.origin.as_deref()) {
            tracing::warn!(origin = ?msg.origin, "dropping message from disallowed origin");
            return Ok(None);
        }

        let gate = &self.settings.required_context_key;
        if !msg.context.contains_key(gate) {
            tracing::debug!(key = %gate, "message payload missing gate key; ignoring");
            return Ok(None);
        }

        let config = source.fetch().await?;
        let visible = filter_active(
            &self.records,
            &config,
            &msg.context,
            self.settings.unmatched_policy,
        );
        tracing::debug!(
            total = self.records.len(),
            visible = visible.len(),
            "filtered announcement set"
        );

        let dismissals = self
            .settings
            .dismissals_enabled
            .then_some(self.dismissals.as_deref())
            .flatten();
        Ok(Some(render_block(
            &visible,
            &msg.context,
            &self.resolver,
            dismissals,
        )))
    }

    fn origin_allowed(&self, origin: Option<&str>) -> bool {
        if self.settings.allowed_origins.is_empty() {
            return true;
        }
        origin.is_some_and(|o| self.settings.allowed_origins.iter().any(|a| a == o))
    }
}

/// Drive a session from a message channel, publishing each successful
/// render through the watch channel. Failures are logged and leave the
/// previous value in place; overlapping sends resolve last-write-wins.
pub async fn run<S: ConfigSource>(
    session: AnnouncementSession,
    source: S,
    mut messages: mpsc::Receiver<RuntimeMessage>,
    output: watch::Sender<String>,
) {
    while let Some(msg) = messages.recv().await {
        match session.handle_message(&msg, &source).await {
            Ok(Some(html)) => {
                // Receiver may be gone; rendering is still well-defined
                let _ = output.send(html);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "message handling failed; keeping previous render");
            }
        }
    }
}

/// Errors from one message-handling run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to fetch configuration: {0}")]
    Fetch(#[from] FetchError),
}
