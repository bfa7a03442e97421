//! Pronunciation playback behind a narrow capability.
//!
//! Engines implement [`Pronounce`]; [`Speaker`] plays at most one utterance at
//! a time and never surfaces engine failures to the caller.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::task::JoinHandle;

pub const DEFAULT_LOCALE: &str = "fr-FR";

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("speech output is not permitted")]
    NotAllowed,
    #[error("speech engine failed: {0}")]
    Engine(String),
}

#[async_trait]
pub trait Pronounce: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    /// Resolves when the utterance has finished playing.
    async fn pronounce(&self, text: &str, locale: &str) -> Result<(), SpeechError>;
}

/// Engine for hosts without speech output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPronouncer;

#[async_trait]
impl Pronounce for NullPronouncer {
    fn is_available(&self) -> bool {
        false
    }

    async fn pronounce(&self, _text: &str, _locale: &str) -> Result<(), SpeechError> {
        Err(SpeechError::Engine("no speech engine".into()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechNotice {
    Started,
    EmptyText,
    Unsupported(String),
}

pub struct Speaker {
    engine: Arc<dyn Pronounce>,
    current: Mutex<Option<JoinHandle<()>>>,
}

impl Speaker {
    pub fn new(engine: Arc<dyn Pronounce>) -> Self {
        Self {
            engine,
            current: Mutex::new(None),
        }
    }

    /// Starts speaking `text`, cancelling whatever is still playing.
    /// Must be called from within a Tokio runtime.
    pub fn say(&self, text: &str, locale: &str) -> SpeechNotice {
        let text = text.trim();
        if text.is_empty() {
            tracing::warn!("no text provided to speak");
            return SpeechNotice::EmptyText;
        }
        if !self.engine.is_available() {
            return SpeechNotice::Unsupported(
                "Speech synthesis is not supported on this device.".into(),
            );
        }

        let engine = Arc::clone(&self.engine);
        let (text, locale) = (text.to_string(), locale.to_string());
        let handle = tokio::spawn(async move {
            match engine.pronounce(&text, &locale).await {
                Ok(()) => tracing::debug!(%locale, "utterance finished"),
                Err(e) => tracing::warn!(error = %e, %locale, "utterance failed"),
            }
        });

        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = current.replace(handle) {
            previous.abort();
        }
        SpeechNotice::Started
    }

    pub fn stop(&self) {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = current.take() {
            handle.abort();
        }
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.stop();
    }
}
