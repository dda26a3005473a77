use std::sync::{Arc, Mutex};

use crate::decoding::domain::audio_decoder::AudioDecoder;
use crate::decoding::domain::decode_error::DecodeError;
use crate::shared::constants::{FFMPEG_DECODER_NAME, WAV_DECODER_NAME};

use super::ffmpeg_decoder::FfmpegDecoder;
use super::wav_decoder::WavDecoder;

/// Builds a fresh decoder instance.
pub type DecoderFactory = Box<dyn Fn() -> Box<dyn AudioDecoder> + Send + Sync>;

/// Registry guarded for callers that register from several threads.
pub type SharedDecoderRegistry = Arc<Mutex<DecoderRegistry>>;

struct Entry {
    name: String,
    priority: i32,
    factory: DecoderFactory,
}

/// Maps backend names to decoder factories.
///
/// Populated once at startup and passed to whatever needs to construct
/// decoders. The default decoder is the one with the highest priority;
/// ties go to the earliest registration.
#[derive(Default)]
pub struct DecoderRegistry {
    entries: Vec<Entry>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing any previous entry with
    /// that name in place.
    pub fn register(&mut self, name: &str, priority: i32, factory: DecoderFactory) {
        let entry = Entry {
            name: name.to_string(),
            priority,
            factory,
        };
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        log::trace!("Registered decoder '{name}' (priority {priority})");
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn AudioDecoder>> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| (e.factory)())
    }

    /// Like [`create`](Self::create), but reports unknown names as an error.
    pub fn require(&self, name: &str) -> Result<Box<dyn AudioDecoder>, DecodeError> {
        self.create(name)
            .ok_or_else(|| DecodeError::UnknownDecoder(name.to_string()))
    }

    /// Registered names in registration order.
    pub fn list_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn default_name(&self) -> Option<&str> {
        let mut best: Option<&Entry> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.priority > b.priority) {
                best = Some(entry);
            }
        }
        best.map(|e| e.name.as_str())
    }

    pub fn create_default(&self) -> Option<Box<dyn AudioDecoder>> {
        let name = self.default_name()?;
        log::debug!("Using default decoder '{name}'");
        self.create(name)
    }

    /// Comma-terminated list of decoder names, e.g. `"ffmpeg,wav,"`.
    pub fn describe(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{},", e.name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_shared(self) -> SharedDecoderRegistry {
        Arc::new(Mutex::new(self))
    }
}

/// Registry holding the built-in backends, ffmpeg first and preferred.
pub fn default_registry() -> DecoderRegistry {
    let mut registry = DecoderRegistry::new();
    registry.register(
        FFMPEG_DECODER_NAME,
        10,
        Box::new(|| Box::new(FfmpegDecoder)),
    );
    registry.register(WAV_DECODER_NAME, 0, Box::new(|| Box::new(WavDecoder)));
    registry
}
