use serde::Serialize;

use crate::models::{GeneratedImage, ReferenceImage};

/// In-memory state for the single editing session.
///
/// History is append-only; a successful generation becomes the active image.
#[derive(Debug, Default)]
pub struct Session {
    reference: Option<ReferenceImage>,
    images: Vec<GeneratedImage>,
    active: Option<usize>,
    in_progress: bool,
    last_error: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSummary {
    pub mime_type: String,
    pub size: usize,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub in_progress: bool,
    pub last_error: Option<String>,
    pub reference_image: Option<ReferenceSummary>,
    pub active: Option<usize>,
    pub images: Vec<GeneratedImage>,
}

impl Session {
    pub fn reference(&self) -> Option<&ReferenceImage> {
        self.reference.as_ref()
    }

    pub fn has_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Replaces any previous reference image.
    pub fn set_reference(&mut self, image: ReferenceImage) {
        self.reference = Some(image);
        self.last_error = None;
    }

    pub fn clear_reference(&mut self) -> bool {
        self.reference.take().is_some()
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Marks a generation as started. Returns false if one is already running.
    pub fn try_begin(&mut self) -> bool {
        if self.in_progress {
            return false;
        }
        self.in_progress = true;
        self.last_error = None;
        true
    }

    pub fn complete(&mut self, image: GeneratedImage) {
        self.images.push(image);
        self.active = Some(self.images.len() - 1);
        self.in_progress = false;
    }

    pub fn fail(&mut self, message: String) {
        self.last_error = Some(message);
        self.in_progress = false;
    }

    pub fn record_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn active_image(&self) -> Option<&GeneratedImage> {
        self.active.and_then(|i| self.images.get(i))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            in_progress: self.in_progress,
            last_error: self.last_error.clone(),
            reference_image: self.reference.as_ref().map(|r| ReferenceSummary { mime_type: r.mime_type.clone(), size: r.len() }),
            active: self.active,
            images: self.images.clone(),
        }
    }
}
