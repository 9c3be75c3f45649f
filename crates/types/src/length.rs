//! Computed lengths as they reach a sink.
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A length in points plus a factor of the display size, as produced by
/// `(+ 2pt (* 0.5 (display-size)))`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LengthSpec {
    pub length: f32,
    #[serde(default)]
    pub display_size_factor: f32,
}

impl LengthSpec {
    pub fn pt(length: f32) -> Self {
        Self {
            length,
            display_size_factor: 0.0,
        }
    }

    pub fn resolve(&self, display_size: f32) -> f32 {
        self.length + self.display_size_factor * display_size
    }
}

impl Hash for LengthSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.to_bits().hash(state);
        self.display_size_factor.to_bits().hash(state);
    }
}

impl Eq for LengthSpec {}
