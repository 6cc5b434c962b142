use crate::enums::Normalization;
use crate::overlay::Alpha;

/// Rendering settings for a viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewerConfig {
    pub alpha: Alpha,
    pub normalization: Normalization,
}

impl ViewerConfig {
    pub fn with_alpha(mut self, alpha: Alpha) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }
}
