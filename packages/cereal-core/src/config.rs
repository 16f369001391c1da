//! Codec configuration.

/// Codec configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Render indented, multi-line JSON instead of compact text
    pub pretty: bool,
    /// Accept JSON floats at integer fields (truncated toward zero, saturating)
    pub coerce_numbers: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            coerce_numbers: true,
        }
    }
}

impl CodecConfig {
    /// Default configuration with pretty rendering enabled.
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Default::default()
        }
    }
}
