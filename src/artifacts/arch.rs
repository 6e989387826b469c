//! Host architecture detection.

use std::fmt;

/// The two download sets that exist upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Arm64,
    Amd64,
}

impl Architecture {
    /// Architecture of the running binary.
    pub fn detect() -> Self {
        Self::from_arch_str(std::env::consts::ARCH)
    }

    /// Anything mentioning `arm` (or Rust's `aarch64`) is arm64; everything
    /// else falls back to amd64.
    pub fn from_arch_str(arch: &str) -> Self {
        let arch = arch.to_ascii_lowercase();
        if arch.contains("arm") || arch.contains("aarch64") {
            Architecture::Arm64
        } else {
            Architecture::Amd64
        }
    }

    /// Name used in download URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Architecture::Arm64 => "arm64",
            Architecture::Amd64 => "amd64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
