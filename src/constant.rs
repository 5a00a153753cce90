/// Application name and metadata constants
pub const APP_NAME: &str = "paradiff";

/// Separator placed between paragraph normalized forms before diffing
pub const PARAGRAPH_SEPARATOR: &str = "\n";

/// Tuning defaults
pub const DEFAULT_REWRITE_SIMILARITY: f32 = 0.5;

/// Seed for document fingerprints
pub const FINGERPRINT_SEED: u64 = 0;
