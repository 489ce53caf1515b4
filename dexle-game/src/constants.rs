//! Centralized scoring and selection constants for Dexle game logic.
//!
//! These values define the deterministic math for the daily puzzle. Keeping
//! them together ensures the rules can only be adjusted via code changes
//! reviewed in version control, rather than through external assets.

// Daily selection -----------------------------------------------------------
pub const LCG_MULTIPLIER: u64 = 1_664_525;
pub const LCG_INCREMENT: u64 = 1_013_904_223;
pub const LCG_MODULUS: u64 = 1 << 32;

// Session limits ------------------------------------------------------------
pub const DAILY_ATTEMPT_LIMIT: u8 = 6;

// Comparison thresholds -----------------------------------------------------
pub const HEIGHT_PARTIAL_TOLERANCE_M: f64 = 0.5;
pub const MASS_PARTIAL_TOLERANCE_KG: f64 = 5.0;

// Fallbacks for malformed catalog entries -----------------------------------
pub const FALLBACK_NAME: &str = "Unknown";
pub const FALLBACK_CLASSIFICATION: &str = "Unknown";

// Search suggestions --------------------------------------------------------
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

// Share output --------------------------------------------------------------
pub const SHARE_TITLE: &str = "Dexle";
pub const GLYPH_EXACT: &str = "🟩";
pub const GLYPH_PARTIAL: &str = "🟨";
pub const GLYPH_NONE: &str = "🟥";
pub const GLYPH_HIGHER: &str = "⬆️";
pub const GLYPH_LOWER: &str = "⬇️";
