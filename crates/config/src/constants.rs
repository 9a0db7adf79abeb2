//! Centralized constants for settings resolution.

/// Separator inserted before each uppercase letter of an identifier when
/// deriving its environment key.
pub const ENV_KEY_SEPARATOR: char = '_';

/// Deepest record nesting the field walk will follow.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Separator between segments of a nested key in flat formats
/// (`.env`, properties) and in dotted field paths.
pub const KEY_PATH_SEPARATOR: char = '.';
