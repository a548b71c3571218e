use crate::constants::PRESET_PROMPTS;

/// All suggested symptom descriptions, in display order
pub fn presets() -> &'static [&'static str] {
    PRESET_PROMPTS
}

/// Suggested prompt at `index` (zero-based)
pub fn preset(index: usize) -> Option<&'static str> {
    PRESET_PROMPTS.get(index).copied()
}
