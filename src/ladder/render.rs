pub const DEFAULT_PROGRESS_WIDTH: usize = 20;

const FILLED: char = '█';
const EMPTY: char = '▁';

/// Render `fraction` as a bar of exactly `width` block characters.
///
/// The fraction is clamped to `[0, 1]` (NaN counts as 0) and the filled
/// length is `round(fraction * width)` with halves rounded up.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let filled = ((fraction * width as f64).round() as usize).min(width);

    std::iter::repeat(FILLED)
        .take(filled)
        .chain(std::iter::repeat(EMPTY).take(width - filled))
        .collect()
}

/// Roman numeral for a division number. Only the range produced by the
/// rank configuration (0-4) is spelled out; larger values fall back to digits.
pub fn division_numeral(division: u32) -> String {
    match division {
        0..=3 => "I".repeat(division as usize),
        4 => "IV".to_string(),
        n => n.to_string(),
    }
}
