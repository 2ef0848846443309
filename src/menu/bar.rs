pub const DEFAULT_WIDTH: usize = 16;
pub const MAX_WIDTH: usize = 64;

const FILLED: char = '\u{2588}';
const EMPTY: char = '\u{2591}';

/// Number of filled cells for `pct`, clamped to `[0, width]`.
/// Non-finite input counts as 0%.
pub fn filled_cells(pct: f64, width: usize) -> usize {
    let pct = if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let cells = (pct / 100.0 * width as f64).floor() as usize;
    cells.min(width)
}

pub fn render(pct: f64, width: usize) -> String {
    let filled = filled_cells(pct, width);
    let mut bar = String::with_capacity(width * FILLED.len_utf8());
    bar.extend(std::iter::repeat_n(FILLED, filled));
    bar.extend(std::iter::repeat_n(EMPTY, width - filled));
    bar
}

/// Placeholder bar for a metric that could not be read.
pub fn empty(width: usize) -> String {
    render(0.0, width)
}
