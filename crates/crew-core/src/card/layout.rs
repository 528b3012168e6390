//! Grid geometry and text wrapping for the card sheet.

pub const CARD_WIDTH: u32 = 300;
pub const CARD_HEIGHT: u32 = 450;
pub const GAP: u32 = 24;
pub const PADDING: u32 = 40;

/// Hand-tuned column counts for 1..=12 cards.
const COLUMN_TABLE: [usize; 12] = [1, 2, 3, 2, 3, 3, 4, 4, 3, 4, 4, 4];

/// Columns that keep the sheet roughly landscape for `count` cards.
pub fn calculate_optimal_columns(count: usize) -> usize {
    match count {
        0 => 1,
        1..=12 => COLUMN_TABLE[count - 1],
        n => (n as f64 * 1.5).sqrt().ceil() as usize,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub width: u32,
    pub height: u32,
}

impl GridLayout {
    pub fn new(count: usize) -> Self {
        let columns = calculate_optimal_columns(count);
        let rows = count.div_ceil(columns).max(1);
        let span = |n: usize, card: u32| PADDING * 2 + n as u32 * card + (n as u32 - 1) * GAP;
        GridLayout {
            columns,
            rows,
            width: span(columns, CARD_WIDTH),
            height: span(rows, CARD_HEIGHT),
        }
    }

    /// Top-left corner of card `index`, filling rows left to right.
    pub fn card_origin(&self, index: usize) -> (f32, f32) {
        let col = (index % self.columns) as u32;
        let row = (index / self.columns) as u32;
        (
            (PADDING + col * (CARD_WIDTH + GAP)) as f32,
            (PADDING + row * (CARD_HEIGHT + GAP)) as f32,
        )
    }
}

/// Greedy word wrap. A word wider than `max_width` gets a line to itself.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_table() {
        assert_eq!(calculate_optimal_columns(0), 1);
        assert_eq!(calculate_optimal_columns(1), 1);
        assert_eq!(calculate_optimal_columns(4), 2);
        assert_eq!(calculate_optimal_columns(9), 3);
        assert_eq!(calculate_optimal_columns(12), 4);
    }

    #[test]
    fn columns_beyond_table_use_sqrt() {
        assert_eq!(calculate_optimal_columns(13), 5);
        assert!(calculate_optimal_columns(13) as f64 >= (13.0f64 * 1.5).sqrt().ceil());
        assert_eq!(calculate_optimal_columns(24), 6);
    }

    #[test]
    fn grid_dimensions() {
        let grid = GridLayout::new(5);
        assert_eq!((grid.columns, grid.rows), (3, 2));
        assert_eq!(grid.width, PADDING * 2 + 3 * CARD_WIDTH + 2 * GAP);
        assert_eq!(grid.height, PADDING * 2 + 2 * CARD_HEIGHT + GAP);
        assert_eq!(grid.card_origin(4), ((PADDING + CARD_WIDTH + GAP) as f32, (PADDING + CARD_HEIGHT + GAP) as f32));

        let empty = GridLayout::new(0);
        assert_eq!((empty.columns, empty.rows), (1, 1));
    }

    #[test]
    fn wraps_greedily() {
        let measure = |s: &str| s.len() as f32;
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10.0, measure),
            vec!["the quick", "brown fox", "jumps"]
        );
        assert_eq!(
            wrap_text("a extraordinarily b", 5.0, measure),
            vec!["a", "extraordinarily", "b"]
        );
        assert!(wrap_text("   ", 10.0, measure).is_empty());
    }
}
