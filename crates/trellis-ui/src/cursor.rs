//! Grid placement cursor.
//!
//! A [`LayoutCursor`] describes where the *next* child of a node goes. Nodes
//! place every widget and nested component at the cursor's current position,
//! and screens move the cursor between creation calls:
//!
//! ```
//! use trellis_ui::cursor::LayoutCursor;
//!
//! let mut cursor = LayoutCursor::new();
//! cursor.advance_column();
//! cursor.advance_column();
//! cursor.wrap_to_next_row();
//! assert_eq!((cursor.row(), cursor.column()), (1, 0));
//! ```

use bitflags::bitflags;

bitflags! {
    /// Edges of the grid cell a child sticks to.
    ///
    /// Opposite edges together stretch the child along that axis; no edge
    /// centers it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Alignment: u8 {
        const NORTH = 0b0001;
        const SOUTH = 0b0010;
        const EAST  = 0b0100;
        const WEST  = 0b1000;

        /// Stretch horizontally.
        const HORIZONTAL = Self::EAST.bits() | Self::WEST.bits();
        /// Stretch vertically.
        const VERTICAL = Self::NORTH.bits() | Self::SOUTH.bits();
        /// Fill the whole cell.
        const FILL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl Alignment {
    /// Parse a sticky string such as `"NSWE"` or `"we"`.
    ///
    /// Returns `None` if the string contains anything other than the four
    /// compass letters.
    pub fn from_sticky(sticky: &str) -> Option<Self> {
        sticky.chars().try_fold(Alignment::empty(), |acc, c| {
            let edge = match c.to_ascii_uppercase() {
                'N' => Alignment::NORTH,
                'S' => Alignment::SOUTH,
                'E' => Alignment::EAST,
                'W' => Alignment::WEST,
                _ => return None,
            };
            Some(acc | edge)
        })
    }
}

/// External padding on one axis, `(before, after)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Padding(pub u16, pub u16);

impl Padding {
    pub const ZERO: Padding = Padding(0, 0);

    pub fn before(&self) -> u16 {
        self.0
    }

    pub fn after(&self) -> u16 {
        self.1
    }
}

impl From<u16> for Padding {
    fn from(value: u16) -> Self {
        Padding(value, value)
    }
}

impl From<(u16, u16)> for Padding {
    fn from((before, after): (u16, u16)) -> Self {
        Padding(before, after)
    }
}

/// Immutable snapshot of a cursor, handed to the host when placing a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub row: u16,
    pub column: u16,
    pub row_span: u16,
    pub column_span: u16,
    pub pad_x: Padding,
    pub pad_y: Padding,
    pub alignment: Alignment,
}

impl Placement {
    /// Top-left cell, filling all available space.
    pub fn fill() -> Self {
        Placement {
            alignment: Alignment::FILL,
            ..Placement::default()
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Placement {
            row: 0,
            column: 0,
            row_span: 1,
            column_span: 1,
            pad_x: Padding::ZERO,
            pad_y: Padding::ZERO,
            alignment: Alignment::empty(),
        }
    }
}

/// Mutable grid placement state owned by a single node.
///
/// Spans are always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCursor {
    column: u16,
    row: u16,
    column_span: u16,
    row_span: u16,
    pad_x: Padding,
    pad_y: Padding,
    alignment: Alignment,
}

impl Default for LayoutCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCursor {
    /// Cursor at row 0, column 0 with default span, padding and alignment.
    pub fn new() -> Self {
        Self {
            column: 0,
            row: 0,
            column_span: 1,
            row_span: 1,
            pad_x: Padding::ZERO,
            pad_y: Padding::ZERO,
            alignment: Alignment::empty(),
        }
    }

    pub fn row(&self) -> u16 {
        self.row
    }

    pub fn column(&self) -> u16 {
        self.column
    }

    pub fn column_span(&self) -> u16 {
        self.column_span
    }

    pub fn row_span(&self) -> u16 {
        self.row_span
    }

    pub fn padding_x(&self) -> Padding {
        self.pad_x
    }

    pub fn padding_y(&self) -> Padding {
        self.pad_y
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Move one row down, stopping at the last row. Returns the new row.
    pub fn advance_row(&mut self) -> u16 {
        self.row = self.row.saturating_add(1);
        self.row
    }

    /// Move one column right, stopping at the last column. Returns the new
    /// column.
    pub fn advance_column(&mut self) -> u16 {
        self.column = self.column.saturating_add(1);
        self.column
    }

    /// Move one row up, stopping at row 0. Returns the new row.
    pub fn retreat_row(&mut self) -> u16 {
        self.row = self.row.saturating_sub(1);
        self.row
    }

    pub fn reset_column(&mut self) {
        self.column = 0;
    }

    /// Finish the current visual row and start the next one at column 0.
    pub fn wrap_to_next_row(&mut self) {
        self.advance_row();
        self.reset_column();
    }

    /// Jump to an explicit cell.
    pub fn move_to(&mut self, row: u16, column: u16) {
        self.row = row;
        self.column = column;
    }

    /// Set the span of the next placements. Zero spans are raised to 1.
    pub fn set_span(&mut self, column_span: u16, row_span: u16) {
        self.column_span = column_span.max(1);
        self.row_span = row_span.max(1);
    }

    pub fn reset_span(&mut self) {
        self.column_span = 1;
        self.row_span = 1;
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    pub fn reset_alignment(&mut self) {
        self.alignment = Alignment::empty();
    }

    pub fn set_padding_x(&mut self, padding: impl Into<Padding>) {
        self.pad_x = padding.into();
    }

    pub fn set_padding_y(&mut self, padding: impl Into<Padding>) {
        self.pad_y = padding.into();
    }

    pub fn reset_padding_x(&mut self) {
        self.pad_x = Padding::ZERO;
    }

    pub fn reset_padding_y(&mut self) {
        self.pad_y = Padding::ZERO;
    }

    /// Reset padding on both axes.
    pub fn reset_padding(&mut self) {
        self.reset_padding_x();
        self.reset_padding_y();
    }

    /// Capture the current placement.
    pub fn snapshot(&self) -> Placement {
        Placement {
            row: self.row,
            column: self.column,
            row_span: self.row_span,
            column_span: self.column_span,
            pad_x: self.pad_x,
            pad_y: self.pad_y,
            alignment: self.alignment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_returns_new_value() {
        let mut cursor = LayoutCursor::new();
        assert_eq!(cursor.advance_column(), 1);
        assert_eq!(cursor.advance_column(), 2);
        assert_eq!(cursor.advance_row(), 1);
        assert_eq!((cursor.row(), cursor.column()), (1, 2));
    }

    #[test]
    fn test_wrap_to_next_row() {
        let mut cursor = LayoutCursor::new();
        cursor.advance_column();
        cursor.advance_column();
        cursor.wrap_to_next_row();
        assert_eq!((cursor.row(), cursor.column()), (1, 0));

        cursor.advance_column();
        cursor.wrap_to_next_row();
        cursor.wrap_to_next_row();
        assert_eq!((cursor.row(), cursor.column()), (3, 0));
    }

    #[test]
    fn test_mixed_sequence_matches_arithmetic() {
        let mut cursor = LayoutCursor::new();
        let (mut row, mut column) = (0u16, 0u16);
        for step in 0..40u16 {
            match step % 5 {
                0 | 3 => {
                    cursor.advance_column();
                    column += 1;
                }
                1 => {
                    cursor.advance_row();
                    row += 1;
                }
                _ => {
                    cursor.wrap_to_next_row();
                    row += 1;
                    column = 0;
                }
            }
            assert_eq!((cursor.row(), cursor.column()), (row, column));
        }
    }

    #[test]
    fn test_retreat_row_saturates() {
        let mut cursor = LayoutCursor::new();
        assert_eq!(cursor.retreat_row(), 0);
        cursor.advance_row();
        cursor.advance_row();
        assert_eq!(cursor.retreat_row(), 1);
    }

    #[test]
    fn test_advance_stops_at_last_cell() {
        let mut cursor = LayoutCursor::new();
        cursor.move_to(u16::MAX, u16::MAX);
        assert_eq!(cursor.advance_column(), u16::MAX);
        assert_eq!(cursor.advance_row(), u16::MAX);

        cursor.wrap_to_next_row();
        assert_eq!((cursor.row(), cursor.column()), (u16::MAX, 0));
    }

    #[test]
    fn test_reset_span() {
        let mut cursor = LayoutCursor::new();
        cursor.set_span(99, 2);
        assert_eq!((cursor.column_span(), cursor.row_span()), (99, 2));
        cursor.reset_span();
        assert_eq!((cursor.column_span(), cursor.row_span()), (1, 1));
    }

    #[test]
    fn test_span_never_zero() {
        let mut cursor = LayoutCursor::new();
        cursor.set_span(0, 0);
        assert_eq!((cursor.column_span(), cursor.row_span()), (1, 1));
    }

    #[test]
    fn test_reset_padding() {
        let mut cursor = LayoutCursor::new();
        cursor.set_padding_x((0, 20));
        cursor.set_padding_y(5);
        assert_eq!(cursor.padding_y(), Padding(5, 5));

        cursor.reset_padding_x();
        assert_eq!(cursor.padding_x(), Padding::ZERO);
        assert_eq!(cursor.padding_y(), Padding(5, 5));

        cursor.set_padding_x(3);
        cursor.reset_padding();
        assert_eq!(cursor.padding_x(), Padding::ZERO);
        assert_eq!(cursor.padding_y(), Padding::ZERO);
    }

    #[test]
    fn test_reset_alignment() {
        let mut cursor = LayoutCursor::new();
        cursor.set_alignment(Alignment::FILL);
        cursor.reset_alignment();
        assert!(cursor.alignment().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached_from_cursor() {
        let mut cursor = LayoutCursor::new();
        cursor.set_alignment(Alignment::HORIZONTAL);
        let before = cursor.snapshot();
        cursor.advance_column();
        assert_eq!(before.column, 0);
        assert_eq!(before.alignment, Alignment::HORIZONTAL);
        assert_eq!(cursor.snapshot().column, 1);
    }

    #[test]
    fn test_alignment_from_sticky() {
        assert_eq!(Alignment::from_sticky("NSWE"), Some(Alignment::FILL));
        assert_eq!(Alignment::from_sticky("we"), Some(Alignment::HORIZONTAL));
        assert_eq!(Alignment::from_sticky(""), Some(Alignment::empty()));
        assert_eq!(Alignment::from_sticky("NX"), None);
    }

    #[test]
    fn test_fill_placement() {
        let placement = Placement::fill();
        assert_eq!((placement.row, placement.column), (0, 0));
        assert_eq!(placement.alignment, Alignment::FILL);
        assert_eq!((placement.row_span, placement.column_span), (1, 1));
    }
}
