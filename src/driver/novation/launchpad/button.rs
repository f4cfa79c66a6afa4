const KEY_OFFSET: i32 = 11;
const ROW_STRIDE: i32 = 10;

/// Row index that [`ButtonAddress::from_raw_key`] reads as the top edge.
const TOP_KEY_ROW: i32 = 9;

/// Row and column index of the top edge and the right edge respectively.
pub const EDGE: i32 = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    /// One of the 64 buttons of the 8x8 grid
    Pad,

    /// One of the round buttons along the top edge
    Top,

    /// One of the round buttons along the right edge
    Side,
}

/// A button on the grid, addressed both by row/column and by the key number
/// the device uses on the wire.
///
/// Rows and columns outside `0..=8` can come out of [`ButtonAddress::from_raw_key`]
/// for keys that are not on the grid; they carry no meaning.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ButtonAddress {
    kind: ButtonKind,
    row: i32,
    column: i32,
    raw_key: i32,
}

// converts row and column into a launchpad key code, wrapping for rows and
// columns far off the grid
const fn launchpad_key(row: i32, column: i32) -> i32 {
    column
        .wrapping_add(ROW_STRIDE.wrapping_mul(row))
        .wrapping_add(KEY_OFFSET)
}

impl ButtonAddress {
    /// Decodes a key number received from the device.
    ///
    /// Key row 9 is the top edge and is stored as row 8. Note that this is not
    /// the inverse of [`ButtonAddress::from_row_column`] for row 8: that one
    /// produces key `91 + column`, which decodes back as a pad or side button.
    pub const fn from_raw_key(raw_key: i32) -> Self {
        let adjusted = raw_key.wrapping_sub(KEY_OFFSET);
        let row = adjusted.div_euclid(ROW_STRIDE);
        let column = adjusted.rem_euclid(ROW_STRIDE);

        let (kind, row) = if row == TOP_KEY_ROW {
            (ButtonKind::Top, EDGE)
        } else if column == EDGE {
            (ButtonKind::Side, row)
        } else {
            (ButtonKind::Pad, row)
        };

        Self {
            kind,
            row,
            column,
            raw_key,
        }
    }

    pub const fn from_row_column(row: i32, column: i32) -> Self {
        let kind = if row == EDGE {
            ButtonKind::Top
        } else if column == EDGE {
            ButtonKind::Side
        } else {
            ButtonKind::Pad
        };

        Self {
            kind,
            row,
            column,
            raw_key: launchpad_key(row, column),
        }
    }

    /// Every physical button: 64 pads and 8 side buttons row by row, then the
    /// 8 top buttons.
    ///
    /// Top buttons use the key numbering the device reports them with (key
    /// row 9), so each one is the same address [`ButtonAddress::from_raw_key`]
    /// gives for an inbound event on that button.
    pub fn all() -> impl Iterator<Item = ButtonAddress> {
        let grid = (0..EDGE)
            .flat_map(|row| (0..=EDGE).map(move |column| Self::from_row_column(row, column)));
        let top = (0..EDGE).map(|column| Self::from_raw_key(launchpad_key(TOP_KEY_ROW, column)));

        grid.chain(top)
    }

    pub const fn kind(&self) -> ButtonKind {
        self.kind
    }

    pub const fn row(&self) -> i32 {
        self.row
    }

    pub const fn column(&self) -> i32 {
        self.column
    }

    pub const fn raw_key(&self) -> i32 {
        self.raw_key
    }
}

#[cfg(test)]
mod test {
    use super::{ButtonAddress, ButtonKind};

    #[test]
    fn decode_grid_corners() {
        let b = ButtonAddress::from_raw_key(11);
        assert_eq!((b.row(), b.column(), b.kind()), (0, 0, ButtonKind::Pad));

        let b = ButtonAddress::from_raw_key(88);
        assert_eq!((b.row(), b.column(), b.kind()), (7, 7, ButtonKind::Pad));
    }

    #[test]
    fn decode_side() {
        let b = ButtonAddress::from_raw_key(89);
        assert_eq!((b.row(), b.column(), b.kind()), (7, 8, ButtonKind::Side));
        assert_eq!(b.raw_key(), 89);
    }

    #[test]
    fn decode_top_is_stored_as_row_8() {
        let b = ButtonAddress::from_raw_key(105);
        assert_eq!((b.row(), b.column(), b.kind()), (8, 4, ButtonKind::Top));
        assert_eq!(b.raw_key(), 105);
    }

    #[test]
    fn decode_off_grid_key() {
        let b = ButtonAddress::from_raw_key(0);
        assert_eq!((b.row(), b.column()), (-2, 9));
    }

    #[test]
    fn encode_classification() {
        assert_eq!(ButtonAddress::from_row_column(3, 5).kind(), ButtonKind::Pad);
        assert_eq!(ButtonAddress::from_row_column(3, 8).kind(), ButtonKind::Side);
        assert_eq!(ButtonAddress::from_row_column(8, 2).kind(), ButtonKind::Top);
        assert_eq!(ButtonAddress::from_row_column(3, 5).raw_key(), 46);
    }

    #[test]
    fn round_trip_below_top_edge() {
        for row in 0..8 {
            for column in 0..8 {
                let encoded = ButtonAddress::from_row_column(row, column);
                let decoded = ButtonAddress::from_raw_key(encoded.raw_key());
                assert_eq!(decoded, encoded);
            }
        }

        for row in 0..8 {
            let encoded = ButtonAddress::from_row_column(row, 8);
            let decoded = ButtonAddress::from_raw_key(encoded.raw_key());
            assert_eq!(decoded.kind(), ButtonKind::Side);
            assert_eq!(decoded, encoded);
        }
    }

    #[test]
    fn top_edge_does_not_round_trip() {
        for column in 0..8 {
            let encoded = ButtonAddress::from_row_column(8, column);
            assert_eq!(encoded.kind(), ButtonKind::Top);
            assert_eq!(encoded.raw_key(), 91 + column);

            let decoded = ButtonAddress::from_raw_key(encoded.raw_key());
            assert_eq!((decoded.row(), decoded.column()), (8, column));
            assert_eq!(decoded.kind(), ButtonKind::Pad);
        }

        let decoded = ButtonAddress::from_raw_key(ButtonAddress::from_row_column(8, 8).raw_key());
        assert_eq!(decoded.kind(), ButtonKind::Side);
    }

    #[test]
    fn decode_never_overflows() {
        let b = ButtonAddress::from_raw_key(i32::MIN);
        assert_eq!(b.raw_key(), i32::MIN);
        assert!((0..10).contains(&b.column()));

        let b = ButtonAddress::from_raw_key(i32::MAX);
        assert_eq!(b.raw_key(), i32::MAX);
        assert!((0..10).contains(&b.column()));
    }

    #[test]
    fn encode_never_overflows() {
        let b = ButtonAddress::from_row_column(i32::MAX, i32::MAX);
        assert_eq!((b.row(), b.column()), (i32::MAX, i32::MAX));

        let b = ButtonAddress::from_row_column(i32::MIN, i32::MIN);
        assert_eq!(b.kind(), ButtonKind::Pad);
    }

    #[test]
    fn all_top_buttons_decode_as_top() {
        let top: Vec<_> = ButtonAddress::all()
            .filter(|b| b.kind() == ButtonKind::Top)
            .collect();

        let keys: Vec<_> = top.iter().map(|b| b.raw_key()).collect();
        assert_eq!(keys, (101..=108).collect::<Vec<_>>());

        for (column, b) in top.iter().enumerate() {
            assert_eq!((b.row(), b.column()), (8, column as i32));
            assert_eq!(ButtonAddress::from_raw_key(b.raw_key()), *b);
        }
    }

    #[test]
    fn all_buttons() {
        let all: Vec<_> = ButtonAddress::all().collect();
        assert_eq!(all.len(), 80);

        let count = |kind| all.iter().filter(|b| b.kind() == kind).count();
        assert_eq!(count(ButtonKind::Pad), 64);
        assert_eq!(count(ButtonKind::Side), 8);
        assert_eq!(count(ButtonKind::Top), 8);
    }
}
