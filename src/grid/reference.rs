//! Conversion from one-based row and column numbers to A1-style references,
//! used for cell positions in error messages and log events.

/// Converts a one-based column number to Excel-style column letters.
pub(crate) fn column_letters(col: usize) -> String {
    let mut col = col;
    let mut letters = String::new();
    while col > 0 {
        col -= 1;
        let digit = char::from_u32(65 + (col % 26) as u32).expect("Hardcode letters");
        col /= 26;
        letters.insert(0, digit);
    }
    letters
}

/// Converts one-based row and column numbers to an A1-style cell reference.
pub(crate) fn cell_reference(row: usize, col: usize) -> String {
    format!("{}{}", column_letters(col), row)
}
