//! The Lo Shu magic square used for the birth chart.

/// Digits in row-major order; every row, column, and diagonal sums to 15.
pub const GRID_LAYOUT: [u8; 9] = [4, 9, 2, 3, 5, 7, 8, 1, 6];

/// Which of the digits 1-9 appear in a birth chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoShuGrid {
    present: [bool; 10],
}

impl LoShuGrid {
    /// Builds the grid from the digits present in a date of birth. Zeros and values
    /// outside 1-9 are ignored; repeats count once.
    pub fn new(numbers: &[u8]) -> Self {
        let mut present = [false; 10];
        for &n in numbers {
            if (1..=9).contains(&n) {
                present[n as usize] = true;
            }
        }
        Self { present }
    }

    pub fn contains(&self, digit: u8) -> bool {
        (1..=9).contains(&digit) && self.present[digit as usize]
    }

    /// Digits 1-9 absent from the chart, ascending.
    pub fn missing(&self) -> Vec<u8> {
        (1..=9).filter(|&d| !self.contains(d)).collect()
    }

    /// The 3×3 cells in display order, each with its digit when present.
    pub fn cells(&self) -> [Option<u8>; 9] {
        GRID_LAYOUT.map(|digit| self.contains(digit).then_some(digit))
    }
}
