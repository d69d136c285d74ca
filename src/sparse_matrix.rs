use crate::error::LinkError;
use std::fmt;

/*------------------------------------------------------------------------------
SparseCostMatrix struct
------------------------------------------------------------------------------*/

/// Compressed sparse-row cost matrix over extended reals: a stored entry is
/// a finite non-negative cost, an absent entry is a forbidden pairing.
///
/// Layout follows the CRS convention: `cc` holds the costs row by row,
/// `kk` the matching column indices (sorted within each row), `number`
/// the entry count of each row and `start` the running offset of each
/// row into `cc`/`kk`.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseCostMatrix {
    n_rows: usize,
    n_cols: usize,
    cc: Vec<f64>,
    kk: Vec<usize>,
    number: Vec<usize>,
    start: Vec<usize>,
}

impl SparseCostMatrix {
    /// Builds a matrix from an unsorted `(row, col, cost)` triplet list.
    /// Rejects out-of-bounds indices, duplicate `(row, col)` pairs and
    /// costs that are not finite and non-negative.
    pub fn from_entries(
        n_rows: usize,
        n_cols: usize,
        mut entries: Vec<(usize, usize, f64)>,
    ) -> Result<Self, LinkError> {
        for &(row, col, cost) in entries.iter() {
            if row >= n_rows || col >= n_cols {
                return Err(LinkError::BadEntry(format!(
                    "entry ({}, {}) outside a {} x {} matrix",
                    row, col, n_rows, n_cols
                )));
            }
            if !cost.is_finite() || cost < 0.0 {
                return Err(LinkError::BadEntry(format!(
                    "cost at ({}, {}) must be finite and non-negative, got {}",
                    row, col, cost
                )));
            }
        }

        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        for w in entries.windows(2) {
            if w[0].0 == w[1].0 && w[0].1 == w[1].1 {
                return Err(LinkError::BadEntry(format!(
                    "duplicate entry at ({}, {})",
                    w[0].0, w[0].1
                )));
            }
        }

        let mut cc = Vec::with_capacity(entries.len());
        let mut kk = Vec::with_capacity(entries.len());
        let mut number = vec![0; n_rows];
        for &(row, col, cost) in entries.iter() {
            cc.push(cost);
            kk.push(col);
            number[row] += 1;
        }

        Ok(Self::from_crs(n_rows, n_cols, cc, kk, number))
    }

    /// A matrix with no stored entry: every pairing is forbidden.
    pub fn empty(n_rows: usize, n_cols: usize) -> Self {
        Self::from_crs(n_rows, n_cols, vec![], vec![], vec![0; n_rows])
    }

    fn from_crs(
        n_rows: usize,
        n_cols: usize,
        cc: Vec<f64>,
        kk: Vec<usize>,
        number: Vec<usize>,
    ) -> Self {
        debug_assert_eq!(cc.len(), kk.len());
        debug_assert_eq!(number.len(), n_rows);
        let mut start = vec![0; n_rows];
        for i in 1..n_rows {
            start[i] = start[i - 1] + number[i - 1];
        }
        Self {
            n_rows,
            n_cols,
            cc,
            kk,
            number,
            start,
        }
    }

    #[inline(always)]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline(always)]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline(always)]
    pub fn n_entries(&self) -> usize {
        self.cc.len()
    }

    /// Stored cost at `(row, col)`, or `default` when the pairing is
    /// forbidden. Out-of-bounds indices are a caller bug.
    pub fn get(&self, row: usize, col: usize, default: f64) -> f64 {
        assert!(
            row < self.n_rows && col < self.n_cols,
            "index ({}, {}) outside a {} x {} matrix",
            row,
            col,
            self.n_rows,
            self.n_cols
        );
        let lo = self.start[row];
        let hi = lo + self.number[row];
        match self.kk[lo..hi].binary_search(&col) {
            Ok(pos) => self.cc[lo + pos],
            Err(_) => default,
        }
    }

    /// Iterates stored entries as `(row, col, cost)` in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.n_rows).flat_map(move |row| {
            let lo = self.start[row];
            let hi = lo + self.number[row];
            (lo..hi).map(move |idx| (row, self.kk[idx], self.cc[idx]))
        })
    }

    /// New matrix with rows and columns swapped; costs preserved.
    pub fn transpose(&self) -> SparseCostMatrix {
        let mut number = vec![0; self.n_cols];
        for &col in self.kk.iter() {
            number[col] += 1;
        }
        let mut start = vec![0; self.n_cols];
        for j in 1..self.n_cols {
            start[j] = start[j - 1] + number[j - 1];
        }

        let mut cc = vec![0.0; self.cc.len()];
        let mut kk = vec![0; self.kk.len()];
        let mut fill = start.clone();
        for (row, col, cost) in self.entries() {
            let idx = fill[col];
            cc[idx] = cost;
            kk[idx] = row;
            fill[col] += 1;
        }

        SparseCostMatrix {
            n_rows: self.n_cols,
            n_cols: self.n_rows,
            cc,
            kk,
            number,
            start,
        }
    }

    /// Dense matrix of the same dimensions with every entry equal to
    /// `value`. Shapes the uniformly filled bottom-right block of the
    /// augmented matrix.
    pub fn fill_with(&self, value: f64) -> SparseCostMatrix {
        let cc = vec![value; self.n_rows * self.n_cols];
        let kk = (0..self.n_rows)
            .flat_map(|_| 0..self.n_cols)
            .collect::<Vec<_>>();
        let number = vec![self.n_cols; self.n_rows];
        Self::from_crs(self.n_rows, self.n_cols, cc, kk, number)
    }

    /// Horizontal concatenation: `other`'s columns are appended to the
    /// right, its column indices offset by `self.n_cols`.
    pub fn hcat(
        &self,
        other: &SparseCostMatrix,
    ) -> Result<SparseCostMatrix, LinkError> {
        if self.n_rows != other.n_rows {
            return Err(LinkError::ShapeMismatch(format!(
                "hcat needs equal row counts, got {} and {}",
                self.n_rows, other.n_rows
            )));
        }

        let mut cc = Vec::with_capacity(self.cc.len() + other.cc.len());
        let mut kk = Vec::with_capacity(self.kk.len() + other.kk.len());
        let mut number = vec![0; self.n_rows];
        for row in 0..self.n_rows {
            let (a_lo, a_hi) =
                (self.start[row], self.start[row] + self.number[row]);
            let (b_lo, b_hi) =
                (other.start[row], other.start[row] + other.number[row]);

            cc.extend_from_slice(&self.cc[a_lo..a_hi]);
            kk.extend_from_slice(&self.kk[a_lo..a_hi]);
            cc.extend_from_slice(&other.cc[b_lo..b_hi]);
            kk.extend(other.kk[b_lo..b_hi].iter().map(|&k| k + self.n_cols));
            number[row] = self.number[row] + other.number[row];
        }

        Ok(SparseCostMatrix::from_crs(
            self.n_rows,
            self.n_cols + other.n_cols,
            cc,
            kk,
            number,
        ))
    }

    /// Vertical concatenation: `other`'s rows are appended below.
    pub fn vcat(
        &self,
        other: &SparseCostMatrix,
    ) -> Result<SparseCostMatrix, LinkError> {
        if self.n_cols != other.n_cols {
            return Err(LinkError::ShapeMismatch(format!(
                "vcat needs equal column counts, got {} and {}",
                self.n_cols, other.n_cols
            )));
        }

        let mut cc = self.cc.clone();
        cc.extend_from_slice(&other.cc);
        let mut kk = self.kk.clone();
        kk.extend_from_slice(&other.kk);
        let mut number = self.number.clone();
        number.extend_from_slice(&other.number);

        Ok(SparseCostMatrix::from_crs(
            self.n_rows + other.n_rows,
            self.n_cols,
            cc,
            kk,
            number,
        ))
    }

    /// Sum of all stored costs.
    pub fn total_cost(&self) -> f64 {
        self.cc.iter().sum()
    }
}

impl fmt::Display for SparseCostMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} x {} sparse matrix, {} entries",
            self.n_rows,
            self.n_cols,
            self.n_entries()
        )?;
        for row in 0..self.n_rows {
            for col in 0..self.n_cols {
                let cost = self.get(row, col, f64::NAN);
                if cost.is_nan() {
                    write!(f, "{:>9}", "-")?;
                } else {
                    write!(f, "{:>9.2}", cost)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
