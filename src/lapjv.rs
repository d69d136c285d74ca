use crate::error::LinkError;

/*------------------------------------------------------------------------------
lapjv.rs - Jonker-Volgenant linear assignment kernel
------------------------------------------------------------------------------*/

// Dense square solver over a flat row-major cost slice. Three phases:
// column reduction, two sweeps of augmenting row reduction, then shortest
// augmenting paths for the remaining free rows.

#[inline(always)]
fn at(cost: &[f64], n: usize, row: usize, col: usize) -> f64 {
    debug_assert!(row < n && col < n);
    cost[row * n + col]
}

fn column_reduction(
    n: usize,
    cost: &[f64],
    free_rows: &mut [usize],
    x: &mut [isize],
    y: &mut [isize],
    v: &mut [f64],
) -> usize {
    // Assign each column to its cheapest row; column potentials start at
    // the column minima.
    for j in 0..n {
        x[j] = -1;
        v[j] = f64::MAX;
        y[j] = 0;
    }
    for i in 0..n {
        for j in 0..n {
            let c = at(cost, n, i, j);
            if c < v[j] {
                v[j] = c;
                y[j] = i as isize;
            }
        }
    }

    let mut unique = vec![true; n];
    let mut j = n;
    while j > 0 {
        j -= 1;
        let i = y[j] as usize;
        if x[i] < 0 {
            x[i] = j as isize;
        } else {
            unique[i] = false;
            y[j] = -1;
        }
    }

    let mut n_free_rows = 0;
    for i in 0..n {
        if x[i] < 0 {
            free_rows[n_free_rows] = i;
            n_free_rows += 1;
        } else if unique[i] {
            let j = x[i] as usize;
            let mut min = f64::MAX;
            for j2 in 0..n {
                if j2 == j {
                    continue;
                }
                let c = at(cost, n, i, j2) - v[j2];
                if c < min {
                    min = c;
                }
            }
            v[j] -= min;
        }
    }
    n_free_rows
}

fn augmenting_row_reduction(
    n: usize,
    cost: &[f64],
    n_free_rows: usize,
    free_rows: &mut [usize],
    x: &mut [isize],
    y: &mut [isize],
    v: &mut [f64],
) -> usize {
    let mut current = 0;
    let mut new_free_rows = 0;
    let mut rr_cnt = 0;

    while current < n_free_rows {
        rr_cnt += 1;
        let free_i = free_rows[current];
        current += 1;

        // Two smallest reduced costs in the free row.
        let mut j1 = 0;
        let mut j2 = -1;
        let mut v1 = at(cost, n, free_i, 0) - v[0];
        let mut v2 = f64::MAX;
        for j in 1..n {
            let c = at(cost, n, free_i, j) - v[j];
            if c < v2 {
                if c >= v1 {
                    v2 = c;
                    j2 = j as isize;
                } else {
                    v2 = v1;
                    v1 = c;
                    j2 = j1;
                    j1 = j as isize;
                }
            }
        }

        let mut i0 = y[j1 as usize];
        let v1_new = v[j1 as usize] - (v2 - v1);
        let v1_lowers = v1_new < v[j1 as usize];

        if rr_cnt < current * n {
            if v1_lowers {
                v[j1 as usize] = v1_new;
            } else if i0 >= 0 && j2 >= 0 {
                j1 = j2;
                i0 = y[j2 as usize];
            }
            if i0 >= 0 {
                if v1_lowers {
                    current -= 1;
                    free_rows[current] = i0 as usize;
                } else {
                    free_rows[new_free_rows] = i0 as usize;
                    new_free_rows += 1;
                }
            }
        } else if i0 >= 0 {
            free_rows[new_free_rows] = i0 as usize;
            new_free_rows += 1;
        }
        x[free_i] = j1;
        y[j1 as usize] = free_i as isize;
    }
    new_free_rows
}

// Moves the columns tied at the current path-length minimum to the front
// of the scan window, returning the new window end.
fn partition_min_columns(
    n: usize,
    lo: usize,
    d: &[f64],
    cols: &mut [usize],
) -> usize {
    let mut hi = lo + 1;
    let mut mind = d[cols[lo]];
    for k in hi..n {
        let j = cols[k];
        if d[j] <= mind {
            if d[j] < mind {
                hi = lo;
                mind = d[j];
            }
            cols[k] = cols[hi];
            cols[hi] = j;
            hi += 1;
        }
    }
    hi
}

fn scan_min_columns(
    n: usize,
    cost: &[f64],
    plo: &mut usize,
    phi: &mut usize,
    d: &mut [f64],
    cols: &mut [usize],
    pred: &mut [usize],
    y: &[isize],
    v: &[f64],
) -> isize {
    let mut lo = *plo;
    let mut hi = *phi;

    while lo != hi {
        let mut j = cols[lo];
        lo += 1;

        let i = y[j] as usize;
        let mind = d[j];
        let h = at(cost, n, i, j) - v[j] - mind;
        for k in hi..n {
            j = cols[k];
            let cred_ij = at(cost, n, i, j) - v[j] - h;
            if cred_ij < d[j] {
                d[j] = cred_ij;
                pred[j] = i;
                if cred_ij == mind {
                    if y[j] < 0 {
                        return j as isize;
                    }
                    cols[k] = cols[hi];
                    cols[hi] = j;
                    hi += 1;
                }
            }
        }
    }
    *plo = lo;
    *phi = hi;
    -1
}

fn shortest_augmenting_path(
    n: usize,
    cost: &[f64],
    start_i: usize,
    y: &mut [isize],
    v: &mut [f64],
    pred: &mut [usize],
) -> isize {
    let mut lo = 0;
    let mut hi = 0;
    let mut final_j = -1;
    let mut n_ready = 0;
    let mut cols = vec![0; n];
    let mut d = vec![0.0; n];

    for i in 0..n {
        cols[i] = i;
        pred[i] = start_i;
        d[i] = at(cost, n, start_i, i) - v[i];
    }

    while final_j == -1 {
        if lo == hi {
            n_ready = lo;
            hi = partition_min_columns(n, lo, &d, &mut cols);
            for k in lo..hi {
                let j = cols[k];
                if y[j] < 0 {
                    final_j = j as isize;
                }
            }
        }
        if final_j == -1 {
            final_j = scan_min_columns(
                n, cost, &mut lo, &mut hi, &mut d, &mut cols, pred, y, v,
            );
        }
    }

    let mind = d[cols[lo]];
    for k in 0..n_ready {
        let j = cols[k];
        v[j] += d[j] - mind;
    }
    final_j
}

fn augment_free_rows(
    n: usize,
    cost: &[f64],
    n_free_rows: usize,
    free_rows: &[usize],
    x: &mut [isize],
    y: &mut [isize],
    v: &mut [f64],
) -> Result<(), LinkError> {
    let mut pred = vec![0; n];

    for &free_row in free_rows.iter().take(n_free_rows) {
        let mut i = -1isize;
        let mut k = 0;

        let mut j =
            shortest_augmenting_path(n, cost, free_row, y, v, &mut pred);
        if j < 0 || j >= n as isize {
            return Err(LinkError::Unsolvable(format!(
                "augmenting path ended at column {} of {}",
                j, n
            )));
        }
        while i != free_row as isize {
            i = pred[j as usize] as isize;
            y[j as usize] = i;

            // swap x[i] and j
            let tmp = j;
            j = x[i as usize];
            x[i as usize] = tmp;

            k += 1;
            if k > n {
                return Err(LinkError::Unsolvable(
                    "augmenting path does not terminate".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Minimum-cost perfect assignment of an `n` x `n` flat row-major cost
/// slice. On return `x[i]` is the column assigned to row `i` and `y[j]`
/// the row assigned to column `j`.
pub(crate) fn lapjv(
    n: usize,
    cost: &[f64],
    x: &mut [isize],
    y: &mut [isize],
) -> Result<(), LinkError> {
    if n == 0 {
        return Err(LinkError::EmptyInput("0 x 0 cost matrix".to_string()));
    }
    if cost.len() != n * n || x.len() != n || y.len() != n {
        return Err(LinkError::ShapeMismatch(format!(
            "n = {}, cost.len() = {}, x.len() = {}, y.len() = {}",
            n,
            cost.len(),
            x.len(),
            y.len()
        )));
    }

    let mut free_rows = vec![0; n];
    let mut v = vec![0.0; n];
    let mut ret = column_reduction(n, cost, &mut free_rows, x, y, &mut v);
    let mut i = 0;
    while ret > 0 && i < 2 {
        ret =
            augmenting_row_reduction(n, cost, ret, &mut free_rows, x, y, &mut v);
        i += 1;
    }
    if ret > 0 {
        augment_free_rows(n, cost, ret, &free_rows, x, y, &mut v)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn solve(n: usize, cost: Vec<f64>) -> (Vec<isize>, Vec<isize>) {
        let mut x = vec![-1; n];
        let mut y = vec![-1; n];
        lapjv(n, &cost, &mut x, &mut y).unwrap();
        (x, y)
    }

    #[test]
    fn test_lapjv_3x3() {
        let cost = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let (x, y) = solve(3, cost);
        assert_eq!(x, vec![2, 0, 1]);
        assert_eq!(y, vec![1, 2, 0]);
    }

    #[test]
    fn test_lapjv_5x5() {
        let cost = vec![
            1., 2., 3., 4., 1., //
            5., 6., 7., 8., 2., //
            9., 10., 11., 12., 3., //
            13., 14., 15., 16., 4., //
            17., 18., 19., 20., 5.,
        ];
        let (x, y) = solve(5, cost);
        assert_eq!(x, vec![0, 2, 1, 3, 4]);
        assert_eq!(y, vec![0, 2, 1, 3, 4]);
    }

    #[test]
    fn test_lapjv_rejects_bad_shapes() {
        let mut x = vec![-1; 2];
        let mut y = vec![-1; 2];
        assert!(lapjv(0, &[], &mut [], &mut []).is_err());
        assert!(lapjv(2, &[1.0, 2.0, 3.0], &mut x, &mut y).is_err());
    }

    #[test]
    fn test_lapjv_result_is_permutation() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let n = rng.gen_range(1..=30);
            let cost = (0..n * n)
                .map(|_| rng.gen_range(0.0..100.0))
                .collect::<Vec<f64>>();
            let (x, _) = solve(n, cost);
            let mut seen = vec![false; n];
            for &j in x.iter() {
                assert!(j >= 0 && (j as usize) < n);
                assert!(!seen[j as usize]);
                seen[j as usize] = true;
            }
        }
    }

    #[test]
    fn test_quickcheck_lapjv_solves() {
        fn prop(seed: u64) -> bool {
            let mut rng = rand::rngs::mock::StepRng::new(seed, 0x9E3779B97F4A7C15);
            let n = (seed % 40 + 1) as usize;
            let cost = (0..n * n)
                .map(|_| (rng.gen::<u32>() % 100_000) as f64 / 100.0)
                .collect::<Vec<f64>>();
            let mut x = vec![-1; n];
            let mut y = vec![-1; n];
            lapjv(n, &cost, &mut x, &mut y).is_ok()
        }
        quickcheck::quickcheck(prop as fn(u64) -> bool);
    }
}
