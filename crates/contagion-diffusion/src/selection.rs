//! Selection - which whole components to update under a headcount limit
//!
//! Each component is a knapsack item whose weight and value are both its
//! size. The table is the textbook 0/1 knapsack: `table[i][j]` is the best
//! headcount reachable with the first `i` components and budget `j`.
//!
//! When several subsets reach the same best headcount, the backtrace walks
//! from the last component to the first and takes a component whenever
//! taking it reproduces the optimum, so later components win ties.

use tracing::debug;

/// Components picked by [`select_components`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Chosen component indices, ascending
    pub indices: Vec<usize>,
    /// Sum of the chosen sizes
    pub total: usize,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }
}

/// Dense DP table, row-major
struct KnapsackTable {
    cells: Vec<usize>,
    width: usize,
}

impl KnapsackTable {
    fn fill(sizes: &[usize], budget: usize) -> Self {
        let width = budget + 1;
        let mut cells = vec![0usize; (sizes.len() + 1) * width];

        for (item, &size) in sizes.iter().enumerate() {
            let (done, rest) = cells.split_at_mut((item + 1) * width);
            let prev = &done[item * width..];
            let row = &mut rest[..width];
            for j in 0..width {
                row[j] = if size <= j {
                    prev[j].max(size + prev[j - size])
                } else {
                    prev[j]
                };
            }
        }

        KnapsackTable { cells, width }
    }

    #[inline]
    fn at(&self, items: usize, budget: usize) -> usize {
        self.cells[items * self.width + budget]
    }
}

/// Choose the subset of `sizes` with the largest sum not above `capacity`
///
/// Runs in O(N × W) time and space, where W is `capacity` clamped to the
/// sum of all sizes (columns past the sum are all identical, so the
/// clamp does not change the result).
pub fn select_components(sizes: &[usize], capacity: usize) -> Selection {
    let population: usize = sizes.iter().sum();
    let budget = capacity.min(population);
    if sizes.is_empty() || budget == 0 {
        return Selection::default();
    }

    let table = KnapsackTable::fill(sizes, budget);

    let mut indices = Vec::new();
    let mut j = budget;
    for i in (1..=sizes.len()).rev() {
        let size = sizes[i - 1];
        if j >= size && table.at(i, j) == size + table.at(i - 1, j - size) {
            indices.push(i - 1);
            j -= size;
        }
    }
    indices.reverse();

    let total = table.at(sizes.len(), budget);
    debug!(
        items = sizes.len(),
        capacity,
        budget,
        chosen = indices.len(),
        total,
        "components selected"
    );

    Selection { indices, total }
}
