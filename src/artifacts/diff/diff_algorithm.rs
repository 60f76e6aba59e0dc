use derive_new::new;
use std::fmt::Display;

/// One step of an edit script
///
/// Indices are zero-based positions in the old (`a`) and new (`b`) sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { a_index: usize, value: T },
    Insert { b_index: usize, value: T },
    Equal { a_index: usize, b_index: usize, value: T },
}

impl<T> Edit<T> {
    pub fn value(&self) -> &T {
        match self {
            Edit::Delete { value, .. } | Edit::Insert { value, .. } | Edit::Equal { value, .. } => {
                value
            }
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Edit::Equal { .. })
    }

    /// Whether the edit consumes a line of the old sequence
    pub fn in_a(&self) -> bool {
        !matches!(self, Edit::Insert { .. })
    }

    /// Whether the edit consumes a line of the new sequence
    pub fn in_b(&self) -> bool {
        !matches!(self, Edit::Delete { .. })
    }

    pub fn prefix(&self) -> char {
        match self {
            Edit::Delete { .. } => '-',
            Edit::Insert { .. } => '+',
            Edit::Equal { .. } => ' ',
        }
    }
}

impl<T> Edit<T>
where
    T: Clone + Into<String>,
{
    pub fn as_string(&self) -> String {
        format!("{}{}", self.prefix(), self.value().clone().into())
    }
}

impl<T> Display for Edit<T>
where
    T: Clone + Into<String>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

pub trait DiffAlgorithm<T> {
    type Trace;
    type EditPath;
    type EditScript;
    type Output;

    fn compute_shortest_edit(&self) -> Self::Trace;
    fn backtrack(&self) -> Self::EditPath;
    fn diff(&self) -> Self::EditScript;
    fn format_diff(&self) -> Self::Output
    where
        T: Clone + Into<String>,
        Self::EditScript: AsRef<[Edit<T>]>,
        Self::Output: From<String>,
    {
        let edits = self.diff();
        let formatted = edits
            .as_ref()
            .iter()
            .map(|edit| edit.as_string())
            .collect::<Vec<_>>()
            .join("\n");
        formatted.into()
    }
}

/// Myers' greedy shortest-edit-script algorithm
///
/// On each diagonal the path is extended from whichever neighbour reaches
/// further along `a`; when both reach equally far the insertion is taken.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<'d, T> MyersDiff<'d, T> {
    /// Index of diagonal `k` in a `v` vector; keeps `k - 1` and `k + 1` in
    /// bounds for every `|k| <= n + m`, including two empty inputs
    fn offset(&self) -> isize {
        (self.a.len() + self.b.len() + 1) as isize
    }
}

impl<'d, T: Eq + Clone> DiffAlgorithm<T> for MyersDiff<'d, T> {
    type Trace = Vec<Vec<isize>>;
    type EditPath = Vec<(isize, isize, isize, isize)>;
    type EditScript = Vec<Edit<T>>;
    type Output = String;

    fn compute_shortest_edit(&self) -> Self::Trace {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let offset = self.offset();

        let mut v = vec![0; 2 * offset as usize + 1];
        let mut trace = Vec::new();

        for d in 0..=(n + m) {
            trace.push(v.clone());

            for k in (-d..=d).step_by(2) {
                let idx = (offset + k) as usize;

                let mut x = if k == -d {
                    // we could have only come from k+1, thus an insertion
                    v[idx + 1]
                } else if k == d {
                    // we could have only come from k-1, thus a deletion
                    v[idx - 1] + 1
                } else {
                    let x_del = v[idx - 1] + 1;
                    let x_ins = v[idx + 1];
                    if x_del > x_ins { x_del } else { x_ins }
                };

                let mut y = x - k;
                while x < n && y < m && self.a[x as usize] == self.b[y as usize] {
                    // snake
                    x += 1;
                    y += 1;
                }

                v[idx] = x;

                if x >= n && y >= m {
                    return trace;
                }
            }
        }

        trace
    }

    fn backtrack(&self) -> Self::EditPath {
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);
        let offset = self.offset();
        let mut edit_path = Vec::new();

        let trace = self.compute_shortest_edit();

        for (d, v) in trace.iter().enumerate().rev() {
            let d = d as isize;
            let k = x - y;

            let prev_k = if k == -d {
                k + 1
            } else if k == d {
                k - 1
            } else if v[(offset + k - 1) as usize] + 1 > v[(offset + k + 1) as usize] {
                k - 1
            } else {
                k + 1
            };

            let prev_x = v[(offset + prev_k) as usize];
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                edit_path.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                edit_path.push((prev_x, prev_y, x, y));
            }

            (x, y) = (prev_x, prev_y);
        }

        edit_path
    }

    fn diff(&self) -> Self::EditScript {
        let mut diff = Vec::new();

        for (prev_x, prev_y, x, y) in self.backtrack() {
            let (a_index, b_index) = (prev_x as usize, prev_y as usize);

            if x == prev_x {
                if let Some(value) = self.b.get(b_index) {
                    diff.push(Edit::Insert {
                        b_index,
                        value: value.clone(),
                    });
                }
            } else if y == prev_y {
                if let Some(value) = self.a.get(a_index) {
                    diff.push(Edit::Delete {
                        a_index,
                        value: value.clone(),
                    });
                }
            } else if let Some(value) = self.a.get(a_index) {
                diff.push(Edit::Equal {
                    a_index,
                    b_index,
                    value: value.clone(),
                });
            }
        }

        diff.reverse();
        diff
    }
}
