// # Labyrinth: an explorer for the partially revealed maze puzzle
//
// The agent starts somewhere in a maze it can only see a few cells around,
// must find the control room, step into it, and walk back to where it started
// before the alarm runs out. The core is `explorer::Explorer`; everything else
// is plumbing around it (judges, maze presets and generation, rendering).

/// A trait for conveniently updating a value to its minimum or maximum.
pub trait SetMinMax {
    /// If `v` is less than `self`, updates `self` to `v` and returns `true`.
    /// Otherwise, returns `false`.
    fn setmin(&mut self, v: Self) -> bool;
    /// If `v` is greater than `self`, updates `self` to `v` and returns `true`.
    /// Otherwise, returns `false`.
    fn setmax(&mut self, v: Self) -> bool;
}
impl<T> SetMinMax for T
where
    T: PartialOrd,
{
    fn setmin(&mut self, v: T) -> bool {
        *self > v && {
            *self = v;
            true
        }
    }
    fn setmax(&mut self, v: T) -> bool {
        *self < v && {
            *self = v;
            true
        }
    }
}

/// A macro for convenient initialization of vectors, including nested vectors for multi-dimensional arrays.
///
/// # Examples
///
/// ```
/// use labyrinth::mat;
/// // A simple vector
/// let v1 = mat![1, 2, 3];
///
/// // A 2x3 matrix initialized with zeros
/// let m1 = mat![0; 2; 3];
/// assert_eq!(m1, vec![vec![0, 0, 0], vec![0, 0, 0]]);
/// ```
#[macro_export]
macro_rules! mat {
    ($($e:expr),*) => { vec![$($e),*] };
    ($($e:expr,)*) => { vec![$($e),*] };
    ($e:expr; $d:expr) => { vec![$e; $d] };
    ($e:expr; $d:expr $(; $ds:expr)+) => { vec![mat![$e $(; $ds)*]; $d] };
}

/// Error type of the explorer core.
pub mod error;

/// Cells, positions, directions and the flat-indexed map the explorer keeps.
pub mod grid;

/// Breadth-first and best-first searches over the explorer's map.
pub mod search;

/// The phase state machine deciding each move.
pub mod explorer;

/// Fully known mazes as the judge sees them.
pub mod maze;

/// Named preset mazes.
pub mod problems;

/// Abstraction for the puzzle environment, with local and remote implementations.
pub mod judge;

/// Utilities for generating SVG pictures of mazes and trails.
pub mod svg;

/// Tools for generating mazes.
pub mod mapgen {
    /// A module for generating random mazes.
    pub mod random;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setmin_only_moves_down() {
        let mut v = 5;
        assert!(v.setmin(3));
        assert!(!v.setmin(4));
        assert!(v.setmax(9));
        assert_eq!(v, 9);
    }
}
