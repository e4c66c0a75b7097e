//! Sideways rendering of a tree for diagnostics.
//!
//! The root is printed leftmost, the right subtree above it and the left
//! subtree below, so the output reads like the tree rotated by a quarter turn.

use std::fmt;
use std::io::{self, Write};

use crate::tree::{AvlTree, Order};

/// Spaces of indentation per level of depth.
pub const INDENT: usize = 8;

impl AvlTree {
    /// Writes the sideways rendering, one `value(height)` line per node.
    pub fn write_tree<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }

    /// Prints the sideways rendering to standard output.
    pub fn print_tree(&self) {
        print!("{self}");
    }
}

impl fmt::Display for AvlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = Ok(());
        self.traverse(Order::ReverseInOrder, |node, depth| {
            if result.is_ok() {
                result = writeln!(f, "{:indent$}{node}", "", indent = INDENT * depth);
            }
        });
        result
    }
}

impl fmt::Debug for AvlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
