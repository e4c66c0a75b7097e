//! An ordered set of unique strings implemented with an AVL tree.
//!
//! ```
//! use avl_strings::AvlTree;
//! let mut tree = AvlTree::new();
//! tree.insert("a").unwrap();
//! tree.insert("b").unwrap();
//! tree.insert("c").unwrap();
//!
//! // The third insert rotates "b" up to the root.
//! let root = tree.root().unwrap();
//! assert_eq!(root.value(), "b");
//! assert_eq!(tree.height(), 1);
//! assert_eq!(tree.rotations(), 1);
//!
//! assert!(tree.search("c").is_some());
//! assert!(tree.search("d").is_none());
//! assert!(tree.insert("").is_err());
//! ```

mod error;
mod node;
mod print;
mod tree;

pub use error::{Error, Result};
pub use node::NodeRef;
pub use print::INDENT;
pub use tree::{AvlTree, Iter, Order, EMPTY_HEIGHT};
