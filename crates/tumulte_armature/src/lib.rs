//! Armature - The structural parser for Tumulte components.
//!
//! Parses a component file into a [`ComponentTree`]: the first top-level
//! element is the component's root tag, `<script>` and `<style>` blocks that
//! are direct children of the root become code regions, and `{ ... }`
//! expressions in text and attribute values are recorded with their ranges.
//!
//! ```
//! let tree = tumulte_armature::parse("<my-app><p>{ message }</p></my-app>").unwrap();
//! assert_eq!(tree.root.tag, "my-app");
//! assert!(tree.script.is_none());
//! ```

mod parser;
pub mod tags;

pub use parser::parse;
pub use tumulte_relief::{ComponentTree, ParseError};
