//! Carton - The toolbox shared by every Tumulte crate.
//!
//! A carton holds the small tools every other layer reaches for: fast hash
//! maps, path handling, file URIs, line/character positions and the
//! identifier rules of the script language.
//!
//! # Modules
//!
//! - **hash**: content fingerprints used to skip rewriting unchanged files
//! - **ident**: identifier and reserved-word rules for generated script
//! - **line_index**: byte offset to editor position conversion (UTF-16)
//! - **path**: normalized, forward-slash file paths
//! - **uri**: file path to `file://` URI
//!
//! # Example
//!
//! ```
//! use tumulte_carton::{is_dot_accessible, normalize_path};
//!
//! assert_eq!(normalize_path("C:\\work\\app.riot"), "C:/work/app.riot");
//! assert!(is_dot_accessible("count"));
//! assert!(!is_dot_accessible("data-id"));
//! ```

pub mod hash;
pub mod ident;
pub mod line_index;
pub mod path;
pub mod uri;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export phf for compile-time perfect hash functions
pub use phf::{phf_map, phf_set, Map as PhfMap, Set as PhfSet};

pub use hash::Fingerprint;
pub use ident::{is_dot_accessible, is_reserved_word, property_key};
pub use line_index::{LineIndex, Position, Range};
pub use path::{
    declaration_path, dirname, join_path, normalize_path, strip_declaration_suffix,
    DECLARATION_SUFFIX,
};
pub use uri::path_to_uri;
