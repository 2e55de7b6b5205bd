//! Relief - The parsed surface of a Tumulte component.
//!
//! A component file is a single root custom tag holding template markup, an
//! optional `<script>` region and an optional `<style>` region. This crate
//! defines the tree a parse produces. Every node, attribute and expression
//! carries a half-open byte range `[start, end)` into the raw component text.

pub mod ast;
pub mod errors;

pub use ast::*;
pub use errors::{ErrorCode, ParseError};
