//! # tumulte_maestro
//!
//! Maestro - The analysis host for Tumulte components.
//!
//! ## Name Origin
//!
//! **Maestro** is the conductor who keeps every section of the orchestra in
//! time. `tumulte_maestro` keeps the three languages of a component (markup,
//! script and style) in step with one script analysis engine.
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------------------------------+
//! |                    tumulte_maestro (AnalysisHost)                 |
//! +------------------------------------------------------------------+
//! |                                                                    |
//! |  +--------------------+     +-------------------+                  |
//! |  |   Document Store   |     |   IDE Services    |                  |
//! |  |   (parsed tree,    |---->|   completion      |                  |
//! |  |    derived cache)  |     |   hover, defs     |                  |
//! |  +--------------------+     +-------------------+                  |
//! |            |                          |                            |
//! |            v                          v                            |
//! |  +-----------------------------------------------------------+    |
//! |  |   Classifier | Declaration Synthesizer | Expression Scope  |    |
//! |  +-----------------------------------------------------------+    |
//! |                              |                                     |
//! |                              v                                     |
//! |  +-----------------------------------------------------------+    |
//! |  |                tumulte_canon::ScriptEngine                 |    |
//! |  |  virtual files | dependency graph | dyn ScriptCompiler     |    |
//! |  +-----------------------------------------------------------+    |
//! +------------------------------------------------------------------+
//! ```
//!
//! ## Virtual files
//!
//! For a component at `/w/app.riot` the engine may hold:
//!
//! - `/w/app.riot`: the script text of the component
//! - `/w/app.riot.d.ts`: its external declaration, written when another
//!   component imports it
//! - `/w/app.riot#expression:<n>`: the scope function of the template
//!   expression starting at byte `n`
//!
//! ## Usage
//!
//! ```no_run
//! use tumulte_maestro::{AnalysisHost, HostConfig};
//! # fn compiler() -> Box<dyn tumulte_canon::ScriptCompiler> { unimplemented!() }
//!
//! let config = HostConfig::from_initialization_options(None).unwrap();
//! tumulte_maestro::init_logging(config.log_level.as_deref());
//!
//! let mut host = AnalysisHost::new(config, compiler());
//! host.update_document("/w/app.riot", "<app><p>{ count }</p></app>");
//! let completions = host.completions("/w/app.riot", 12);
//! ```

pub mod classifier;
pub mod compiler;
pub mod config;
pub mod declaration;
pub mod document;
pub mod expression_scope;
mod host;
pub mod ide;
pub mod imports;
mod inspect;
pub mod markup;
pub mod slots;

pub use classifier::ContentType;
pub use compiler::{CompileError, CompiledOutput, ComponentCompiler};
pub use config::{ConfigError, HostConfig};
pub use declaration::{DeclarationKind, DEFAULT_COMPONENT_DECLARATION};
pub use document::{ComponentDocument, DiskTextSource, DocumentStore, TextSource};
pub use expression_scope::{ExpressionScope, ScopeProperty};
pub use host::AnalysisHost;
pub use ide::{CompletionService, DefinitionService, HoverService, QueryTarget};
pub use markup::{MarkupLanguageService, NoopMarkupService};
pub use slots::SlotInfo;

/// Install the global `tracing` subscriber, once.
///
/// Logs go to stderr. `TUMULTE_LOG` takes precedence over `level`; both
/// accept `EnvFilter` directives (`debug`, `tumulte_canon=trace`, ...).
pub fn init_logging(level: Option<&str>) {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("TUMULTE_LOG")
            .or_else(|_| EnvFilter::try_new(level.unwrap_or("info")))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init();
    });
}
