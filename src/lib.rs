//! ES|QL language front-end: a lenient tokenizer, a tolerant pipeline
//! parser, a typed validator and a cursor-aware autocomplete engine.
//!
//! Every stage is synchronous and pure except the collection of external
//! schema data, which goes through the async [`SchemaCallbacks`] seam.
//!
//! ```rust
//! use esql_lang::*;
//!
//! let ParseResult { query, errors } = parse("FROM logs | WHERE status >= 500");
//! assert!(errors.is_empty());
//! assert_eq!(query.commands.len(), 2);
//! ```
reexport!(error);
reexport!(config);
reexport!(lexer);
reexport!(ast);
reexport!(parser);
reexport!(definitions);
reexport!(commands);
reexport!(messages);
reexport!(schema);
reexport!(validation);
reexport!(autocomplete);
reexport!(testing, test);
#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn};

/// Build [`Params`] for a diagnostic: `params! { "name" => column.name }`.
#[macro_export]
macro_rules! params {
    ($($key:literal => $value:expr),* $(,)?) => {
        $crate::Params::from([$(($key, $value.to_string())),*])
    };
}

#[macro_export]
macro_rules! reexport {
    ($module:ident) => {
        $crate::reexport!($module, false);
    };
    ($module:ident, test) => {
        $crate::reexport!($module, true);
    };
    ($module:ident, $is_test:literal) => {
        #[cfg_attr($is_test, cfg(test))]
        mod $module;
        #[cfg_attr($is_test, cfg(test))]
        #[allow(unused_imports)]
        #[allow(ambiguous_glob_reexports)]
        pub use $module::*;
    };
}
