//! `abbrev_core` expands compact markup abbreviations such as `ul>li.item$*3`
//! or `div[foo=bar]/` into a resolved node tree that renderers turn into HTML,
//! JSX or any other markup.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Abbreviation string
//!   → Scanner (character cursor over the source)
//!   → Lexer (context sensitive tokens covering the source end to end)
//!   → Parser (elements and groups joined by `>`, `+` and `^`)
//!   → Engine (unrolls repeaters, numbers clones, distributes text)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Expansion options, loadable from TOML or JSON.
//! - [`lexer`]: Tokenizer that tracks quote and bracket nesting.
//! - [`parser`]: Structural parser producing an unresolved statement tree.
//! - [`scanner`]: Character cursor and character classes used by the lexer.
//! - [`tokens`]: Token types shared by the lexer and parser.
//!
//! ## Key Types
//!
//! - [`Abbreviation`]: Root nodes of an expanded abbreviation.
//! - [`AbbreviationNode`]: An element or text node with resolved name, value
//!   and attributes.
//! - [`ExpandOptions`]: Text, variables and the repeat limit for an expansion.
//! - [`AbbreviationError`]: Lexical and structural errors with source spans.
//!
//! ## Quick Start
//!
//! ```rust
//! use abbrev_core::ExpandOptions;
//! use abbrev_core::expand;
//!
//! let options = ExpandOptions::default().with_text(["Home", "About"]);
//! let abbreviation = expand("nav>a.link$*", &options).unwrap();
//!
//! let links = &abbreviation[0].children;
//! assert_eq!(links.len(), 2);
//! assert_eq!(links[1].text().as_deref(), Some("About"));
//! ```
//!
//! Errors carry the offending span, so they render with
//! [`miette`](https://docs.rs/miette) when the source is attached:
//!
//! ```rust
//! use abbrev_core::ExpandOptions;
//! use abbrev_core::expand;
//!
//! let error = expand("ul>li[title=a=b]", &ExpandOptions::default()).unwrap_err();
//! assert_eq!(error.offset(), Some(13));
//! ```

pub use abbreviation::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use href::href_for;

mod abbreviation;
pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
mod href;
pub mod lexer;
pub mod parser;
pub mod scanner;
pub mod tokens;

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;
