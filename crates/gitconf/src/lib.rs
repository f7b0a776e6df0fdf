//! # gitconf
//!
//! Reads gitconfig files into an ordered list of [`Section`]s.
//!
//! ```
//! let sections = gitconf::parse("[color \"branch\"]\n\tcurrent = yellow reverse\n").unwrap();
//!
//! assert_eq!(sections[0].kind, "color");
//! assert_eq!(sections[0].id.as_deref(), Some("branch"));
//! assert_eq!(sections[0].get("current"), Some("yellow reverse"));
//! ```
//!
//! Parsing is all-or-nothing: when the file does not match the grammar no
//! sections are returned, only an [`Error`] whose message points at the
//! failure. Matching, tree building and diagnostics live in
//! [`gitconf_syntax`]; this crate supplies the semantic actions.

pub mod builder;
pub mod section;
pub mod settings;

pub use builder::ConfigBuilder;
pub use section::Section;
pub use settings::{Settings, SettingsError};

use gitconf_syntax::{ParseError, Parser, TreeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Parse `data` with default settings.
pub fn parse(data: &str) -> Result<Vec<Section>, Error> {
    parse_with(data, &Settings::default())
}

pub fn parse_with(data: &str, settings: &Settings) -> Result<Vec<Section>, Error> {
    let mut parser = Parser::with_options(data, settings.parser.clone());
    parser.parse()?;

    let mut builder = ConfigBuilder::new();
    gitconf_syntax::execute(parser.tokens()?, data, &mut builder);

    let sections = builder.finish();
    log::debug!("read {} sections", sections.len());
    Ok(sections)
}
