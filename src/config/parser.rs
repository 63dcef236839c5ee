use std::path::Path;

use logos::Logos;

use crate::error::Error;
use crate::warn;

use super::token::{self, Line};
use super::ConfigStore;

/// Parse dotfile text into a store. An entry before any `[section]` header
/// is a format error, as is any line that lexes to neither a header nor a
/// `key = value` entry.
pub fn parse_store(inp: &str, path: &Path) -> Result<ConfigStore, Error> {
    let mut store = ConfigStore::default();
    let mut current: Option<String> = None;

    for (result, span) in Line::lexer(inp).spanned() {
        match result {
            Ok(Line::Section(name)) => current = Some(name.to_owned()),
            Ok(Line::Entry((key, value))) => {
                let Some(section) = current.as_deref() else {
                    return Err(Error::ConfigFormat {
                        rendered: token::span_error(
                            "entry before any [section] header",
                            path,
                            inp,
                            &span,
                        ),
                    });
                };

                if store.insert(section, key, value).is_some() {
                    warn!("\"{key}\" is already set in [{section}], overriding");
                }
            }
            Err(()) => {
                return Err(Error::ConfigFormat {
                    rendered: token::span_error(
                        "unrecognised configuration syntax",
                        path,
                        inp,
                        &span,
                    ),
                });
            }
        }
    }

    Ok(store)
}
