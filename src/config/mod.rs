mod parser;
pub mod token;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::UserDirs;
use logos::Logos;

use crate::error::Error;

use token::Piece;

pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Final (or intermediate) variable mapping for one template.
pub type Variables = BTreeMap<String, String>;

/// Layered view of the user's prefs dotfile: a `DEFAULT` section that
/// applies to every template, and zero or more template-named sections that
/// override it for that template only. Loaded once per invocation and never
/// written back; the file is the user's to edit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    defaults: Variables,
    sections: BTreeMap<String, Variables>,
}

impl ConfigStore {
    /// Location of the prefs dotfile, `~/.skelter`.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if a path for the user's home can not be found.
    pub fn dotfile_path() -> anyhow::Result<PathBuf> {
        Ok(UserDirs::new()
            .context("Failed to get user's home directory")?
            .home_dir()
            .join(".skelter"))
    }

    /// Load a store from `path`. A missing file is an empty store, not an
    /// error; the dotfile is optional.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the file exists but can not be read, or if its
    /// contents are not valid dotfile syntax.
    pub fn load(path: &Path) -> anyhow::Result<ConfigStore> {
        if !path.exists() {
            return Ok(ConfigStore::default());
        }

        let inp = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Ok(parser::parse_store(&inp, path)?)
    }

    /// Compute the final variable set for `template_name`: the `DEFAULT`
    /// section overlaid with the template's own section, every value fully
    /// interpolated, and `cli_overrides` applied on top. Command-line input
    /// is always authoritative over the dotfile.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if interpolation hits an unknown variable, a
    /// reference cycle, or bad `%` syntax.
    pub fn resolve_for(
        &self,
        template_name: &str,
        cli_overrides: &Variables,
    ) -> Result<Variables, Error> {
        let section = self.sections.get(template_name);
        let mut interpolator = Interpolator {
            defaults: &self.defaults,
            section,
            done: BTreeMap::new(),
            stack: Vec::new(),
        };

        let mut resolved = Variables::new();
        let keys = self
            .defaults
            .keys()
            .chain(section.map(Variables::keys).into_iter().flatten());

        for key in keys {
            if !resolved.contains_key(key.as_str()) {
                let value = interpolator.expand(key, Lookup::Merged)?;
                resolved.insert(key.clone(), value);
            }
        }

        for (key, value) in cli_overrides {
            resolved.insert(key.clone(), value.clone());
        }

        Ok(resolved)
    }

    fn insert(&mut self, section: &str, key: &str, value: &str) -> Option<String> {
        let target = if section == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(section.to_owned()).or_default()
        };

        target.insert(key.to_owned(), value.to_owned())
    }
}

/// Which layers a reference may resolve against. A reference from a section
/// value to its own key reaches one layer down, which is how a section value
/// extends the default it shadows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Merged,
    DefaultOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Layer {
    Section,
    Default,
}

/// Memoised depth-first evaluation of `%(key)s` references. The in-progress
/// stack doubles as the cycle report, so resolution always terminates with
/// either a value or a precise diagnostic.
struct Interpolator<'a> {
    defaults: &'a Variables,
    section: Option<&'a Variables>,
    done: BTreeMap<(String, Layer), String>,
    stack: Vec<(String, Layer)>,
}

impl Interpolator<'_> {
    fn expand(&mut self, key: &str, lookup: Lookup) -> Result<String, Error> {
        let (layer, raw) = match lookup {
            Lookup::Merged => {
                if let Some(value) = self.section.and_then(|s| s.get(key)) {
                    (Layer::Section, value.clone())
                } else if let Some(value) = self.defaults.get(key) {
                    (Layer::Default, value.clone())
                } else {
                    return Err(Error::UnknownVariable(key.to_owned()));
                }
            }
            Lookup::DefaultOnly => {
                if let Some(value) = self.defaults.get(key) {
                    (Layer::Default, value.clone())
                } else {
                    // a self-reference with nothing underneath to fall back to
                    return Err(self.cycle_to(key));
                }
            }
        };

        let node = (key.to_owned(), layer);
        if let Some(done) = self.done.get(&node) {
            return Ok(done.clone());
        }
        if self.stack.contains(&node) {
            return Err(self.cycle_to(key));
        }

        self.stack.push(node.clone());
        let mut out = String::with_capacity(raw.len());

        for piece in Piece::lexer(&raw) {
            match piece {
                Ok(Piece::Text(text)) => out.push_str(text),
                Ok(Piece::Escape) => out.push('%'),
                Ok(Piece::Reference(reference)) => {
                    let lookup = if reference == key {
                        Lookup::DefaultOnly
                    } else {
                        Lookup::Merged
                    };
                    let expanded = self.expand(reference, lookup)?;
                    out.push_str(&expanded);
                }
                Err(()) => {
                    return Err(Error::ConfigFormat {
                        rendered: format!(
                            "bad interpolation syntax in the value of \"{key}\" \
                             (use %% for a literal percent)"
                        ),
                    });
                }
            }
        }

        self.stack.pop();
        self.done.insert(node, out.clone());
        Ok(out)
    }

    fn cycle_to(&self, key: &str) -> Error {
        let from = self
            .stack
            .iter()
            .position(|(k, _)| k == key)
            .unwrap_or(0);
        let mut cycle: Vec<String> = self.stack[from..]
            .iter()
            .map(|(k, _)| k.clone())
            .collect();
        cycle.push(key.to_owned());

        Error::CircularReference { cycle }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{parser, ConfigStore, Variables};
    use crate::error::Error;

    fn store(text: &str) -> ConfigStore {
        parser::parse_store(text, Path::new("test.conf")).unwrap()
    }

    fn overrides(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    const LAYERED: &str = "\
[DEFAULT]
license_name = GPL
keywords = base

[plone3_theme]
license_name = BSD
keywords = %(keywords)s extra
";

    #[test]
    fn template_section_extends_default() {
        let resolved = store(LAYERED)
            .resolve_for("plone3_theme", &overrides(&[("license_name", "MIT")]))
            .unwrap();

        assert_eq!(resolved.get("license_name").map(String::as_str), Some("MIT"));
        assert_eq!(resolved.get("keywords").map(String::as_str), Some("base extra"));
    }

    #[test]
    fn unknown_template_gets_defaults_only() {
        let resolved = store(LAYERED)
            .resolve_for("other", &Variables::new())
            .unwrap();

        assert_eq!(resolved.get("license_name").map(String::as_str), Some("GPL"));
        assert_eq!(resolved.get("keywords").map(String::as_str), Some("base"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let store = store(LAYERED);
        let cli = overrides(&[("license_name", "MIT")]);

        assert_eq!(
            store.resolve_for("plone3_theme", &cli).unwrap(),
            store.resolve_for("plone3_theme", &cli).unwrap()
        );
    }

    #[test]
    fn cli_overrides_always_win() {
        let resolved = store(LAYERED)
            .resolve_for("plone3_theme", &overrides(&[("keywords", "cli wins")]))
            .unwrap();

        assert_eq!(resolved.get("keywords").map(String::as_str), Some("cli wins"));
    }

    #[test]
    fn chained_references_resolve() {
        let resolved = store(
            "[DEFAULT]\nroot = base\nmid = %(root)s-mid\nleaf = %(mid)s-leaf\n",
        )
        .resolve_for("any", &Variables::new())
        .unwrap();

        assert_eq!(resolved.get("leaf").map(String::as_str), Some("base-mid-leaf"));
    }

    #[test]
    fn mutual_reference_is_a_cycle() {
        let err = store("[DEFAULT]\na = %(b)s\nb = %(a)s\n")
            .resolve_for("any", &Variables::new())
            .unwrap_err();

        match err {
            Error::CircularReference { cycle } => {
                assert!(cycle.len() >= 3);
                assert_eq!(cycle.first(), cycle.last());
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn direct_self_reference_without_fallback_is_a_cycle() {
        let err = store("[DEFAULT]\na = x %(a)s\n")
            .resolve_for("any", &Variables::new())
            .unwrap_err();

        assert!(matches!(err, Error::CircularReference { .. }));
    }

    #[test]
    fn section_self_reference_without_default_is_a_cycle() {
        let err = store("[theme]\nkeywords = %(keywords)s extra\n")
            .resolve_for("theme", &Variables::new())
            .unwrap_err();

        assert!(matches!(err, Error::CircularReference { .. }));
    }

    #[test]
    fn unknown_reference_is_reported() {
        let err = store("[DEFAULT]\na = %(missing)s\n")
            .resolve_for("any", &Variables::new())
            .unwrap_err();

        assert!(matches!(err, Error::UnknownVariable(key) if key == "missing"));
    }

    #[test]
    fn escaped_percent_is_literal() {
        let resolved = store("[DEFAULT]\ncompletion = 100%%\n")
            .resolve_for("any", &Variables::new())
            .unwrap();

        assert_eq!(resolved.get("completion").map(String::as_str), Some("100%"));
    }

    #[test]
    fn stray_percent_is_a_format_error() {
        let err = store("[DEFAULT]\ncompletion = 100%\n")
            .resolve_for("any", &Variables::new())
            .unwrap_err();

        assert!(matches!(err, Error::ConfigFormat { .. }));
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let loaded = ConfigStore::load(Path::new("/definitely/not/here.conf")).unwrap();
        assert_eq!(loaded, ConfigStore::default());
    }

    #[test]
    fn entry_before_section_is_a_format_error() {
        let err = parser::parse_store("a = 1\n", Path::new("bad.conf")).unwrap_err();
        assert!(matches!(err, Error::ConfigFormat { .. }));
    }

    #[test]
    fn garbage_line_is_a_format_error() {
        let err = parser::parse_store("[DEFAULT]\n!!!\n", Path::new("bad.conf")).unwrap_err();
        match err {
            Error::ConfigFormat { rendered } => assert!(rendered.contains("bad.conf:2")),
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    #[test]
    fn later_entries_shadow_earlier_ones() {
        let resolved = store("[DEFAULT]\nk = 1\nk = 2\n")
            .resolve_for("any", &Variables::new())
            .unwrap();

        assert_eq!(resolved.get("k").map(String::as_str), Some("2"));
    }
}
