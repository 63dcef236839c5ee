use std::collections::BTreeMap;

pub use clap::Parser;

use crate::error::Error;

/// Outer command-line surface. The report flags short-circuit before any
/// session work happens; everything else rides in `tokens`. Help and version
/// are owned by the runner, not clap, so their wording stays injectable.
#[derive(Parser, Debug)]
#[command(name = "skelter", disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Template name, then an optional output name, then key=value overrides
    #[arg(value_name = "TOKEN")]
    pub tokens: Vec<String>,

    /// Show the full description of this front end
    #[arg(long)]
    pub help: bool,

    /// List templates verbosely, with details
    #[arg(long)]
    pub list: bool,

    /// Print a starter prefs dotfile to redirect into your home directory
    #[arg(long)]
    pub make_config_file: bool,

    /// Print the versions of the installed packages
    #[arg(long)]
    pub version: bool,

    /// Forward directly to the generator, listing the template's variables
    #[arg(long)]
    pub list_variables: bool,
}

/// A fully classified invocation: which template, what to call the output,
/// and the variable overrides given on the command line. Built once, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    pub template_name: String,
    pub output_name: Option<String>,
    pub overrides: BTreeMap<String, String>,
}

/// Classify raw tokens into a [`ParsedInvocation`].
///
/// The first token is the template name. Of the rest, the first token with
/// no `=` is the output name; a second one is ambiguous and rejected. A
/// `key=value` token adds an override, splitting at the first `=` so values
/// may themselves contain `=`; on duplicate keys the last one wins. Any key
/// containing `svn-repository` is rejected outright: that capability must go
/// through the underlying generator, not this front end.
pub fn resolve(tokens: &[String]) -> Result<ParsedInvocation, Error> {
    let (template_name, rest) = tokens.split_first().ok_or(Error::MissingTemplate)?;

    let mut output_name = None;
    let mut overrides = BTreeMap::new();

    for token in rest {
        match token.split_once('=') {
            None if output_name.is_none() => output_name = Some(token.clone()),
            None => return Err(Error::MalformedArgument(token.clone())),
            Some(("", _)) => return Err(Error::MalformedArgument(token.clone())),
            Some((key, value)) => {
                if key.contains("svn-repository") {
                    return Err(Error::UnsupportedArgument(key.to_owned()));
                }
                overrides.insert(key.to_owned(), value.to_owned());
            }
        }
    }

    Ok(ParsedInvocation {
        template_name: template_name.clone(),
        output_name,
        overrides,
    })
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::error::Error;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn bare_template_only() {
        let parsed = resolve(&tokens(&["skel"])).unwrap();
        assert_eq!(parsed.template_name, "skel");
        assert_eq!(parsed.output_name, None);
        assert!(parsed.overrides.is_empty());
    }

    #[test]
    fn output_name_and_overrides() {
        let parsed = resolve(&tokens(&["skel", "foo.bar", "author=me"])).unwrap();
        assert_eq!(parsed.template_name, "skel");
        assert_eq!(parsed.output_name.as_deref(), Some("foo.bar"));
        assert_eq!(parsed.overrides.get("author").map(String::as_str), Some("me"));
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let parsed = resolve(&tokens(&["skel", "a=1", "a=2"])).unwrap();
        assert_eq!(parsed.overrides.get("a").map(String::as_str), Some("2"));
        assert_eq!(parsed.overrides.len(), 1);
    }

    #[test]
    fn value_keeps_extra_equals() {
        let parsed = resolve(&tokens(&["skel", "expr=a=b"])).unwrap();
        assert_eq!(parsed.overrides.get("expr").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn empty_tokens_is_missing_template() {
        assert!(matches!(resolve(&[]), Err(Error::MissingTemplate)));
    }

    #[test]
    fn leading_equals_is_malformed() {
        assert!(matches!(
            resolve(&tokens(&["skel", "=foo"])),
            Err(Error::MalformedArgument(t)) if t == "=foo"
        ));
    }

    #[test]
    fn second_bare_token_is_malformed() {
        assert!(matches!(
            resolve(&tokens(&["skel", "one", "two"])),
            Err(Error::MalformedArgument(t)) if t == "two"
        ));
    }

    #[test]
    fn svn_repository_rejected_anywhere() {
        for case in [
            vec!["skel", "--svn-repository=http://example.org/svn"],
            vec!["skel", "name", "a=1", "svn-repository=x"],
        ] {
            assert!(matches!(
                resolve(&tokens(&case)),
                Err(Error::UnsupportedArgument(_))
            ));
        }
    }
}
