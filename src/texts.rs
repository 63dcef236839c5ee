use logos::Logos;

use crate::config::token::Piece;

/// Presentation blocks for the report modes and the session. These are
/// data, not logic; a wrapping application can swap any of them out without
/// touching the resolution engine.
#[derive(Debug, Clone)]
pub struct Texts {
    pub usage: &'static str,
    pub description: &'static str,
    pub dotfile_header: &'static str,
    pub help_prompt: &'static str,
}

impl Texts {
    /// Guidance for a template's expected namespace depth, when there is
    /// something useful to say about it.
    #[must_use]
    pub fn dot_help(&self, ndots: Option<usize>) -> Option<&'static str> {
        match ndots? {
            0 => Some(DOT_HELP_0),
            1 => Some(DOT_HELP_1),
            2 => Some(DOT_HELP_2),
            _ => None,
        }
    }
}

impl Default for Texts {
    fn default() -> Self {
        Texts {
            usage: USAGE,
            description: DESCRIPTION,
            dotfile_header: DOTFILE_HEADER,
            help_prompt: HELP_PROMPT,
        }
    }
}

/// Substitute `%(key)s` references in a text block. The blocks share the
/// dotfile's substitution syntax; unknown references and stray percents are
/// left in place rather than rejected, since these strings are cosmetic.
#[must_use]
pub fn fill(text: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut lexer = Piece::lexer(text);

    while let Some(piece) = lexer.next() {
        match piece {
            Ok(Piece::Reference(name)) => match vars.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => out.push_str(value),
                None => {
                    out.push_str("%(");
                    out.push_str(name);
                    out.push_str(")s");
                }
            },
            Ok(Piece::Escape) => out.push('%'),
            Ok(Piece::Text(text)) => out.push_str(text),
            Err(()) => out.push_str(lexer.slice()),
        }
    }

    out
}

const USAGE: &str = "
Usage:

    %(script_name)s <template> <output-name> [var1=value] ... [varN=value]

    %(script_name)s --help                Full help
    %(script_name)s --list                List templates verbosely, with details
    %(script_name)s --make-config-file    Output a %(dotfile_name)s prefs file
    %(script_name)s --version             Print versions of installed packages

%(templates)s
Warning: use of the --svn-repository argument is not allowed with this script.

For further help information, please invoke this script with the
option --help.
";

const DESCRIPTION: &str = "
This script creates project skeletons from best-practice templates. It is a
front end around an underlying generator, providing an easier syntax for
invoking it and better help.

Basic usage:

    %(script_name)s <template>

(Run the script without arguments for a list of templates; use --list for a
verbose list with full descriptions.)

This will prompt you for the name of the project and for other information
about it. If you want to specify the output name up front, you can:

    %(script_name)s <template> <output-name>

You can also pass any variable the template would ask for as a name=value
pair, which is mostly useful for scripted use:

    %(script_name)s <template> <output-name> author_email=joel@example.org

(To see the variables a template expects, run
``%(script_name)s <template> --list-variables``.)

Default values for any template can be kept in a file in your home
directory. The file is in INI format: a [DEFAULT] section applies to every
template, a section named after a template overrides it for that template
only, and values may refer to other values with %(name)s references. Run
``%(script_name)s --make-config-file`` for a starter file to save.

The --svn-repository argument accepted by the underlying generator is not
allowed through this script; invoke the generator directly if you need it.
";

const DOT_HELP_0: &str = "
This template expects a project name with no dots in it (a simple
package name, like 'foo').
";

const DOT_HELP_1: &str = "
This template expects a project name with 1 dot in it (a basic
namespace, like 'foo.bar').
";

const DOT_HELP_2: &str = "
This template expects a project name with 2 dots in it (a nested
namespace, like 'foo.bar.baz').
";

const DOTFILE_HEADER: &str = "
# This file lets you set default values used by %(script_name)s.
# To set a global default, uncomment any line that looks like:
#    variable_name = Default Value

[DEFAULT]
";

const HELP_PROMPT: &str = "
If at any point you need additional help for a question, you can enter
'?' and press RETURN.
";

#[cfg(test)]
mod tests {
    use super::fill;

    #[test]
    fn fills_known_references() {
        let out = fill("run %(script_name)s now", &[("script_name", "skelter")]);
        assert_eq!(out, "run skelter now");
    }

    #[test]
    fn leaves_unknown_references_in_place() {
        let out = fill("see %(name)s, 100%% done, 50% off", &[]);
        assert_eq!(out, "see %(name)s, 100% done, 50% off");
    }
}
