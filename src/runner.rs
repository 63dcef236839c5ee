use std::path::PathBuf;

use derive_builder::Builder;

use crate::{
    args::{self, ParsedInvocation},
    config::ConfigStore,
    error::Error,
    generator::{GenerateFailure, GenerateRequest, Generator},
    name,
    prompt::{NamePrompt, Reply},
    registry::{TemplateDescriptor, TemplateProvider},
    texts::{self, Texts},
    trace,
};

/// How a session ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The operator backed out; nothing was generated.
    Cancelled,
}

/// One command-line session over the injected collaborators: argument
/// resolution, template lookup, output-name resolution, configuration merge,
/// generator invocation. Also owns the non-interactive report modes.
#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct SessionRunner {
    /// Script name used in messages and text blocks.
    #[builder(setter(into), default = "\"skelter\".to_owned()")]
    name: String,

    /// Location of the prefs dotfile.
    dotfile: PathBuf,

    #[builder(default)]
    texts: Texts,

    /// (package, version) pairs for the --version report.
    #[builder(default)]
    versions: Vec<(String, String)>,

    registry: Box<dyn TemplateProvider>,
    generator: Box<dyn Generator>,
    prompt: Box<dyn NamePrompt>,
}

enum NameOutcome {
    Accepted(String),
    Quit,
}

/// The single suspension point of a session. Ask loops back to itself on a
/// validation failure; only an accepted name or an explicit quit leaves it.
enum AskState {
    Ask,
    Accepted(String),
    Quit,
}

impl SessionRunner {
    /// Create a new [`SessionRunner`] builder.
    #[must_use]
    pub fn builder() -> SessionRunnerBuilder {
        SessionRunnerBuilder::default()
    }

    /// Drive one full invocation end to end.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] for any argument, lookup, validation or
    /// configuration failure, and when the generator itself fails. All of
    /// those abort before or surface after generation; a voluntary quit is
    /// an [`Outcome::Cancelled`], not an error.
    pub fn run(&mut self, tokens: &[String], list_variables: bool) -> anyhow::Result<Outcome> {
        let invocation = args::resolve(tokens)?;

        let template = self
            .registry
            .lookup(&invocation.template_name)
            .ok_or_else(|| Error::TemplateNotFound(invocation.template_name.clone()))?
            .clone();

        println!("\n{}: {}", template.name, template.summary);
        if let Some(help) = template.help.as_deref() {
            println!("{help}");
        }

        let output_name = if list_variables {
            None
        } else {
            match self.resolve_output_name(&invocation, &template)? {
                NameOutcome::Accepted(accepted) => {
                    println!("{}", self.texts.help_prompt);
                    Some(accepted)
                }
                NameOutcome::Quit => return Ok(Outcome::Cancelled),
            }
        };

        trace!("loading defaults from {}", self.dotfile.display());
        let store = ConfigStore::load(&self.dotfile)?;
        let variables = store.resolve_for(&invocation.template_name, &invocation.overrides)?;
        trace!("resolved {} variable(s)", variables.len());

        let mut tokens: Vec<String> = variables
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        if let Some(output_name) = output_name {
            tokens.insert(0, output_name);
        }
        if list_variables {
            tokens.push("--list-variables".to_owned());
        }

        let request = GenerateRequest {
            template_name: invocation.template_name,
            quiet: true,
            tokens,
        };

        match self.generator.generate(&request) {
            Ok(()) => Ok(Outcome::Completed),
            Err(GenerateFailure::Interrupted) => {
                println!("\n\nExiting...\n");
                Ok(Outcome::Cancelled)
            }
            Err(GenerateFailure::Failed(reason)) => Err(Error::Generation(reason).into()),
        }
    }

    fn resolve_output_name(
        &mut self,
        invocation: &ParsedInvocation,
        template: &TemplateDescriptor,
    ) -> anyhow::Result<NameOutcome> {
        if let Some(supplied) = invocation.output_name.as_deref() {
            name::check(template.ndots, supplied)?;
            return Ok(NameOutcome::Accepted(supplied.to_owned()));
        }

        let help = self.texts.dot_help(template.ndots);
        let mut state = AskState::Ask;

        loop {
            state = match state {
                AskState::Ask => {
                    if let Some(help) = help {
                        println!("{help}");
                    }

                    match self.prompt.challenge("Enter project name (or q to quit)")? {
                        Reply::Interrupted => AskState::Quit,
                        Reply::Line(line) if line == "q" => AskState::Quit,
                        Reply::Line(line) => match name::check(template.ndots, &line) {
                            Ok(()) => AskState::Accepted(line),
                            Err(problem) => {
                                crate::error!("{problem}");
                                AskState::Ask
                            }
                        },
                    }
                }
                AskState::Accepted(accepted) => return Ok(NameOutcome::Accepted(accepted)),
                AskState::Quit => {
                    println!("\n\nExiting...\n");
                    return Ok(NameOutcome::Quit);
                }
            };
        }
    }

    /// Print the usage block with the per-category template table.
    pub fn usage(&self) {
        let templates = self.printable_templates();
        let dotfile = self.dotfile_name();

        println!(
            "{}",
            texts::fill(
                self.texts.usage,
                &[
                    ("script_name", self.name.as_str()),
                    ("dotfile_name", dotfile.as_str()),
                    ("templates", templates.as_str()),
                ],
            )
        );
    }

    /// Print the long description of this front end.
    pub fn show_help(&self) {
        println!(
            "{}",
            texts::fill(self.texts.description, &[("script_name", self.name.as_str())])
        );
    }

    /// List every registered template with its summary and help text,
    /// grouped by category.
    pub fn list_verbose(&self) {
        for (category, items) in self.registry.by_category() {
            println!("\n{category}");
            println!("{}", "-".repeat(category.len()));

            for template in items {
                println!("\n{}: {}", template.name, template.summary);
                if let Some(help) = template.help.as_deref() {
                    for line in help.lines() {
                        println!("   {}", line.trim());
                    }
                }
            }
        }
        println!();
    }

    /// Print a starter dotfile for the operator to redirect into their home
    /// directory. Nothing is written here; saving it is the operator's call.
    pub fn make_config_file(&self) {
        println!(
            "{}",
            texts::fill(
                self.texts.dotfile_header,
                &[("script_name", self.name.as_str())],
            )
        );

        for template in self.registry.all() {
            println!("\n[{}]\n", template.name);
            for var in &template.vars {
                if var.description.is_some() {
                    println!("# {}", var.pretty_description());
                }
                println!("# {} = {}\n", var.name, var.default);
            }
        }
    }

    /// Width-aligned table of the configured package versions.
    pub fn show_version(&self) {
        if self.versions.is_empty() {
            println!("No packages registered");
            return;
        }

        let name_width = self.versions.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        let version_width = self.versions.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

        println!("\n| Installed packages");
        println!("+{}", "-".repeat(name_width + version_width + 3));
        for (package, version) in &self.versions {
            println!("| {package:name_width$}: {version}");
        }
    }

    fn dotfile_name(&self) -> String {
        self.dotfile
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dotfile.display().to_string())
    }

    fn printable_templates(&self) -> String {
        let width = self
            .registry
            .all()
            .iter()
            .map(|t| t.name.len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for (category, items) in self.registry.by_category() {
            out.push_str(&format!("{category}\n\n"));
            for template in items {
                out.push_str(&format!(
                    "|  {name:width$}  {summary}\n",
                    name = template.name,
                    summary = template.summary
                ));
            }
            out.push('\n');
        }

        out
    }
}
