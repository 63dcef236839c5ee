/// A variable a template will ask for during generation.
#[derive(Debug, Clone)]
pub struct TemplateVar {
    pub name: String,
    pub default: String,
    pub description: Option<String>,
}

impl TemplateVar {
    #[must_use]
    pub fn new(name: &str, default: &str, description: &str) -> Self {
        TemplateVar {
            name: name.to_owned(),
            default: default.to_owned(),
            description: (!description.is_empty()).then(|| description.to_owned()),
        }
    }

    /// Human form used by the starter-dotfile report.
    #[must_use]
    pub fn pretty_description(&self) -> String {
        match &self.description {
            Some(text) => format!("{} ({})", self.name, text),
            None => self.name.clone(),
        }
    }
}

/// Everything the session needs to know about one registered template.
#[derive(Debug, Clone)]
pub struct TemplateDescriptor {
    pub name: String,
    pub summary: String,
    pub help: Option<String>,
    /// Expected namespace depth of the output name; `None` accepts any.
    pub ndots: Option<usize>,
    pub category: String,
    pub vars: Vec<TemplateVar>,
}

/// Lookup seam over whatever registration mechanism the build chose. The
/// session never depends on how templates got registered.
pub trait TemplateProvider {
    fn lookup(&self, name: &str) -> Option<&TemplateDescriptor>;

    fn all(&self) -> &[TemplateDescriptor];

    /// Registered templates grouped by category, in registration order.
    fn by_category(&self) -> Vec<(String, Vec<&TemplateDescriptor>)> {
        let mut categories: Vec<(String, Vec<&TemplateDescriptor>)> = Vec::new();

        for template in self.all() {
            match categories.iter_mut().find(|(name, _)| name == &template.category) {
                Some((_, items)) => items.push(template),
                None => categories.push((template.category.clone(), vec![template])),
            }
        }

        categories
    }
}

/// Explicitly registered template set.
pub struct StaticRegistry {
    templates: Vec<TemplateDescriptor>,
}

impl StaticRegistry {
    #[must_use]
    pub fn new(templates: Vec<TemplateDescriptor>) -> Self {
        StaticRegistry { templates }
    }

    /// The descriptor set compiled into the stock binary.
    #[must_use]
    pub fn builtin() -> Self {
        let common = || {
            vec![
                TemplateVar::new("version", "0.1", "Version number for the project"),
                TemplateVar::new("description", "", "One-line description of the project"),
                TemplateVar::new("author", "", "Author name"),
                TemplateVar::new("author_email", "", "Author email"),
                TemplateVar::new("keywords", "", "Space-separated keywords"),
                TemplateVar::new("license_name", "GPL", "License of the project"),
            ]
        };

        StaticRegistry::new(vec![
            TemplateDescriptor {
                name: "basic_package".to_owned(),
                summary: "A project with a single flat package".to_owned(),
                help: Some(
                    "Use this when the project is one importable package with \
                     no namespace around it, like 'foo'."
                        .to_owned(),
                ),
                ndots: Some(0),
                category: "Core Packages".to_owned(),
                vars: common(),
            },
            TemplateDescriptor {
                name: "basic_namespace".to_owned(),
                summary: "A project with a namespace package".to_owned(),
                help: Some(
                    "Use this for a package living inside one namespace, \
                     like 'foo.bar'."
                        .to_owned(),
                ),
                ndots: Some(1),
                category: "Core Packages".to_owned(),
                vars: common(),
            },
            TemplateDescriptor {
                name: "nested_namespace".to_owned(),
                summary: "A project with a nested namespace package".to_owned(),
                help: Some(
                    "Use this for a package two namespaces deep, like \
                     'foo.bar.baz'."
                        .to_owned(),
                ),
                ndots: Some(2),
                category: "Core Packages".to_owned(),
                vars: common(),
            },
        ])
    }
}

impl TemplateProvider for StaticRegistry {
    fn lookup(&self, name: &str) -> Option<&TemplateDescriptor> {
        self.templates.iter().find(|t| t.name == name)
    }

    fn all(&self) -> &[TemplateDescriptor] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use super::{StaticRegistry, TemplateProvider, TemplateVar};

    #[test]
    fn lookup_finds_registered_templates() {
        let registry = StaticRegistry::builtin();
        assert!(registry.lookup("basic_namespace").is_some());
        assert!(registry.lookup("no_such_thing").is_none());
    }

    #[test]
    fn categories_keep_registration_order() {
        let registry = StaticRegistry::builtin();
        let categories = registry.by_category();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].0, "Core Packages");
        assert_eq!(categories[0].1.len(), 3);
    }

    #[test]
    fn pretty_description_includes_the_hint() {
        let var = TemplateVar::new("author", "", "Author name");
        assert_eq!(var.pretty_description(), "author (Author name)");

        let bare = TemplateVar::new("author", "", "");
        assert_eq!(bare.pretty_description(), "author");
    }
}
