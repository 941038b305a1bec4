//! Declarative templates describing node subtrees
//!
//! A template is an immutable recipe: a name, an optional component-type
//! selector, scalar configuration fields, and nested subcomponent
//! templates. Templates compare structurally and hash by content, so they
//! are safe to use as cache and identity keys.

pub mod factory;
pub mod services;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::component::property::PropertyValue;

/// Immutable recipe for constructing a node subtree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Template {
    name: String,
    component_type: Option<String>,
    fields: BTreeMap<String, PropertyValue>,
    subcomponents: Vec<Template>,
}

impl Template {
    /// Start building a template with the given name
    pub fn build(name: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder {
            template: Template {
                name: name.into(),
                component_type: None,
                fields: BTreeMap::new(),
                subcomponents: Vec::new(),
            },
        }
    }

    /// Template name; becomes the node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit component-type selector, if one was set
    pub fn component_type(&self) -> Option<&str> {
        self.component_type.as_deref()
    }

    /// The component type this template resolves to
    ///
    /// Falls back to the template name when no explicit selector was set.
    pub fn resolved_type(&self) -> &str {
        self.component_type.as_deref().unwrap_or(&self.name)
    }

    /// Look up one configuration field
    pub fn field(&self, name: &str) -> Option<&PropertyValue> {
        self.fields.get(name)
    }

    /// Iterate configuration fields in stable order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Nested child templates, in child order
    pub fn subcomponents(&self) -> &[Template] {
        &self.subcomponents
    }
}

/// Fluent constructor for [`Template`] values
///
/// The only way to assemble a template; once `finish` returns, the value
/// is immutable.
pub struct TemplateBuilder {
    template: Template,
}

impl TemplateBuilder {
    /// Select an explicit component type
    pub fn component_type(mut self, type_name: impl Into<String>) -> Self {
        self.template.component_type = Some(type_name.into());
        self
    }

    /// Add a configuration field
    pub fn field(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.template.fields.insert(name.into(), value);
        self
    }

    /// Append a subcomponent template
    pub fn child(mut self, child: Template) -> Self {
        self.template.subcomponents.push(child);
        self
    }

    /// Produce the immutable template
    pub fn finish(self) -> Template {
        self.template
    }
}
