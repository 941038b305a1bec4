//! Component registry and factory
//!
//! The registry maps component-type names to constructors. The factory
//! resolves a template's type, builds a bare node with its collaborators
//! injected from the service locator, and recurses over subcomponents.
//! Construction never configures and never activates; the returned subtree
//! is raw material for the content manager.

use log::debug;
use std::collections::HashMap;
use thiserror::Error;

use crate::component::behavior::{ComponentBehavior, GroupBehavior};
use crate::component::node::ComponentNode;
use crate::component::tree::ComponentTree;
use crate::foundation::collections::NodeId;

use super::services::ServiceLocator;
use super::Template;

/// Constructor producing a behavior with its collaborators resolved
pub type Constructor = Box<dyn Fn(&ServiceLocator) -> Box<dyn ComponentBehavior>>;

/// Errors produced during subtree construction
#[derive(Debug, Error)]
pub enum FactoryError {
    /// The template names a component type nobody registered
    #[error("no component type registered for `{type_name}` (required by template `{template}`)")]
    TypeResolution {
        /// The unresolvable type name
        type_name: String,
        /// Name of the template that required it
        template: String,
    },
}

/// Name-keyed registry of component constructors
pub struct ComponentRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Create a registry with the built-in `group` container registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("group", |_| Box::new(GroupBehavior));
        registry
    }

    /// Register a constructor under a component-type name
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        constructor: impl Fn(&ServiceLocator) -> Box<dyn ComponentBehavior> + 'static,
    ) {
        self.constructors
            .insert(type_name.into(), Box::new(constructor));
    }

    /// Whether a type name is registered
    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    fn get(&self, type_name: &str) -> Option<&Constructor> {
        self.constructors.get(type_name)
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Builds bare node subtrees from templates
pub struct ComponentFactory {
    registry: ComponentRegistry,
    services: ServiceLocator,
}

impl ComponentFactory {
    /// Create a factory over a registry and service locator
    pub fn new(registry: ComponentRegistry, services: ServiceLocator) -> Self {
        Self { registry, services }
    }

    /// The registry this factory resolves types against
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// The service locator handed to constructors
    pub fn services(&self) -> &ServiceLocator {
        &self.services
    }

    /// Construct the subtree a template describes
    ///
    /// Returns the root of a bare subtree: every node `Created`,
    /// unconfigured, inactive, attached to nothing outside itself. When a
    /// nested template fails to resolve, everything built so far is
    /// discarded from the arena and the error names the missing
    /// registration.
    pub fn create(
        &self,
        tree: &mut ComponentTree,
        template: &Template,
    ) -> Result<NodeId, FactoryError> {
        let mut built = Vec::new();
        match self.create_subtree(tree, template, &mut built) {
            Ok(id) => {
                debug!(
                    "built subtree `{}` ({} node(s))",
                    template.name(),
                    built.len()
                );
                Ok(id)
            }
            Err(e) => {
                for id in built {
                    tree.remove_raw(id);
                }
                Err(e)
            }
        }
    }

    fn create_subtree(
        &self,
        tree: &mut ComponentTree,
        template: &Template,
        built: &mut Vec<NodeId>,
    ) -> Result<NodeId, FactoryError> {
        let type_name = template.resolved_type();
        let constructor =
            self.registry
                .get(type_name)
                .ok_or_else(|| FactoryError::TypeResolution {
                    type_name: type_name.to_string(),
                    template: template.name().to_string(),
                })?;

        let behavior = constructor(&self.services);
        let id = tree.insert(ComponentNode::new(template.clone(), type_name, behavior));
        built.push(id);

        for sub in template.subcomponents() {
            let child = self.create_subtree(tree, sub, built)?;
            // Both nodes are freshly created, so attachment cannot fail.
            tree.add_child(id, child).ok();
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::lifecycle::LifecycleState;
    use crate::component::property::{PropertyDescriptor, PropertyValue};
    use crate::content::validate::ValidationReport;
    use std::any::Any;
    use std::sync::Arc;

    struct Palette {
        accent: &'static str,
    }

    struct Swatch {
        accent: String,
    }

    impl ComponentBehavior for Swatch {
        fn descriptors(&self) -> Vec<PropertyDescriptor> {
            vec![PropertyDescriptor::new(
                "opacity",
                PropertyValue::Float(1.0),
            )]
        }

        fn on_validate(&self, report: &mut ValidationReport) {
            if self.accent.is_empty() {
                report.error("swatch", "no accent color resolved");
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn factory() -> ComponentFactory {
        let mut registry = ComponentRegistry::with_defaults();
        registry.register("swatch", |services: &ServiceLocator| {
            let accent = services
                .resolve::<Palette>()
                .map(|p| p.accent.to_string())
                .unwrap_or_default();
            Box::new(Swatch { accent })
        });

        let mut services = ServiceLocator::new();
        services.register(Arc::new(Palette { accent: "teal" }));
        ComponentFactory::new(registry, services)
    }

    fn nested_template() -> Template {
        Template::build("panel")
            .component_type("group")
            .child(Template::build("fill").component_type("swatch").finish())
            .child(Template::build("border").component_type("swatch").finish())
            .finish()
    }

    #[test]
    fn test_create_builds_bare_subtree_in_order() {
        let factory = factory();
        let mut tree = ComponentTree::new();
        let root = factory.create(&mut tree, &nested_template()).unwrap();

        let node = tree.get(root).unwrap();
        assert_eq!(node.state(), LifecycleState::Created);
        assert_eq!(node.children().len(), 2);

        let names: Vec<_> = node
            .children()
            .iter()
            .map(|c| tree.get(*c).unwrap().name().to_string())
            .collect();
        assert_eq!(names, ["fill", "border"]);
    }

    #[test]
    fn test_constructor_receives_injected_services() {
        let factory = factory();
        let mut tree = ComponentTree::new();
        let root = factory.create(&mut tree, &nested_template()).unwrap();

        let fill = tree.get(root).unwrap().children()[0];
        let swatch = tree.get(fill).unwrap().behavior_as::<Swatch>().unwrap();
        assert_eq!(swatch.accent, "teal");
    }

    #[test]
    fn test_unresolvable_type_names_the_missing_registration() {
        let factory = factory();
        let mut tree = ComponentTree::new();
        let template = Template::build("panel")
            .component_type("group")
            .child(Template::build("exotic").finish())
            .finish();

        let err = factory.create(&mut tree, &template).unwrap_err();
        match err {
            FactoryError::TypeResolution {
                type_name,
                template,
            } => {
                assert_eq!(type_name, "exotic");
                assert_eq!(template, "exotic");
            }
        }
    }

    #[test]
    fn test_failed_construction_leaves_no_orphans() {
        let factory = factory();
        let mut tree = ComponentTree::new();
        let template = Template::build("panel")
            .component_type("group")
            .child(Template::build("fill").component_type("swatch").finish())
            .child(Template::build("mystery").finish())
            .finish();

        assert!(factory.create(&mut tree, &template).is_err());
        assert!(tree.is_empty());
    }
}
