//! Component node: lifecycle state, children, properties, pending updates
//!
//! A node owns its ordered child list, its property bag, and its deferred
//! update queue. The parent reference is a lookup-only arena key, never an
//! ownership edge, so the tree has no reference cycles to manage.

use log::{trace, warn};

use crate::animation::{CellEvents, Easing};
use crate::foundation::collections::NodeId;
use crate::foundation::time::FrameContext;
use crate::template::Template;

use super::behavior::ComponentBehavior;
use super::lifecycle::{LifecycleError, LifecycleState};
use super::property::{PropertyBag, PropertyValue};
use super::queue::{PendingUpdate, UpdateQueue};

/// Optional callback slots invoked by the runtime when set
///
/// Each slot is set at construction time by the code that built the node;
/// an unset slot is a no-op.
#[derive(Default)]
pub struct NodeHooks {
    /// Invoked after a property animation reaches its target
    pub animation_completed: Option<Box<dyn FnMut(&str)>>,
    /// Invoked after this node's child list changes
    pub child_collection_changed: Option<Box<dyn FnMut()>>,
}

/// One node in the component tree
pub struct ComponentNode {
    id: NodeId,
    name: String,
    component_type: String,
    template: Template,
    state: LifecycleState,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    properties: PropertyBag,
    queue: UpdateQueue,
    behavior: Box<dyn ComponentBehavior>,
    hooks: NodeHooks,
}

impl ComponentNode {
    /// Construct a bare node from its template and resolved behavior
    ///
    /// The node starts in `Created`: construction never configures or
    /// activates.
    pub(crate) fn new(
        template: Template,
        component_type: &str,
        behavior: Box<dyn ComponentBehavior>,
    ) -> Self {
        let properties = PropertyBag::from_descriptors(&behavior.descriptors());
        Self {
            id: NodeId::default(),
            name: template.name().to_string(),
            component_type: component_type.to_string(),
            template,
            state: LifecycleState::Created,
            parent: None,
            children: Vec::new(),
            properties,
            queue: UpdateQueue::new(),
            behavior,
            hooks: NodeHooks::default(),
        }
    }

    /// Arena key of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: NodeId) {
        self.id = id;
    }

    /// Node name, taken from its template
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the resolved component type
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    /// The template this node was built from
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Parent node key, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered child keys; order defines traversal order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// This node's property bag
    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// The component's behavior object
    pub fn behavior(&self) -> &dyn ComponentBehavior {
        self.behavior.as_ref()
    }

    /// Mutable access to the component's behavior object
    pub fn behavior_mut(&mut self) -> &mut dyn ComponentBehavior {
        self.behavior.as_mut()
    }

    /// Type-query the behavior as a concrete component type
    pub fn behavior_as<T: 'static>(&self) -> Option<&T> {
        self.behavior.as_any().downcast_ref::<T>()
    }

    /// Install the animation-completed callback slot
    pub fn set_animation_completed_hook(&mut self, hook: Box<dyn FnMut(&str)>) {
        self.hooks.animation_completed = Some(hook);
    }

    /// Install the child-collection-changed callback slot
    pub fn set_child_changed_hook(&mut self, hook: Box<dyn FnMut()>) {
        self.hooks.child_collection_changed = Some(hook);
    }

    /// Number of actions waiting in the deferred queue
    pub fn pending_updates(&self) -> usize {
        self.queue.len()
    }

    /// Set a property, immediately or animated depending on state
    ///
    /// Before activation the value is assigned directly. On an active node
    /// a zero duration defers the assignment to the next apply step so the
    /// change lands atomically, and a positive duration begins an animation
    /// from the currently displayed value. A negative duration is rejected,
    /// and mutation of a deactivated or disposed node is an error.
    pub fn set_property(
        &mut self,
        name: &str,
        value: PropertyValue,
        duration: f32,
        easing: Easing,
    ) -> Result<(), LifecycleError> {
        if duration < 0.0 {
            return Err(LifecycleError::InvalidArgument(format!(
                "negative duration {duration} for property `{name}`"
            )));
        }
        let declared = self.properties.kind_of(name).ok_or_else(|| {
            LifecycleError::InvalidArgument(format!("unknown property `{name}`"))
        })?;
        if declared != value.kind() {
            return Err(LifecycleError::InvalidArgument(format!(
                "property `{name}` holds {declared:?}, got {:?}",
                value.kind()
            )));
        }

        match self.state {
            LifecycleState::Created | LifecycleState::Configured => {
                self.properties.set_immediate(name, value)
            }
            LifecycleState::Active => {
                if duration == 0.0 {
                    let name = name.to_string();
                    self.queue.push(Box::new(move |node| {
                        if let Err(e) = node.properties.set_immediate(&name, value) {
                            warn!("deferred assignment of `{name}` dropped: {e}");
                        }
                    }));
                    Ok(())
                } else {
                    self.properties.animate(name, value, duration, easing)
                }
            }
            LifecycleState::Inactive | LifecycleState::Disposed => {
                Err(LifecycleError::InvalidState {
                    operation: "set_property",
                    node: self.name.clone(),
                    state: self.state,
                })
            }
        }
    }

    /// Queue a deferred action against this node
    ///
    /// On an active node the action runs at the next apply step, in arrival
    /// order. Before activation it runs immediately. Queuing against a
    /// deactivated or disposed node is an error, never a silent no-op.
    pub fn queue_update(&mut self, action: PendingUpdate) -> Result<(), LifecycleError> {
        match self.state {
            LifecycleState::Created | LifecycleState::Configured => {
                action(self);
                Ok(())
            }
            LifecycleState::Active => {
                self.queue.push(action);
                Ok(())
            }
            LifecycleState::Inactive | LifecycleState::Disposed => {
                Err(LifecycleError::InvalidState {
                    operation: "queue_update",
                    node: self.name.clone(),
                    state: self.state,
                })
            }
        }
    }

    /// Drain the deferred queue, then advance every animated cell
    ///
    /// The single per-frame mutation point for this node. Returns the
    /// animation notifications produced by the advance.
    pub(crate) fn apply_updates(&mut self, frame: &FrameContext) -> Vec<(String, CellEvents)> {
        for action in self.queue.take() {
            action(self);
        }

        let produced = self.properties.advance_all(frame.delta_time);
        if let Some(hook) = self.hooks.animation_completed.as_mut() {
            for (name, events) in &produced {
                if events.contains(CellEvents::COMPLETED) {
                    hook(name);
                }
            }
        }
        produced
    }

    /// Copy template fields into the property bag
    ///
    /// Before activation fields are assigned directly. On an active node
    /// each field goes through the deferred queue so the reconfiguration
    /// lands atomically at the next apply step. Fields that match no
    /// declared property are skipped with a warning; validation reports
    /// them as diagnostics.
    pub(crate) fn copy_template_fields(&mut self) {
        let fields: Vec<(String, PropertyValue)> = self
            .template
            .fields()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        for (name, value) in fields {
            let result = if self.state.is_active() {
                let deferred = name.clone();
                self.queue.push(Box::new(move |node| {
                    if let Err(e) = node.properties.set_immediate(&deferred, value) {
                        warn!("deferred template field `{deferred}` dropped: {e}");
                    }
                }));
                Ok(())
            } else {
                self.properties.set_immediate(&name, value)
            };
            if let Err(e) = result {
                warn!("template field `{name}` skipped on `{}`: {e}", self.name);
            }
        }
    }

    /// Run the configure step: copy fields, then notify the behavior
    pub(crate) fn run_configure(&mut self) {
        self.copy_template_fields();
        let Self {
            behavior, template, ..
        } = self;
        behavior.on_configure(template);
        if self.state == LifecycleState::Created {
            self.set_state(LifecycleState::Configured);
        }
    }

    /// Run the validate step: structural checks, then behavior diagnostics
    pub(crate) fn run_validate(&self, report: &mut crate::content::validate::ValidationReport) {
        for (field, value) in self.template.fields() {
            match self.properties.kind_of(field) {
                None => report.warn(
                    &self.name,
                    format!("field `{field}` matches no declared property"),
                ),
                Some(kind) if kind != value.kind() => report.warn(
                    &self.name,
                    format!(
                        "field `{field}` is {:?}, property expects {kind:?}",
                        value.kind()
                    ),
                ),
                _ => {}
            }
        }
        self.behavior.on_validate(report);
    }

    /// Abandon all in-flight animations without completion notifications
    pub(crate) fn cancel_animations(&mut self) {
        self.properties.cancel_all();
    }

    /// Discard queued updates without executing them
    pub(crate) fn clear_pending(&mut self) {
        self.queue.clear();
    }

    pub(crate) fn set_state(&mut self, new_state: LifecycleState) {
        if self.state != new_state {
            trace!(
                "node `{}` {:?} -> {:?}",
                self.name,
                self.state,
                new_state
            );
            self.state = new_state;
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
        if let Some(hook) = self.hooks.child_collection_changed.as_mut() {
            hook();
        }
    }

    pub(crate) fn remove_child_id(&mut self, child: NodeId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != child);
        let removed = self.children.len() != before;
        if removed {
            if let Some(hook) = self.hooks.child_collection_changed.as_mut() {
                hook();
            }
        }
        removed
    }
}

impl std::fmt::Debug for ComponentNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentNode")
            .field("name", &self.name)
            .field("component_type", &self.component_type)
            .field("state", &self.state)
            .field("children", &self.children.len())
            .field("pending_updates", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::behavior::GroupBehavior;
    use crate::component::property::PropertyDescriptor;
    use crate::content::validate::ValidationReport;
    use crate::foundation::math::Vec3;
    use std::any::Any;

    struct Dot;

    impl ComponentBehavior for Dot {
        fn descriptors(&self) -> Vec<PropertyDescriptor> {
            vec![
                PropertyDescriptor::new("position", PropertyValue::Vec3(Vec3::zeros())),
                PropertyDescriptor::new("opacity", PropertyValue::Float(1.0)),
            ]
        }

        fn on_validate(&self, _report: &mut ValidationReport) {}

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn dot_node() -> ComponentNode {
        ComponentNode::new(Template::build("dot").finish(), "dot", Box::new(Dot))
    }

    #[test]
    fn test_construction_state_and_defaults() {
        let node = dot_node();
        assert_eq!(node.state(), LifecycleState::Created);
        assert_eq!(
            node.properties().get("opacity").unwrap().as_float(),
            Some(1.0)
        );
    }

    #[test]
    fn test_set_before_activation_is_immediate() {
        let mut node = dot_node();
        node.set_property(
            "opacity",
            PropertyValue::Float(0.5),
            2.0,
            Easing::Linear,
        )
        .unwrap();
        // No queue entry, no animation: assigned on the spot.
        assert_eq!(node.pending_updates(), 0);
        assert!(!node.properties().is_animating("opacity"));
        assert_eq!(
            node.properties().get("opacity").unwrap().as_float(),
            Some(0.5)
        );
    }

    #[test]
    fn test_zero_duration_on_active_node_defers() {
        let mut node = dot_node();
        node.set_state(LifecycleState::Active);
        node.set_property("opacity", PropertyValue::Float(0.0), 0.0, Easing::Linear)
            .unwrap();

        // Not yet visible; lands at the apply step.
        assert_eq!(
            node.properties().get("opacity").unwrap().as_float(),
            Some(1.0)
        );
        assert_eq!(node.pending_updates(), 1);

        node.apply_updates(&FrameContext::step(0.016));
        assert_eq!(
            node.properties().get("opacity").unwrap().as_float(),
            Some(0.0)
        );
    }

    #[test]
    fn test_queued_updates_last_writer_wins() {
        let mut node = dot_node();
        node.set_state(LifecycleState::Active);
        node.set_property("opacity", PropertyValue::Float(0.3), 0.0, Easing::Linear)
            .unwrap();
        node.set_property("opacity", PropertyValue::Float(0.7), 0.0, Easing::Linear)
            .unwrap();

        node.apply_updates(&FrameContext::step(0.016));
        // FIFO drain: only the second assignment is ever observable.
        assert_eq!(
            node.properties().get("opacity").unwrap().as_float(),
            Some(0.7)
        );
    }

    #[test]
    fn test_negative_duration_rejected_and_state_unchanged() {
        let mut node = dot_node();
        node.set_state(LifecycleState::Active);
        let err = node
            .set_property("opacity", PropertyValue::Float(0.0), -1.0, Easing::Linear)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidArgument(_)));
        assert_eq!(
            node.properties().get("opacity").unwrap().as_float(),
            Some(1.0)
        );
        assert!(!node.properties().is_animating("opacity"));
        assert_eq!(node.pending_updates(), 0);
    }

    #[test]
    fn test_mutation_after_deactivation_is_an_error() {
        let mut node = dot_node();
        node.set_state(LifecycleState::Inactive);
        let err = node
            .set_property("opacity", PropertyValue::Float(0.0), 0.0, Easing::Linear)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidState { .. }));

        let err = node.queue_update(Box::new(|_| {})).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidState { .. }));
    }

    #[test]
    fn test_animation_completed_hook_fires() {
        let completed = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = completed.clone();

        let mut node = dot_node();
        node.set_animation_completed_hook(Box::new(move |name| {
            sink.borrow_mut().push(name.to_string());
        }));
        node.set_state(LifecycleState::Active);
        node.set_property("opacity", PropertyValue::Float(0.0), 0.5, Easing::Linear)
            .unwrap();

        node.apply_updates(&FrameContext::step(0.25));
        assert!(completed.borrow().is_empty());
        node.apply_updates(&FrameContext::step(0.25));
        assert_eq!(completed.borrow().as_slice(), ["opacity"]);
    }

    #[test]
    fn test_child_changed_hook_fires_on_push_and_remove() {
        let count = std::rc::Rc::new(std::cell::Cell::new(0));
        let sink = count.clone();

        let mut node =
            ComponentNode::new(Template::build("g").finish(), "group", Box::new(GroupBehavior));
        node.set_child_changed_hook(Box::new(move || sink.set(sink.get() + 1)));

        let phantom = NodeId::default();
        node.push_child(phantom);
        node.remove_child_id(phantom);
        assert_eq!(count.get(), 2);
    }
}
