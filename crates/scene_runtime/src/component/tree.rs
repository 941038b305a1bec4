//! Component tree: arena storage, lifecycle cascades, frame traversal
//!
//! All nodes live in one slot-map arena. The tree owns every edge: a
//! node's ordered child list is mutated only through the tree, from the
//! single update thread. Lifecycle cascades follow fixed traversal orders:
//! activation is parent-first in child order, teardown is children-first,
//! so no node ever runs against a torn-down parent.

use log::debug;

use crate::animation::{CellEvents, Easing};
use crate::content::validate::ValidationReport;
use crate::core::config::RuntimeConfig;
use crate::events::{Event, EventArg, EventSystem, EventType};
use crate::foundation::collections::{NodeArena, NodeId};
use crate::foundation::time::FrameContext;

use super::behavior::Renderable;
use super::lifecycle::{LifecycleError, LifecycleState};
use super::node::ComponentNode;
use super::property::PropertyValue;
use super::queue::PendingUpdate;

/// Arena-backed tree of component nodes
pub struct ComponentTree {
    nodes: NodeArena<ComponentNode>,
    roots: Vec<NodeId>,
    events: EventSystem,
    default_easing: Easing,
    last_frame: u64,
}

impl ComponentTree {
    /// Create an empty tree with default configuration
    pub fn new() -> Self {
        Self::with_config(&RuntimeConfig::default())
    }

    /// Create an empty tree configured from runtime settings
    pub fn with_config(config: &RuntimeConfig) -> Self {
        Self {
            nodes: NodeArena::with_key(),
            roots: Vec::new(),
            events: EventSystem::new(),
            default_easing: config.animation.default_easing,
            last_frame: 0,
        }
    }

    /// Number of nodes in the arena, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live arena entry
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&ComponentNode> {
        self.nodes.get(id)
    }

    /// Look up a node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ComponentNode> {
        self.nodes.get_mut(id)
    }

    /// Top-level nodes in traversal order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// The event system delivering runtime notifications
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// Frame number of the most recent update traversal
    pub fn current_frame(&self) -> u64 {
        self.last_frame
    }

    /// Insert a constructed node into the arena, unattached
    pub(crate) fn insert(&mut self, node: ComponentNode) -> NodeId {
        self.nodes.insert_with_key(|id| {
            let mut node = node;
            node.assign_id(id);
            node
        })
    }

    /// Promote an unattached node to a root of the tree
    pub fn add_root(&mut self, id: NodeId) -> Result<(), LifecycleError> {
        let node = self.expect_node(id)?;
        node.state()
            .require(
                &[
                    LifecycleState::Created,
                    LifecycleState::Configured,
                    LifecycleState::Active,
                    LifecycleState::Inactive,
                ],
                "add_root",
                node.name(),
            )?;
        if node.parent().is_some() {
            return Err(LifecycleError::InvalidArgument(format!(
                "node `{}` is attached to a parent",
                node.name()
            )));
        }
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
        Ok(())
    }

    /// Remove a node from the root list, leaving it in the arena
    pub fn remove_root(&mut self, id: NodeId) {
        self.roots.retain(|r| *r != id);
    }

    /// Append `child` to `parent`'s child list
    ///
    /// Child order is stable and defines update and activation order. The
    /// operation fails without modifying the tree when either node is
    /// disposed, when the child is already attached, or when attaching an
    /// active child under a non-active parent would break the activation
    /// invariant.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LifecycleError> {
        let parent_state = {
            let node = self.expect_node(parent)?;
            node.state()
                .require(
                    &[
                        LifecycleState::Created,
                        LifecycleState::Configured,
                        LifecycleState::Active,
                        LifecycleState::Inactive,
                    ],
                    "add_child",
                    node.name(),
                )?;
            node.state()
        };
        {
            let node = self.expect_node(child)?;
            node.state().require(
                &[
                    LifecycleState::Created,
                    LifecycleState::Configured,
                    LifecycleState::Active,
                    LifecycleState::Inactive,
                ],
                "add_child",
                node.name(),
            )?;
            if node.parent().is_some() {
                return Err(LifecycleError::InvalidArgument(format!(
                    "node `{}` already has a parent",
                    node.name()
                )));
            }
            if node.state().is_active() && !parent_state.is_active() {
                return Err(LifecycleError::InvalidState {
                    operation: "add_child",
                    node: node.name().to_string(),
                    state: node.state(),
                });
            }
        }

        // Reject attachments that would close a cycle, including self-attach.
        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(LifecycleError::InvalidArgument(
                    "attachment would make a node its own ancestor".into(),
                ));
            }
            cursor = self.nodes.get(current).and_then(ComponentNode::parent);
        }

        self.roots.retain(|r| *r != child);
        self.nodes[parent].push_child(child);
        self.nodes[child].set_parent(Some(parent));
        self.events.send(
            Event::new(EventType::ChildCollectionChanged, self.last_frame)
                .with_arg("node", EventArg::Node(parent))
                .with_arg("child", EventArg::Child(child)),
        );
        Ok(())
    }

    /// Detach `child` from `parent`, leaving it in the arena
    ///
    /// The detached subtree keeps its lifecycle state; hand it to the
    /// content manager to tear it down, or re-attach it elsewhere.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LifecycleError> {
        {
            let node = self.expect_node(parent)?;
            node.state().require(
                &[
                    LifecycleState::Created,
                    LifecycleState::Configured,
                    LifecycleState::Active,
                    LifecycleState::Inactive,
                ],
                "remove_child",
                node.name(),
            )?;
        }
        if !self.nodes[parent].remove_child_id(child) {
            return Err(LifecycleError::InvalidArgument(format!(
                "node is not a child of `{}`",
                self.nodes[parent].name()
            )));
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.set_parent(None);
        }
        self.events.send(
            Event::new(EventType::ChildCollectionChanged, self.last_frame)
                .with_arg("node", EventArg::Node(parent))
                .with_arg("child", EventArg::Child(child)),
        );
        Ok(())
    }

    /// Copy template configuration into every node of the subtree
    ///
    /// Idempotent and repeatable before activation. Legal on an active
    /// subtree, where field values land through each node's deferred queue,
    /// but activation-time setup is not re-run.
    pub fn configure(&mut self, id: NodeId) -> Result<(), LifecycleError> {
        {
            let node = self.expect_node(id)?;
            if !node.state().can_configure() {
                return Err(LifecycleError::InvalidState {
                    operation: "configure",
                    node: node.name().to_string(),
                    state: node.state(),
                });
            }
        }
        self.nodes[id].run_configure();
        for child in self.children_of(id) {
            self.configure(child)?;
        }
        Ok(())
    }

    /// Collect diagnostics for the subtree without touching lifecycle state
    pub fn validate(&self, id: NodeId) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_into(id, &mut report);
        report
    }

    fn validate_into(&self, id: NodeId, report: &mut ValidationReport) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        node.run_validate(report);
        for child in node.children() {
            self.validate_into(*child, report);
        }
    }

    /// Activate the subtree, parent first, children in list order
    ///
    /// Fails from `Created` (configure first) and from `Disposed`. A
    /// mid-cascade failure is reported to the caller with already-activated
    /// ancestors left active; the caller decides whether to roll back.
    pub fn activate(&mut self, id: NodeId) -> Result<(), LifecycleError> {
        {
            let node = self.expect_node(id)?;
            if let Some(parent) = node.parent() {
                let parent_state = self.nodes[parent].state();
                if !parent_state.is_active() {
                    return Err(LifecycleError::InvalidState {
                        operation: "activate",
                        node: node.name().to_string(),
                        state: node.state(),
                    });
                }
            }
            debug!("activating subtree at `{}`", node.name());
        }
        self.activate_recursive(id)
    }

    fn activate_recursive(&mut self, id: NodeId) -> Result<(), LifecycleError> {
        {
            let node = self
                .nodes
                .get_mut(id)
                .ok_or_else(|| LifecycleError::InvalidArgument("unknown node id".into()))?;
            node.state().require(
                &[LifecycleState::Configured, LifecycleState::Inactive],
                "activate",
                node.name(),
            )?;
            node.set_state(LifecycleState::Active);
            node.behavior_mut().on_activate();
        }
        for child in self.children_of(id) {
            if self.nodes.get(child).map(ComponentNode::state) == Some(LifecycleState::Active) {
                continue;
            }
            self.activate_recursive(child)?;
        }
        Ok(())
    }

    /// Deactivate the subtree, children first, then the parent
    ///
    /// In-flight animations are abandoned without completion notifications
    /// and pending updates are discarded; displayed values freeze where
    /// they were.
    pub fn deactivate(&mut self, id: NodeId) -> Result<(), LifecycleError> {
        {
            let node = self.expect_node(id)?;
            node.state()
                .require(&[LifecycleState::Active], "deactivate", node.name())?;
            debug!("deactivating subtree at `{}`", node.name());
        }
        self.deactivate_recursive(id);
        Ok(())
    }

    fn deactivate_recursive(&mut self, id: NodeId) {
        for child in self.children_of(id) {
            if self.nodes.get(child).map(ComponentNode::state) == Some(LifecycleState::Active) {
                self.deactivate_recursive(child);
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.cancel_animations();
            node.clear_pending();
            node.behavior_mut().on_deactivate();
            node.set_state(LifecycleState::Inactive);
        }
    }

    /// Dispose the subtree, children before parent; terminal and idempotent
    ///
    /// Implies deactivation when the subtree is still active. Disposed
    /// nodes stay in the arena with a queryable terminal state until
    /// [`ComponentTree::prune`] removes them.
    pub fn dispose(&mut self, id: NodeId) -> Result<(), LifecycleError> {
        let node = self.expect_node(id)?;
        if node.state().is_disposed() {
            return Ok(());
        }
        debug!("disposing subtree at `{}`", node.name());
        self.dispose_recursive(id);
        Ok(())
    }

    fn dispose_recursive(&mut self, id: NodeId) {
        for child in self.children_of(id) {
            if self.nodes.get(child).map(ComponentNode::state) != Some(LifecycleState::Disposed) {
                self.dispose_recursive(child);
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            if node.state().is_active() {
                node.cancel_animations();
                node.behavior_mut().on_deactivate();
                node.set_state(LifecycleState::Inactive);
            }
            node.clear_pending();
            node.behavior_mut().on_dispose();
            node.set_state(LifecycleState::Disposed);
        }
    }

    /// Remove a disposed subtree from the arena entirely
    ///
    /// Detaches the subtree from its parent or the root list and frees
    /// every node in it. Only disposed subtrees can be pruned.
    pub fn prune(&mut self, id: NodeId) -> Result<(), LifecycleError> {
        let (state, name, parent) = {
            let node = self.expect_node(id)?;
            (node.state(), node.name().to_string(), node.parent())
        };
        if !state.is_disposed() {
            return Err(LifecycleError::InvalidState {
                operation: "prune",
                node: name,
                state,
            });
        }
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.remove_child_id(id);
            }
        }
        self.roots.retain(|r| *r != id);
        self.prune_recursive(id);
        Ok(())
    }

    /// Drop a node from the arena with no lifecycle ceremony
    ///
    /// Only for discarding partially built nodes after a failed
    /// construction; attached or activated nodes go through dispose/prune.
    pub(crate) fn remove_raw(&mut self, id: NodeId) {
        self.roots.retain(|r| *r != id);
        self.nodes.remove(id);
    }

    fn prune_recursive(&mut self, id: NodeId) {
        for child in self.children_of(id) {
            self.prune_recursive(child);
        }
        self.nodes.remove(id);
    }

    /// Run one frame of the update traversal
    ///
    /// Visits active nodes pre-order in child-list order. Each node drains
    /// its deferred queue, then advances its animated cells, then runs its
    /// per-frame logic capability. Events produced during the traversal
    /// are dispatched synchronously before this method returns.
    pub fn update(&mut self, frame: &FrameContext) {
        self.last_frame = frame.frame_number;
        for root in self.roots.clone() {
            self.update_node(root, frame);
        }
        self.events.dispatch();
    }

    fn update_node(&mut self, id: NodeId, frame: &FrameContext) {
        let (produced, children) = {
            let Some(node) = self.nodes.get_mut(id) else {
                return;
            };
            if !node.state().is_active() {
                return;
            }
            let produced = node.apply_updates(frame);
            if let Some(updatable) = node.behavior_mut().as_updatable() {
                updatable.tick(frame);
            }
            (produced, node.children().to_vec())
        };

        for (property, cell_events) in produced {
            if cell_events.contains(CellEvents::STARTED) {
                self.events.send(
                    Event::new(EventType::AnimationStarted, frame.frame_number)
                        .with_arg("node", EventArg::Node(id))
                        .with_arg("property", EventArg::Property(property.clone())),
                );
            }
            if cell_events.contains(CellEvents::COMPLETED) {
                self.events.send(
                    Event::new(EventType::AnimationCompleted, frame.frame_number)
                        .with_arg("node", EventArg::Node(id))
                        .with_arg("property", EventArg::Property(property)),
                );
            }
        }

        for child in children {
            self.update_node(child, frame);
        }
    }

    /// Read a property's current value
    pub fn property(&self, id: NodeId, name: &str) -> Option<&PropertyValue> {
        self.nodes.get(id).and_then(|n| n.properties().get(name))
    }

    /// Set a property with explicit duration and easing
    pub fn set_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: PropertyValue,
        duration: f32,
        easing: Easing,
    ) -> Result<(), LifecycleError> {
        self.expect_node_mut(id)?.set_property(name, value, duration, easing)
    }

    /// Assign a property without animating
    ///
    /// On an active node the assignment lands atomically at the next apply
    /// step.
    pub fn assign(
        &mut self,
        id: NodeId,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), LifecycleError> {
        let easing = self.default_easing;
        self.expect_node_mut(id)?.set_property(name, value, 0.0, easing)
    }

    /// Animate a property with the configured default easing
    pub fn animate_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: PropertyValue,
        duration: f32,
    ) -> Result<(), LifecycleError> {
        let easing = self.default_easing;
        self.expect_node_mut(id)?.set_property(name, value, duration, easing)
    }

    /// Queue a deferred action against a node
    pub fn queue_update(
        &mut self,
        id: NodeId,
        action: PendingUpdate,
    ) -> Result<(), LifecycleError> {
        self.expect_node_mut(id)?.queue_update(action)
    }

    /// Walk active nodes exposing the draw capability, in traversal order
    ///
    /// Intended for the external render phase, strictly after the frame's
    /// update has completed.
    pub fn for_each_renderable(&self, mut visit: impl FnMut(NodeId, &dyn Renderable)) {
        for root in &self.roots {
            self.visit_renderable(*root, &mut visit);
        }
    }

    fn visit_renderable(&self, id: NodeId, visit: &mut impl FnMut(NodeId, &dyn Renderable)) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.state().is_active() {
            return;
        }
        if let Some(renderable) = node.behavior().as_renderable() {
            visit(id, renderable);
        }
        for child in node.children() {
            self.visit_renderable(*child, visit);
        }
    }

    /// Find the first attached node with the given name, in traversal order
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        for root in &self.roots {
            if let Some(found) = self.find_in_subtree(*root, name) {
                return Some(found);
            }
        }
        None
    }

    fn find_in_subtree(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if node.name() == name {
            return Some(id);
        }
        for child in node.children() {
            if let Some(found) = self.find_in_subtree(*child, name) {
                return Some(found);
            }
        }
        None
    }

    fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id)
            .map(|n| n.children().to_vec())
            .unwrap_or_default()
    }

    fn expect_node(&self, id: NodeId) -> Result<&ComponentNode, LifecycleError> {
        self.nodes
            .get(id)
            .ok_or_else(|| LifecycleError::InvalidArgument("unknown node id".into()))
    }

    fn expect_node_mut(&mut self, id: NodeId) -> Result<&mut ComponentNode, LifecycleError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| LifecycleError::InvalidArgument("unknown node id".into()))
    }
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::behavior::{ComponentBehavior, GroupBehavior};
    use crate::component::property::{PropertyDescriptor, PropertyValue};
    use crate::foundation::math::Vec3;
    use crate::template::Template;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        label: &'static str,
        journal: Rc<RefCell<Vec<String>>>,
    }

    impl ComponentBehavior for Probe {
        fn descriptors(&self) -> Vec<PropertyDescriptor> {
            vec![PropertyDescriptor::new(
                "position",
                PropertyValue::Vec3(Vec3::zeros()),
            )]
        }

        fn on_activate(&mut self) {
            self.journal.borrow_mut().push(format!("{}:activate", self.label));
        }

        fn on_deactivate(&mut self) {
            self.journal
                .borrow_mut()
                .push(format!("{}:deactivate", self.label));
        }

        fn on_dispose(&mut self) {
            self.journal.borrow_mut().push(format!("{}:dispose", self.label));
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn probe_node(
        tree: &mut ComponentTree,
        label: &'static str,
        journal: &Rc<RefCell<Vec<String>>>,
    ) -> NodeId {
        tree.insert(ComponentNode::new(
            Template::build(label).finish(),
            "probe",
            Box::new(Probe {
                label,
                journal: journal.clone(),
            }),
        ))
    }

    fn group_node(tree: &mut ComponentTree, name: &str) -> NodeId {
        tree.insert(ComponentNode::new(
            Template::build(name).finish(),
            "group",
            Box::new(GroupBehavior),
        ))
    }

    /// Build root -> (a, b), configured and attached
    fn small_tree() -> (ComponentTree, NodeId, NodeId, NodeId, Rc<RefCell<Vec<String>>>) {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let mut tree = ComponentTree::new();
        let root = probe_node(&mut tree, "root", &journal);
        let a = probe_node(&mut tree, "a", &journal);
        let b = probe_node(&mut tree, "b", &journal);
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.add_root(root).unwrap();
        tree.configure(root).unwrap();
        (tree, root, a, b, journal)
    }

    #[test]
    fn test_activation_is_parent_first_in_child_order() {
        let (mut tree, root, _, _, journal) = small_tree();
        tree.activate(root).unwrap();
        assert_eq!(
            journal.borrow().as_slice(),
            ["root:activate", "a:activate", "b:activate"]
        );
    }

    #[test]
    fn test_deactivation_is_children_first() {
        let (mut tree, root, _, _, journal) = small_tree();
        tree.activate(root).unwrap();
        journal.borrow_mut().clear();

        tree.deactivate(root).unwrap();
        assert_eq!(
            journal.borrow().as_slice(),
            ["a:deactivate", "b:deactivate", "root:deactivate"]
        );
    }

    #[test]
    fn test_dispose_is_children_before_parent_and_idempotent() {
        let (mut tree, root, a, _, journal) = small_tree();
        tree.activate(root).unwrap();
        journal.borrow_mut().clear();

        tree.dispose(root).unwrap();
        let first_pass = journal.borrow().clone();
        assert_eq!(
            first_pass,
            [
                "a:deactivate",
                "a:dispose",
                "b:deactivate",
                "b:dispose",
                "root:deactivate",
                "root:dispose"
            ]
        );
        assert_eq!(tree.get(a).unwrap().state(), LifecycleState::Disposed);

        // Second dispose: no additional side effects, no error.
        tree.dispose(root).unwrap();
        assert_eq!(journal.borrow().as_slice(), first_pass.as_slice());
    }

    #[test]
    fn test_activate_from_created_is_rejected() {
        let mut tree = ComponentTree::new();
        let lone = group_node(&mut tree, "lone");
        tree.add_root(lone).unwrap();
        let err = tree.activate(lone).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidState { .. }));
    }

    #[test]
    fn test_add_child_on_disposed_parent_leaves_tree_unchanged() {
        let (mut tree, root, _, _, _) = small_tree();
        tree.dispose(root).unwrap();

        let orphan = group_node(&mut tree, "orphan");
        let err = tree.add_child(root, orphan).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidState { .. }));

        // Tree unchanged: child count as before, orphan unattached.
        assert_eq!(tree.get(root).unwrap().children().len(), 2);
        assert!(tree.get(orphan).unwrap().parent().is_none());
    }

    #[test]
    fn test_attachment_cannot_create_cycles() {
        let (mut tree, root, a, _, _) = small_tree();
        let err = tree.add_child(a, root).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidArgument(_)));
        let err = tree.add_child(root, root).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidArgument(_)));
        assert_eq!(tree.get(root).unwrap().children().len(), 2);
    }

    #[test]
    fn test_child_cannot_activate_under_inactive_parent() {
        let (mut tree, _, a, _, _) = small_tree();
        // Parent `root` is configured but not active.
        let err = tree.activate(a).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidState { .. }));
    }

    #[test]
    fn test_mid_cascade_failure_reports_and_keeps_prior_activations() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let mut tree = ComponentTree::new();
        let root = probe_node(&mut tree, "root", &journal);
        let good = probe_node(&mut tree, "good", &journal);
        tree.add_child(root, good).unwrap();
        tree.add_root(root).unwrap();
        tree.configure(root).unwrap();

        // An unconfigured child makes the cascade fail partway through.
        let raw = group_node(&mut tree, "raw");
        tree.add_child(root, raw).unwrap();

        let err = tree.activate(root).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidState { .. }));
        assert_eq!(tree.get(root).unwrap().state(), LifecycleState::Active);
        assert_eq!(tree.get(good).unwrap().state(), LifecycleState::Active);
        assert_eq!(tree.get(raw).unwrap().state(), LifecycleState::Created);
    }

    #[test]
    fn test_update_advances_only_active_subtrees() {
        let (mut tree, root, a, _, _) = small_tree();
        tree.activate(root).unwrap();
        tree.animate_property(a, "position", PropertyValue::Vec3(Vec3::new(10.0, 0.0, 0.0)), 2.0)
            .unwrap();

        tree.update(&FrameContext::step(1.0));
        let mid = tree.property(a, "position").unwrap().as_vec3().unwrap();
        assert_eq!(mid.x, 5.0);

        tree.deactivate(root).unwrap();
        tree.update(&FrameContext::step(1.0));
        // Frozen: deactivation abandoned the animation.
        let frozen = tree.property(a, "position").unwrap().as_vec3().unwrap();
        assert_eq!(frozen.x, 5.0);
    }

    #[test]
    fn test_deactivate_mid_animation_never_completes() {
        let (mut tree, root, a, _, _) = small_tree();
        tree.activate(root).unwrap();

        let completions = Rc::new(RefCell::new(0));
        let sink = completions.clone();
        tree.get_mut(a)
            .unwrap()
            .set_animation_completed_hook(Box::new(move |_| *sink.borrow_mut() += 1));

        tree.animate_property(a, "position", PropertyValue::Vec3(Vec3::new(10.0, 0.0, 0.0)), 2.0)
            .unwrap();
        tree.update(&FrameContext::step(0.5));
        tree.deactivate(root).unwrap();

        // Reactivate and run well past the original duration.
        tree.activate(root).unwrap();
        tree.update(&FrameContext::step(10.0));

        assert_eq!(*completions.borrow(), 0);
        let frozen = tree.property(a, "position").unwrap().as_vec3().unwrap();
        assert_eq!(frozen.x, 2.5);
    }

    #[test]
    fn test_prune_requires_disposed_and_empties_arena() {
        let (mut tree, root, a, _, _) = small_tree();
        let err = tree.prune(root).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidState { .. }));

        tree.dispose(root).unwrap();
        tree.prune(root).unwrap();
        assert!(tree.is_empty());
        assert!(!tree.contains(a));
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn test_find_by_name_walks_in_traversal_order() {
        let (tree, _, a, _, _) = small_tree();
        assert_eq!(tree.find_by_name("a"), Some(a));
        assert_eq!(tree.find_by_name("missing"), None);
    }

    #[test]
    fn test_events_emitted_for_animation_lifecycle() {
        use crate::events::EventHandler;

        struct Collect {
            seen: Rc<RefCell<Vec<EventType>>>,
        }
        impl EventHandler for Collect {
            fn on_event(&mut self, event: &Event) -> bool {
                self.seen.borrow_mut().push(event.event_type);
                false
            }
        }

        let (mut tree, root, a, _, _) = small_tree();
        tree.activate(root).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        tree.events_mut().register_handler(
            EventType::AnimationStarted,
            Box::new(Collect { seen: seen.clone() }),
        );
        tree.events_mut().register_handler(
            EventType::AnimationCompleted,
            Box::new(Collect { seen: seen.clone() }),
        );

        tree.animate_property(a, "position", PropertyValue::Vec3(Vec3::new(1.0, 0.0, 0.0)), 1.0)
            .unwrap();
        tree.update(&FrameContext::step(0.5));
        tree.update(&FrameContext::step(0.6));

        assert_eq!(
            seen.borrow().as_slice(),
            [EventType::AnimationStarted, EventType::AnimationCompleted]
        );
    }
}
