//! Content manager: lifecycle sequencing and deferred content swaps
//!
//! The sole authority for bringing subtrees up (configure, validate,
//! activate) and tearing them down (deactivate, dispose). It also owns the
//! deferred swap protocol for hosts that replace their subtree at runtime:
//! staged content is built and configured while the old content keeps
//! rendering, and the exchange happens at a frame boundary so no observer
//! ever sees half a swap.

pub mod validate;

use log::{debug, info, warn};
use std::collections::HashMap;
use thiserror::Error;

use crate::component::lifecycle::{LifecycleError, LifecycleState};
use crate::component::tree::ComponentTree;
use crate::core::config::{ContentConfig, RuntimeConfig};
use crate::events::{Event, EventArg, EventType};
use crate::foundation::collections::NodeId;
use crate::foundation::time::FrameContext;
use crate::template::factory::{ComponentFactory, FactoryError};
use crate::template::Template;

use validate::ValidationReport;

/// Errors produced while sequencing content
#[derive(Debug, Error)]
pub enum ContentError {
    /// A lifecycle transition was rejected
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Subtree construction failed
    #[error(transparent)]
    Factory(#[from] FactoryError),

    /// Validation found errors and policy aborts activation on errors
    #[error("validation of `{node}` found {errors} error(s); activation aborted")]
    ValidationFailed {
        /// Root of the subtree that failed validation
        node: String,
        /// Number of error-severity findings
        errors: usize,
        /// The full report, for the caller's diagnostics surface
        report: ValidationReport,
    },

    /// The node was never registered as a content host
    #[error("node is not a registered content host")]
    UnknownHost,

    /// A swap was requested with nothing staged
    #[error("no content staged on host")]
    NothingStaged,
}

/// Swap protocol state of one content host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapState {
    /// No swap in progress
    #[default]
    Idle,
    /// New content staged; old content still live and rendering
    PendingSwap,
    /// Swap executed during the current update tick
    Applied,
}

#[derive(Default)]
struct HostEntry {
    state: SwapState,
    current: Option<NodeId>,
    pending: Option<NodeId>,
}

/// Sequences lifecycle cascades and content swaps
pub struct ContentManager {
    factory: ComponentFactory,
    config: ContentConfig,
    hosts: HashMap<NodeId, HostEntry>,
}

impl ContentManager {
    /// Create a manager over a factory, with policy from runtime config
    pub fn new(factory: ComponentFactory, config: &RuntimeConfig) -> Self {
        Self {
            factory,
            config: config.content.clone(),
            hosts: HashMap::new(),
        }
    }

    /// The factory used to build content subtrees
    pub fn factory(&self) -> &ComponentFactory {
        &self.factory
    }

    /// Construct a bare subtree without configuring or activating it
    pub fn build(
        &self,
        tree: &mut ComponentTree,
        template: &Template,
    ) -> Result<NodeId, ContentError> {
        Ok(self.factory.create(tree, template)?)
    }

    /// Configure, validate, and activate a built subtree
    ///
    /// Validation diagnostics are returned to the caller either way.
    /// Whether error-severity findings abort the activation is configured
    /// policy, not a hardcoded rule. A mid-cascade activation failure
    /// propagates with already-activated ancestors left active; the caller
    /// decides whether to roll those back.
    pub fn bring_up(
        &self,
        tree: &mut ComponentTree,
        id: NodeId,
    ) -> Result<ValidationReport, ContentError> {
        tree.configure(id)?;
        let report = tree.validate(id);
        if report.has_errors() && self.config.abort_activation_on_error {
            let node = tree
                .get(id)
                .map(|n| n.name().to_string())
                .unwrap_or_default();
            warn!(
                "validation of `{node}` found {} error(s); not activating",
                report.error_count()
            );
            return Err(ContentError::ValidationFailed {
                node,
                errors: report.error_count(),
                report,
            });
        }
        tree.activate(id)?;
        Ok(report)
    }

    /// Build a template, attach it, and bring it up in one step
    ///
    /// Attaches under `parent` when given, otherwise as a tree root.
    pub fn spawn(
        &self,
        tree: &mut ComponentTree,
        template: &Template,
        parent: Option<NodeId>,
    ) -> Result<NodeId, ContentError> {
        let id = self.build(tree, template)?;
        match parent {
            Some(parent) => tree.add_child(parent, id)?,
            None => tree.add_root(id)?,
        }
        self.bring_up(tree, id)?;
        Ok(id)
    }

    /// Deactivate and dispose a subtree
    pub fn tear_down(
        &self,
        tree: &mut ComponentTree,
        id: NodeId,
    ) -> Result<(), ContentError> {
        if tree.get(id).map(|n| n.state()) == Some(LifecycleState::Active) {
            tree.deactivate(id)?;
        }
        tree.dispose(id)?;
        Ok(())
    }

    /// Enroll a node in the deferred content-swap protocol
    pub fn register_host(
        &mut self,
        tree: &ComponentTree,
        host: NodeId,
    ) -> Result<(), ContentError> {
        if !tree.contains(host) {
            return Err(ContentError::Lifecycle(LifecycleError::InvalidArgument(
                "unknown node id".into(),
            )));
        }
        self.hosts.entry(host).or_default();
        Ok(())
    }

    /// Swap protocol state of a host
    pub fn host_state(&self, host: NodeId) -> Option<SwapState> {
        self.hosts.get(&host).map(|e| e.state)
    }

    /// The subtree a host currently shows, if any
    pub fn current_content(&self, host: NodeId) -> Option<NodeId> {
        self.hosts.get(&host).and_then(|e| e.current)
    }

    /// Stage new content on a host
    ///
    /// The new subtree is built and configured now but stays inactive; the
    /// old content remains live and is what the render phase observes until
    /// the swap applies at the next update tick. Staging again before the
    /// swap applies replaces the previously staged subtree.
    pub fn stage_content(
        &mut self,
        tree: &mut ComponentTree,
        host: NodeId,
        template: &Template,
    ) -> Result<(), ContentError> {
        if !self.hosts.contains_key(&host) {
            return Err(ContentError::UnknownHost);
        }
        {
            let node = tree
                .get(host)
                .ok_or(ContentError::UnknownHost)?;
            if node.state().is_disposed() {
                return Err(ContentError::Lifecycle(LifecycleError::InvalidState {
                    operation: "stage_content",
                    node: node.name().to_string(),
                    state: node.state(),
                }));
            }
        }

        let staged = self.factory.create(tree, template)?;
        tree.configure(staged)?;

        let entry = self.hosts.get_mut(&host).ok_or(ContentError::UnknownHost)?;
        if let Some(abandoned) = entry.pending.replace(staged) {
            debug!("replacing previously staged content");
            tree.dispose(abandoned)?;
            tree.prune(abandoned)?;
        }
        entry.state = SwapState::PendingSwap;
        info!("content staged; swap applies at next update tick");
        Ok(())
    }

    /// Apply a staged swap immediately instead of waiting for the tick
    ///
    /// The explicit synchronous bypass for callers that need a populated,
    /// active subtree without waiting a frame.
    pub fn activate_now(
        &mut self,
        tree: &mut ComponentTree,
        host: NodeId,
    ) -> Result<(), ContentError> {
        self.apply_swap(tree, host)?;
        if let Some(entry) = self.hosts.get_mut(&host) {
            entry.state = SwapState::Idle;
        }
        Ok(())
    }

    /// Run one frame: apply pending swaps, then the tree's update traversal
    ///
    /// Swaps apply at the top of the tick, so freshly swapped-in content
    /// advances and renders in the same frame that retired its predecessor.
    pub fn update(&mut self, tree: &mut ComponentTree, frame: &FrameContext) {
        let due: Vec<NodeId> = self
            .hosts
            .iter()
            .filter(|(_, e)| e.state == SwapState::PendingSwap)
            .map(|(id, _)| *id)
            .collect();
        for host in due {
            if let Err(e) = self.apply_swap(tree, host) {
                log::error!("content swap failed: {e}");
            }
        }

        tree.update(frame);

        for entry in self.hosts.values_mut() {
            if entry.state == SwapState::Applied {
                entry.state = SwapState::Idle;
            }
        }
    }

    fn apply_swap(
        &mut self,
        tree: &mut ComponentTree,
        host: NodeId,
    ) -> Result<(), ContentError> {
        {
            let node = tree.get(host).ok_or(ContentError::UnknownHost)?;
            if node.state().is_disposed() {
                return Err(ContentError::Lifecycle(LifecycleError::InvalidState {
                    operation: "apply_swap",
                    node: node.name().to_string(),
                    state: node.state(),
                }));
            }
        }
        let entry = self.hosts.get_mut(&host).ok_or(ContentError::UnknownHost)?;
        let incoming = entry.pending.take().ok_or(ContentError::NothingStaged)?;
        let outgoing = entry.current.take();

        if let Some(outgoing) = outgoing {
            if tree.get(outgoing).map(|n| n.state()) == Some(LifecycleState::Active) {
                tree.deactivate(outgoing)?;
            }
            tree.dispose(outgoing)?;
            tree.remove_child(host, outgoing)?;
        }

        tree.add_child(host, incoming)?;
        let host_active = tree
            .get(host)
            .map(|n| n.state().is_active())
            .unwrap_or(false);
        if host_active {
            tree.activate(incoming)?;
        }

        let entry = self.hosts.get_mut(&host).ok_or(ContentError::UnknownHost)?;
        entry.current = Some(incoming);
        entry.state = SwapState::Applied;

        let frame = tree.current_frame();
        tree.events_mut().send(
            Event::new(EventType::ContentSwapped, frame)
                .with_arg("host", EventArg::Host(host))
                .with_arg("node", EventArg::Node(incoming)),
        );
        info!("content swap applied");
        Ok(())
    }
}
