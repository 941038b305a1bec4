//! Component behavior contract and optional capabilities
//!
//! A behavior is the logic of a resolved component type. The base trait
//! carries lifecycle hooks; anything beyond that is an optional capability
//! a behavior may expose through a type query. Composition over hierarchy:
//! a component is a node plus whichever capabilities its behavior answers.

use std::any::Any;

use crate::content::validate::ValidationReport;
use crate::foundation::time::FrameContext;
use crate::template::Template;

use super::property::PropertyDescriptor;

/// Draw capability, invoked by the external render phase
///
/// The runtime performs no drawing itself; a render-phase caller walks
/// active nodes exposing this capability strictly after the frame's apply
/// step has completed, so drawn values are stable.
pub trait Renderable {
    /// Record draw output for the current frame
    fn draw(&self, frame: &FrameContext);
}

/// Per-frame logic capability, invoked during the update traversal
pub trait Updatable {
    /// Advance component logic by one frame
    fn tick(&mut self, frame: &FrameContext);
}

/// Logic contract implemented by every resolvable component type
///
/// All lifecycle hooks default to no-ops; a minimal component implements
/// only the two type-query methods.
pub trait ComponentBehavior: Any {
    /// Properties this component exposes, compiled into its node's bag
    fn descriptors(&self) -> Vec<PropertyDescriptor> {
        Vec::new()
    }

    /// Copy template configuration into component state
    fn on_configure(&mut self, _template: &Template) {}

    /// Report non-fatal diagnostics about the configured state
    fn on_validate(&self, _report: &mut ValidationReport) {}

    /// Called when the owning node becomes active
    fn on_activate(&mut self) {}

    /// Called when the owning node deactivates
    fn on_deactivate(&mut self) {}

    /// Called once when the owning node is disposed
    fn on_dispose(&mut self) {}

    /// Expose the draw capability, if this component renders
    fn as_renderable(&self) -> Option<&dyn Renderable> {
        None
    }

    /// Expose the per-frame logic capability, if this component updates
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        None
    }

    /// Type-query access to the concrete component
    fn as_any(&self) -> &dyn Any;

    /// Mutable type-query access to the concrete component
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Container component with no properties or logic of its own
///
/// The default component type when a template names no other; useful for
/// grouping children under one lifecycle.
#[derive(Debug, Default)]
pub struct GroupBehavior;

impl ComponentBehavior for GroupBehavior {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
