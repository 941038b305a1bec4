//! # Scene Runtime
//!
//! Component lifecycle and animated property runtime for a modular game
//! engine.
//!
//! ## Features
//!
//! - **Declarative Templates**: Immutable, structurally-equal recipes for
//!   node subtrees, safe to use as cache keys
//! - **Lifecycle Cascades**: Configure, validate, activate parent-first;
//!   deactivate and dispose children-first
//! - **Deferred Updates**: Mid-frame mutations land atomically at each
//!   node's apply step, so readers never observe a torn state
//! - **Animated Properties**: Scalar, vector, and rotation cells with
//!   easing curves; rotations blend spherically
//! - **Content Swaps**: Hosts replace their subtree at a frame boundary,
//!   with an explicit synchronous bypass
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_runtime::prelude::*;
//! use std::any::Any;
//!
//! struct Marker;
//!
//! impl ComponentBehavior for Marker {
//!     fn descriptors(&self) -> Vec<PropertyDescriptor> {
//!         vec![PropertyDescriptor::new(
//!             "position",
//!             PropertyValue::Vec3(Vec3::zeros()),
//!         )]
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!
//!     fn as_any_mut(&mut self) -> &mut dyn Any {
//!         self
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = ComponentRegistry::with_defaults();
//!     registry.register("marker", |_| Box::new(Marker));
//!     let factory = ComponentFactory::new(registry, ServiceLocator::new());
//!     let content = ContentManager::new(factory, &RuntimeConfig::default());
//!
//!     let mut tree = ComponentTree::new();
//!     let template = Template::build("pin").component_type("marker").finish();
//!     let pin = content.spawn(&mut tree, &template, None)?;
//!
//!     // Glide to (10, 0, 0) over two seconds; values move only at the
//!     // frame's apply step.
//!     tree.set_property(
//!         pin,
//!         "position",
//!         PropertyValue::Vec3(Vec3::new(10.0, 0.0, 0.0)),
//!         2.0,
//!         Easing::EaseInOut,
//!     )?;
//!     tree.update(&FrameContext::step(1.0));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod animation;
pub mod component;
pub mod content;
pub mod core;
pub mod events;
pub mod foundation;
pub mod template;

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        animation::{AnimatedCell, CellEvents, Easing, Interpolate},
        component::{
            ComponentBehavior, ComponentNode, ComponentTree, GroupBehavior, LifecycleError,
            LifecycleState, PropertyBag, PropertyDescriptor, PropertyKind, PropertyValue,
            Renderable, Updatable,
        },
        content::{
            validate::{Diagnostic, Severity, ValidationReport},
            ContentError, ContentManager, SwapState,
        },
        core::config::{Config, ConfigError, RuntimeConfig},
        events::{Event, EventArg, EventHandler, EventSystem, EventType},
        foundation::{
            collections::NodeId,
            math::{Quat, Transform, Vec2, Vec3, Vec4},
            time::{FrameContext, Timer},
        },
        template::{
            factory::{ComponentFactory, ComponentRegistry, FactoryError},
            services::ServiceLocator,
            Template, TemplateBuilder,
        },
    };
}
