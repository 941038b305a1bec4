//! Component model: nodes, lifecycle, properties, deferred updates
//!
//! A component is a node in the tree: lifecycle state, ordered children,
//! a bag of animated properties, and a deferred update queue, plus the
//! behavior object of its resolved component type. The tree owns the
//! nodes; everything else references them by arena key.

pub mod behavior;
pub mod lifecycle;
pub mod node;
pub mod property;
pub mod queue;
pub mod tree;

pub use behavior::{ComponentBehavior, GroupBehavior, Renderable, Updatable};
pub use lifecycle::{LifecycleError, LifecycleState};
pub use node::{ComponentNode, NodeHooks};
pub use property::{PropertyBag, PropertyDescriptor, PropertyKind, PropertyValue};
pub use queue::{PendingUpdate, UpdateQueue};
pub use tree::ComponentTree;
