//! Runtime event system
//!
//! Key principles:
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify interested handlers)
//! - Synchronous delivery from the update thread at frame boundaries

use std::collections::HashMap;

use crate::foundation::collections::NodeId;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A property animation began moving
    AnimationStarted,
    /// A property animation reached its target
    AnimationCompleted,
    /// A node's child list changed
    ChildCollectionChanged,
    /// A content host replaced its subtree
    ContentSwapped,
}

/// Variant for type-safe event arguments
///
/// Uses key-value pairs to avoid order dependency problems.
#[derive(Debug, Clone)]
pub enum EventArg {
    /// Node the event originated from
    Node(NodeId),
    /// Name of the affected property
    Property(String),
    /// Child node involved in a collection change
    Child(NodeId),
    /// Content host that swapped its subtree
    Host(NodeId),
}

/// Event with type ID and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Frame number the event was produced in
    pub frame: u64,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and frame number
    pub fn new(event_type: EventType, frame: u64) -> Self {
        Self {
            event_type,
            frame,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get the originating node if present
    pub fn get_node(&self) -> Option<NodeId> {
        if let Some(EventArg::Node(id)) = self.get_arg("node") {
            Some(*id)
        } else {
            None
        }
    }

    /// Get the property name if present
    pub fn get_property(&self) -> Option<&str> {
        if let Some(EventArg::Property(name)) = self.get_arg("property") {
            Some(name)
        } else {
            None
        }
    }

    /// Get the child node if present
    pub fn get_child(&self) -> Option<NodeId> {
        if let Some(EventArg::Child(id)) = self.get_arg("child") {
            Some(*id)
        } else {
            None
        }
    }

    /// Get the content host if present
    pub fn get_host(&self) -> Option<NodeId> {
        if let Some(EventArg::Host(id)) = self.get_arg("host") {
            Some(*id)
        } else {
            None
        }
    }
}

/// Event handler trait
///
/// Returns true if the event was consumed (stops forwarding), false to
/// allow forwarding to other handlers.
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event) -> bool;
}

/// Event system with registration and queuing
///
/// Events produced during an update traversal are queued and dispatched at
/// the end of that traversal, still synchronously on the update thread.
pub struct EventSystem {
    queue: Vec<Event>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a specific event type
    ///
    /// Only handlers registered for this type will be notified.
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Queue an event for dispatch at the end of the current traversal
    pub fn send(&mut self, event: Event) {
        self.queue.push(event);
    }

    /// Number of events waiting for dispatch
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Dispatch all pending events in production order
    pub fn dispatch(&mut self) {
        let queued = std::mem::take(&mut self.queue);
        for event in queued {
            self.dispatch_event(&event);
        }
    }

    /// Dispatch single event to registered handlers
    ///
    /// Stops on the first handler that returns true (consumed).
    fn dispatch_event(&mut self, event: &Event) {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    break;
                }
            }
        }
    }

    /// Clear all queued events (useful for teardown)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}
