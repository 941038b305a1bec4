//! Service locator for collaborator injection
//!
//! The factory constructs components with their external collaborators
//! (renderer handle, asset cache, audio mixer) resolved from here. The
//! runtime never owns those collaborators; it only hands them to the
//! constructors that declared a need for them.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Type-keyed registry of shared services
///
/// Services are stored behind `Arc` so constructed components can hold on
/// to them past the locator's lifetime. Thread safety of a service's own
/// interior is the service's documented responsibility.
#[derive(Default)]
pub struct ServiceLocator {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ServiceLocator {
    /// Create an empty locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service instance, replacing any previous one of the type
    pub fn register<T: Any + Send + Sync>(&mut self, service: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), service);
    }

    /// Resolve a service by type
    pub fn resolve<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|s| Arc::clone(s).downcast::<T>().ok())
    }

    /// Whether a service of the given type is registered
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FontLibrary {
        faces: u32,
    }

    #[test]
    fn test_register_and_resolve() {
        let mut services = ServiceLocator::new();
        services.register(Arc::new(FontLibrary { faces: 3 }));

        let fonts = services.resolve::<FontLibrary>().unwrap();
        assert_eq!(fonts.faces, 3);
    }

    #[test]
    fn test_missing_service_is_none() {
        let services = ServiceLocator::new();
        assert!(services.resolve::<FontLibrary>().is_none());
        assert!(!services.contains::<FontLibrary>());
    }
}
