//! Property values, descriptors, and the per-node property bag
//!
//! Components declare their properties as descriptors (name, kind,
//! default). At construction the bag compiles those descriptors into
//! animated cells, one per property, giving every component the same
//! accessor surface. Reading a property that is not animating is a plain
//! field access.
//!
//! Values are a tagged union in the key-value style of the event system:
//! typed variants with typed getters, no boxing and no reflection.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::animation::{AnimatedCell, CellEvents, Easing, Interpolate};
use crate::foundation::math::{Quat, Vec2, Vec3, Vec4};

use super::lifecycle::LifecycleError;

/// Value kinds a property may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    /// Scalar float
    Float,
    /// 2D vector
    Vec2,
    /// 3D vector
    Vec3,
    /// 4D vector
    Vec4,
    /// Rotation quaternion
    Rotation,
    /// Boolean flag
    Bool,
    /// Signed integer
    Int,
    /// Text string
    Text,
}

/// A single property value
///
/// Scalar and vector variants blend component-wise under animation;
/// rotations blend spherically; discrete variants snap to the target at
/// completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Scalar float value
    Float(f32),
    /// 2D vector value
    Vec2(Vec2),
    /// 3D vector value
    Vec3(Vec3),
    /// 4D vector value
    Vec4(Vec4),
    /// Rotation value
    Rotation(Quat),
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i32),
    /// Text value
    Text(String),
}

impl PropertyValue {
    /// The kind of this value
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Float(_) => PropertyKind::Float,
            Self::Vec2(_) => PropertyKind::Vec2,
            Self::Vec3(_) => PropertyKind::Vec3,
            Self::Vec4(_) => PropertyKind::Vec4,
            Self::Rotation(_) => PropertyKind::Rotation,
            Self::Bool(_) => PropertyKind::Bool,
            Self::Int(_) => PropertyKind::Int,
            Self::Text(_) => PropertyKind::Text,
        }
    }

    /// Get the float value if this is a `Float`
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the vector value if this is a `Vec2`
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Self::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the vector value if this is a `Vec3`
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Self::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the vector value if this is a `Vec4`
    pub fn as_vec4(&self) -> Option<Vec4> {
        match self {
            Self::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the rotation value if this is a `Rotation`
    pub fn as_rotation(&self) -> Option<Quat> {
        match self {
            Self::Rotation(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the boolean value if this is a `Bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the integer value if this is an `Int`
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the text value if this is a `Text`
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

// Equality and hashing compare float components bitwise so templates built
// from property values can serve as cache and identity keys.
impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Vec2(a), Self::Vec2(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Self::Vec3(a), Self::Vec3(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Self::Vec4(a), Self::Vec4(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Self::Rotation(a), Self::Rotation(b)) => a
                .coords
                .iter()
                .zip(b.coords.iter())
                .all(|(x, y)| x.to_bits() == y.to_bits()),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PropertyValue {}

impl Hash for PropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Float(v) => v.to_bits().hash(state),
            Self::Vec2(v) => v.iter().for_each(|c| c.to_bits().hash(state)),
            Self::Vec3(v) => v.iter().for_each(|c| c.to_bits().hash(state)),
            Self::Vec4(v) => v.iter().for_each(|c| c.to_bits().hash(state)),
            Self::Rotation(v) => v.coords.iter().for_each(|c| c.to_bits().hash(state)),
            Self::Bool(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Text(v) => v.hash(state),
        }
    }
}

impl Interpolate for PropertyValue {
    fn interpolate(&self, target: &Self, t: f32) -> Self {
        match (self, target) {
            (Self::Float(a), Self::Float(b)) => Self::Float(a.interpolate(b, t)),
            (Self::Vec2(a), Self::Vec2(b)) => Self::Vec2(a.interpolate(b, t)),
            (Self::Vec3(a), Self::Vec3(b)) => Self::Vec3(a.interpolate(b, t)),
            (Self::Vec4(a), Self::Vec4(b)) => Self::Vec4(a.interpolate(b, t)),
            (Self::Rotation(a), Self::Rotation(b)) => Self::Rotation(a.interpolate(b, t)),
            (Self::Int(a), Self::Int(b)) => {
                Self::Int(a + ((b - a) as f32 * t).round() as i32)
            }
            // Discrete values and kind mismatches snap at completion. The
            // bag rejects mismatched kinds before an animation starts, so
            // the fallback arm only ever sees Bool and Text.
            (a, b) => {
                if t >= 1.0 {
                    b.clone()
                } else {
                    a.clone()
                }
            }
        }
    }
}

/// Declarative description of one property: name, kind, default
///
/// Components declare descriptors; the bag compiles them into cells at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name used for lookup
    pub name: &'static str,
    /// Value kind every assignment must match
    pub kind: PropertyKind,
    /// Initial value
    pub default: PropertyValue,
}

impl PropertyDescriptor {
    /// Create a descriptor whose kind is implied by the default value
    pub fn new(name: &'static str, default: PropertyValue) -> Self {
        Self {
            name,
            kind: default.kind(),
            default,
        }
    }
}

/// Named collection of animated property cells owned by one node
pub struct PropertyBag {
    cells: BTreeMap<String, AnimatedCell<PropertyValue>>,
}

impl PropertyBag {
    /// Build a bag from component descriptors
    pub fn from_descriptors(descriptors: &[PropertyDescriptor]) -> Self {
        let cells = descriptors
            .iter()
            .map(|d| (d.name.to_string(), AnimatedCell::new(d.default.clone())))
            .collect();
        Self { cells }
    }

    /// Read a property's current value
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.cells.get(name).map(AnimatedCell::value)
    }

    /// The kind a property was declared with
    pub fn kind_of(&self, name: &str) -> Option<PropertyKind> {
        self.cells.get(name).map(|c| c.value().kind())
    }

    /// Whether the named property is currently animating
    pub fn is_animating(&self, name: &str) -> bool {
        self.cells.get(name).is_some_and(AnimatedCell::is_animating)
    }

    /// Whether any property on this bag is animating
    pub fn any_animating(&self) -> bool {
        self.cells.values().any(AnimatedCell::is_animating)
    }

    /// Iterate property names in stable order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Assign a property immediately, discarding any in-flight animation
    pub fn set_immediate(
        &mut self,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), LifecycleError> {
        let cell = self.checked_cell(name, &value)?;
        cell.set_immediate(value);
        Ok(())
    }

    /// Begin animating a property toward `value`
    ///
    /// Callers have already validated the duration; the bag validates the
    /// name and kind.
    pub(crate) fn animate(
        &mut self,
        name: &str,
        value: PropertyValue,
        duration: f32,
        easing: Easing,
    ) -> Result<(), LifecycleError> {
        let cell = self.checked_cell(name, &value)?;
        cell.animate(value, duration, easing);
        Ok(())
    }

    /// Advance every cell, collecting per-property notifications
    pub(crate) fn advance_all(&mut self, delta_time: f32) -> Vec<(String, CellEvents)> {
        let mut produced = Vec::new();
        for (name, cell) in &mut self.cells {
            let events = cell.advance(delta_time);
            if !events.is_empty() {
                produced.push((name.clone(), events));
            }
        }
        produced
    }

    /// Abandon every in-flight animation, freezing displayed values
    pub(crate) fn cancel_all(&mut self) {
        for cell in self.cells.values_mut() {
            cell.cancel();
        }
    }

    fn checked_cell(
        &mut self,
        name: &str,
        value: &PropertyValue,
    ) -> Result<&mut AnimatedCell<PropertyValue>, LifecycleError> {
        let cell = self.cells.get_mut(name).ok_or_else(|| {
            LifecycleError::InvalidArgument(format!("unknown property `{name}`"))
        })?;
        let declared = cell.value().kind();
        if declared != value.kind() {
            return Err(LifecycleError::InvalidArgument(format!(
                "property `{name}` holds {declared:?}, got {:?}",
                value.kind()
            )));
        }
        Ok(cell)
    }
}
