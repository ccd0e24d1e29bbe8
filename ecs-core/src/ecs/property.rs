// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Named, dynamically-typed component properties
//!
//! Data-driven loaders refer to component fields by name and supply values
//! whose type is only known at runtime. Each component type declares an
//! ordered [`PropertyTable`] once, listing its settable fields together with
//! a typed accessor pair:
//!
//! ```
//! use ecs_core::ecs::{Component, PropertyTable, PropertyValue};
//!
//! #[derive(Default)]
//! struct Health {
//!     current: f64,
//!     label: String,
//! }
//!
//! impl Component for Health {
//!     const NAME: &'static str = "Health";
//!
//!     fn properties() -> PropertyTable<Self> {
//!         PropertyTable::new()
//!             .field("current", |h: &Health| &h.current, |h: &mut Health| &mut h.current)
//!             .field("label", |h: &Health| &h.label, |h: &mut Health| &mut h.label)
//!     }
//! }
//!
//! let table = Health::properties();
//! let mut health = Health::default();
//! table.set(&mut health, "current", PropertyValue::Float(12.5)).unwrap();
//! assert_eq!(health.current, 12.5);
//! assert!(table.set(&mut health, "current", PropertyValue::Bool(true)).is_err());
//! ```
//!
//! The table belongs to the type, not to instances, so cloning or
//! assigning a component can never leave its dynamic view out of sync
//! with its fields.

use crate::ecs::Component;
use crate::error::{EcsError, EcsResult};
use std::any::Any;
use std::fmt;

/// Runtime type tag of a [`PropertyValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Boolean flag
    Bool,
    /// Signed integer
    Int,
    /// Floating point number
    Float,
    /// UTF-8 text
    Text,
}

/// A dynamically-typed property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// UTF-8 text
    Text(String),
}

impl PropertyValue {
    /// Get the runtime type of this value
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Int(_) => PropertyKind::Int,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::Text(_) => PropertyKind::Text,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Text(v) => write!(f, "{:?}", v),
        }
    }
}

/// Rust field types that can be exposed as properties
///
/// Conversion from a [`PropertyValue`] is strict: a value of a different
/// kind, or an integer that does not fit the field, is rejected.
pub trait PropertyType: Clone + 'static {
    /// Kind of value this field accepts
    const KIND: PropertyKind;

    /// Convert a dynamic value into the field type
    fn from_value(value: PropertyValue) -> Option<Self>;

    /// Convert the field into a dynamic value
    fn to_value(&self) -> PropertyValue;
}

impl PropertyType for bool {
    const KIND: PropertyKind = PropertyKind::Bool;

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Bool(*self)
    }
}

impl PropertyType for f64 {
    const KIND: PropertyKind = PropertyKind::Float;

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Float(v) => Some(v),
            _ => None,
        }
    }

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Float(*self)
    }
}

impl PropertyType for f32 {
    const KIND: PropertyKind = PropertyKind::Float;

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Float(v) => Some(v as f32),
            _ => None,
        }
    }

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Float(*self as f64)
    }
}

impl PropertyType for String {
    const KIND: PropertyKind = PropertyKind::Text;

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Text(v) => Some(v),
            _ => None,
        }
    }

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Text(self.clone())
    }
}

macro_rules! impl_integer_property {
    ($($ty:ty),*) => {
        $(
            impl PropertyType for $ty {
                const KIND: PropertyKind = PropertyKind::Int;

                fn from_value(value: PropertyValue) -> Option<Self> {
                    match value {
                        PropertyValue::Int(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }

                fn to_value(&self) -> PropertyValue {
                    PropertyValue::Int(*self as i64)
                }
            }
        )*
    };
}

impl_integer_property!(i32, i64, u8, u16, u32);

/// Name and kind of one property, as reported to loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Property name
    pub name: &'static str,
    /// Kind of value the property accepts
    pub kind: PropertyKind,
}

type Getter<T> = Box<dyn Fn(&T) -> PropertyValue + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, PropertyValue) -> bool + Send + Sync>;

struct Property<T> {
    info: PropertyInfo,
    get: Getter<T>,
    set: Setter<T>,
}

/// Ordered table of the settable properties of component type `T`
pub struct PropertyTable<T> {
    properties: Vec<Property<T>>,
}

impl<T: Component> PropertyTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        PropertyTable {
            properties: Vec::new(),
        }
    }

    /// Declare a field through a pair of typed accessors
    ///
    /// Declaring the same name twice keeps the first declaration.
    pub fn field<V: PropertyType>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        if self.find(name).is_some() {
            return self;
        }
        self.properties.push(Property {
            info: PropertyInfo {
                name,
                kind: V::KIND,
            },
            get: Box::new(move |target| get(target).to_value()),
            set: Box::new(move |target, value| match V::from_value(value) {
                Some(v) => {
                    *get_mut(target) = v;
                    true
                }
                None => false,
            }),
        });
        self
    }

    /// Names and kinds of all properties in declaration order
    pub fn schema(&self) -> Vec<PropertyInfo> {
        self.properties.iter().map(|p| p.info).collect()
    }

    /// Number of declared properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check whether the table declares no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Read a property by name
    pub fn get(&self, target: &T, property: &str) -> EcsResult<PropertyValue> {
        let entry = self.lookup(property)?;
        Ok((entry.get)(target))
    }

    /// Assign a property by name
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnknownProperty`] if `property` is not declared
    /// - [`EcsError::PropertyTypeMismatch`] if `value` has the wrong kind or
    ///   does not fit the field
    pub fn set(&self, target: &mut T, property: &str, value: PropertyValue) -> EcsResult<()> {
        let entry = self.lookup(property)?;
        let found = value.kind();
        if (entry.set)(target, value) {
            Ok(())
        } else {
            Err(EcsError::PropertyTypeMismatch {
                component: T::NAME,
                property: entry.info.name,
                expected: entry.info.kind,
                found,
            })
        }
    }

    fn find(&self, property: &str) -> Option<&Property<T>> {
        self.properties.iter().find(|p| p.info.name == property)
    }

    fn lookup(&self, property: &str) -> EcsResult<&Property<T>> {
        self.find(property).ok_or_else(|| EcsError::UnknownProperty {
            component: T::NAME,
            property: property.to_string(),
        })
    }
}

impl<T: Component> Default for PropertyTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased access to a [`PropertyTable`]
///
/// Lets name-keyed component handles read and write properties without
/// knowing the concrete component type.
pub trait PropertyAccess: Send + Sync {
    /// Names and kinds of all properties
    fn schema(&self) -> Vec<PropertyInfo>;

    /// Read a property of `target`
    fn read(&self, target: &dyn Any, property: &str) -> EcsResult<PropertyValue>;

    /// Assign a property of `target`
    fn write(&self, target: &mut dyn Any, property: &str, value: PropertyValue) -> EcsResult<()>;
}

impl<T: Component> PropertyAccess for PropertyTable<T> {
    fn schema(&self) -> Vec<PropertyInfo> {
        PropertyTable::schema(self)
    }

    fn read(&self, target: &dyn Any, property: &str) -> EcsResult<PropertyValue> {
        let target = target.downcast_ref::<T>().ok_or(EcsError::ComponentTypeMismatch(T::NAME))?;
        self.get(target, property)
    }

    fn write(&self, target: &mut dyn Any, property: &str, value: PropertyValue) -> EcsResult<()> {
        let target = target.downcast_mut::<T>().ok_or(EcsError::ComponentTypeMismatch(T::NAME))?;
        self.set(target, property, value)
    }
}
