//! Model class metadata.
//!
//! A [`ModelClass`] lists the declared fields of one model type and how each
//! field should be converted. Classes are declared with [`ModelClassBuilder`]
//! and stored by name in a [`MetadataStore`].
//!
//! # Example
//! ```rust,ignore
//! use wiremodel_core::{DeclaredType, ModelClass, TypeTag};
//!
//! let user = ModelClass::builder("User")
//!     .field("id")
//!     .tagged("createdAt", TypeTag::Date)
//!     .aliased("balance", "bigint")
//!     .declared("tags", DeclaredType::Set)
//!     .nested("manager", "User")
//!     .build();
//! ```

use dashmap::DashMap;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::key::{TransformerKey, TypeTag};

/// Type of a field as surfaced by the model declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Date,
    Map,
    Set,
    String,
    Number,
    Boolean,
}

impl DeclaredType {
    /// Built-in tag handling this declared type.
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Date => TypeTag::Date,
            Self::Map => TypeTag::Map,
            Self::Set => TypeTag::Set,
            Self::String => TypeTag::String,
            Self::Number => TypeTag::Number,
            Self::Boolean => TypeTag::Boolean,
        }
    }
}

/// Reference to a model class by name, resolved when a value is converted.
///
/// Resolving late lets a class refer to itself or to classes declared after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelRef(String);

impl ModelRef {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self(class_name.into())
    }

    pub fn class_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How one declared field is converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, also the wire key
    pub name: String,
    /// Explicit transformer annotation
    pub transformer: Option<TransformerKey>,
    /// Explicit nested model annotation
    pub model: Option<ModelRef>,
    /// Declared intrinsic type
    pub declared: Option<DeclaredType>,
}

impl FieldDescriptor {
    /// A field with no annotations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transformer: None,
            model: None,
            declared: None,
        }
    }

    pub fn with_transformer(mut self, key: impl Into<TransformerKey>) -> Self {
        self.transformer = Some(key.into());
        self
    }

    pub fn with_model(mut self, class_name: impl Into<String>) -> Self {
        self.model = Some(ModelRef::new(class_name));
        self
    }

    pub fn with_declared(mut self, declared: DeclaredType) -> Self {
        self.declared = Some(declared);
        self
    }

    /// True when the field carries no annotation and is left to inference.
    pub fn is_plain(&self) -> bool {
        self.transformer.is_none() && self.model.is_none() && self.declared.is_none()
    }
}

/// A declared model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelClass {
    name: String,
    fields: IndexMap<String, FieldDescriptor>,
}

impl ModelClass {
    pub fn builder(name: impl Into<String>) -> ModelClassBuilder {
        ModelClassBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`ModelClass`].
///
/// Annotating the same field twice merges the annotations into a single
/// descriptor, so `.declared("at", DeclaredType::Date).tagged("at", ..)` gives
/// one field carrying both.
#[derive(Debug, Clone)]
pub struct ModelClassBuilder {
    name: String,
    fields: IndexMap<String, FieldDescriptor>,
}

impl ModelClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    fn entry(&mut self, name: &str) -> &mut FieldDescriptor {
        self.fields
            .entry(name.to_string())
            .or_insert_with(|| FieldDescriptor::new(name))
    }

    /// Declare a field without annotations.
    pub fn field(mut self, name: &str) -> Self {
        self.entry(name);
        self
    }

    /// Declare several plain fields at once.
    pub fn fields<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            self.entry(name);
        }
        self
    }

    /// Annotate a field with a transformer key of any kind.
    pub fn transformer(mut self, name: &str, key: impl Into<TransformerKey>) -> Self {
        self.entry(name).transformer = Some(key.into());
        self
    }

    /// Annotate a field by symbolic tag.
    pub fn tagged(self, name: &str, tag: TypeTag) -> Self {
        self.transformer(name, TransformerKey::Tag(tag))
    }

    /// Annotate a field by string alias.
    pub fn aliased(self, name: &str, alias: &str) -> Self {
        self.transformer(name, TransformerKey::alias(alias))
    }

    /// Annotate a field by the Rust type standing in for the constructor.
    pub fn native<T: ?Sized + 'static>(self, name: &str) -> Self {
        self.transformer(name, TransformerKey::native::<T>())
    }

    /// Annotate a field as holding instances (or arrays of instances) of
    /// another model class.
    pub fn nested(mut self, name: &str, class_name: &str) -> Self {
        self.entry(name).model = Some(ModelRef::new(class_name));
        self
    }

    /// Record the declared intrinsic type of a field.
    pub fn declared(mut self, name: &str, declared: DeclaredType) -> Self {
        self.entry(name).declared = Some(declared);
        self
    }

    /// Add a prebuilt descriptor, replacing any field of the same name.
    pub fn descriptor(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(descriptor.name.clone(), descriptor);
        self
    }

    pub fn build(self) -> ModelClass {
        ModelClass {
            name: self.name,
            fields: self.fields,
        }
    }
}

/// Model classes by name.
#[derive(Debug, Default)]
pub struct MetadataStore {
    classes: DashMap<String, Arc<ModelClass>>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `class`, replacing any previous class of the same name.
    ///
    /// Returns the previous class, if there was one.
    pub fn define(&self, class: Arc<ModelClass>) -> Option<Arc<ModelClass>> {
        self.classes.insert(class.name().to_string(), class)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ModelClass>> {
        self.classes.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Names of all stored classes, sorted.
    pub fn classes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}
