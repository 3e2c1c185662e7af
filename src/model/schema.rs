use wiremodel_core::{ModelClass, ModelClassBuilder};

/// Static declaration of a model type.
///
/// ```rust,ignore
/// struct User;
///
/// impl ModelSchema for User {
///     fn model_name() -> &'static str {
///         "User"
///     }
///
///     fn declare(builder: ModelClassBuilder) -> ModelClassBuilder {
///         builder
///             .field("id")
///             .tagged("createdAt", TypeTag::Date)
///             .nested("address", "Address")
///     }
/// }
/// ```
pub trait ModelSchema {
    /// Class name the model is registered under.
    fn model_name() -> &'static str;

    /// Add the model's fields to `builder`.
    fn declare(builder: ModelClassBuilder) -> ModelClassBuilder;

    fn model_class() -> ModelClass {
        Self::declare(ModelClass::builder(Self::model_name())).build()
    }
}
