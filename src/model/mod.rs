//! Model instances and static model declarations

mod instance;
mod schema;

pub use instance::Model;
pub use schema::ModelSchema;
