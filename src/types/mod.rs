//! UBJSON value model and the serializable-view contract.

mod huge;
mod value;
mod view;

pub use huge::HugeNumber;
pub use value::{UbjObject, UbjValue};
pub use view::{Field, SerializableView};
