// ABOUTME: Value model shared by the normalizers and the template engine
// ABOUTME: Exports the tagged value tree and its structured re-serialization

pub mod error;
pub mod marshal;
pub mod model;

pub use error::{MarshalError, Result};
pub use marshal::{to_json_string, to_xml_string};
pub use model::{format_float, Record, Scalar, Value};
