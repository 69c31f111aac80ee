pub mod callback;
pub mod config_object;
pub mod js_literal;
pub mod merge;
pub mod nullable;
pub mod parser;
pub mod primitives;
pub mod validators;
pub mod value;
pub mod value_deserializer;
pub mod value_serializer;

pub use callback::{CallbackFunction, JavaScriptClass};
pub use config_object::ConfigObject;
pub use js_literal::{JsLiteralFormat, render_js_literal};
pub use merge::{CopyPolicy, copy_tree};
pub use nullable::Nullable;
pub use parser::{JsCall, parse_js_call, parse_js_literal};
pub use value::{JsObject, JsValue};
pub use value_deserializer::from_js_value;
pub use value_serializer::to_js_value;
