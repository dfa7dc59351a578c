// ABOUTME: Re-serializes value subtrees into JSON and XML text for embedding in output
// ABOUTME: Backs the json and xml template helpers

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::error::{MarshalError, Result};
use super::model::{Scalar, Value};

/// Compact JSON with record keys in insertion order.
pub fn to_json_string(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// XML rendition of a value.
///
/// A root scalar is wrapped in an element named after its type, a root list
/// is written as its elements back to back and a root record is wrapped in
/// `<record>`. Inside a record every key becomes an element; list items
/// repeat the element of their key.
pub fn to_xml_string(value: &Value) -> Result<String> {
    let mut xml = XmlWriter::new();
    xml.write_root(value)?;
    String::from_utf8(xml.writer.into_inner()).map_err(|e| MarshalError::Write(e.to_string()))
}

struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn write_root(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Scalar(Scalar::Null) => Ok(()),
            Value::Scalar(scalar) => self.write_element(scalar.type_name(), value),
            Value::List(items) => items.iter().try_for_each(|item| self.write_root(item)),
            Value::Record(_) => self.write_element("record", value),
        }
    }

    fn write_element(&mut self, name: &str, value: &Value) -> Result<()> {
        if !is_valid_name(name) {
            return Err(MarshalError::InvalidName(name.to_string()));
        }

        match value {
            Value::Scalar(Scalar::Null) => self.emit(Event::Empty(BytesStart::new(name))),
            Value::Scalar(scalar) => {
                self.emit(Event::Start(BytesStart::new(name)))?;
                self.emit(Event::Text(BytesText::new(&scalar.to_string())))?;
                self.emit(Event::End(BytesEnd::new(name)))
            }
            Value::List(items) => items
                .iter()
                .try_for_each(|item| self.write_element(name, item)),
            Value::Record(fields) => {
                self.emit(Event::Start(BytesStart::new(name)))?;
                for (key, field) in fields {
                    self.write_element(key, field)?;
                }
                self.emit(Event::End(BytesEnd::new(name)))
            }
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| MarshalError::Write(e.to_string()))
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        }
        _ => false,
    }
}
