//! Typed runtime arguments passed to contract code.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use crate::blockchain::bytesrepr::{u512_bytes, write_length_prefixed, ToBytes};

/// Subset of the CL type system this tool emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CLType {
    Bool,
    U32,
    U64,
    U512,
    String,
}

impl CLType {
    /// Wire tag of the type.
    pub fn tag(&self) -> u8 {
        match self {
            CLType::Bool => 0,
            CLType::U32 => 4,
            CLType::U64 => 5,
            CLType::U512 => 8,
            CLType::String => 10,
        }
    }
}

/// A serialized value together with its type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CLValue {
    cl_type: CLType,
    #[serde(with = "hex::serde")]
    bytes: Vec<u8>,
    parsed: serde_json::Value,
}

impl CLValue {
    pub fn bool(value: bool) -> Self {
        Self::new(CLType::Bool, value.to_bytes(), value.into())
    }

    pub fn u32(value: u32) -> Self {
        Self::new(CLType::U32, value.to_bytes(), value.into())
    }

    pub fn u64(value: u64) -> Self {
        Self::new(CLType::U64, value.to_bytes(), value.into())
    }

    /// Amounts in motes; the parsed form is a decimal string like the node prints.
    pub fn u512(value: u64) -> Self {
        Self::new(CLType::U512, u512_bytes(value), value.to_string().into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new(CLType::String, value.to_bytes(), value.into())
    }

    fn new(cl_type: CLType, bytes: Vec<u8>, parsed: serde_json::Value) -> Self {
        Self {
            cl_type,
            bytes,
            parsed,
        }
    }

    pub fn cl_type(&self) -> CLType {
        self.cl_type
    }

    pub fn inner_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl ToBytes for CLValue {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        write_length_prefixed(&self.bytes, out);
        out.push(self.cl_type.tag());
    }
}

/// One named argument.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArg {
    name: String,
    value: CLValue,
}

impl NamedArg {
    pub fn new(name: impl Into<String>, value: CLValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &CLValue {
        &self.value
    }
}

impl ToBytes for NamedArg {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.name.write_bytes(out);
        self.value.write_bytes(out);
    }
}

// JSON form is a `[name, value]` pair.
impl Serialize for NamedArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.value)?;
        tuple.end()
    }
}

/// Ordered list of named arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuntimeArgs(Vec<NamedArg>);

impl RuntimeArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, replacing any earlier one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: CLValue) {
        let name = name.into();
        match self.0.iter_mut().find(|arg| arg.name == name) {
            Some(existing) => existing.value = value,
            None => self.0.push(NamedArg::new(name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: CLValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&CLValue> {
        self.0.iter().find(|arg| arg.name == name).map(|arg| &arg.value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedArg> {
        self.0.iter()
    }
}

impl ToBytes for RuntimeArgs {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.0.write_bytes(out);
    }
}
