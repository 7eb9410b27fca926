//! Contains node property related stuff.

use std::fmt;

use crate::alloc::{Array, Handle};
use crate::error::{Error, Result};

pub(crate) mod array;
pub(crate) mod decode;


/// Type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    String,
    VecI32,
    VecI64,
    VecF32,
    VecF64,
    VecBool,
    Binary,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            PropertyType::I16 => "i16",
            PropertyType::I32 => "i32",
            PropertyType::I64 => "i64",
            PropertyType::F32 => "f32",
            PropertyType::F64 => "f64",
            PropertyType::Bool => "bool",
            PropertyType::String => "string",
            PropertyType::VecI32 => "i32 array",
            PropertyType::VecI64 => "i64 array",
            PropertyType::VecF32 => "f32 array",
            PropertyType::VecF64 => "f64 array",
            PropertyType::VecBool => "bool array",
            PropertyType::Binary => "byte array",
        };
        f.write_str(name)
    }
}

/// A node property value.
///
/// Strings and binaries are zero-copy views into the allocation made while decoding.
#[derive(Debug)]
pub enum Property {
    /// 2-byte signed integer.
    I16(i16),
    /// 4-byte signed integer.
    I32(i32),
    /// 8-byte signed integer.
    I64(i64),
    /// 4-byte single-precision IEEE 754 floating-point number.
    F32(f32),
    /// 8-byte double-precision IEEE 754 floating-point number.
    F64(f64),
    /// Boolean.
    Bool(bool),
    /// String, as raw bytes with `0x00` and `0x01` replaced by `:`.
    String(Handle),
    /// Array of 4-byte signed integer.
    VecI32(Array<i32>),
    /// Array of 8-byte signed integer.
    VecI64(Array<i64>),
    /// Array of 4-byte single-precision IEEE 754 number.
    VecF32(Array<f32>),
    /// Array of 8-byte double-precision IEEE 754 number.
    VecF64(Array<f64>),
    /// Array of boolean.
    VecBool(Array<bool>),
    /// Raw binary.
    Binary(Handle),
}

impl Property {
    /// Returns the type of the value.
    pub fn property_type(&self) -> PropertyType {
        match *self {
            Property::I16(_) => PropertyType::I16,
            Property::I32(_) => PropertyType::I32,
            Property::I64(_) => PropertyType::I64,
            Property::F32(_) => PropertyType::F32,
            Property::F64(_) => PropertyType::F64,
            Property::Bool(_) => PropertyType::Bool,
            Property::String(_) => PropertyType::String,
            Property::VecI32(_) => PropertyType::VecI32,
            Property::VecI64(_) => PropertyType::VecI64,
            Property::VecF32(_) => PropertyType::VecF32,
            Property::VecF64(_) => PropertyType::VecF64,
            Property::VecBool(_) => PropertyType::VecBool,
            Property::Binary(_) => PropertyType::Binary,
        }
    }

    /// Number of elements for arrays, byte length for strings and binaries, 1 for scalars.
    pub fn len(&self) -> usize {
        match *self {
            Property::String(ref v) | Property::Binary(ref v) => v.len(),
            Property::VecI32(ref v) => v.len(),
            Property::VecI64(ref v) => v.len(),
            Property::VecF32(ref v) => v.len(),
            Property::VecF64(ref v) => v.len(),
            Property::VecBool(ref v) => v.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn mismatch(&self, expected: PropertyType) -> Error {
        Error::PropertyTypeMismatch {
            expected: expected,
            actual: self.property_type(),
        }
    }
}

macro_rules! implement_property_value_getter {
    (primitive, $t:ty, $method_name:ident, $variant:ident) => (
        impl Property {
            /// Get property value without type conversion.
            ///
            /// Fails with `PropertyTypeMismatch` for a property of another type.
            pub fn $method_name(&self) -> Result<$t> {
                match *self {
                    Property::$variant(v) => Ok(v),
                    _ => Err(self.mismatch(PropertyType::$variant)),
                }
            }
        }
    );
    (slice, $t:ty, $method_name:ident, $variant:ident) => (
        impl Property {
            /// Get property value without type conversion.
            ///
            /// Fails with `PropertyTypeMismatch` for a property of another type.
            pub fn $method_name(&self) -> Result<&[$t]> {
                match *self {
                    Property::$variant(ref v) => Ok(&v[..]),
                    _ => Err(self.mismatch(PropertyType::$variant)),
                }
            }
        }
    );
}

implement_property_value_getter!(primitive, i16, as_i16, I16);
implement_property_value_getter!(primitive, i32, as_i32, I32);
implement_property_value_getter!(primitive, i64, as_i64, I64);
implement_property_value_getter!(primitive, f32, as_f32, F32);
implement_property_value_getter!(primitive, f64, as_f64, F64);
implement_property_value_getter!(primitive, bool, as_bool, Bool);

implement_property_value_getter!(slice, u8, as_string, String);
implement_property_value_getter!(slice, i32, as_i32_array, VecI32);
implement_property_value_getter!(slice, i64, as_i64_array, VecI64);
implement_property_value_getter!(slice, f32, as_f32_array, VecF32);
implement_property_value_getter!(slice, f64, as_f64_array, VecF64);
implement_property_value_getter!(slice, bool, as_bool_array, VecBool);
implement_property_value_getter!(slice, u8, as_byte_array, Binary);

impl Property {
    /// Get string property value as `&str`, if it is valid UTF-8.
    pub fn as_str(&self) -> Result<Option<&str>> {
        self.as_string().map(|v| ::std::str::from_utf8(v).ok())
    }
}
