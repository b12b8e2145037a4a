//! Scalar types the scanner understands

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag for the element type of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Int32,
    Float32,
    Float64,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Int32 => "i32",
            ScalarType::Float32 => "f32",
            ScalarType::Float64 => "f64",
        };
        f.write_str(name)
    }
}

/// A single typed value, used where the scalar type is only known at run time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ScanValue {
    Int32(i32),
    Float32(f32),
    Float64(f64),
}

impl ScanValue {
    /// Returns the scalar type of this value
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScanValue::Int32(_) => ScalarType::Int32,
            ScanValue::Float32(_) => ScalarType::Float32,
            ScanValue::Float64(_) => ScalarType::Float64,
        }
    }
}

impl fmt::Display for ScanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanValue::Int32(v) => write!(f, "{}", v),
            ScanValue::Float32(v) => write!(f, "{}", v),
            ScanValue::Float64(v) => write!(f, "{}", v),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A fixed-width scalar that can be scanned for.
///
/// Implemented for `i32`, `f32` and `f64` only. Equality is the type's native
/// `==`, so `NaN` never matches and `0.0` matches `-0.0`.
pub trait Scalar: Copy + PartialEq + fmt::Debug + fmt::Display + sealed::Sealed + 'static {
    /// Run-time tag for this type
    const SCALAR_TYPE: ScalarType;
    /// Width in bytes
    const SIZE: usize;

    /// Decodes the first `SIZE` bytes, or `None` if the slice is shorter
    fn from_ne_slice(bytes: &[u8]) -> Option<Self>;

    /// Encodes the value as native-endian bytes
    fn to_ne_vec(self) -> Vec<u8>;

    /// Raw bit pattern, used to bucket values that are not `Hash`
    fn to_bits_u64(self) -> u64;
}

macro_rules! impl_scalar {
    ($ty:ty, $variant:ident, |$v:ident| $bits:expr) => {
        impl Scalar for $ty {
            const SCALAR_TYPE: ScalarType = ScalarType::$variant;
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn from_ne_slice(bytes: &[u8]) -> Option<Self> {
                let raw = bytes.get(..Self::SIZE)?;
                raw.try_into().ok().map(<$ty>::from_ne_bytes)
            }

            fn to_ne_vec(self) -> Vec<u8> {
                self.to_ne_bytes().to_vec()
            }

            fn to_bits_u64(self) -> u64 {
                let $v = self;
                $bits
            }
        }
    };
}

impl_scalar!(i32, Int32, |v| v as u32 as u64);
impl_scalar!(f32, Float32, |v| v.to_bits() as u64);
impl_scalar!(f64, Float64, |v| v.to_bits());
