//! Element type tags and data descriptions.
//!
//! A [`DataType`] is the opaque "type + shape/strides" a view carries. The
//! store never interprets element bytes beyond their size; typed access goes
//! through the [`Element`] trait.

use std::fmt;

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Element type tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeId {
    /// No type has been described.
    #[default]
    NoType,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// Byte string.
    Char8Str,
}

impl TypeId {
    /// All concrete (non-`NoType`) tags.
    pub const ALL: [TypeId; 11] = [
        TypeId::Int8,
        TypeId::Int16,
        TypeId::Int32,
        TypeId::Int64,
        TypeId::UInt8,
        TypeId::UInt16,
        TypeId::UInt32,
        TypeId::UInt64,
        TypeId::Float32,
        TypeId::Float64,
        TypeId::Char8Str,
    ];

    /// Size of one element in bytes. `NoType` is zero.
    #[must_use]
    pub const fn bytes_per_element(self) -> usize {
        match self {
            Self::NoType => 0,
            Self::Int8 | Self::UInt8 | Self::Char8Str => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Returns true for any tag other than `NoType`.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::NoType)
    }

    /// Stable lowercase name, used in serialized documents.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoType => "empty",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Char8Str => "char8_str",
        }
    }

    /// Parses a name produced by [`TypeId::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name == Self::NoType.name() {
            return Some(Self::NoType);
        }
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive that can be stored in a buffer or view.
pub trait Element: Copy + fmt::Debug + PartialEq {
    /// Tag describing this element type.
    const TYPE_ID: TypeId;

    /// Writes the native-endian bytes of `self` into `out`.
    ///
    /// `out` must be exactly `TYPE_ID.bytes_per_element()` long.
    fn write_ne(self, out: &mut [u8]);

    /// Reads a value from native-endian bytes.
    ///
    /// `bytes` must be at least `TYPE_ID.bytes_per_element()` long.
    fn read_ne(bytes: &[u8]) -> Self;
}

macro_rules! impl_element {
    ($($t:ty => $id:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const TYPE_ID: TypeId = TypeId::$id;

                fn write_ne(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }

                fn read_ne(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
                    <$t>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_element! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

/// Description of typed data: element type, shape, offset and stride.
///
/// Offset and stride are measured in elements, so a view can select every
/// other value of a buffer, or start part-way into it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataType {
    type_id: TypeId,
    shape: SmallVec<[usize; 4]>,
    offset: usize,
    stride: usize,
}

impl Default for DataType {
    fn default() -> Self {
        Self::empty()
    }
}

impl DataType {
    /// A description with no type and no elements.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            type_id: TypeId::NoType,
            shape: SmallVec::new(),
            offset: 0,
            stride: 1,
        }
    }

    /// One-dimensional description of `num_elements` values.
    #[must_use]
    pub fn new(type_id: TypeId, num_elements: usize) -> Self {
        Self::with_shape(type_id, &[num_elements])
    }

    /// Multi-dimensional description; the element count is the product of
    /// the extents.
    #[must_use]
    pub fn with_shape(type_id: TypeId, shape: &[usize]) -> Self {
        Self {
            type_id,
            shape: SmallVec::from_slice(shape),
            offset: 0,
            stride: 1,
        }
    }

    /// Description of a byte string of `len` characters.
    #[must_use]
    pub fn char8_str(len: usize) -> Self {
        Self::new(TypeId::Char8Str, len)
    }

    /// Description of `n` 32-bit integers.
    #[must_use]
    pub fn int32(n: usize) -> Self {
        Self::new(TypeId::Int32, n)
    }

    /// Description of `n` 64-bit integers.
    #[must_use]
    pub fn int64(n: usize) -> Self {
        Self::new(TypeId::Int64, n)
    }

    /// Description of `n` 32-bit floats.
    #[must_use]
    pub fn float32(n: usize) -> Self {
        Self::new(TypeId::Float32, n)
    }

    /// Description of `n` 64-bit floats.
    #[must_use]
    pub fn float64(n: usize) -> Self {
        Self::new(TypeId::Float64, n)
    }

    /// Sets the element offset into the backing memory.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the distance, in elements, between consecutive values.
    #[must_use]
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Element type tag.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Per-dimension extents.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    #[must_use]
    pub fn num_dimensions(&self) -> usize {
        self.shape.len()
    }

    /// Offset of the first value, in elements.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Distance between values, in elements.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Total number of values described.
    ///
    /// Saturates at `usize::MAX`; [`DataType::validate`] refuses shapes
    /// that get there.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.checked_num_elements().unwrap_or(usize::MAX)
    }

    fn checked_num_elements(&self) -> Option<usize> {
        if self.shape.is_empty() {
            return Some(0);
        }
        self.shape
            .iter()
            .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
    }

    /// Size of one element in bytes.
    #[must_use]
    pub fn bytes_per_element(&self) -> usize {
        self.type_id.bytes_per_element()
    }

    /// Bytes occupied by the values if packed contiguously.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.num_elements().saturating_mul(self.bytes_per_element())
    }

    /// Bytes of backing memory required to reach the last value, counting
    /// offset and stride.
    #[must_use]
    pub fn span_bytes(&self) -> usize {
        self.checked_span_bytes().unwrap_or(usize::MAX)
    }

    /// Like [`DataType::span_bytes`], but `None` if the span does not fit
    /// in `usize`.
    #[must_use]
    pub fn checked_span_bytes(&self) -> Option<usize> {
        match self.checked_num_elements()? {
            0 => Some(0),
            n => (n - 1)
                .checked_mul(self.stride)?
                .checked_add(self.offset)?
                .checked_add(1)?
                .checked_mul(self.bytes_per_element()),
        }
    }

    /// Byte position of value `i` in the backing memory.
    ///
    /// Exact for every `i` below [`DataType::num_elements`] once the
    /// description validates.
    #[must_use]
    pub fn element_byte_offset(&self, i: usize) -> usize {
        i.saturating_mul(self.stride)
            .saturating_add(self.offset)
            .saturating_mul(self.bytes_per_element())
    }

    /// Returns true if no type has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.type_id.is_valid()
    }

    /// Returns true if values are laid out back to back from byte zero.
    #[must_use]
    pub fn is_compact(&self) -> bool {
        self.offset == 0 && self.stride == 1
    }

    /// Checks that the description can be applied to memory.
    ///
    /// # Errors
    ///
    /// Returns an error for `NoType`, a zero stride, or a layout whose
    /// byte span overflows `usize`.
    pub fn validate(&self) -> Result<()> {
        if !self.type_id.is_valid() {
            return Err(Error::invalid_argument("data type has no element type"));
        }
        if self.stride == 0 {
            return Err(Error::invalid_argument("data type stride must be non-zero"));
        }
        if self.checked_span_bytes().is_none() {
            return Err(Error::invalid_argument(format!(
                "data type {self} overflows the address space"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.type_id)?;
        for (i, extent) in self.shape.iter().enumerate() {
            if i > 0 {
                write!(f, "x")?;
            }
            write!(f, "{extent}")?;
        }
        write!(f, "]")
    }
}
