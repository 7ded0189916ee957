/*!

The storage type of a column, e.g. `Int32`, `Float64`, ….

A storage type tag says how the values of a field should be stored when the record stream is loaded.
The canonical names are the NumPy dtype spellings, so a tag can be handed to a loader as a string.

*/

use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, IntoStaticStr, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum StorageType {
  /// 64-bit signed integer
  Int64,
  /// 32-bit signed integer
  Int32,
  /// 64-bit IEEE 754 floating point
  Float64,
  /// No fixed storage type. Values may be of any kind, or missing, and the consumer has to cope with that.
  Object,
}

impl StorageType {
  /// The canonical (NumPy) name of the tag.
  pub fn name(&self) -> &'static str {
    (*self).into()
  }

  pub fn bit_width(&self) -> Option<u32> {
    match self {
      StorageType::Int64   => Some(64),
      StorageType::Int32   => Some(32),
      StorageType::Float64 => Some(64),
      StorageType::Object  => None,
    }
  }

  pub fn size_in_bytes(&self) -> Option<usize> {
    self.bit_width().map(|bits| bits as usize / 8)
  }

  pub fn is_integer(&self) -> bool {
    matches!(self, StorageType::Int64 | StorageType::Int32)
  }

  pub fn is_float(&self) -> bool {
    *self == StorageType::Float64
  }

  pub fn is_opaque(&self) -> bool {
    *self == StorageType::Object
  }
}
