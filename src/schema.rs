/*!

Storage type hints for the columns of the answer-correctness record stream.

The table is built once, on first access, and never changes afterward. A loader consults it to avoid
type inference on a large flat file. It is a hint and nothing more: nothing here rejects or coerces a
malformed record.

```
let tag = riiid_util::schema::lookup("user_id");
assert_eq!(tag, Some(riiid_util::StorageType::Int32));
```

*/

use fnv::FnvHashMap;
use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

use crate::storage_type::StorageType;


pub type DTypeMap = FnvHashMap<&'static str, StorageType>;

lazy_static! {
  static ref DTYPES: DTypeMap = Field::iter().map(|field| (field.name(), field.storage_type())).collect();
}


/// A column of the record stream. The string form of each variant is the column name.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, IntoStaticStr, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
  RowId,
  Timestamp,
  UserId,
  ContentId,
  ContentTypeId,
  TaskContainerId,
  UserAnswer,
  AnsweredCorrectly,
  PriorQuestionElapsedTime,
  // Left opaque. Nothing says it is a nullable boolean, so it is not narrowed to one.
  PriorQuestionHadExplanation,
}

impl Field {
  pub fn name(&self) -> &'static str {
    (*self).into()
  }

  pub fn storage_type(&self) -> StorageType {
    match self {
      Field::RowId => StorageType::Int64,

      Field::Timestamp
      | Field::UserId
      | Field::ContentId
      | Field::ContentTypeId
      | Field::TaskContainerId
      | Field::UserAnswer
      | Field::AnsweredCorrectly => StorageType::Int32,

      Field::PriorQuestionElapsedTime => StorageType::Float64,

      Field::PriorQuestionHadExplanation => StorageType::Object,
    }
  }
}


#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
  #[error("no storage type is known for field `{0}`")]
  UnknownField(String),
}


/// The whole field name → storage type table.
pub fn dtypes() -> &'static DTypeMap {
  &DTYPES
}

/// Exact, case-sensitive lookup. Names outside the table give `None`.
pub fn lookup(name: &str) -> Option<StorageType> {
  DTYPES.get(name).copied()
}

pub fn require(name: &str) -> Result<StorageType, SchemaError> {
  lookup(name).ok_or_else(|| SchemaError::UnknownField(name.to_string()))
}

/// Every field stored as `storage_type`, in declaration order.
pub fn fields_of(storage_type: StorageType) -> impl Iterator<Item = Field> {
  Field::iter().filter(move |field| field.storage_type() == storage_type)
}
