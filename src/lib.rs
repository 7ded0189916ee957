/*!

Loading hints and timing for the answer-correctness record stream.

  * `schema` maps each column name to its storage type, so a bulk loader can skip type inference.
  * `timer` reports how long a scoped span took, on every way out of the span.

The two have nothing to do with each other beyond living in the same crate.

*/
mod storage_type;
pub mod schema;
pub mod timer;
pub mod logging;

pub use storage_type::StorageType;
pub use schema::{dtypes, lookup, Field, SchemaError};
pub use timer::{time, Timer, TimerGuard};
