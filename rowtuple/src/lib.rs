/*!
Fixed-arity heterogeneous row tuples that track, per field, whether a value has ever been
assigned, was explicitly set to null, or holds a real value.

A row in a data pipeline is rarely "a struct with all fields filled in". Fields arrive one at a
time, some are legitimately null, and some have simply not been produced yet. This crate gives
each row a small, allocation-light representation in which those three situations are
distinguished by a [`FieldState`], packed two bits per field into a single `u64`
([`PackedStateVector`]). A tuple never needs more than that one word of bookkeeping, which is why
arities are capped at [`MAX_ARITY`].

# Two representations, one contract

- [`Tuple`] has a shape known only at runtime, described by a [`TupleDescriptor`]. Build one
  with [`TupleFactory::create`].
- [`TypedTuple<T>`] has a shape fixed at compile time by an ordinary Rust tuple `T`, and offers
  statically typed access through [`get`](TypedTuple::get) and [`set`](TypedTuple::set).

Both implement [`TupleAccess`], the index-based contract: read a field's state, read its value
(always alongside its state), assign a value or [`Value::Null`], or make a fresh tuple of the
same shape. Both can be converted into one another when their shapes agree.

```
use rowtuple::prelude::*;
use rowtuple::{FieldState, FieldType, TupleDescriptor, Value};

let descriptor =
    TupleDescriptor::new(vec![FieldType::Int32, FieldType::String, FieldType::Int32]);
let mut row = TupleFactory::create(&descriptor)?.into_owned();

// Nothing has been assigned yet
assert!(row.state_vector().iter(row.count()).all(FieldState::is_unavailable));

row.set_value(1, Value::from("abc"))?;
row.set_value(0, Value::Null)?;

assert_eq!(row.field_state(0)?, FieldState::Null);
assert_eq!(row.value(1)?, (Value::from("abc"), FieldState::Available));
assert_eq!(row.field_state(2)?, FieldState::Unavailable);

// The same row, with its shape in the type
let typed: TypedTuple<(i32, String, i32)> = std::convert::TryFrom::try_from(row)?;
assert_eq!(typed.get::<1>(), (&"abc".to_owned(), FieldState::Available));
# Ok::<(), Box<dyn std::error::Error>>(())
```

# The zero-field tuple

A descriptor with no fields always yields the same shared, immutable [`Tuple`], borrowed from a
static: [`TupleFactory::create`] returns a [`Cow`](std::borrow::Cow) so that this case costs
nothing.

# Features

- `serde` (on by default): [`Tuple`], [`TypedTuple`], [`Value`], and [`FieldType`] implement
  `Serialize` and `Deserialize`. A serialized tuple is its slot values plus its packed state
  word; the descriptor is recomputed when it is deserialized, and payloads whose states and
  values disagree are rejected.
*/

#![allow(clippy::type_complexity)]
#![warn(missing_docs)]
#![warn(missing_copy_implementations, missing_debug_implementations)]
#![warn(unused_qualifications, unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate derivative;

mod descriptor;
mod error;
mod factory;
mod state;
mod tuple;
mod typed;
mod value;

pub use descriptor::{Describe, TupleDescriptor};
pub use error::{FactoryError, RehydrateError, TupleError};
pub use factory::TupleFactory;
pub use state::{FieldState, InvalidStateVector, PackedStateVector, BITS_PER_FIELD, MAX_ARITY};
pub use tuple::{Tuple, TupleAccess};
pub use typed::{Fields, Position, TypedTuple};
pub use value::{FieldType, FieldValue, Value};

/// The traits and types needed to build tuples and work with their fields.
///
/// ```
/// use rowtuple::prelude::*;
/// ```
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{FieldValue, Fields, Position};
    #[doc(no_inline)]
    pub use crate::{Tuple, TupleAccess, TupleFactory, TypedTuple};
}
