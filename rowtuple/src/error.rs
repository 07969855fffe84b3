use thiserror::Error;

#[allow(unused_imports)] // To link with documentation
use crate::prelude::*;
use crate::{FieldState, FieldType, InvalidStateVector, TupleDescriptor, MAX_ARITY};

/// The error returned by field accessors and mutators.
///
/// Every variant indicates a programming error in the caller; none of them leave the tuple
/// modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TupleError {
    /// The index is not below the tuple's [`count`](TupleAccess::count).
    #[error("field index {index} is out of range for a tuple of arity {arity}")]
    OutOfRange {
        /// The rejected index.
        index: usize,
        /// The arity of the tuple.
        arity: usize,
    },
    /// The value's type is not exactly the field's declared type.
    #[error("field {index} holds {expected} values, but a {found} value was given")]
    InvalidCast {
        /// The field being written.
        index: usize,
        /// The field's declared type.
        expected: FieldType,
        /// The type of the rejected value.
        found: FieldType,
    },
    /// A tuple was accessed as a statically typed tuple of a different shape.
    #[error("a tuple of shape {found} cannot be accessed as {expected}")]
    ShapeMismatch {
        /// The shape of the static type requested.
        expected: TupleDescriptor,
        /// The shape of the tuple actually supplied.
        found: TupleDescriptor,
    },
}

/// The error returned by [`TupleFactory::create`] for a descriptor it cannot build a tuple from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// The descriptor claims fewer than zero fields.
    #[error("descriptor field count {0} is negative")]
    NegativeCount(isize),
    /// The descriptor has more fields than any tuple supports.
    #[error("tuples of arity {0} are not supported; the maximum arity is {}", MAX_ARITY)]
    UnsupportedArity(usize),
    /// The descriptor's count disagrees with the field types it lists.
    #[error("descriptor declares {count} fields but lists {listed} field types")]
    Malformed {
        /// The declared count.
        count: usize,
        /// The number of field types listed.
        listed: usize,
    },
}

/// The reasons a deserialized payload cannot be rehydrated into a tuple.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RehydrateError {
    /// The packed state word is ill-formed for the number of values.
    #[error(transparent)]
    States(#[from] InvalidStateVector),
    /// A slot holds the null sentinel instead of a typed value.
    #[error("slot {index} holds null instead of a typed value")]
    UntypedSlot {
        /// The offending slot.
        index: usize,
    },
    /// A slot's value does not match the declared field type.
    #[error("slot {index} holds {found} where {expected} was expected")]
    MismatchedSlot {
        /// The offending slot.
        index: usize,
        /// The declared field type.
        expected: FieldType,
        /// The type found in the payload.
        found: FieldType,
    },
    /// A slot marked unassigned or null holds something other than its type's default.
    #[error("slot {index} is {state} but holds a non-default value")]
    StaleValue {
        /// The offending slot.
        index: usize,
        /// The slot's state.
        state: FieldState,
    },
    /// The payload has the wrong number of values for a statically typed tuple.
    #[error("expected {expected} values, found {found}")]
    ArityMismatch {
        /// The arity of the static type.
        expected: usize,
        /// The number of values in the payload.
        found: usize,
    },
}
