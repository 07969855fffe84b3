//! Tuples whose arity and field types are fixed at compile time.
//!
//! A [`TypedTuple<T>`] stores an ordinary Rust tuple `T` together with a packed state word. `T`
//! must implement [`Fields`], which this crate implements for `()` and for every tuple of up to
//! [`MAX_ARITY`](crate::MAX_ARITY) [`FieldValue`]s. Each position `K` of such a tuple also
//! implements [`Position<K>`], which gives [`get`](TypedTuple::get) and [`set`](TypedTuple::set)
//! their statically typed results.

use std::fmt;

use crate::{
    tuple::check_index, FieldState, FieldType, FieldValue, PackedStateVector, TupleAccess,
    TupleDescriptor, TupleError, Value,
};

/// A Rust tuple usable as the storage of a [`TypedTuple`].
///
/// This trait is already implemented for `()` and every tuple of [`FieldValue`]s of arity up to
/// 32, and there is nothing else it is meant to be implemented for.
pub trait Fields: Clone + Sized + 'static {
    /// The number of fields.
    const ARITY: usize;

    /// The type of each field, in order.
    const FIELD_TYPES: &'static [FieldType];

    /// Every field at its type's default.
    fn default_fields() -> Self;

    /// The field at `index` with its type erased, or `None` past the last field.
    fn value(&self, index: usize) -> Option<Value>;

    /// Overwrite the field at `index`. Hands the value back if its variant does not exactly
    /// match the field's type, or if `index` is past the last field.
    fn set_value(&mut self, index: usize, value: Value) -> Result<(), Value>;

    /// Field-by-field equality. Rust's standard tuple impls of `PartialEq` stop at arity 12.
    fn fields_eq(&self, other: &Self) -> bool;
}

/// Static access to position `K` of a [`Fields`] tuple.
pub trait Position<const K: usize>: Fields {
    /// The Rust type of field `K`.
    type Field: FieldValue;

    /// Borrow field `K`.
    fn field(&self) -> &Self::Field;

    /// Mutably borrow field `K`.
    fn field_mut(&mut self) -> &mut Self::Field;
}

rowtuple_macro::impl_tuples!(32);

fn eq_fields<T: Fields>(a: &T, b: &T) -> bool {
    a.fields_eq(b)
}

/// A tuple of compile-time arity, holding the Rust tuple `T` and the state of each of its fields.
///
/// # Examples
///
/// ```
/// use rowtuple::prelude::*;
/// use rowtuple::{FieldState, Value};
///
/// let mut row = TypedTuple::<(i32, String, i32)>::new();
/// assert_eq!(row.count(), 3);
///
/// row.set::<1>(Some("abc".to_owned()));
/// assert_eq!(row.get::<1>(), (&"abc".to_owned(), FieldState::Available));
///
/// row.set::<0>(None);
/// assert_eq!(row.get::<0>(), (&0, FieldState::Null));
///
/// // The index-based contract is available too
/// row.set_value(2, Value::Int32(7))?;
/// assert_eq!(row.get::<2>(), (&7, FieldState::Available));
/// # Ok::<(), rowtuple::TupleError>(())
/// ```
#[derive(Derivative)]
#[derivative(Clone(bound = ""), PartialEq(bound = ""))]
pub struct TypedTuple<T: Fields> {
    #[derivative(PartialEq(compare_with = "eq_fields"))]
    fields: T,
    states: PackedStateVector,
    #[derivative(PartialEq = "ignore")]
    descriptor: TupleDescriptor,
}

// Rust's tuples only implement `Debug` up to arity 12, so the fields are shown as values
impl<T: Fields> fmt::Debug for TypedTuple<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let values: Vec<Value> = (0..T::ARITY)
            .filter_map(|index| self.fields.value(index))
            .collect();
        f.debug_struct("TypedTuple")
            .field("fields", &values)
            .field("states", &self.states)
            .finish()
    }
}

impl<T: Fields> Default for TypedTuple<T> {
    fn default() -> Self {
        TypedTuple::new()
    }
}

impl<T: Fields> TypedTuple<T> {
    /// A tuple with every field [`Unavailable`](FieldState::Unavailable).
    pub fn new() -> Self {
        TypedTuple::from_parts(T::default_fields(), PackedStateVector::new())
    }

    /// A tuple with every field [`Available`](FieldState::Available), holding `fields`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowtuple::prelude::*;
    ///
    /// let row = TypedTuple::from_fields((true, 'x'));
    /// assert!(row.is_complete());
    /// ```
    pub fn from_fields(fields: T) -> Self {
        let mut states = PackedStateVector::new();
        for index in 0..T::ARITY {
            states.set(index, FieldState::Available);
        }
        TypedTuple::from_parts(fields, states)
    }

    pub(crate) fn from_parts(fields: T, states: PackedStateVector) -> Self {
        TypedTuple {
            fields,
            states,
            descriptor: TupleDescriptor::of::<T>(),
        }
    }

    /// Borrow field `K` along with its state.
    pub fn get<const K: usize>(&self) -> (&<T as Position<K>>::Field, FieldState)
    where
        T: Position<K>,
    {
        (<T as Position<K>>::field(&self.fields), self.states.get(K))
    }

    /// Assign field `K`. `Some` stores the value and marks it
    /// [`Available`](FieldState::Available); `None` resets it to the default and marks it
    /// [`Null`](FieldState::Null).
    pub fn set<const K: usize>(&mut self, value: Option<<T as Position<K>>::Field>)
    where
        T: Position<K>,
    {
        let (field, state) = match value {
            Some(field) => (field, FieldState::Available),
            None => (Default::default(), FieldState::Null),
        };
        *<T as Position<K>>::field_mut(&mut self.fields) = field;
        self.states.set(K, state);
    }

    /// Borrow the underlying Rust tuple. Fields that are not
    /// [`Available`](FieldState::Available) hold their defaults.
    pub fn fields(&self) -> &T {
        &self.fields
    }

    /// Unwrap the underlying Rust tuple, discarding field states.
    pub fn into_fields(self) -> T {
        self.fields
    }

    /// Recompute the cached descriptor from `T`; used after deserialization, where the
    /// descriptor is not part of the payload.
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    fn rehydrate(&mut self) {
        self.descriptor = TupleDescriptor::of::<T>();
        tracing::trace!(arity = T::ARITY, descriptor = %self.descriptor, "rehydrated typed tuple");
    }
}

impl<T: Fields> TupleAccess for TypedTuple<T> {
    fn count(&self) -> usize {
        T::ARITY
    }

    fn descriptor(&self) -> &TupleDescriptor {
        &self.descriptor
    }

    fn state_vector(&self) -> PackedStateVector {
        self.states
    }

    fn value(&self, index: usize) -> Result<(Value, FieldState), TupleError> {
        check_index(index, T::ARITY)?;
        let value = self
            .fields
            .value(index)
            .ok_or(TupleError::OutOfRange {
                index,
                arity: T::ARITY,
            })?;
        Ok((value, self.states.get(index)))
    }

    fn set_value(&mut self, index: usize, value: Value) -> Result<(), TupleError> {
        check_index(index, T::ARITY)?;
        let expected = T::FIELD_TYPES[index];
        let (value, state) = match value.field_type() {
            None => (expected.default_value(), FieldState::Null),
            Some(found) if found == expected => (value, FieldState::Available),
            Some(found) => {
                return Err(TupleError::InvalidCast {
                    index,
                    expected,
                    found,
                })
            }
        };
        self.fields
            .set_value(index, value)
            .map_err(|value| TupleError::InvalidCast {
                index,
                expected,
                found: value.field_type().unwrap_or(expected),
            })?;
        self.states.set(index, state);
        Ok(())
    }

    fn create_new(&self) -> Self {
        TypedTuple::new()
    }
}

#[cfg(feature = "serde")]
mod serialization {
    use super::*;
    use crate::{
        tuple::serialization::{OwnedPayload, Payload},
        RehydrateError,
    };

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl<T: Fields> Serialize for TypedTuple<T> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let values: Vec<Value> = (0..T::ARITY)
                .filter_map(|index| self.fields.value(index))
                .collect();
            Payload {
                values: &values,
                states: self.states.bits(),
            }
            .serialize(serializer)
        }
    }

    fn rehydrate<T: Fields>(payload: OwnedPayload) -> Result<TypedTuple<T>, RehydrateError> {
        let OwnedPayload { values, states } = payload;
        if values.len() != T::ARITY {
            return Err(RehydrateError::ArityMismatch {
                expected: T::ARITY,
                found: values.len(),
            });
        }
        let states = PackedStateVector::from_bits(states, T::ARITY)?;

        let mut fields = T::default_fields();
        for (index, value) in values.into_iter().enumerate() {
            let expected = T::FIELD_TYPES[index];
            let found = value
                .field_type()
                .ok_or(RehydrateError::UntypedSlot { index })?;
            let state = states.get(index);
            if !state.is_available() && !value.is_default() {
                return Err(RehydrateError::StaleValue { index, state });
            }
            fields
                .set_value(index, value)
                .map_err(|_| RehydrateError::MismatchedSlot {
                    index,
                    expected,
                    found,
                })?;
        }

        // The descriptor placed here is provisional; the hook below is what restores it
        let mut tuple = TypedTuple {
            fields,
            states,
            descriptor: TupleDescriptor::empty(),
        };
        tuple.rehydrate();
        Ok(tuple)
    }

    impl<'de, T: Fields> Deserialize<'de> for TypedTuple<T> {
        fn deserialize<D>(deserializer: D) -> Result<TypedTuple<T>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let payload = OwnedPayload::deserialize(deserializer)?;
            rehydrate(payload).map_err(de::Error::custom)
        }
    }
}
