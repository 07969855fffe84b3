//! The runtime-arity [`Tuple`], and the [`TupleAccess`] contract shared with [`TypedTuple`].

use std::convert::TryFrom;

use crate::{
    FieldState, FieldValue, Fields, PackedStateVector, Position, RehydrateError, TupleDescriptor,
    TupleError, TypedTuple, Value,
};

/// Index-based access to the fields of a tuple, whatever its representation.
///
/// The state returned alongside a value is authoritative: a field that is not
/// [`Available`](FieldState::Available) still yields its slot's content (its type's default),
/// which must not be mistaken for an assigned value.
pub trait TupleAccess {
    /// The number of field slots. Constant for the life of the tuple; it never reflects how many
    /// fields have been assigned.
    fn count(&self) -> usize;

    /// The field types of this tuple.
    fn descriptor(&self) -> &TupleDescriptor;

    /// The packed state of every field.
    fn state_vector(&self) -> PackedStateVector;

    /// The state of the field at `index`.
    ///
    /// # Errors
    ///
    /// [`TupleError::OutOfRange`] if `index >= self.count()`.
    fn field_state(&self, index: usize) -> Result<FieldState, TupleError> {
        check_index(index, self.count())?;
        Ok(self.state_vector().get(index))
    }

    /// The content of the field at `index` along with its state.
    ///
    /// # Errors
    ///
    /// [`TupleError::OutOfRange`] if `index >= self.count()`.
    fn value(&self, index: usize) -> Result<(Value, FieldState), TupleError>;

    /// Assign the field at `index`.
    ///
    /// Assigning [`Value::Null`] marks the field [`Null`](FieldState::Null) and resets its slot to
    /// the type's default. Any other value must have exactly the field's type; it is stored and
    /// the field marked [`Available`](FieldState::Available). No other field is touched.
    ///
    /// # Errors
    ///
    /// [`TupleError::OutOfRange`] if `index >= self.count()`, or [`TupleError::InvalidCast`] if
    /// the value's type differs from the field's. The tuple is unchanged on error.
    fn set_value(&mut self, index: usize, value: Value) -> Result<(), TupleError>;

    /// A fresh tuple of the same shape, with every field
    /// [`Unavailable`](FieldState::Unavailable).
    fn create_new(&self) -> Self
    where
        Self: Sized;

    /// `true` if no field is [`Unavailable`](FieldState::Unavailable).
    fn is_complete(&self) -> bool {
        self.state_vector()
            .iter(self.count())
            .all(|state| !state.is_unavailable())
    }
}

pub(crate) fn check_index(index: usize, arity: usize) -> Result<(), TupleError> {
    if index < arity {
        Ok(())
    } else {
        Err(TupleError::OutOfRange { index, arity })
    }
}

/// A tuple whose arity and field types are known only at runtime, as described by a
/// [`TupleDescriptor`].
///
/// Descriptor-driven construction goes through [`TupleFactory::create`](crate::TupleFactory);
/// a `Tuple` may also be converted from a [`TypedTuple`].
///
/// # Examples
///
/// ```
/// use rowtuple::prelude::*;
/// use rowtuple::{FieldState, FieldType, TupleDescriptor, Value};
///
/// let descriptor =
///     TupleDescriptor::new(vec![FieldType::Int32, FieldType::String, FieldType::Int32]);
/// let mut tuple = TupleFactory::create(&descriptor)?.into_owned();
/// assert_eq!(tuple.count(), 3);
///
/// tuple.set_value(1, "abc".into())?;
/// assert_eq!(tuple.value(1)?, (Value::from("abc"), FieldState::Available));
///
/// tuple.set_value(0, Value::Null)?;
/// assert_eq!(tuple.field_state(0)?, FieldState::Null);
/// assert_eq!(tuple.value(0)?.0, Value::Int32(0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    descriptor: TupleDescriptor,
    values: Box<[Value]>,
    states: PackedStateVector,
}

impl Tuple {
    /// An all-[`Unavailable`](FieldState::Unavailable) tuple of the described shape. The
    /// descriptor's arity has already been checked by the factory.
    pub(crate) fn with_descriptor(descriptor: TupleDescriptor) -> Self {
        let values = descriptor
            .field_types()
            .iter()
            .map(|ty| ty.default_value())
            .collect();
        Tuple {
            descriptor,
            values,
            states: PackedStateVector::new(),
        }
    }

    /// Reassemble a tuple whose parts are already known to agree with one another.
    pub(crate) fn from_parts(
        descriptor: TupleDescriptor,
        values: Box<[Value]>,
        states: PackedStateVector,
    ) -> Self {
        debug_assert_eq!(descriptor.count(), values.len());
        Tuple {
            descriptor,
            values,
            states,
        }
    }

    /// Borrow the content of the field at `index` along with its state.
    ///
    /// # Errors
    ///
    /// [`TupleError::OutOfRange`] if `index >= self.count()`.
    pub fn value_ref(&self, index: usize) -> Result<(&Value, FieldState), TupleError> {
        check_index(index, self.values.len())?;
        Ok((&self.values[index], self.states.get(index)))
    }

    /// Every slot with its state, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, FieldState)> + '_ {
        let states = self.states;
        self.values
            .iter()
            .enumerate()
            .map(move |(index, value)| (value, states.get(index)))
    }

    fn check_shape<T: Fields>(&self) -> Result<(), TupleError> {
        if self.descriptor.field_types() == T::FIELD_TYPES {
            Ok(())
        } else {
            Err(self.shape_mismatch::<T>())
        }
    }

    fn shape_mismatch<T: Fields>(&self) -> TupleError {
        TupleError::ShapeMismatch {
            expected: TupleDescriptor::of::<T>(),
            found: self.descriptor.clone(),
        }
    }

    /// Read field `K` as the Rust type declared for it by the static tuple type `T`.
    ///
    /// # Errors
    ///
    /// [`TupleError::ShapeMismatch`] if this tuple's field types are not exactly `T`'s.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowtuple::prelude::*;
    /// use rowtuple::{FieldState, TupleDescriptor};
    ///
    /// type Row = (i32, String, i32);
    ///
    /// let mut tuple = TupleFactory::create(&TupleDescriptor::of::<Row>())?.into_owned();
    /// tuple.set_as::<Row, 1>(Some("abc".to_owned()))?;
    /// assert_eq!(tuple.get_as::<Row, 1>()?, ("abc".to_owned(), FieldState::Available));
    ///
    /// assert!(tuple.get_as::<(i32, String), 1>().is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn get_as<T, const K: usize>(
        &self,
    ) -> Result<(<T as Position<K>>::Field, FieldState), TupleError>
    where
        T: Position<K>,
    {
        self.check_shape::<T>()?;
        let field = <T as Position<K>>::Field::from_value(self.values[K].clone())
            .map_err(|_| self.shape_mismatch::<T>())?;
        Ok((field, self.states.get(K)))
    }

    /// Assign field `K` as the Rust type declared for it by the static tuple type `T`; `None`
    /// assigns null.
    ///
    /// # Errors
    ///
    /// [`TupleError::ShapeMismatch`] if this tuple's field types are not exactly `T`'s.
    pub fn set_as<T, const K: usize>(
        &mut self,
        value: Option<<T as Position<K>>::Field>,
    ) -> Result<(), TupleError>
    where
        T: Position<K>,
    {
        self.check_shape::<T>()?;
        match value {
            Some(field) => {
                self.values[K] = field.into_value();
                self.states.set(K, FieldState::Available);
            }
            None => {
                self.values[K] = <T as Position<K>>::Field::default().into_value();
                self.states.set(K, FieldState::Null);
            }
        }
        Ok(())
    }

    /// Rebuild a tuple from a deserialized payload, recomputing its descriptor from the types of
    /// the values themselves.
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn rehydrate(values: Vec<Value>, states: u64) -> Result<Self, RehydrateError> {
        let states = PackedStateVector::from_bits(states, values.len())?;

        let mut field_types = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            let ty = value
                .field_type()
                .ok_or(RehydrateError::UntypedSlot { index })?;
            let state = states.get(index);
            if !state.is_available() && !value.is_default() {
                return Err(RehydrateError::StaleValue { index, state });
            }
            field_types.push(ty);
        }

        let descriptor = TupleDescriptor::new(field_types);
        tracing::trace!(arity = descriptor.count(), %descriptor, "rehydrated tuple");
        Ok(Tuple::from_parts(descriptor, values.into_boxed_slice(), states))
    }
}

impl TupleAccess for Tuple {
    fn count(&self) -> usize {
        self.values.len()
    }

    fn descriptor(&self) -> &TupleDescriptor {
        &self.descriptor
    }

    fn state_vector(&self) -> PackedStateVector {
        self.states
    }

    fn value(&self, index: usize) -> Result<(Value, FieldState), TupleError> {
        self.value_ref(index)
            .map(|(value, state)| (value.clone(), state))
    }

    fn set_value(&mut self, index: usize, value: Value) -> Result<(), TupleError> {
        check_index(index, self.values.len())?;
        let expected = self.descriptor.field_types()[index];
        match value.field_type() {
            None => {
                self.values[index] = expected.default_value();
                self.states.set(index, FieldState::Null);
            }
            Some(found) if found == expected => {
                self.values[index] = value;
                self.states.set(index, FieldState::Available);
            }
            Some(found) => {
                return Err(TupleError::InvalidCast {
                    index,
                    expected,
                    found,
                })
            }
        }
        Ok(())
    }

    fn create_new(&self) -> Self {
        Tuple::with_descriptor(self.descriptor.clone())
    }
}

impl<T: Fields> From<TypedTuple<T>> for Tuple {
    fn from(typed: TypedTuple<T>) -> Self {
        let values = (0..T::ARITY)
            .filter_map(|index| typed.fields().value(index))
            .collect();
        Tuple::from_parts(typed.descriptor().clone(), values, typed.state_vector())
    }
}

impl<T: Fields> TryFrom<Tuple> for TypedTuple<T> {
    type Error = TupleError;

    fn try_from(tuple: Tuple) -> Result<Self, Self::Error> {
        tuple.check_shape::<T>()?;
        let mismatch = tuple.shape_mismatch::<T>();
        let Tuple { values, states, .. } = tuple;

        let mut fields = T::default_fields();
        for (index, value) in values.into_vec().into_iter().enumerate() {
            fields
                .set_value(index, value)
                .map_err(|_| mismatch.clone())?;
        }
        Ok(TypedTuple::from_parts(fields, states))
    }
}

#[cfg(feature = "serde")]
pub(crate) mod serialization {
    use super::*;

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    /// The serialized form shared by [`Tuple`] and [`TypedTuple`]: the slot values and the packed
    /// state word. The descriptor is not part of the payload.
    #[derive(Serialize)]
    pub(crate) struct Payload<'a> {
        pub(crate) values: &'a [Value],
        pub(crate) states: u64,
    }

    #[derive(Deserialize)]
    pub(crate) struct OwnedPayload {
        pub(crate) values: Vec<Value>,
        pub(crate) states: u64,
    }

    impl Serialize for Tuple {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            Payload {
                values: &self.values,
                states: self.states.bits(),
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Tuple {
        fn deserialize<D>(deserializer: D) -> Result<Tuple, D::Error>
        where
            D: Deserializer<'de>,
        {
            let OwnedPayload { values, states } = OwnedPayload::deserialize(deserializer)?;
            Tuple::rehydrate(values, states).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldType, TupleFactory};

    fn scenario() -> Tuple {
        let descriptor =
            TupleDescriptor::new(vec![FieldType::Int32, FieldType::String, FieldType::Int32]);
        TupleFactory::create(&descriptor).unwrap().into_owned()
    }

    #[test]
    fn fresh_tuple_is_unavailable() {
        let tuple = scenario();
        assert_eq!(tuple.count(), 3);
        for index in 0..3 {
            assert_eq!(tuple.field_state(index), Ok(FieldState::Unavailable));
        }
        assert_eq!(tuple.value(2), Ok((Value::Int32(0), FieldState::Unavailable)));
        assert!(!tuple.is_complete());
    }

    #[test]
    fn set_then_get() {
        let mut tuple = scenario();
        tuple.set_value(1, "abc".into()).unwrap();
        assert_eq!(
            tuple.value(1),
            Ok((Value::String("abc".to_owned()), FieldState::Available))
        );
        assert_eq!(tuple.value_ref(1).unwrap().0, &Value::from("abc"));
    }

    #[test]
    fn null_resets_to_default() {
        let mut tuple = scenario();
        tuple.set_value(0, Value::Int32(42)).unwrap();
        tuple.set_value(0, Value::Null).unwrap();
        assert_eq!(tuple.field_state(0), Ok(FieldState::Null));
        assert_eq!(tuple.value(0), Ok((Value::Int32(0), FieldState::Null)));
    }

    #[test]
    fn setting_one_field_leaves_others_alone() {
        let mut tuple = scenario();
        tuple.set_value(2, Value::Int32(9)).unwrap();
        tuple.set_value(1, Value::Null).unwrap();
        assert_eq!(tuple.field_state(0), Ok(FieldState::Unavailable));
        assert_eq!(tuple.field_state(1), Ok(FieldState::Null));
        assert_eq!(tuple.field_state(2), Ok(FieldState::Available));
    }

    #[test]
    fn mismatched_type_is_rejected_without_change() {
        let mut tuple = scenario();
        tuple.set_value(0, Value::Int32(1)).unwrap();
        assert_eq!(
            tuple.set_value(0, Value::Int64(2)),
            Err(TupleError::InvalidCast {
                index: 0,
                expected: FieldType::Int32,
                found: FieldType::Int64,
            })
        );
        assert_eq!(tuple.value(0), Ok((Value::Int32(1), FieldState::Available)));
    }

    #[test]
    fn out_of_range() {
        let mut tuple = scenario();
        let err = TupleError::OutOfRange { index: 3, arity: 3 };
        assert_eq!(tuple.field_state(3), Err(err.clone()));
        assert_eq!(tuple.value(3), Err(err.clone()));
        assert_eq!(tuple.set_value(3, Value::Int32(0)), Err(err));
        assert!(tuple.value(usize::MAX).is_err());
    }

    #[test]
    fn clone_is_independent() {
        let mut original = scenario();
        original.set_value(0, Value::Int32(5)).unwrap();
        original.set_value(1, Value::Null).unwrap();

        let mut copy = original.clone();
        assert_eq!(copy, original);
        assert!(copy.descriptor().ptr_eq(original.descriptor()));

        copy.set_value(2, Value::Int32(7)).unwrap();
        assert_eq!(original.field_state(2), Ok(FieldState::Unavailable));
        assert_ne!(copy.state_vector(), original.state_vector());
    }

    #[test]
    fn create_new_is_empty_with_same_shape() {
        let mut tuple = scenario();
        tuple.set_value(0, Value::Int32(5)).unwrap();
        let fresh = tuple.create_new();
        assert_eq!(fresh.descriptor(), tuple.descriptor());
        assert_eq!(fresh.state_vector(), PackedStateVector::new());
    }

    #[test]
    fn iterates_slots_in_order() {
        let mut tuple = scenario();
        tuple.set_value(0, Value::Int32(1)).unwrap();
        tuple.set_value(1, Value::Null).unwrap();
        let states: Vec<FieldState> = tuple.iter().map(|(_, state)| state).collect();
        assert_eq!(
            states,
            vec![FieldState::Available, FieldState::Null, FieldState::Unavailable]
        );
    }

    #[test]
    fn typed_access_checks_shape() {
        let mut tuple = scenario();
        tuple.set_as::<(i32, String, i32), 2>(Some(11)).unwrap();
        tuple.set_as::<(i32, String, i32), 1>(None).unwrap();
        assert_eq!(
            tuple.get_as::<(i32, String, i32), 2>(),
            Ok((11, FieldState::Available))
        );
        assert_eq!(
            tuple.get_as::<(i32, String, i32), 1>(),
            Ok((String::new(), FieldState::Null))
        );
        assert_eq!(
            tuple.get_as::<(i64, String, i32), 1>(),
            Err(TupleError::ShapeMismatch {
                expected: TupleDescriptor::of::<(i64, String, i32)>(),
                found: tuple.descriptor().clone(),
            })
        );
    }

    #[test]
    fn converts_to_and_from_typed() {
        let mut tuple = scenario();
        tuple.set_value(1, "x".into()).unwrap();
        tuple.set_value(2, Value::Null).unwrap();

        let typed = TypedTuple::<(i32, String, i32)>::try_from(tuple.clone()).unwrap();
        assert_eq!(typed.get::<1>(), (&"x".to_owned(), FieldState::Available));
        assert_eq!(typed.state_vector(), tuple.state_vector());

        assert_eq!(Tuple::from(typed), tuple);
        assert!(TypedTuple::<(i32, String)>::try_from(tuple).is_err());
    }

    #[test]
    fn rehydrate_recomputes_descriptor() {
        let mut states = PackedStateVector::new();
        states.set(0, FieldState::Available);
        states.set(1, FieldState::Null);
        let tuple = Tuple::rehydrate(
            vec![Value::Bool(true), Value::Char('\0'), Value::Int8(0)],
            states.bits(),
        )
        .unwrap();
        assert_eq!(
            tuple.descriptor().field_types(),
            &[FieldType::Bool, FieldType::Char, FieldType::Int8]
        );
        assert_eq!(tuple.field_state(1), Ok(FieldState::Null));
    }

    #[test]
    fn rehydrate_rejects_malformed_payloads() {
        assert_eq!(
            Tuple::rehydrate(vec![Value::Null], 0),
            Err(RehydrateError::UntypedSlot { index: 0 })
        );
        assert_eq!(
            Tuple::rehydrate(vec![Value::Int32(3)], 0),
            Err(RehydrateError::StaleValue {
                index: 0,
                state: FieldState::Unavailable
            })
        );
        assert!(Tuple::rehydrate(vec![Value::Int32(3)], 0b11).is_err());
        assert!(Tuple::rehydrate(vec![Value::Int32(3)], 0b01_01).is_err());
    }
}
