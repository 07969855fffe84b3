use std::borrow::Cow;
use std::convert::TryFrom;

use rowtuple::prelude::*;
use rowtuple::{
    Describe, FactoryError, FieldState, FieldType, TupleDescriptor, TupleError, Value, MAX_ARITY,
};

/// A descriptor as it might arrive from a foreign schema, with an independently stated count.
struct Schema {
    count: isize,
    columns: Vec<FieldType>,
}

impl Describe for Schema {
    fn count(&self) -> isize {
        self.count
    }

    fn field_types(&self) -> &[FieldType] {
        &self.columns
    }
}

fn row_descriptor() -> TupleDescriptor {
    TupleDescriptor::new(vec![FieldType::Int32, FieldType::String, FieldType::Int32])
}

#[test]
fn concrete_scenario() {
    let mut tuple = TupleFactory::create(&row_descriptor()).unwrap().into_owned();
    assert_eq!(tuple.count(), 3);
    for index in 0..3 {
        assert_eq!(tuple.field_state(index), Ok(FieldState::Unavailable));
    }

    tuple.set_value(1, Value::from("abc")).unwrap();
    assert_eq!(tuple.field_state(1), Ok(FieldState::Available));
    assert_eq!(tuple.value(1).unwrap().0, Value::from("abc"));

    tuple.set_value(0, Value::Null).unwrap();
    assert_eq!(tuple.field_state(0), Ok(FieldState::Null));
    assert_eq!(tuple.field_state(2), Ok(FieldState::Unavailable));

    let copy = tuple.clone();
    for index in 0..3 {
        assert_eq!(copy.value(index), tuple.value(index));
    }
}

#[test]
fn each_arity_dispatches_to_its_own_width() {
    for arity in 1..=MAX_ARITY {
        let descriptor: TupleDescriptor =
            std::iter::repeat(FieldType::UInt16).take(arity).collect();
        let tuple = TupleFactory::create(&descriptor).unwrap();
        assert!(matches!(tuple, Cow::Owned(_)), "arity {}", arity);
        assert_eq!(tuple.count(), arity);

        let mut tuple = tuple.into_owned();
        for index in 0..arity {
            let value = Value::UInt16(index as u16 + 1);
            tuple.set_value(index, value.clone()).unwrap();
            assert_eq!(tuple.value(index), Ok((value, FieldState::Available)));
        }
        assert!(tuple.is_complete());

        let out_of_range = TupleError::OutOfRange {
            index: arity,
            arity,
        };
        assert_eq!(tuple.field_state(arity), Err(out_of_range.clone()));
        assert_eq!(tuple.value(arity), Err(out_of_range.clone()));
        assert_eq!(
            tuple.set_value(arity, Value::UInt16(0)),
            Err(out_of_range.clone())
        );
        assert_eq!(tuple.set_value(arity, Value::Null), Err(out_of_range));
    }
}

#[test]
fn zero_arity_is_shared() {
    let first = TupleFactory::create(&Schema {
        count: 0,
        columns: Vec::new(),
    })
    .unwrap();
    let second = TupleFactory::create(&TupleDescriptor::empty()).unwrap();
    assert!(std::ptr::eq(&*first, &*second));
    assert!(std::ptr::eq(&*first, TupleFactory::empty()));
    assert_eq!(first.count(), 0);
    assert!(first.field_state(0).is_err());

    // Taking ownership yields an independent, equal copy
    let owned = first.into_owned();
    assert_eq!(&owned, TupleFactory::empty());
}

#[test]
fn out_of_range_counts() {
    let negative = Schema {
        count: -1,
        columns: Vec::new(),
    };
    assert_eq!(
        TupleFactory::create(&negative).unwrap_err(),
        FactoryError::NegativeCount(-1)
    );

    let wide = Schema {
        count: 33,
        columns: vec![FieldType::Bool; 33],
    };
    assert_eq!(
        TupleFactory::create(&wide).unwrap_err(),
        FactoryError::UnsupportedArity(33)
    );
    assert_eq!(
        FactoryError::UnsupportedArity(33).to_string(),
        "tuples of arity 33 are not supported; the maximum arity is 32"
    );
}

#[test]
fn typed_and_runtime_tuples_interconvert() {
    type Row = (i32, String, i32);

    let mut typed = TupleFactory::create_typed::<Row>();
    typed.set::<0>(Some(1));
    typed.set::<1>(None);

    let runtime = Tuple::from(typed.clone());
    assert_eq!(runtime.descriptor(), &row_descriptor());
    assert_eq!(runtime.value(0), Ok((Value::Int32(1), FieldState::Available)));
    assert_eq!(runtime.field_state(1), Ok(FieldState::Null));
    assert_eq!(runtime.field_state(2), Ok(FieldState::Unavailable));

    let back = TypedTuple::<Row>::try_from(runtime).unwrap();
    assert_eq!(back, typed);
}

#[test]
fn mismatched_shapes_do_not_convert() {
    let tuple = TupleFactory::create(&row_descriptor()).unwrap().into_owned();
    let err = TypedTuple::<(i32, String)>::try_from(tuple).unwrap_err();
    assert!(matches!(err, TupleError::ShapeMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "a tuple of shape (Int32, String, Int32) cannot be accessed as (Int32, String)"
    );
}
