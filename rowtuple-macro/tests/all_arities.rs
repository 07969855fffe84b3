use rowtuple::{FieldType, Fields, Position, TupleDescriptor};
use static_assertions::{assert_impl_all, assert_not_impl_any, assert_type_eq_all};

type Wide = (
    u8,
    u16,
    u32,
    u64,
    i8,
    i16,
    i32,
    i64,
    f32,
    f64,
    bool,
    char,
    String,
    Vec<u8>,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    String,
);

type TooWide = (
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
    u8,
);

assert_impl_all!((): Fields);
assert_impl_all!((bool,): Fields, Position<0>);
assert_impl_all!(Wide: Fields, Position<0>, Position<13>, Position<31>);
assert_not_impl_any!(Wide: Position<32>);
assert_not_impl_any!(TooWide: Fields);

assert_type_eq_all!(<Wide as Position<13>>::Field, Vec<u8>);
assert_type_eq_all!(<Wide as Position<31>>::Field, String);
assert_type_eq_all!(<(i32, char) as Position<1>>::Field, char);

#[test]
fn arity_constants() {
    assert_eq!(<() as Fields>::ARITY, 0);
    assert_eq!(<(bool,) as Fields>::ARITY, 1);
    assert_eq!(<Wide as Fields>::ARITY, 32);
}

#[test]
fn field_types_follow_declaration_order() {
    let types = <Wide as Fields>::FIELD_TYPES;
    assert_eq!(types.len(), 32);
    assert_eq!(
        &types[..4],
        &[
            FieldType::UInt8,
            FieldType::UInt16,
            FieldType::UInt32,
            FieldType::UInt64
        ]
    );
    assert_eq!(types[13], FieldType::Bytes);
    assert_eq!(types[31], FieldType::String);
    assert_eq!(TupleDescriptor::of::<Wide>().count(), 32);
}

#[test]
fn default_fields_and_equality() {
    let a = <Wide as Fields>::default_fields();
    let mut b = a.clone();
    assert!(a.fields_eq(&b));
    *<Wide as Position<31>>::field_mut(&mut b) = "changed".to_owned();
    assert!(!a.fields_eq(&b));
    assert_eq!(<Wide as Position<31>>::field(&b), "changed");
}
