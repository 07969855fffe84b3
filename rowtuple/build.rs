use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::{env, error::Error};

const MAX_ARITY: usize = 32;

fn main() -> Result<(), Box<dyn Error>> {
    // One generated test per arity, so that a mistake in the generated trait impls for any single
    // tuple width is caught by name rather than hidden inside a loop.
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("arity_tests.rs");
    let mut f = File::create(&dest_path)?;

    // File header
    writeln!(f, "#[allow(unused_imports)] use crate::prelude::*;")?;
    writeln!(f, "use crate::{{FieldState, TupleDescriptor, TupleError, Value}};")?;
    writeln!(f, "use static_assertions::assert_impl_all;")?;
    writeln!(f, "use std::convert::TryFrom;")?;
    writeln!(f)?;

    for arity in 1..=MAX_ARITY {
        let row = Row::new(arity);
        let last = arity - 1;
        let sample = row.sample(last);

        writeln!(f, "#[test]")?;
        writeln!(f, "fn arity_{}() {{", arity)?;
        writeln!(f, "    type Row = {};", row)?;
        writeln!(
            f,
            "    assert_impl_all!(Row: Fields, Position<0>, Position<{}>);",
            last
        )?;
        writeln!(
            f,
            "    let out_of_range = TupleError::OutOfRange {{ index: {0}, arity: {0} }};",
            arity
        )?;
        writeln!(f)?;

        // Compile-time arity
        writeln!(f, "    let mut typed = TypedTuple::<Row>::new();")?;
        writeln!(f, "    assert_eq!(typed.count(), {});", arity)?;
        writeln!(
            f,
            "    assert!(typed.state_vector().iter({}).all(FieldState::is_unavailable));",
            arity
        )?;
        writeln!(f, "    typed.set::<0>(None);")?;
        writeln!(f, "    typed.set::<{}>(Some({}));", last, sample)?;
        writeln!(
            f,
            "    assert_eq!(typed.get::<{}>(), (&{}, FieldState::Available));",
            last, sample
        )?;
        if arity > 1 {
            writeln!(
                f,
                "    assert_eq!(typed.field_state(0), Ok(FieldState::Null));"
            )?;
        }
        write_out_of_range(&mut f, "typed", arity)?;
        writeln!(
            f,
            "    let back = TypedTuple::<Row>::try_from(Tuple::from(typed.clone())).unwrap();"
        )?;
        writeln!(f, "    assert_eq!(back, typed);")?;
        writeln!(f)?;

        // Runtime arity, built from the same shape
        writeln!(
            f,
            "    let mut runtime = TupleFactory::create(typed.descriptor()).unwrap().into_owned();"
        )?;
        writeln!(f, "    assert_eq!(runtime.count(), {});", arity)?;
        writeln!(
            f,
            "    assert_eq!(runtime.descriptor(), &TupleDescriptor::of::<Row>());"
        )?;
        for index in 0..arity {
            let value = format!("Value::from({})", row.sample(index));
            writeln!(f, "    runtime.set_value({}, {}).unwrap();", index, value)?;
            writeln!(
                f,
                "    assert_eq!(runtime.value({}), Ok(({}, FieldState::Available)));",
                index, value
            )?;
            if index + 1 < arity {
                writeln!(
                    f,
                    "    assert_eq!(runtime.field_state({}), Ok(FieldState::Unavailable));",
                    index + 1
                )?;
            }
        }
        writeln!(f, "    assert!(runtime.is_complete());")?;
        writeln!(f, "    runtime.set_value(0, Value::Null).unwrap();")?;
        writeln!(
            f,
            "    assert_eq!(runtime.value(0), Ok((Value::Bool(false), FieldState::Null)));"
        )?;
        write_out_of_range(&mut f, "runtime", arity)?;
        writeln!(f, "}}")?;
        writeln!(f)?;
    }
    Ok(())
}

/// Every index-based access one past the last field must fail without touching the tuple.
fn write_out_of_range(f: &mut File, tuple: &str, arity: usize) -> io::Result<()> {
    writeln!(f, "    let before = {}.clone();", tuple)?;
    for call in &["field_state({})", "value({})", "set_value({}, Value::Null)"] {
        let call = call.replace("{}", &arity.to_string());
        writeln!(
            f,
            "    assert_eq!({}.{}.unwrap_err(), out_of_range);",
            tuple, call
        )?;
    }
    writeln!(f, "    assert_eq!({}, before);", tuple)
}

/// The scalar field types, each with a non-default literal of that type.
const SCALARS: &[(&str, &str)] = &[
    ("bool", "true"),
    ("i8", "-8i8"),
    ("i16", "-16i16"),
    ("i32", "-32i32"),
    ("i64", "-64i64"),
    ("u8", "8u8"),
    ("u16", "16u16"),
    ("u32", "32u32"),
    ("u64", "64u64"),
    ("f32", "1.5f32"),
    ("f64", "2.5f64"),
    ("char", "'z'"),
    ("String", "\"row\".to_owned()"),
    ("Vec<u8>", "vec![1u8, 2, 3]"),
];

/// A tuple type of some arity whose field types cycle through [`SCALARS`].
#[derive(Clone, Copy, Debug)]
pub struct Row {
    arity: usize,
}

impl Row {
    pub fn new(arity: usize) -> Self {
        Row { arity }
    }

    pub fn sample(&self, position: usize) -> &'static str {
        SCALARS[position % SCALARS.len()].1
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "(")?;
        for i in 0..self.arity {
            write!(f, "{}", SCALARS[i % SCALARS.len()].0)?;
            if i + 1 < self.arity {
                write!(f, ", ")?;
            }
        }
        if self.arity == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}
