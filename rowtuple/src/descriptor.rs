use std::{fmt, iter::FromIterator, sync::Arc};

use crate::{FieldType, Fields};

/// The ordered field types of a tuple.
///
/// Descriptors are immutable and cheap to clone: clones share one allocation, so every tuple
/// built from the same descriptor refers to the same field type list rather than owning a copy.
///
/// # Examples
///
/// ```
/// use rowtuple::{FieldType, TupleDescriptor};
///
/// let descriptor = TupleDescriptor::new(vec![FieldType::Int32, FieldType::String]);
/// assert_eq!(descriptor.count(), 2);
/// assert_eq!(descriptor.field_type(1), Some(FieldType::String));
/// assert_eq!(descriptor.to_string(), "(Int32, String)");
///
/// assert_eq!(descriptor, TupleDescriptor::of::<(i32, String)>());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleDescriptor {
    field_types: Arc<[FieldType]>,
}

impl TupleDescriptor {
    /// A descriptor listing `field_types` in order.
    pub fn new(field_types: Vec<FieldType>) -> Self {
        TupleDescriptor {
            field_types: Arc::from(field_types),
        }
    }

    /// The descriptor of the zero-field tuple.
    pub fn empty() -> Self {
        TupleDescriptor::new(Vec::new())
    }

    /// The descriptor of a statically typed tuple, derived from its type parameters.
    pub fn of<T: Fields>() -> Self {
        TupleDescriptor {
            field_types: Arc::from(T::FIELD_TYPES),
        }
    }

    /// The number of fields.
    pub fn count(&self) -> usize {
        self.field_types.len()
    }

    /// `true` if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.field_types.is_empty()
    }

    /// All field types, in order.
    pub fn field_types(&self) -> &[FieldType] {
        &self.field_types
    }

    /// The type of the field at `index`, if there is one.
    pub fn field_type(&self, index: usize) -> Option<FieldType> {
        self.field_types.get(index).copied()
    }

    /// `true` if both descriptors share one field type list, not merely equal ones.
    pub fn ptr_eq(&self, other: &TupleDescriptor) -> bool {
        Arc::ptr_eq(&self.field_types, &other.field_types)
    }
}

impl From<Vec<FieldType>> for TupleDescriptor {
    fn from(field_types: Vec<FieldType>) -> Self {
        TupleDescriptor::new(field_types)
    }
}

impl From<&[FieldType]> for TupleDescriptor {
    fn from(field_types: &[FieldType]) -> Self {
        TupleDescriptor {
            field_types: Arc::from(field_types),
        }
    }
}

impl FromIterator<FieldType> for TupleDescriptor {
    fn from_iter<I: IntoIterator<Item = FieldType>>(iter: I) -> Self {
        TupleDescriptor::new(iter.into_iter().collect())
    }
}

impl fmt::Display for TupleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let count = self.count();
        write!(f, "(")?;
        for (i, ty) in self.field_types.iter().enumerate() {
            write!(f, "{}", ty)?;
            if i + 1 < count {
                write!(f, ", ")?;
            }
        }
        write!(f, ")")
    }
}

/// Anything that can describe the shape of a tuple to the [`TupleFactory`](crate::TupleFactory).
///
/// The count is signed so that a malformed foreign descriptor claiming a negative number of
/// fields can be represented, and rejected, rather than wrapping around.
pub trait Describe {
    /// The number of fields the described tuple has.
    fn count(&self) -> isize;

    /// The field types, in order. A well-formed descriptor lists exactly [`count`](Self::count)
    /// of them.
    fn field_types(&self) -> &[FieldType];

    /// Convert to a [`TupleDescriptor`], sharing storage where possible.
    fn to_descriptor(&self) -> TupleDescriptor {
        TupleDescriptor::from(self.field_types())
    }
}

impl Describe for TupleDescriptor {
    fn count(&self) -> isize {
        self.field_types.len() as isize
    }

    fn field_types(&self) -> &[FieldType] {
        &self.field_types
    }

    fn to_descriptor(&self) -> TupleDescriptor {
        self.clone()
    }
}

impl Describe for [FieldType] {
    fn count(&self) -> isize {
        self.len() as isize
    }

    fn field_types(&self) -> &[FieldType] {
        self
    }
}

impl Describe for Vec<FieldType> {
    fn count(&self) -> isize {
        self.len() as isize
    }

    fn field_types(&self) -> &[FieldType] {
        self
    }
}
