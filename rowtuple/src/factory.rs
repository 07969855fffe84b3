use std::borrow::Cow;

use lazy_static::lazy_static;

use crate::{Describe, FactoryError, Fields, Tuple, TupleDescriptor, TypedTuple, MAX_ARITY};

lazy_static! {
    static ref EMPTY: Tuple = Tuple::with_descriptor(TupleDescriptor::empty());
}

/// Builds tuples from descriptors.
///
/// Every arity from 1 to [`MAX_ARITY`] yields a fresh, exclusively owned tuple with every field
/// [`Unavailable`](crate::FieldState::Unavailable). Arity 0 yields the one shared zero-field
/// tuple: it has no fields to mutate, so handing out a borrow of a single static instance is
/// indistinguishable from allocating a new one.
#[derive(Debug, Clone, Copy)]
pub struct TupleFactory;

impl TupleFactory {
    /// Build the tuple `descriptor` describes.
    ///
    /// # Errors
    ///
    /// - [`FactoryError::NegativeCount`] if the descriptor's count is below zero.
    /// - [`FactoryError::UnsupportedArity`] if it is above [`MAX_ARITY`].
    /// - [`FactoryError::Malformed`] if it disagrees with the number of field types listed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::borrow::Cow;
    /// use rowtuple::prelude::*;
    /// use rowtuple::{FactoryError, FieldType};
    ///
    /// let pair = TupleFactory::create(&vec![FieldType::Bool, FieldType::Bytes])?;
    /// assert!(matches!(pair, Cow::Owned(_)));
    /// assert_eq!(pair.count(), 2);
    ///
    /// let unit = TupleFactory::create(&Vec::<FieldType>::new())?;
    /// assert!(std::ptr::eq(&*unit, TupleFactory::empty()));
    ///
    /// let wide = vec![FieldType::Int8; 33];
    /// assert_eq!(TupleFactory::create(&wide), Err(FactoryError::UnsupportedArity(33)));
    /// # Ok::<(), FactoryError>(())
    /// ```
    pub fn create<D>(descriptor: &D) -> Result<Cow<'static, Tuple>, FactoryError>
    where
        D: Describe + ?Sized,
    {
        let count = descriptor.count();
        let listed = descriptor.field_types().len();

        if count < 0 {
            tracing::debug!(count, "rejecting descriptor with negative field count");
            return Err(FactoryError::NegativeCount(count));
        }
        let count = count as usize;
        if count > MAX_ARITY {
            tracing::debug!(count, max = MAX_ARITY, "rejecting descriptor above maximum arity");
            return Err(FactoryError::UnsupportedArity(count));
        }
        if count != listed {
            tracing::debug!(count, listed, "rejecting malformed descriptor");
            return Err(FactoryError::Malformed { count, listed });
        }

        if count == 0 {
            tracing::trace!("handing out the shared zero-arity tuple");
            return Ok(Cow::Borrowed(TupleFactory::empty()));
        }

        let descriptor = descriptor.to_descriptor();
        tracing::trace!(arity = count, %descriptor, "creating tuple");
        Ok(Cow::Owned(Tuple::with_descriptor(descriptor)))
    }

    /// The shared zero-field tuple.
    pub fn empty() -> &'static Tuple {
        &EMPTY
    }

    /// Build a fresh tuple of the statically known shape `T`.
    ///
    /// Arities beyond [`MAX_ARITY`] have no [`Fields`] implementation, so this cannot fail.
    pub fn create_typed<T: Fields>() -> TypedTuple<T> {
        tracing::trace!(arity = T::ARITY, "creating typed tuple");
        TypedTuple::new()
    }
}
