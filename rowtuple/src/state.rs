//! Per-field availability state, and the single word in which a tuple packs all of it.
//!
//! Every field of a tuple is in exactly one of three [`FieldState`]s. Three states need two bits,
//! so a tuple of up to [`MAX_ARITY`] fields stores them all in one `u64`: the state of field `i`
//! occupies bits `2i` and `2i + 1` of a [`PackedStateVector`].

use std::fmt;
use thiserror::Error;

use static_assertions::{assert_eq_size, const_assert};

/// The number of bits used to encode the [`FieldState`] of a single field.
pub const BITS_PER_FIELD: usize = 2;

/// The largest number of fields a tuple may have.
pub const MAX_ARITY: usize = 32;

const_assert!(MAX_ARITY * BITS_PER_FIELD <= u64::BITS as usize);

/// Whether a field holds a meaningful value.
///
/// The state, not the stored value, is authoritative: a field that is [`Unavailable`] or
/// [`Null`] still occupies a slot holding its type's default value, and that value must not be
/// trusted.
///
/// Once a field leaves [`Unavailable`] it never returns there. Clearing a field means setting it
/// to null.
///
/// [`Unavailable`]: FieldState::Unavailable
/// [`Null`]: FieldState::Null
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldState {
    /// No value has ever been assigned.
    Unavailable = 0b00,
    /// A real, non-null value is stored.
    Available = 0b01,
    /// The field was explicitly assigned null.
    Null = 0b10,
}

impl Default for FieldState {
    fn default() -> Self {
        FieldState::Unavailable
    }
}

impl FieldState {
    /// The two-bit pattern of this state.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a two-bit pattern, or `None` for the reserved pattern `0b11` (or anything wider than
    /// two bits).
    ///
    /// # Examples
    ///
    /// ```
    /// use rowtuple::FieldState;
    ///
    /// assert_eq!(FieldState::from_bits(0b10), Some(FieldState::Null));
    /// assert_eq!(FieldState::from_bits(0b11), None);
    /// ```
    pub const fn from_bits(bits: u8) -> Option<FieldState> {
        match bits {
            0b00 => Some(FieldState::Unavailable),
            0b01 => Some(FieldState::Available),
            0b10 => Some(FieldState::Null),
            _ => None,
        }
    }

    /// `true` if the field holds a real value.
    pub const fn is_available(self) -> bool {
        matches!(self, FieldState::Available)
    }

    /// `true` if the field was explicitly set to null.
    pub const fn is_null(self) -> bool {
        matches!(self, FieldState::Null)
    }

    /// `true` if the field has never been assigned.
    pub const fn is_unavailable(self) -> bool {
        matches!(self, FieldState::Unavailable)
    }
}

impl fmt::Display for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            FieldState::Unavailable => "unavailable",
            FieldState::Available => "available",
            FieldState::Null => "null",
        };
        write!(f, "{}", name)
    }
}

/// The [`FieldState`] of every field of a tuple, two bits per field, in one `u64`.
///
/// A fresh vector is all zeroes, which decodes as every field [`Unavailable`]. Bits beyond twice
/// the arity of the owning tuple stay zero; vectors built from untrusted bits go through
/// [`from_bits`](PackedStateVector::from_bits), which checks this.
///
/// # Examples
///
/// ```
/// use rowtuple::{FieldState, PackedStateVector};
///
/// let mut states = PackedStateVector::new();
/// states.set(0, FieldState::Null);
/// states.set(3, FieldState::Available);
///
/// assert_eq!(states.get(0), FieldState::Null);
/// assert_eq!(states.get(1), FieldState::Unavailable);
/// assert_eq!(states.get(3), FieldState::Available);
/// assert_eq!(states.bits(), 0b01_00_00_10);
/// ```
///
/// [`Unavailable`]: FieldState::Unavailable
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedStateVector(u64);

assert_eq_size!(PackedStateVector, u64);

/// A packed state word that cannot belong to a well-formed tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidStateVector {
    /// The owning tuple would have more fields than a state word can describe.
    #[error("arity {0} exceeds the maximum of {}", MAX_ARITY)]
    ArityTooLarge(usize),
    /// A field is encoded with the reserved two-bit pattern.
    #[error("field {index} has the reserved state pattern 0b11")]
    ReservedPattern {
        /// The offending field.
        index: usize,
    },
    /// Bits are set past the last field of the tuple.
    #[error("state word {bits:#x} has bits set beyond field {arity}")]
    StrayBits {
        /// The rejected word.
        bits: u64,
        /// The arity the word was checked against.
        arity: usize,
    },
}

impl PackedStateVector {
    const MASK: u64 = (1 << BITS_PER_FIELD) - 1;

    /// A vector in which every field is [`Unavailable`](FieldState::Unavailable).
    pub const fn new() -> Self {
        PackedStateVector(0)
    }

    /// Check a raw word against the arity of the tuple it is meant to describe.
    ///
    /// # Errors
    ///
    /// Fails if `arity` exceeds [`MAX_ARITY`], if any field within the arity uses the reserved
    /// pattern, or if any bit beyond the arity is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowtuple::{FieldState, PackedStateVector};
    ///
    /// let states = PackedStateVector::from_bits(0b10_01, 2).unwrap();
    /// assert_eq!(states.get(1), FieldState::Null);
    ///
    /// assert!(PackedStateVector::from_bits(0b11, 1).is_err());
    /// assert!(PackedStateVector::from_bits(0b01_00, 1).is_err());
    /// ```
    pub fn from_bits(bits: u64, arity: usize) -> Result<Self, InvalidStateVector> {
        if arity > MAX_ARITY {
            return Err(InvalidStateVector::ArityTooLarge(arity));
        }

        let used = arity * BITS_PER_FIELD;
        if used < u64::BITS as usize && bits >> used != 0 {
            return Err(InvalidStateVector::StrayBits { bits, arity });
        }

        for index in 0..arity {
            let pattern = (bits >> Self::shift(index)) & Self::MASK;
            if FieldState::from_bits(pattern as u8).is_none() {
                return Err(InvalidStateVector::ReservedPattern { index });
            }
        }

        Ok(PackedStateVector(bits))
    }

    /// The raw word.
    pub const fn bits(self) -> u64 {
        self.0
    }

    const fn shift(index: usize) -> usize {
        index * BITS_PER_FIELD
    }

    // Past the last slice the shift would wrap onto a lower field's bits
    fn check(index: usize) {
        assert!(
            index < MAX_ARITY,
            "state index {} out of range for a {}-field word",
            index,
            MAX_ARITY
        );
    }

    /// The state of the field at `index`.
    ///
    /// # Panics
    ///
    /// If `index` is not below [`MAX_ARITY`]. Tuples check indices against their own arity
    /// before reaching here.
    pub fn get(self, index: usize) -> FieldState {
        Self::check(index);
        let pattern = (self.0 >> Self::shift(index)) & Self::MASK;
        match FieldState::from_bits(pattern as u8) {
            Some(state) => state,
            None => unreachable!("reserved state pattern stored for field {}", index),
        }
    }

    /// Overwrite the state of the field at `index`, leaving every other field untouched.
    ///
    /// # Panics
    ///
    /// If `index` is not below [`MAX_ARITY`].
    pub fn set(&mut self, index: usize, state: FieldState) {
        Self::check(index);
        let shift = Self::shift(index);
        self.0 = (self.0 & !(Self::MASK << shift)) | (u64::from(state.bits()) << shift);
    }

    /// The states of the first `arity` fields, in order.
    ///
    /// # Panics
    ///
    /// If `arity` exceeds [`MAX_ARITY`].
    pub fn iter(self, arity: usize) -> impl Iterator<Item = FieldState> {
        assert!(
            arity <= MAX_ARITY,
            "arity {} exceeds the maximum of {}",
            arity,
            MAX_ARITY
        );
        (0..arity).map(move |index| self.get(index))
    }

    /// How many of the first `arity` fields are in `state`.
    pub fn count(self, arity: usize, state: FieldState) -> usize {
        self.iter(arity).filter(|s| *s == state).count()
    }
}
