//! # Arithmetic Gates
//!
//! Adders and the Arithmetic Logic Unit, built from the [gates][crate::gates].
//!
//! ## Half-Adder
//! Sum is XOR, carry is AND.
//!
//! ## Full-Adder
//! Half-add the first two bits, then half-add that sum with the third bit. Either half-adder
//! can carry, but never both, so an OR joins the carries.
//!
//! ## Add
//! Ripple carry from the least significant bit (last position) to the most significant. The
//! final carry is dropped: overflow wraps exactly like fixed-width hardware.
//!
//! ## The Arithmetic Logic Unit
//! Control bits pick the calculation without branching. Zeroing is an AND against `NOT(zx)`,
//! negation an XOR against `nx`. Both the sum and the AND are computed, and a multiplexor keeps
//! the one `f` asks for.
//!
//! # Examples
//! ```
//! use nand_kernel::{from_i16, gates, arithmetic as alu};
//! let x = from_i16(22);
//! let y = from_i16(42);
//!
//! // Constant ALU operations
//! assert_eq!(alu::alu(&x, &y, alu::ALU_ZERO), Ok((from_i16(0), true, false)));
//! assert_eq!(alu::alu(&x, &y, alu::ALU_ONE), Ok((from_i16(1), false, false)));
//! assert_eq!(alu::alu(&x, &y, alu::ALU_MINUS_ONE), Ok((from_i16(-1), false, true)));
//!
//! // Single input ALU operations
//! assert_eq!(alu::alu(&x, &y, alu::ALU_X), Ok((from_i16(22), false, false)));
//! assert_eq!(alu::alu(&x, &y, alu::ALU_Y), Ok((from_i16(42), false, false)));
//! assert_eq!(alu::alu(&x, &y, alu::ALU_X_NOT), Ok((gates::not_multibit_gate(&x), false, true)));
//! assert_eq!(alu::alu(&x, &y, alu::ALU_X_MINUS), Ok((from_i16(-22), false, true)));
//! assert_eq!(alu::alu(&x, &y, alu::ALU_Y_PLUS1), Ok((from_i16(43), false, false)));
//! assert_eq!(alu::alu(&x, &y, alu::ALU_X_MINUS1), Ok((from_i16(21), false, false)));
//!
//! // Arithmetic ALU operations
//! assert_eq!(alu::alu(&x, &y, alu::ALU_X_PLUS_Y), Ok((from_i16(64), false, false)));
//! assert_eq!(alu::alu(&x, &y, alu::ALU_X_MINUS_Y), Ok((from_i16(-20), false, true)));
//! assert_eq!(alu::alu(&y, &y, alu::ALU_Y_MINUS_X), Ok((from_i16(0), true, false)));
//!
//! // Bitwise ALU operations
//! assert_eq!(
//!     alu::alu(&x, &y, alu::ALU_X_OR_Y),
//!     Ok((gates::or_multibit_gate(&x, &y).unwrap(), false, false))
//! );
//! ```

use crate::error::{ensure_same_width, Error};
use crate::{gates, Word};

/// The Half-Adder gate. Returns `(sum, carry)`.
///
/// # Examples
/// ```
/// use nand_kernel::arithmetic::half_adder;
/// assert_eq!(half_adder(false, false), (false, false));
/// assert_eq!(half_adder(false, true), (true, false));
/// assert_eq!(half_adder(true, false), (true, false));
/// assert_eq!(half_adder(true, true), (false, true));
/// ```
///
pub fn half_adder(a: bool, b: bool) -> (bool, bool) {
    (gates::xor_gate(a, b), gates::and_gate(a, b))
}

/// The Full Adder gate. Adds three bits, returns `(sum, carry)`.
///
/// # Examples
/// ```
/// use nand_kernel::arithmetic::full_adder;
/// assert_eq!(full_adder(false, false, false), (false, false));
/// assert_eq!(full_adder(false, true, true), (false, true));
/// assert_eq!(full_adder(true, false, false), (true, false));
/// assert_eq!(full_adder(true, true, true), (true, true));
/// ```
///
pub fn full_adder(a: bool, b: bool, c: bool) -> (bool, bool) {
    let (sum, carry) = half_adder(a, b);
    let (final_sum, carry2) = half_adder(sum, c);
    (final_sum, gates::or_gate(carry, carry2))
}

/// The ripple-carry Add gate. Both words must be the same width; the result has that width.
///
/// # Examples
/// ```
/// use nand_kernel::{from_i16, arithmetic::add};
/// assert_eq!(add(&from_i16(100), &from_i16(320)), Ok(from_i16(420)));
/// assert_eq!(add(&from_i16(20), &from_i16(-10)), Ok(from_i16(10)));
/// // Overflow wraps
/// assert_eq!(add(&from_i16(i16::MAX), &from_i16(1)), Ok(from_i16(i16::MIN)));
/// ```
pub fn add(a: &[bool], b: &[bool]) -> Result<Word, Error> {
    ensure_same_width(a, b)?;
    let mut carry = false;
    let mut result = vec![false; a.len()];
    for i in (0..a.len()).rev() {
        let (sum, c) = full_adder(a[i], b[i], carry);
        result[i] = sum;
        carry = c;
    }
    Ok(result)
}

/// The Increment gate, `add(a, 1)` at the width of `a`.
///
/// # Examples
/// ```
/// use nand_kernel::{from_i16, arithmetic::increment};
/// assert_eq!(increment(&from_i16(42)), from_i16(43));
/// assert_eq!(increment(&from_i16(-112)), from_i16(-111));
/// assert_eq!(increment(&[true, true, true]), vec![false, false, false]);
/// ```
pub fn increment(a: &[bool]) -> Word {
    let mut one = vec![false; a.len()];
    if let Some(last) = one.last_mut() {
        *last = true;
    }
    // Same width by construction
    add(a, &one).unwrap_or_default()
}

/// The six ALU control bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AluControl {
    /// Zero the x input
    pub zx: bool,
    /// Negate the x input
    pub nx: bool,
    /// Zero the y input
    pub zy: bool,
    /// Negate the y input
    pub ny: bool,
    /// Add if set, AND otherwise
    pub f: bool,
    /// Negate the output
    pub no: bool,
}

impl AluControl {
    pub const fn new(zx: bool, nx: bool, zy: bool, ny: bool, f: bool, no: bool) -> Self {
        Self {
            zx,
            nx,
            zy,
            ny,
            f,
            no,
        }
    }
}

impl From<[bool; 6]> for AluControl {
    fn from(bits: [bool; 6]) -> Self {
        let [zx, nx, zy, ny, f, no] = bits;
        Self::new(zx, nx, zy, ny, f, no)
    }
}

/// The ALU. Returns the calculation, `zr` (1 iff output is 0) and `ng` (1 iff output is
/// negative). Total over every control combination; fails only if `x` and `y` differ in width
/// or are empty.
pub fn alu(x: &[bool], y: &[bool], control: AluControl) -> Result<(Word, bool, bool), Error> {
    ensure_same_width(x, y)?;
    let width = x.len();

    let mut x = gates::and_multibit_gate(x, &vec![gates::not_gate(control.zx); width])?;
    x = gates::xor_multibit_gate(&x, &vec![control.nx; width])?;

    let mut y = gates::and_multibit_gate(y, &vec![gates::not_gate(control.zy); width])?;
    y = gates::xor_multibit_gate(&y, &vec![control.ny; width])?;

    let addition = add(&x, &y)?;
    let and = gates::and_multibit_gate(&x, &y)?;
    let mut out = gates::multiplexor_multibit_gate(&and, &addition, control.f)?;
    out = gates::xor_multibit_gate(&out, &vec![control.no; width])?;

    let zero = gates::not_gate(gates::or_multiway_gate(&out)?);
    let negative = out[0];
    Ok((out, zero, negative))
}

/// Returns 0
pub const ALU_ZERO: AluControl = AluControl::new(true, false, true, false, true, false);
/// Returns 1
pub const ALU_ONE: AluControl = AluControl::new(true, true, true, true, true, true);
/// Returns -1
pub const ALU_MINUS_ONE: AluControl = AluControl::new(true, true, true, false, true, false);
/// Returns X
pub const ALU_X: AluControl = AluControl::new(false, false, true, true, false, false);
/// Returns Y
pub const ALU_Y: AluControl = AluControl::new(true, true, false, false, false, false);
/// Returns NOT(X)
pub const ALU_X_NOT: AluControl = AluControl::new(false, false, true, true, false, true);
/// Returns NOT(Y)
pub const ALU_Y_NOT: AluControl = AluControl::new(true, true, false, false, false, true);
/// Returns minus X
pub const ALU_X_MINUS: AluControl = AluControl::new(false, false, true, true, true, true);
/// Returns minus Y
pub const ALU_Y_MINUS: AluControl = AluControl::new(true, true, false, false, true, true);
/// Returns X+1
pub const ALU_X_PLUS1: AluControl = AluControl::new(false, true, true, true, true, true);
/// Returns Y+1
pub const ALU_Y_PLUS1: AluControl = AluControl::new(true, true, false, true, true, true);
/// Returns X-1
pub const ALU_X_MINUS1: AluControl = AluControl::new(false, false, true, true, true, false);
/// Returns Y-1
pub const ALU_Y_MINUS1: AluControl = AluControl::new(true, true, false, false, true, false);
/// Returns X+Y
pub const ALU_X_PLUS_Y: AluControl = AluControl::new(false, false, false, false, true, false);
/// Returns X-Y
pub const ALU_X_MINUS_Y: AluControl = AluControl::new(false, true, false, false, true, true);
/// Returns Y-X
pub const ALU_Y_MINUS_X: AluControl = AluControl::new(false, false, false, true, true, true);
/// Returns AND(X, Y)
pub const ALU_X_AND_Y: AluControl = AluControl::new(false, false, false, false, false, false);
/// Returns OR(X, Y)
pub const ALU_X_OR_Y: AluControl = AluControl::new(false, true, false, true, false, true);

#[cfg(test)]
mod alu_tests {
    use super::*;
    use crate::codec::{from_twos_complement, to_twos_complement};
    use crate::from_i16;
    use proptest::prelude::*;

    #[test]
    fn subtraction() {
        assert_eq!(
            alu(&from_i16(100), &from_i16(18), ALU_X_MINUS_Y),
            Ok((from_i16(82), false, false))
        );
        assert_eq!(
            alu(&from_i16(100), &from_i16(18), ALU_Y_MINUS_X),
            Ok((from_i16(-82), false, true))
        );
        assert_eq!(
            alu(&from_i16(100), &from_i16(-18), ALU_X_MINUS_Y),
            Ok((from_i16(118), false, false))
        );
    }

    #[test]
    fn negative() {
        assert_eq!(
            alu(&from_i16(10000), &from_i16(3999), ALU_X_MINUS),
            Ok((from_i16(-10000), false, true))
        );
        assert_eq!(
            alu(&from_i16(10000), &from_i16(-3999), ALU_Y_MINUS),
            Ok((from_i16(3999), false, false))
        );
        assert_eq!(
            alu(&from_i16(10000), &from_i16(0), ALU_Y_MINUS),
            Ok((from_i16(0), true, false))
        );
    }

    #[test]
    fn control_from_bits() {
        assert_eq!(
            AluControl::from([false, true, false, true, false, true]),
            ALU_X_OR_Y
        );
    }

    #[test]
    fn width_errors() {
        assert_eq!(
            alu(&from_i16(1), &[true; 15], ALU_X),
            Err(Error::DimensionMismatch {
                expected: 16,
                actual: 15
            })
        );
        assert_eq!(alu(&[], &[], ALU_X), Err(Error::EmptyInput));
        assert!(add(&[true; 3], &[true; 4]).is_err());
    }

    #[test]
    fn add_concrete_case() {
        let a = to_twos_complement(100, 16).unwrap();
        let b = to_twos_complement(320, 16).unwrap();
        assert_eq!(from_twos_complement(&add(&a, &b).unwrap()), Ok(420));
    }

    #[test]
    fn increment_negative() {
        let word = to_twos_complement(-112, 16).unwrap();
        assert_eq!(from_twos_complement(&increment(&word)), Ok(-111));
    }

    proptest! {
        #[test]
        fn adder_matches_integer_sum(a in -16384i64..16384, b in -16384i64..16384) {
            let sum = add(
                &to_twos_complement(a, 16).unwrap(),
                &to_twos_complement(b, 16).unwrap(),
            ).unwrap();
            prop_assert_eq!(from_twos_complement(&sum), Ok(a + b));
        }

        #[test]
        fn alu_plus_agrees_with_adder(a in any::<i16>(), b in any::<i16>()) {
            let (out, zr, ng) = alu(&from_i16(a), &from_i16(b), ALU_X_PLUS_Y).unwrap();
            prop_assert_eq!(&out, &from_i16(a.wrapping_add(b)));
            prop_assert_eq!(zr, a.wrapping_add(b) == 0);
            prop_assert_eq!(ng, a.wrapping_add(b) < 0);
        }
    }
}
