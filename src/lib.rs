//! Exact simulation of a small qubit register.
//!
//! Amplitudes are kept as Gaussian integers together with a level `k`, the
//! true state being `vector / sqrt(2)^k`. Gates are single-qubit matrices with
//! entries in `{0, ±1, ±i}`, placed inside the register by an
//! [`OperationSequence`] of controls and one gate slot.
//!
//! ```
//! use gaussian_qsim::{library, NamedGate, OperationSequence, QuantumState};
//!
//! let mut state = QuantumState::new(2, 3)?;
//! let sequence = OperationSequence::parse("1G", NamedGate::H.gate())?;
//! library::gate_h(&mut state, &sequence)?;
//!
//! assert_eq!(state.to_string(), "(0, 0, 1, -1) * sqrt(2)^(-1)");
//! # Ok::<(), gaussian_qsim::QsimError>(())
//! ```

pub mod error;
pub mod gates;
pub mod library;
pub mod qstate;
pub mod sequence;

#[cfg(test)]
mod test_util;

use num_complex::Complex;

pub use error::{QsimError, Result};
pub use gates::{NamedGate, QuantumGate};
pub use qstate::QuantumState;
pub use sequence::{Marker, OperationSequence};

/// A Gaussian integer amplitude.
pub type Amplitude = Complex<i64>;
