use nalgebra::DMatrix;
use num_complex::Complex;

use crate::error::{QsimError, Result};
use crate::Amplitude;

const ZERO: Amplitude = Complex::new(0, 0);
const ONE: Amplitude = Complex::new(1, 0);
const I: Amplitude = Complex::new(0, 1);

/// Unnormalized Hadamard, `[[1, 1], [1, -1]]`. The missing `1/sqrt(2)` is
/// carried by the level of the state it is applied to.
pub fn h_matrix() -> DMatrix<Amplitude> {
    DMatrix::from_row_slice(2, 2, &[ONE, ONE, ONE, -ONE])
}

/// Hadamard with the first row negated.
pub fn h_sym_matrix() -> DMatrix<Amplitude> {
    DMatrix::from_row_slice(2, 2, &[-ONE, ONE, ONE, ONE])
}

pub fn v_matrix() -> DMatrix<Amplitude> {
    DMatrix::from_row_slice(2, 2, &[ONE, ZERO, ZERO, I])
}

pub fn v_sym_matrix() -> DMatrix<Amplitude> {
    DMatrix::from_row_slice(2, 2, &[I, ZERO, ZERO, ONE])
}

pub fn z_matrix() -> DMatrix<Amplitude> {
    DMatrix::from_row_slice(2, 2, &[ONE, ZERO, ZERO, -ONE])
}

pub fn z_sym_matrix() -> DMatrix<Amplitude> {
    DMatrix::from_row_slice(2, 2, &[-ONE, ZERO, ZERO, ONE])
}

pub fn x_matrix() -> DMatrix<Amplitude> {
    DMatrix::from_row_slice(2, 2, &[ZERO, ONE, ONE, ZERO])
}

/// A unitary operator (up to a power of `sqrt(2)`) acting on `length` qubits.
///
/// Gates are plain values: they are never mutated after construction and are
/// compared by matrix, dimension and identifier together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantumGate {
    matrix: DMatrix<Amplitude>,
    identifier: String,
    length: usize,
}

impl QuantumGate {
    pub fn new(matrix: DMatrix<Amplitude>, identifier: &str) -> Result<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(QsimError::out_of_range(format!(
                "Gate matrix must be square, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }

        let dim = matrix.nrows();
        if dim < 2 || !dim.is_power_of_two() {
            return Err(QsimError::out_of_range(format!(
                "Gate matrix dimension must be a power of two of at least 2, got {}",
                dim
            )));
        }

        if identifier.is_empty() {
            return Err(QsimError::out_of_range("Gate identifier must not be empty"));
        }

        Ok(Self {
            matrix,
            identifier: identifier.to_string(),
            length: dim.ilog2() as usize,
        })
    }

    pub fn matrix(&self) -> &DMatrix<Amplitude> {
        &self.matrix
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// First character of the identifier, used as a compact tag.
    pub fn initial(&self) -> char {
        self.identifier.chars().next().unwrap_or_default()
    }

    /// Number of qubits the gate acts on.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Whether a 2x2 base matrix can be restricted to the basis pairs selected
    /// by fixed control bits.
    ///
    /// Hadamard-like matrices scale the pair they touch by `sqrt(2)`, so
    /// applying them to only part of the register would leave amplitudes at
    /// different levels. Those are applied for every control combination.
    pub fn supports_controls(matrix: &DMatrix<Amplitude>) -> bool {
        *matrix != h_matrix() && *matrix != h_sym_matrix()
    }
}

/// The fixed single-qubit gates known to the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedGate {
    H,
    V,
    Z,
    X,
    HSym,
    VSym,
    ZSym,
}

impl NamedGate {
    pub const ALL: [NamedGate; 7] = [
        NamedGate::H,
        NamedGate::V,
        NamedGate::Z,
        NamedGate::X,
        NamedGate::HSym,
        NamedGate::VSym,
        NamedGate::ZSym,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            NamedGate::H => "Hadamard",
            NamedGate::V => "V",
            NamedGate::Z => "Z",
            NamedGate::X => "X",
            NamedGate::HSym => "H_sym",
            NamedGate::VSym => "V_sym",
            NamedGate::ZSym => "Z_sym",
        }
    }

    pub fn matrix(self) -> DMatrix<Amplitude> {
        match self {
            NamedGate::H => h_matrix(),
            NamedGate::V => v_matrix(),
            NamedGate::Z => z_matrix(),
            NamedGate::X => x_matrix(),
            NamedGate::HSym => h_sym_matrix(),
            NamedGate::VSym => v_sym_matrix(),
            NamedGate::ZSym => z_sym_matrix(),
        }
    }

    pub fn gate(self) -> QuantumGate {
        // All named matrices are 2x2 with a non-empty identifier.
        QuantumGate {
            matrix: self.matrix(),
            identifier: self.identifier().to_string(),
            length: 1,
        }
    }
}
