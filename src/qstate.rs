use std::fmt::Display;
use std::str::FromStr;

use log::{debug, trace};
use nalgebra::{DMatrix, RowDVector};
use num_complex::Complex;

use crate::error::{QsimError, Result};
use crate::gates::QuantumGate;
use crate::sequence::OperationSequence;
use crate::Amplitude;

/// An `n`-qubit register held exactly.
///
/// The stored amplitudes are Gaussian integers; the true amplitude at index
/// `i` is `vector[i] / sqrt(2)^level`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantumState {
    length: usize,
    vector: RowDVector<Amplitude>,
    level: u32,
}

impl QuantumState {
    /// Basis state `|state>` of a `length`-qubit register.
    pub fn new(length: usize, state: usize) -> Result<Self> {
        if length == 0 {
            return Err(QsimError::out_of_range(
                "The length of a register must be at least 1",
            ));
        }

        let size = u32::try_from(length)
            .ok()
            .and_then(|shift| 1_usize.checked_shl(shift))
            .ok_or_else(|| {
                QsimError::out_of_range(format!("A {}-qubit register is too large", length))
            })?;

        if state >= size {
            return Err(QsimError::out_of_range(format!(
                "The state must be within 0 and {}, got {}",
                size - 1,
                state
            )));
        }

        let mut vector = RowDVector::zeros(size);
        vector[state] = Complex::new(1, 0);

        Ok(Self {
            length,
            vector,
            level: 0,
        })
    }

    pub fn zero_state(length: usize) -> Result<Self> {
        Self::new(length, 0)
    }

    /// Basis state written as a bit string, e.g. `"011"` for `|3>` of 3 qubits.
    pub fn from_bits(bits: &str) -> Result<Self> {
        let index = usize::from_str_radix(bits, 2)
            .map_err(|_| QsimError::type_mismatch("bit string", format!("'{}'", bits)))?;
        Self::new(bits.len(), index)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn vector(&self) -> &RowDVector<Amplitude> {
        &self.vector
    }

    pub fn amplitude(&self, index: usize) -> Option<Amplitude> {
        self.vector.get(index).copied()
    }

    /// Independent copy of the register; later changes to either side are
    /// not visible to the other.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Applies the gate carried by `sequence` at the position and with the
    /// controls it describes.
    pub fn apply_gate(&mut self, sequence: &OperationSequence) -> Result<()> {
        if sequence.length() != self.length {
            return Err(QsimError::out_of_range(format!(
                "The length of the sequence ({}) does not match the number of qubits ({})",
                sequence.length(),
                self.length
            )));
        }

        debug!(
            "applying {} to {}-qubit state, coupled states {:?}",
            sequence,
            self.length,
            sequence.coupled_states()
        );

        self.apply_matrix(&sequence.operator())
    }

    /// Applies a gate spanning the whole register.
    pub fn apply_operator(&mut self, gate: &QuantumGate) -> Result<()> {
        if gate.length() != self.length {
            return Err(QsimError::out_of_range(format!(
                "This gate can only be applied to {}-qubit registers, {} qubits found",
                gate.length(),
                self.length
            )));
        }

        debug!("applying {} to {}-qubit state", gate.identifier(), self.length);

        self.apply_matrix(gate.matrix())
    }

    fn apply_matrix(&mut self, operator: &DMatrix<Amplitude>) -> Result<()> {
        let mut vector = multiply(&self.vector, operator).ok_or_else(|| {
            QsimError::InternalConsistency("amplitude overflow while applying operator".into())
        })?;

        let halvings = simplify(&mut vector);
        let level = level_of(&vector)?;

        trace!(
            "halved {} times, level {} -> {}",
            halvings,
            self.level,
            level
        );

        self.vector = vector;
        self.level = level;
        Ok(())
    }

    /// Compact form used for exports, e.g. `(1,-1);1`.
    pub fn to_file_string(&self) -> String {
        let amplitudes = self
            .vector
            .iter()
            .map(format_gaussian)
            .collect::<Vec<_>>()
            .join(",");
        format!("({});{}", amplitudes, self.level)
    }
}

/// `vector * operator`, or `None` if any amplitude overflows.
fn multiply(
    vector: &RowDVector<Amplitude>,
    operator: &DMatrix<Amplitude>,
) -> Option<RowDVector<Amplitude>> {
    let mut result = RowDVector::zeros(operator.ncols());

    for (j, column) in operator.column_iter().enumerate() {
        let mut sum: Amplitude = Complex::new(0, 0);
        for (a, b) in vector.iter().zip(column.iter()) {
            let re = a.re.checked_mul(b.re)?.checked_sub(a.im.checked_mul(b.im)?)?;
            let im = a.re.checked_mul(b.im)?.checked_add(a.im.checked_mul(b.re)?)?;
            sum = Complex::new(sum.re.checked_add(re)?, sum.im.checked_add(im)?);
        }
        result[j] = sum;
    }

    Some(result)
}

fn sum_of_squares(vector: &RowDVector<Amplitude>) -> Option<i64> {
    vector.iter().try_fold(0_i64, |sum, a| {
        let norm = a.re.checked_mul(a.re)?.checked_add(a.im.checked_mul(a.im)?)?;
        sum.checked_add(norm)
    })
}

fn is_halvable(vector: &RowDVector<Amplitude>) -> bool {
    vector.iter().any(|a| a.re != 0 || a.im != 0)
        && vector.iter().all(|a| a.re % 2 == 0 && a.im % 2 == 0)
}

/// Divides the whole vector by two for as long as every component is even.
fn simplify(vector: &mut RowDVector<Amplitude>) -> u32 {
    let mut halvings = 0;

    while is_halvable(vector) {
        for a in vector.iter_mut() {
            *a = Complex::new(a.re / 2, a.im / 2);
        }
        halvings += 1;
    }

    halvings
}

/// The `k` with `sum |a_i|^2 = 2^k`.
fn level_of(vector: &RowDVector<Amplitude>) -> Result<u32> {
    let sum_squares = sum_of_squares(vector).ok_or_else(|| {
        QsimError::InternalConsistency("sum of squares overflows i64".into())
    })?;

    if sum_squares <= 0 || !(sum_squares as u64).is_power_of_two() {
        return Err(QsimError::InternalConsistency(format!(
            "sum of squares {} is not a power of two",
            sum_squares
        )));
    }

    Ok(sum_squares.trailing_zeros())
}

pub(crate) fn format_gaussian(number: &Amplitude) -> String {
    match (number.re, number.im) {
        (0, 0) => "0".to_string(),
        (0, 1) => "i".to_string(),
        (0, -1) => "-i".to_string(),
        (0, im) => format!("{}i", im),
        (re, 0) => format!("{}", re),
        (re, 1) => format!("{}+i", re),
        (re, -1) => format!("{}-i", re),
        (re, im) if im > 0 => format!("{}+{}i", re, im),
        (re, im) => format!("{}{}i", re, im),
    }
}

pub(crate) fn parse_gaussian(text: &str) -> Result<Amplitude> {
    let malformed = || QsimError::type_mismatch("Gaussian integer", format!("'{}'", text));

    let Some(body) = text.strip_suffix('i') else {
        let re = text.parse::<i64>().map_err(|_| malformed())?;
        return Ok(Complex::new(re, 0));
    };

    // A sign after the first character separates the real part.
    let split = body
        .char_indices()
        .skip(1)
        .filter(|&(_, c)| c == '+' || c == '-')
        .map(|(i, _)| i)
        .last();

    let (re, im) = match split {
        Some(i) => (body[..i].parse::<i64>().map_err(|_| malformed())?, &body[i..]),
        None => (0, body),
    };

    let im = match im {
        "" | "+" => 1,
        "-" => -1,
        digits => digits.parse::<i64>().map_err(|_| malformed())?,
    };

    Ok(Complex::new(re, im))
}

impl Display for QuantumState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            let bin_width = self.length;
            for (i, value) in self.vector.iter().enumerate() {
                writeln!(
                    f,
                    "|{:0width$b}>: {}",
                    i,
                    format_gaussian(value),
                    width = bin_width
                )?;
            }
            return write!(f, "* sqrt(2)^({})", -i64::from(self.level));
        }

        write!(f, "(")?;
        for (i, value) in self.vector.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", format_gaussian(value))?;
        }
        write!(f, ") * sqrt(2)^({})", -i64::from(self.level))
    }
}

impl FromStr for QuantumState {
    type Err = QsimError;

    /// Parses the form written by [`QuantumState::to_file_string`].
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || QsimError::type_mismatch("state string '(a0,...);k'", format!("'{}'", s));

        let (vector, level) = s.trim().rsplit_once(';').ok_or_else(malformed)?;
        let level: u32 = level.trim().parse().map_err(|_| malformed())?;
        let vector = vector
            .trim()
            .strip_prefix('(')
            .and_then(|v| v.strip_suffix(')'))
            .ok_or_else(malformed)?;

        let amplitudes = vector
            .split(',')
            .map(|a| parse_gaussian(a.trim()))
            .collect::<Result<Vec<_>>>()?;

        let size = amplitudes.len();
        if size < 2 || !size.is_power_of_two() {
            return Err(QsimError::out_of_range(format!(
                "State vector length must be a power of two of at least 2, got {}",
                size
            )));
        }

        let vector = RowDVector::from_vec(amplitudes);
        let sum_squares = sum_of_squares(&vector).ok_or_else(|| {
            QsimError::out_of_range(format!("Sum of squares of '{}' overflows i64", s))
        })?;
        if 1_i64.checked_shl(level) != Some(sum_squares) {
            return Err(QsimError::out_of_range(format!(
                "Sum of squares {} does not match level {}",
                sum_squares, level
            )));
        }
        if is_halvable(&vector) {
            return Err(QsimError::out_of_range(format!(
                "Every amplitude of '{}' is even, the state is not fully halved",
                s
            )));
        }

        Ok(Self {
            length: size.ilog2() as usize,
            vector,
            level,
        })
    }
}
