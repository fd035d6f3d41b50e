use std::fmt::Display;
use std::sync::Arc;

use nalgebra::DMatrix;

use crate::error::{QsimError, Result};
use crate::gates::QuantumGate;
use crate::Amplitude;

/// Longest sequence whose `2^n` operator dimension fits in a `usize`.
pub const MAX_LENGTH: usize = usize::BITS as usize - 1;

fn check_length(length: usize) -> Result<()> {
    if length > MAX_LENGTH {
        return Err(QsimError::out_of_range(format!(
            "A sequence can span at most {} qubits, got {}",
            MAX_LENGTH, length
        )));
    }
    Ok(())
}

/// One position of an [`OperationSequence`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Marker {
    /// The qubit must hold this value for the gate to act.
    Control(bool),
    /// The qubit the gate acts on.
    Gate(Arc<QuantumGate>),
}

impl Marker {
    pub fn gate(gate: impl Into<Arc<QuantumGate>>) -> Self {
        Marker::Gate(gate.into())
    }
}

/// Describes where a single-qubit gate acts inside a register and which
/// qubits control it. Position 0 is the most significant bit of a basis index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationSequence {
    markers: Vec<Marker>,
    gate: Arc<QuantumGate>,
    gate_position: usize,
}

impl OperationSequence {
    pub fn new(markers: Vec<Marker>) -> Result<Self> {
        check_length(markers.len())?;

        let mut found = None;

        for (i, marker) in markers.iter().enumerate() {
            let Marker::Gate(gate) = marker else {
                continue;
            };

            if gate.length() != 1 {
                return Err(QsimError::type_mismatch(
                    "single-qubit gate",
                    format!(
                        "{}-qubit gate '{}' at element {}",
                        gate.length(),
                        gate.identifier(),
                        i
                    ),
                ));
            }
            if found.is_some() {
                return Err(QsimError::out_of_range(
                    "The sequence must contain exactly one gate marker, found several",
                ));
            }
            found = Some((i, gate.clone()));
        }

        let (gate_position, gate) = found.ok_or_else(|| {
            QsimError::out_of_range("The sequence must contain exactly one gate marker, found none")
        })?;

        Ok(Self {
            markers,
            gate,
            gate_position,
        })
    }

    /// Builds a sequence from a pattern such as `"10G"`: `0` and `1` are
    /// controls, `G` is the slot for `gate`.
    pub fn parse(pattern: &str, gate: impl Into<Arc<QuantumGate>>) -> Result<Self> {
        let gate = gate.into();
        let markers = pattern
            .chars()
            .enumerate()
            .map(|(i, c)| match c {
                '0' => Ok(Marker::Control(false)),
                '1' => Ok(Marker::Control(true)),
                'G' => Ok(Marker::Gate(gate.clone())),
                other => Err(QsimError::type_mismatch(
                    "'0', '1' or 'G'",
                    format!("'{}' at element {}", other, i),
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(markers)
    }

    /// Every sequence of `length` qubits carrying `gate`, for each gate
    /// position and each combination of control values.
    pub fn generate_all(length: usize, gate: impl Into<Arc<QuantumGate>>) -> Result<Vec<Self>> {
        if length == 0 {
            return Err(QsimError::out_of_range(
                "A sequence must span at least one qubit",
            ));
        }
        check_length(length)?;

        let gate = gate.into();
        let mut result = Vec::new();
        for position in 0..length {
            let markers = (0..length)
                .map(|i| {
                    if i == position {
                        Marker::Gate(gate.clone())
                    } else {
                        Marker::Control(false)
                    }
                })
                .collect();
            result.extend(Self::new(markers)?.alter_controls());
        }

        Ok(result)
    }

    pub fn length(&self) -> usize {
        self.markers.len()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn gate(&self) -> &QuantumGate {
        &self.gate
    }

    pub fn gate_position(&self) -> usize {
        self.gate_position
    }

    /// Same layout with another gate in the gate slot.
    pub fn with_gate(&self, gate: impl Into<Arc<QuantumGate>>) -> Result<Self> {
        let mut markers = self.markers.clone();
        markers[self.gate_position] = Marker::gate(gate);
        Self::new(markers)
    }

    /// The two basis indices coupled by the gate: the controls read as literal
    /// bits, with the gate qubit set to 0 and to 1 respectively.
    pub fn decimal_states(&self) -> (usize, usize) {
        self.markers
            .iter()
            .fold((0, 0), |(low, high), marker| match marker {
                Marker::Control(bit) => ((low << 1) | *bit as usize, (high << 1) | *bit as usize),
                Marker::Gate(_) => (low << 1, (high << 1) | 1),
            })
    }

    /// All `2^(n-1)` sequences with the same gate position, one per
    /// combination of control values, counting up from this one.
    pub fn alter_controls(&self) -> Vec<Self> {
        let count = 1_usize << (self.length() - 1);
        let mut current = self.clone();
        let mut result = Vec::with_capacity(count);

        for _ in 0..count {
            result.push(current.clone());
            current.increment_controls();
        }

        result
    }

    fn increment_controls(&mut self) {
        for marker in self.markers.iter_mut().rev() {
            if let Marker::Control(bit) = marker {
                *bit = !*bit;
                if *bit {
                    break;
                }
            }
        }
    }

    /// Index pairs the gate acts on. Gates that cannot carry controls act on
    /// the pairs of every control combination.
    pub fn coupled_states(&self) -> Vec<(usize, usize)> {
        if QuantumGate::supports_controls(self.gate.matrix()) {
            vec![self.decimal_states()]
        } else {
            self.alter_controls()
                .iter()
                .map(|sequence| sequence.decimal_states())
                .collect()
        }
    }

    /// Expands the gate into the full `2^n x 2^n` operator: the identity with
    /// the base matrix written over each coupled pair of rows and columns.
    pub fn operator(&self) -> DMatrix<Amplitude> {
        let base = self.gate.matrix();
        let dim = 1_usize << self.length();
        let mut operator = DMatrix::identity(dim, dim);

        for (low, high) in self.coupled_states() {
            let targets = [low, high];
            for i in 0..2 {
                for j in 0..2 {
                    operator[(targets[i], targets[j])] = base[(i, j)];
                }
            }
        }

        operator
    }
}

impl Display for OperationSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, marker) in self.markers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match marker {
                Marker::Control(bit) => write!(f, "{}", *bit as u8)?,
                Marker::Gate(gate) => write!(f, "{}", gate.initial())?,
            }
        }
        write!(f, "]")
    }
}
