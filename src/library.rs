use crate::error::{QsimError, Result};
use crate::gates::NamedGate;
use crate::qstate::QuantumState;
use crate::sequence::OperationSequence;

fn apply_named(
    state: &mut QuantumState,
    sequence: &OperationSequence,
    gate: NamedGate,
) -> Result<()> {
    if sequence.length() != state.length() {
        return Err(QsimError::out_of_range(format!(
            "The length of the sequence ({}) does not match the number of qubits ({})",
            sequence.length(),
            state.length()
        )));
    }

    state.apply_gate(&sequence.with_gate(gate.gate())?)
}

fn check_fixed_length(state: &QuantumState, name: &str, length: usize) -> Result<()> {
    if state.length() != length {
        return Err(QsimError::out_of_range(format!(
            "The {} gate can only be applied to {}-qubit registers, {} qubits found",
            name,
            length,
            state.length()
        )));
    }
    Ok(())
}

/// Hadamard, `[[1, 1], [1, -1]]`. Acts on every control combination.
pub fn gate_h(state: &mut QuantumState, sequence: &OperationSequence) -> Result<()> {
    apply_named(state, sequence, NamedGate::H)
}

/// Phase gate V, `[[1, 0], [0, i]]`.
pub fn gate_v(state: &mut QuantumState, sequence: &OperationSequence) -> Result<()> {
    apply_named(state, sequence, NamedGate::V)
}

/// Pauli-Z, `[[1, 0], [0, -1]]`. Equal to V applied twice.
pub fn gate_z(state: &mut QuantumState, sequence: &OperationSequence) -> Result<()> {
    apply_named(state, sequence, NamedGate::Z)
}

/// Pauli-X, `[[0, 1], [1, 0]]`. Equal to H Z H.
pub fn gate_x(state: &mut QuantumState, sequence: &OperationSequence) -> Result<()> {
    apply_named(state, sequence, NamedGate::X)
}

/// Toffoli: flips the third qubit of a 3-qubit register when the first two
/// are both set.
pub fn gate_toffoli(state: &mut QuantumState) -> Result<()> {
    check_fixed_length(state, "Toffoli", 3)?;
    state.apply_gate(&OperationSequence::parse("11G", NamedGate::X.gate())?)
}

/// G, the doubly controlled V: maps `|111>` to `i|111>` and leaves every
/// other basis state alone.
pub fn gate_g(state: &mut QuantumState) -> Result<()> {
    check_fixed_length(state, "G", 3)?;
    state.apply_gate(&OperationSequence::parse("11G", NamedGate::V.gate())?)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use num_complex::Complex;

    use super::*;
    use crate::assert_amplitudes;

    fn seq(pattern: &str) -> OperationSequence {
        OperationSequence::parse(pattern, NamedGate::H.gate()).unwrap()
    }

    #[test]
    fn test_gate_h_substitutes_its_matrix() -> Result<()> {
        // The gate carried by the sequence is only a placeholder.
        let sequence = OperationSequence::parse("G", NamedGate::X.gate())?;

        let mut q = QuantumState::new(1, 0)?;
        gate_h(&mut q, &sequence)?;
        assert_amplitudes!(q, [(1, 0), (1, 0)], 1);
        assert_eq!(q.to_string(), "(1, 1) * sqrt(2)^(-1)");

        gate_h(&mut q, &sequence)?;
        assert_eq!(q, QuantumState::new(1, 0)?);

        Ok(())
    }

    #[test]
    fn test_v_twice_is_z() -> Result<()> {
        for pattern in ["G0", "G1", "0G", "1G"] {
            for basis in 0..4 {
                let mut start = QuantumState::new(2, basis)?;
                gate_h(&mut start, &seq("G0"))?;
                gate_h(&mut start, &seq("0G"))?;

                let mut via_v = start.copy();
                gate_v(&mut via_v, &seq(pattern))?;
                gate_v(&mut via_v, &seq(pattern))?;

                let mut via_z = start.copy();
                gate_z(&mut via_z, &seq(pattern))?;

                assert_eq!(via_v, via_z, "pattern {} basis {}", pattern, basis);
            }
        }
        Ok(())
    }

    #[test]
    fn test_hzh_is_x() -> Result<()> {
        for pattern in ["G", "G0", "G1", "0G", "1G", "11G", "1G0"] {
            let length = pattern.len();
            for basis in 0..(1 << length) {
                let mut via_hzh = QuantumState::new(length, basis)?;
                gate_h(&mut via_hzh, &seq(pattern))?;
                gate_z(&mut via_hzh, &seq(pattern))?;
                gate_h(&mut via_hzh, &seq(pattern))?;

                let mut via_x = QuantumState::new(length, basis)?;
                gate_x(&mut via_x, &seq(pattern))?;

                assert_eq!(via_hzh, via_x, "pattern {} basis {}", pattern, basis);
            }
        }
        Ok(())
    }

    #[test]
    fn test_h_sym_ignores_control_values() -> Result<()> {
        let sequence = OperationSequence::parse("0G", NamedGate::HSym.gate())?;

        // |3> sits on the (2, 3) pair, which a "0G" control would exclude.
        let mut q = QuantumState::new(2, 3)?;
        q.apply_gate(&sequence)?;
        assert_amplitudes!(q, [(0, 0), (0, 0), (1, 0), (1, 0)], 1);

        // H_sym^2 = 2I
        q.apply_gate(&sequence)?;
        assert_eq!(q, QuantumState::new(2, 3)?);

        let mut q = QuantumState::new(2, 0)?;
        q.apply_gate(&sequence)?;
        assert_amplitudes!(q, [(-1, 0), (1, 0), (0, 0), (0, 0)], 1);

        Ok(())
    }

    #[test]
    fn test_controlled_x() -> Result<()> {
        let mut q = QuantumState::new(2, 3)?;
        gate_x(&mut q, &seq("1G"))?;
        assert_eq!(q, QuantumState::new(2, 2)?);

        let mut q = QuantumState::new(2, 1)?;
        gate_x(&mut q, &seq("1G"))?;
        assert_eq!(q, QuantumState::new(2, 1)?);

        Ok(())
    }

    #[test]
    fn test_toffoli() -> Result<()> {
        let mut q = QuantumState::new(3, 7)?;
        gate_toffoli(&mut q)?;
        assert_eq!(q, QuantumState::new(3, 6)?);

        gate_toffoli(&mut q)?;
        assert_eq!(q, QuantumState::new(3, 7)?);

        for basis in 0..6 {
            let mut q = QuantumState::new(3, basis)?;
            gate_toffoli(&mut q)?;
            assert_eq!(q, QuantumState::new(3, basis)?);
        }

        Ok(())
    }

    #[test]
    fn test_gate_g() -> Result<()> {
        let mut q = QuantumState::new(3, 7)?;
        gate_g(&mut q)?;
        assert_eq!(q.amplitude(7), Some(Complex::new(0, 1)));
        assert_eq!(q.level(), 0);

        // G^2 is the doubly controlled Z, not the identity.
        gate_g(&mut q)?;
        let mut via_z = QuantumState::new(3, 7)?;
        gate_z(&mut via_z, &seq("11G"))?;
        assert_eq!(q, via_z);
        assert_eq!(q.amplitude(7), Some(Complex::new(-1, 0)));

        gate_g(&mut q)?;
        gate_g(&mut q)?;
        assert_eq!(q, QuantumState::new(3, 7)?);

        let mut q = QuantumState::new(3, 6)?;
        gate_g(&mut q)?;
        assert_eq!(q, QuantumState::new(3, 6)?);

        Ok(())
    }

    #[test]
    fn test_fixed_gates_reject_wrong_register_size() -> Result<()> {
        for length in [1, 2, 4] {
            let mut q = QuantumState::new(length, 0)?;
            assert!(matches!(
                gate_toffoli(&mut q),
                Err(QsimError::ValueOutOfRange(_))
            ));
            assert!(matches!(gate_g(&mut q), Err(QsimError::ValueOutOfRange(_))));
            assert_eq!(q, QuantumState::new(length, 0)?);
        }
        Ok(())
    }

    #[test]
    fn test_length_mismatch_leaves_state_unchanged() -> Result<()> {
        let mut q = QuantumState::new(2, 2)?;
        for op in [gate_h, gate_v, gate_z, gate_x] {
            assert!(matches!(
                op(&mut q, &seq("11G")),
                Err(QsimError::ValueOutOfRange(_))
            ));
        }
        assert_eq!(q, QuantumState::new(2, 2)?);
        Ok(())
    }
}
