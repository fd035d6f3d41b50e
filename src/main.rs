use anyhow::{anyhow, Context, Result};
use clap::Parser;
use gaussian_qsim::{library, NamedGate, OperationSequence, QuantumState};

type GateFn = fn(&mut QuantumState, &OperationSequence) -> gaussian_qsim::Result<()>;

/// Apply exact single-qubit gates to a small qubit register.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of qubits in the register
    #[arg(short, long, default_value_t = 1)]
    qubits: usize,

    /// Initial basis state
    #[arg(short, long, default_value_t = 0)]
    state: usize,

    /// Print states in the export format, e.g. `(1,1);1`
    #[arg(long)]
    file_format: bool,

    /// Operations applied in order: `H:<pattern>`, `V:<pattern>`,
    /// `Z:<pattern>`, `X:<pattern>` with a pattern such as `1G`, or `T`
    /// (Toffoli) and `G` on 3-qubit registers
    operations: Vec<String>,
}

fn apply(state: &mut QuantumState, operation: &str) -> Result<()> {
    let Some((name, pattern)) = operation.split_once(':') else {
        match operation {
            "T" => library::gate_toffoli(state)?,
            "G" => library::gate_g(state)?,
            other => return Err(anyhow!("Unknown operation '{}'", other)),
        }
        return Ok(());
    };

    let (gate, apply_gate): (NamedGate, GateFn) = match name {
        "H" => (NamedGate::H, library::gate_h),
        "V" => (NamedGate::V, library::gate_v),
        "Z" => (NamedGate::Z, library::gate_z),
        "X" => (NamedGate::X, library::gate_x),
        other => return Err(anyhow!("Unknown gate '{}'", other)),
    };

    let sequence = OperationSequence::parse(pattern, gate.gate())?;
    apply_gate(state, &sequence)?;
    Ok(())
}

fn render(state: &QuantumState, file_format: bool) -> String {
    if file_format {
        state.to_file_string()
    } else {
        state.to_string()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut state = QuantumState::new(args.qubits, args.state)?;
    println!("{}", render(&state, args.file_format));

    for operation in &args.operations {
        apply(&mut state, operation)
            .with_context(|| format!("Failed to apply '{}'", operation))?;
        println!("{}: {}", operation, render(&state, args.file_format));
    }

    Ok(())
}
