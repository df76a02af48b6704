// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! The catalog of standard gates and their arities.
//!
//! A gate application whose name is in the catalog is checked against the
//! recorded parameter and qubit counts; unknown names pass through unchecked
//! since they may refer to a `DEFGATE` elsewhere in the program.

use hashbrown::HashMap;
use once_cell::sync::Lazy;

use crate::ast::{Gate, QubitRef};
use crate::error::QuilError;
use crate::expression::Expression;

#[derive(Clone, Copy, Debug)]
pub struct StandardGate {
    pub name: &'static str,
    pub num_params: usize,
    pub num_qubits: usize,
}

impl StandardGate {
    pub fn instantiate(
        &self,
        parameters: Vec<Expression>,
        qubits: Vec<QubitRef>,
    ) -> Result<Gate, QuilError> {
        if parameters.len() != self.num_params || qubits.len() != self.num_qubits {
            return Err(QuilError::GateArity {
                name: self.name.to_string(),
                expected_params: self.num_params,
                expected_qubits: self.num_qubits,
                found_params: parameters.len(),
                found_qubits: qubits.len(),
            });
        }
        Ok(Gate::new(self.name, parameters, qubits))
    }
}

#[rustfmt::skip]
const STANDARD_GATE_TABLE: &[StandardGate] = &[
    StandardGate { name: "I",        num_params: 0, num_qubits: 1 },
    StandardGate { name: "X",        num_params: 0, num_qubits: 1 },
    StandardGate { name: "Y",        num_params: 0, num_qubits: 1 },
    StandardGate { name: "Z",        num_params: 0, num_qubits: 1 },
    StandardGate { name: "H",        num_params: 0, num_qubits: 1 },
    StandardGate { name: "S",        num_params: 0, num_qubits: 1 },
    StandardGate { name: "T",        num_params: 0, num_qubits: 1 },
    StandardGate { name: "PHASE",    num_params: 1, num_qubits: 1 },
    StandardGate { name: "RX",       num_params: 1, num_qubits: 1 },
    StandardGate { name: "RY",       num_params: 1, num_qubits: 1 },
    StandardGate { name: "RZ",       num_params: 1, num_qubits: 1 },
    StandardGate { name: "CZ",       num_params: 0, num_qubits: 2 },
    StandardGate { name: "CNOT",     num_params: 0, num_qubits: 2 },
    StandardGate { name: "SWAP",     num_params: 0, num_qubits: 2 },
    StandardGate { name: "ISWAP",    num_params: 0, num_qubits: 2 },
    StandardGate { name: "CPHASE00", num_params: 1, num_qubits: 2 },
    StandardGate { name: "CPHASE01", num_params: 1, num_qubits: 2 },
    StandardGate { name: "CPHASE10", num_params: 1, num_qubits: 2 },
    StandardGate { name: "CPHASE",   num_params: 1, num_qubits: 2 },
    StandardGate { name: "PSWAP",    num_params: 1, num_qubits: 2 },
    StandardGate { name: "XY",       num_params: 1, num_qubits: 2 },
    StandardGate { name: "CCNOT",    num_params: 0, num_qubits: 3 },
    StandardGate { name: "CSWAP",    num_params: 0, num_qubits: 3 },
];

pub struct GateCatalog {
    gates: HashMap<&'static str, StandardGate>,
}

impl GateCatalog {
    pub fn standard() -> GateCatalog {
        GateCatalog {
            gates: STANDARD_GATE_TABLE.iter().map(|g| (g.name, *g)).collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&StandardGate> {
        self.gates.get(name)
    }
}

pub static STANDARD_GATES: Lazy<GateCatalog> = Lazy::new(GateCatalog::standard);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_mismatch_is_rejected() {
        let rx = STANDARD_GATES.lookup("RX").unwrap();
        let err = rx.instantiate(vec![], vec![QubitRef::Fixed(0)]).unwrap_err();
        assert!(matches!(err, QuilError::GateArity { .. }));
    }

    #[test]
    fn unknown_names_are_absent() {
        assert!(STANDARD_GATES.lookup("MYGATE").is_none());
    }
}
