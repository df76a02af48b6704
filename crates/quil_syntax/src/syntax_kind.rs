// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Defines [`SyntaxKind`] -- a fieldless enum of all possible syntactic
//! constructs of the Quil language: tokens produced by the lexer and rule
//! nodes produced by the parser. Both stages are external to this workspace;
//! this enum is the contract they target.

/// The kind of a syntax node or token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // Punctuation tokens.
    PLUS,
    MINUS,
    TIMES,
    DIVIDE,
    POWER,
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    COMMA,
    COLON,
    AT,
    PERCENT,

    // Literal tokens.
    INT,
    FLOAT,
    STRING,
    IDENTIFIER,

    // Keyword tokens.
    DEFGATE_KW,
    DEFCIRCUIT_KW,
    MEASURE_KW,
    LABEL_KW,
    HALT_KW,
    JUMP_KW,
    JUMP_WHEN_KW,
    JUMP_UNLESS_KW,
    RESET_KW,
    WAIT_KW,
    NOP_KW,
    INCLUDE_KW,
    PRAGMA_KW,
    DECLARE_KW,
    SHARING_KW,
    OFFSET_KW,
    AS_KW,
    MATRIX_KW,
    PERMUTATION_KW,
    NEG_KW,
    NOT_KW,
    TRUE_KW,
    FALSE_KW,
    AND_KW,
    OR_KW,
    IOR_KW,
    XOR_KW,
    MOVE_KW,
    EXCHANGE_KW,
    CONVERT_KW,
    ADD_KW,
    SUB_KW,
    MUL_KW,
    DIV_KW,
    EQ_KW,
    GT_KW,
    GE_KW,
    LT_KW,
    LE_KW,
    LOAD_KW,
    STORE_KW,
    CONTROLLED_KW,
    DAGGER_KW,
    FORKED_KW,
    PULSE_KW,
    NONBLOCKING_KW,
    DELAY_KW,
    FENCE_KW,
    CAPTURE_KW,
    RAW_CAPTURE_KW,
    SET_FREQUENCY_KW,
    SHIFT_FREQUENCY_KW,
    SET_PHASE_KW,
    SHIFT_PHASE_KW,
    SWAP_PHASE_KW,
    SET_SCALE_KW,
    DEFCAL_KW,
    DEFFRAME_KW,
    DEFWAVEFORM_KW,
    SIN_KW,
    COS_KW,
    SQRT_KW,
    EXP_KW,
    CIS_KW,
    I_KW,
    PI_KW,

    // Trivia tokens.
    WHITESPACE,
    COMMENT,

    // The root node.
    QUIL_PROGRAM,

    // Atom nodes.
    NAME,
    VARIABLE,
    QUBIT,
    ADDRESS,
    LABEL,
    FRAME,
    WAVEFORM,
    WAVEFORM_NAME,
    NAMED_PARAM,
    MATRIX,
    MATRIX_ROW,
    IMAGINARY,
    FRAME_ATTR,
    PRAGMA_NAME,
    OFFSET_DESCRIPTOR,

    // Expression nodes. Operator precedence and associativity are fully
    // resolved by the parser; consumers dispatch on the kind alone.
    PAREN_EXPRESSION,
    POWER_EXPRESSION,
    MUL_DIV_EXPRESSION,
    ADD_SUB_EXPRESSION,
    SIGNED_EXPRESSION,
    FUNCTION_EXPRESSION,
    NUMBER,

    // Instruction nodes.
    GATE,
    CIRCUIT_GATE,
    MEASURE,
    CIRCUIT_MEASURE,
    DEF_LABEL,
    HALT,
    JUMP,
    JUMP_WHEN,
    JUMP_UNLESS,
    RESET_STATE,
    CIRCUIT_RESET_STATE,
    WAIT,
    NOP,
    CLASSICAL_UNARY,
    LOGICAL_BINARY_OP,
    ARITHMETIC_BINARY_OP,
    MOVE,
    EXCHANGE,
    CONVERT,
    LOAD,
    STORE,
    CLASSICAL_COMPARISON,
    INCLUDE,
    PRAGMA,
    MEMORY_DESCRIPTOR,
    DEF_GATE,
    DEF_CIRCUIT,
    DEF_FRAME,
    FRAME_SPEC,
    DEF_CALIBRATION,
    DEF_MEAS_CALIBRATION,
    DEF_WAVEFORM,
    PULSE,
    SET_FREQUENCY,
    SHIFT_FREQUENCY,
    SET_PHASE,
    SHIFT_PHASE,
    SWAP_PHASE,
    SET_SCALE,
    CAPTURE,
    RAW_CAPTURE,
    DELAY,
    FENCE,
    FENCE_ALL,

    #[doc(hidden)]
    __LAST,
}

impl From<u16> for SyntaxKind {
    #[inline]
    fn from(d: u16) -> SyntaxKind {
        assert!(d <= (SyntaxKind::__LAST as u16));
        unsafe { std::mem::transmute::<u16, SyntaxKind>(d) }
    }
}

impl From<SyntaxKind> for u16 {
    #[inline]
    fn from(k: SyntaxKind) -> u16 {
        k as u16
    }
}

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::WHITESPACE | SyntaxKind::COMMENT)
    }

    /// `true` for node kinds that can stand in an expression position.
    #[inline]
    pub fn is_expression(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            PAREN_EXPRESSION
                | POWER_EXPRESSION
                | MUL_DIV_EXPRESSION
                | ADD_SUB_EXPRESSION
                | SIGNED_EXPRESSION
                | FUNCTION_EXPRESSION
                | NUMBER
                | VARIABLE
                | ADDRESS
        )
    }

    /// `true` for tokens that modify a gate application.
    #[inline]
    pub fn is_gate_modifier(self) -> bool {
        use SyntaxKind::*;
        matches!(self, CONTROLLED_KW | DAGGER_KW | FORKED_KW)
    }

    /// The literal surface form of a token kind, if it has exactly one.
    /// Kinds without a fixed spelling (`INT`, `IDENTIFIER`, ...) return
    /// `None` and are displayed by their symbolic name instead.
    pub fn literal_name(self) -> Option<&'static str> {
        use SyntaxKind::*;
        let name = match self {
            PLUS => "+",
            MINUS => "-",
            TIMES => "*",
            DIVIDE => "/",
            POWER => "^",
            L_PAREN => "(",
            R_PAREN => ")",
            L_BRACKET => "[",
            R_BRACKET => "]",
            COMMA => ",",
            COLON => ":",
            AT => "@",
            PERCENT => "%",
            DEFGATE_KW => "DEFGATE",
            DEFCIRCUIT_KW => "DEFCIRCUIT",
            MEASURE_KW => "MEASURE",
            LABEL_KW => "LABEL",
            HALT_KW => "HALT",
            JUMP_KW => "JUMP",
            JUMP_WHEN_KW => "JUMP-WHEN",
            JUMP_UNLESS_KW => "JUMP-UNLESS",
            RESET_KW => "RESET",
            WAIT_KW => "WAIT",
            NOP_KW => "NOP",
            INCLUDE_KW => "INCLUDE",
            PRAGMA_KW => "PRAGMA",
            DECLARE_KW => "DECLARE",
            SHARING_KW => "SHARING",
            OFFSET_KW => "OFFSET",
            AS_KW => "AS",
            MATRIX_KW => "MATRIX",
            PERMUTATION_KW => "PERMUTATION",
            NEG_KW => "NEG",
            NOT_KW => "NOT",
            TRUE_KW => "TRUE",
            FALSE_KW => "FALSE",
            AND_KW => "AND",
            OR_KW => "OR",
            IOR_KW => "IOR",
            XOR_KW => "XOR",
            MOVE_KW => "MOVE",
            EXCHANGE_KW => "EXCHANGE",
            CONVERT_KW => "CONVERT",
            ADD_KW => "ADD",
            SUB_KW => "SUB",
            MUL_KW => "MUL",
            DIV_KW => "DIV",
            EQ_KW => "EQ",
            GT_KW => "GT",
            GE_KW => "GE",
            LT_KW => "LT",
            LE_KW => "LE",
            LOAD_KW => "LOAD",
            STORE_KW => "STORE",
            CONTROLLED_KW => "CONTROLLED",
            DAGGER_KW => "DAGGER",
            FORKED_KW => "FORKED",
            PULSE_KW => "PULSE",
            NONBLOCKING_KW => "NONBLOCKING",
            DELAY_KW => "DELAY",
            FENCE_KW => "FENCE",
            CAPTURE_KW => "CAPTURE",
            RAW_CAPTURE_KW => "RAW-CAPTURE",
            SET_FREQUENCY_KW => "SET-FREQUENCY",
            SHIFT_FREQUENCY_KW => "SHIFT-FREQUENCY",
            SET_PHASE_KW => "SET-PHASE",
            SHIFT_PHASE_KW => "SHIFT-PHASE",
            SWAP_PHASE_KW => "SWAP-PHASE",
            SET_SCALE_KW => "SET-SCALE",
            DEFCAL_KW => "DEFCAL",
            DEFFRAME_KW => "DEFFRAME",
            DEFWAVEFORM_KW => "DEFWAVEFORM",
            SIN_KW => "SIN",
            COS_KW => "COS",
            SQRT_KW => "SQRT",
            EXP_KW => "EXP",
            CIS_KW => "CIS",
            I_KW => "i",
            PI_KW => "pi",
            _ => return None,
        };
        Some(name)
    }
}
