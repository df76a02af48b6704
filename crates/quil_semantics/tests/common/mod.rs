// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Hand-built syntax trees for the analyzer tests. The grammar and parser
//! live outside this workspace, so tests assemble the trees the parser
//! would produce.

#![allow(dead_code)]

use quil_syntax::{SyntaxKind, SyntaxNode, SyntaxTreeBuilder};

use quil_syntax::SyntaxKind::*;

pub fn program(build: impl FnOnce(&mut SyntaxTreeBuilder)) -> SyntaxNode {
    let mut b = SyntaxTreeBuilder::default();
    b.start_node(QUIL_PROGRAM);
    build(&mut b);
    b.finish_node();
    SyntaxNode::new_root(b.finish())
}

/// The single node under the program root, for expression tests.
pub fn single_node(build: impl FnOnce(&mut SyntaxTreeBuilder)) -> SyntaxNode {
    let root = program(build);
    root.first_child().expect("program has one child node")
}

pub fn node(
    b: &mut SyntaxTreeBuilder,
    kind: SyntaxKind,
    build: impl FnOnce(&mut SyntaxTreeBuilder),
) {
    b.start_node(kind);
    build(b);
    b.finish_node();
}

pub fn name(b: &mut SyntaxTreeBuilder, text: &str) {
    node(b, NAME, |b| b.token(IDENTIFIER, text));
}

pub fn int(b: &mut SyntaxTreeBuilder, text: &str) {
    node(b, NUMBER, |b| b.token(INT, text));
}

pub fn float(b: &mut SyntaxTreeBuilder, text: &str) {
    node(b, NUMBER, |b| b.token(FLOAT, text));
}

pub fn pi(b: &mut SyntaxTreeBuilder, negative: bool) {
    node(b, NUMBER, |b| {
        if negative {
            b.token(MINUS, "-");
        }
        b.token(PI_KW, "pi");
    });
}

pub fn qubit(b: &mut SyntaxTreeBuilder, text: &str) {
    let kind = if text.chars().all(|c| c.is_ascii_digit()) {
        INT
    } else {
        IDENTIFIER
    };
    node(b, QUBIT, |b| b.token(kind, text));
}

/// `%name`, as written in parameter positions.
pub fn variable(b: &mut SyntaxTreeBuilder, var_name: &str) {
    node(b, VARIABLE, |b| {
        b.token(PERCENT, "%");
        b.token(IDENTIFIER, var_name);
    });
}

/// `region` or `region[offset]`.
pub fn memory(b: &mut SyntaxTreeBuilder, region: &str, offset: Option<&str>) {
    node(b, ADDRESS, |b| {
        b.token(IDENTIFIER, region);
        if let Some(offset) = offset {
            b.token(L_BRACKET, "[");
            b.token(INT, offset);
            b.token(R_BRACKET, "]");
        }
    });
}

/// The deprecated numbered register form `[index]`.
pub fn register(b: &mut SyntaxTreeBuilder, index: &str) {
    node(b, ADDRESS, |b| {
        b.token(L_BRACKET, "[");
        b.token(INT, index);
        b.token(R_BRACKET, "]");
    });
}

pub fn label(b: &mut SyntaxTreeBuilder, label_name: &str) {
    node(b, LABEL, |b| {
        b.token(AT, "@");
        b.token(IDENTIFIER, label_name);
    });
}

pub fn quoted(b: &mut SyntaxTreeBuilder, contents: &str) {
    b.token(STRING, &format!("\"{contents}\""));
}

pub fn frame(b: &mut SyntaxTreeBuilder, qubits: &[&str], frame_name: &str) {
    node(b, FRAME, |b| {
        for q in qubits {
            qubit(b, q);
        }
        quoted(b, frame_name);
    });
}

pub fn waveform_name(b: &mut SyntaxTreeBuilder, segments: &[&str]) {
    node(b, WAVEFORM_NAME, |b| {
        for segment in segments {
            name(b, segment);
        }
    });
}

/// A bare waveform reference with no template parameters.
pub fn waveform_reference(b: &mut SyntaxTreeBuilder, segments: &[&str]) {
    node(b, WAVEFORM, |b| waveform_name(b, segments));
}

pub fn named_param(
    b: &mut SyntaxTreeBuilder,
    param_name: &str,
    value: impl FnOnce(&mut SyntaxTreeBuilder),
) {
    node(b, NAMED_PARAM, |b| {
        b.token(IDENTIFIER, param_name);
        b.token(COLON, ":");
        value(b);
    });
}

pub fn pragma_arg(b: &mut SyntaxTreeBuilder, text: &str) {
    let kind = if text.chars().all(|c| c.is_ascii_digit()) {
        INT
    } else {
        IDENTIFIER
    };
    node(b, PRAGMA_NAME, |b| b.token(kind, text));
}

pub fn frame_attr(b: &mut SyntaxTreeBuilder, text: &str) {
    node(b, FRAME_ATTR, |b| b.token(IDENTIFIER, text));
}
