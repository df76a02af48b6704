// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! This module defines the Concrete Syntax Tree (CST) for Quil.
//!
//! The CST provides a single node type, `SyntaxNode`, and a basic traversal
//! API (parent, children, siblings). The *real* implementation is in the
//! (language-agnostic) `rowan` crate; this module just wraps its API.
//!
//! The lexer and parser live outside this workspace. They produce a
//! `GreenNode` with `SyntaxTreeBuilder`; everything downstream consumes the
//! finished tree.

use rowan::{GreenNodeBuilder, Language};

use crate::SyntaxKind;

pub use rowan::{GreenNode, WalkEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QuilLanguage {}

impl Language for QuilLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from(raw.0)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind.into())
    }
}

pub type SyntaxNode = rowan::SyntaxNode<QuilLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<QuilLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<QuilLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<QuilLanguage>;
pub type SyntaxElementChildren = rowan::SyntaxElementChildren<QuilLanguage>;
pub type Preorder = rowan::api::Preorder<QuilLanguage>;

/// Builder for the green (immutable, position-independent) tree.
/// The external parser targets this; tests use it to construct trees by hand.
#[derive(Default)]
pub struct SyntaxTreeBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl SyntaxTreeBuilder {
    pub fn token(&mut self, kind: SyntaxKind, text: &str) {
        let kind = QuilLanguage::kind_to_raw(kind);
        self.inner.token(kind, text);
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        let kind = QuilLanguage::kind_to_raw(kind);
        self.inner.start_node(kind);
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn finish(self) -> GreenNode {
        self.inner.finish()
    }
}
