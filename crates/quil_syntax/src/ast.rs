// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Typed views, layered on top of untyped `SyntaxNode`s.
//!
//! The conversion from an untyped node to a view has zero runtime cost: a
//! view and a syntax node have exactly the same representation. Views only
//! add kind-checked accessors for the children a builder needs.

mod nodes;

use std::marker::PhantomData;

use crate::{
    syntax_node::{SyntaxNode, SyntaxNodeChildren, SyntaxToken},
    SyntaxKind,
};

pub use self::nodes::*;

/// The main trait to go from an untyped `SyntaxNode` to a typed view.
pub trait AstNode {
    fn can_cast(kind: SyntaxKind) -> bool
    where
        Self: Sized;

    fn cast(syntax: SyntaxNode) -> Option<Self>
    where
        Self: Sized;

    fn syntax(&self) -> &SyntaxNode;

    /// The source text covered by this node.
    fn text(&self) -> String {
        self.syntax().text().to_string()
    }
}

/// Nodes that carry a `NAME` child.
pub trait HasName: AstNode {
    fn name(&self) -> Option<Name>
    where
        Self: Sized,
    {
        support::child(self.syntax())
    }
}

/// An iterator over `SyntaxNode` children of a particular view type.
#[derive(Debug, Clone)]
pub struct AstChildren<N> {
    inner: SyntaxNodeChildren,
    ph: PhantomData<N>,
}

impl<N> AstChildren<N> {
    fn new(parent: &SyntaxNode) -> Self {
        AstChildren {
            inner: parent.children(),
            ph: PhantomData,
        }
    }
}

impl<N: AstNode> Iterator for AstChildren<N> {
    type Item = N;
    fn next(&mut self) -> Option<N> {
        self.inner.find_map(N::cast)
    }
}

pub(crate) mod support {
    use super::{AstChildren, AstNode, SyntaxKind, SyntaxNode, SyntaxToken};

    pub(crate) fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
        parent.children().find_map(N::cast)
    }

    pub(crate) fn children<N: AstNode>(parent: &SyntaxNode) -> AstChildren<N> {
        AstChildren::new(parent)
    }

    pub(crate) fn token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
        parent
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|it| it.kind() == kind)
    }

    pub(crate) fn tokens(
        parent: &SyntaxNode,
        kind: SyntaxKind,
    ) -> impl Iterator<Item = SyntaxToken> {
        parent
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(move |it| it.kind() == kind)
    }
}
