//! AST node definitions
//!
//! The tree is built by the parser and annotated in place by the analysis
//! passes. Statement and argument lists are right-leaning sibling chains
//! rather than vectors, so a node is both a tree vertex and the head of
//! the list it starts.

use serde::{Deserialize, Serialize};
use crate::{BinaryOp, ExpType, ScopeId};

/// One node of the syntax tree.
///
/// `ty`, `is_array`, and `scope` are analysis annotations: `scope` is set
/// by the symbol-table builder on nodes that introduce a scope, and
/// `ty`/`is_array` are set by the type checker on the way up. All three
/// are unset on a freshly parsed tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Source line number, set by the parser
    pub line: u32,
    /// Next element of the enclosing statement/argument/parameter list
    pub sibling: Option<Box<Node>>,
    /// Inferred expression type, `None` until the checker pass visits the node
    pub ty: Option<ExpType>,
    /// Whether the node's value is an array (meaningful once `ty` is set)
    pub is_array: bool,
    /// Scope introduced by this node, set by the builder pass on function
    /// declarations and on compound statements that open a new block
    pub scope: Option<ScopeId>,
}

/// Node category: the three syntactic classes of C-Minus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    Decl(Decl),
    Stmt(Stmt),
    Expr(Expr),
}

/// Declarations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Decl {
    /// Function declaration: `int f(int x) { ... }`
    Function {
        name: String,
        return_ty: ExpType,
        /// Head of the parameter chain (`Param`/`VoidParam` nodes)
        params: Option<Box<Node>>,
        /// The function's top-level compound statement
        body: Option<Box<Node>>,
    },

    /// Variable declaration: `int a;` or `int a[10];`
    Var {
        name: String,
        ty: ExpType,
        is_array: bool,
    },

    /// Function parameter: `int x` or `int x[]`
    Param {
        name: String,
        ty: ExpType,
        is_array: bool,
    },

    /// The `void` marker in an empty parameter list: `f(void)`
    VoidParam,
}

/// Statements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// Compound statement: `{ locals... statements... }`
    Compound {
        locals: Option<Box<Node>>,
        statements: Option<Box<Node>>,
    },

    /// Selection: `if (cond) then else`
    If {
        condition: Option<Box<Node>>,
        then_branch: Option<Box<Node>>,
        else_branch: Option<Box<Node>>,
    },

    /// Iteration: `while (cond) body`
    While {
        condition: Option<Box<Node>>,
        body: Option<Box<Node>>,
    },

    /// Return, with or without a value
    Return { value: Option<Box<Node>> },
}

/// Expressions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// Assignment: `x = e` or `a[i] = e`
    Assign {
        target: Box<Node>,
        value: Box<Node>,
    },

    /// Binary operation: `a + b`, `x < y`
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    /// Numeric constant
    Constant(i32),

    /// Function call: `f(args...)`, `args` heads the argument chain
    Call {
        name: String,
        args: Option<Box<Node>>,
    },

    /// Variable reference: `x` or `a[i]`
    Var {
        name: String,
        index: Option<Box<Node>>,
    },
}

impl Node {
    pub fn new(kind: NodeKind, line: u32) -> Self {
        Self {
            kind,
            line,
            sibling: None,
            ty: None,
            is_array: false,
            scope: None,
        }
    }

    pub fn function(
        name: impl Into<String>,
        return_ty: ExpType,
        params: Option<Node>,
        body: Option<Node>,
        line: u32,
    ) -> Self {
        Self::new(
            NodeKind::Decl(Decl::Function {
                name: name.into(),
                return_ty,
                params: params.map(Box::new),
                body: body.map(Box::new),
            }),
            line,
        )
    }

    pub fn var_decl(name: impl Into<String>, ty: ExpType, is_array: bool, line: u32) -> Self {
        Self::new(
            NodeKind::Decl(Decl::Var {
                name: name.into(),
                ty,
                is_array,
            }),
            line,
        )
    }

    pub fn param(name: impl Into<String>, ty: ExpType, is_array: bool, line: u32) -> Self {
        Self::new(
            NodeKind::Decl(Decl::Param {
                name: name.into(),
                ty,
                is_array,
            }),
            line,
        )
    }

    pub fn void_param(line: u32) -> Self {
        Self::new(NodeKind::Decl(Decl::VoidParam), line)
    }

    pub fn compound(locals: Option<Node>, statements: Option<Node>, line: u32) -> Self {
        Self::new(
            NodeKind::Stmt(Stmt::Compound {
                locals: locals.map(Box::new),
                statements: statements.map(Box::new),
            }),
            line,
        )
    }

    pub fn if_stmt(
        condition: Option<Node>,
        then_branch: Option<Node>,
        else_branch: Option<Node>,
        line: u32,
    ) -> Self {
        Self::new(
            NodeKind::Stmt(Stmt::If {
                condition: condition.map(Box::new),
                then_branch: then_branch.map(Box::new),
                else_branch: else_branch.map(Box::new),
            }),
            line,
        )
    }

    pub fn while_stmt(condition: Option<Node>, body: Option<Node>, line: u32) -> Self {
        Self::new(
            NodeKind::Stmt(Stmt::While {
                condition: condition.map(Box::new),
                body: body.map(Box::new),
            }),
            line,
        )
    }

    pub fn return_stmt(value: Option<Node>, line: u32) -> Self {
        Self::new(
            NodeKind::Stmt(Stmt::Return {
                value: value.map(Box::new),
            }),
            line,
        )
    }

    pub fn assign(target: Node, value: Node, line: u32) -> Self {
        Self::new(
            NodeKind::Expr(Expr::Assign {
                target: Box::new(target),
                value: Box::new(value),
            }),
            line,
        )
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node, line: u32) -> Self {
        Self::new(
            NodeKind::Expr(Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }),
            line,
        )
    }

    pub fn constant(value: i32, line: u32) -> Self {
        Self::new(NodeKind::Expr(Expr::Constant(value)), line)
    }

    pub fn call(name: impl Into<String>, args: Option<Node>, line: u32) -> Self {
        Self::new(
            NodeKind::Expr(Expr::Call {
                name: name.into(),
                args: args.map(Box::new),
            }),
            line,
        )
    }

    pub fn var(name: impl Into<String>, index: Option<Node>, line: u32) -> Self {
        Self::new(
            NodeKind::Expr(Expr::Var {
                name: name.into(),
                index: index.map(Box::new),
            }),
            line,
        )
    }

    /// Append `next` at the tail of this node's sibling chain and return
    /// the (moved) head, so chains can be built left to right:
    /// `a.with_sibling(b).with_sibling(c)`.
    pub fn with_sibling(mut self, next: Node) -> Self {
        self.append_sibling(next);
        self
    }

    /// Append `next` at the tail of this node's sibling chain
    pub fn append_sibling(&mut self, next: Node) {
        let mut tail = self;
        while let Some(ref mut sib) = tail.sibling {
            tail = sib;
        }
        tail.sibling = Some(Box::new(next));
    }

    /// Iterate this node and the rest of its sibling chain
    pub fn iter_siblings(&self) -> SiblingIter<'_> {
        SiblingIter { next: Some(self) }
    }

    /// The node's child slots in fixed left-to-right order.
    ///
    /// Unused slots are `None`; the traversal engine relies on this order
    /// so both passes see children in the same sequence.
    pub fn children_mut(&mut self) -> [Option<&mut Node>; 3] {
        match &mut self.kind {
            NodeKind::Decl(Decl::Function { params, body, .. }) => {
                [params.as_deref_mut(), body.as_deref_mut(), None]
            }
            NodeKind::Decl(Decl::Var { .. })
            | NodeKind::Decl(Decl::Param { .. })
            | NodeKind::Decl(Decl::VoidParam) => [None, None, None],
            NodeKind::Stmt(Stmt::Compound { locals, statements }) => {
                [locals.as_deref_mut(), statements.as_deref_mut(), None]
            }
            NodeKind::Stmt(Stmt::If {
                condition,
                then_branch,
                else_branch,
            }) => [
                condition.as_deref_mut(),
                then_branch.as_deref_mut(),
                else_branch.as_deref_mut(),
            ],
            NodeKind::Stmt(Stmt::While { condition, body }) => {
                [condition.as_deref_mut(), body.as_deref_mut(), None]
            }
            NodeKind::Stmt(Stmt::Return { value }) => [value.as_deref_mut(), None, None],
            NodeKind::Expr(Expr::Assign { target, value }) => {
                [Some(target.as_mut()), Some(value.as_mut()), None]
            }
            NodeKind::Expr(Expr::Binary { left, right, .. }) => {
                [Some(left.as_mut()), Some(right.as_mut()), None]
            }
            NodeKind::Expr(Expr::Constant(_)) => [None, None, None],
            NodeKind::Expr(Expr::Call { args, .. }) => [args.as_deref_mut(), None, None],
            NodeKind::Expr(Expr::Var { index, .. }) => [index.as_deref_mut(), None, None],
        }
    }
}

/// Iterator over a sibling chain
pub struct SiblingIter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for SiblingIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.sibling.as_deref();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_chain_appends_at_tail() {
        let chain = Node::constant(1, 1)
            .with_sibling(Node::constant(2, 2))
            .with_sibling(Node::constant(3, 3));

        let values: Vec<u32> = chain.iter_siblings().map(|n| n.line).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn fresh_nodes_carry_no_annotations() {
        let node = Node::var("x", None, 7);
        assert_eq!(node.ty, None);
        assert!(!node.is_array);
        assert_eq!(node.scope, None);
    }

    #[test]
    fn serde_round_trip() {
        let tree = Node::assign(
            Node::var("x", None, 4),
            Node::binary(BinaryOp::Plus, Node::constant(1, 4), Node::constant(2, 4), 4),
            4,
        );
        let json = serde_json::to_string(&tree).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back.line, 4);
        assert!(matches!(back.kind, NodeKind::Expr(Expr::Assign { .. })));
    }
}
