//! The closed set of node types the grammar can produce.
//!
//! Names follow ESTree so trees exported by other JavaScript tooling can be
//! imported and compared against trees built by [`crate::syntax::parser`].

use std::fmt;
use std::str::FromStr;

macro_rules! node_kinds {
    ($($kind:ident),+ $(,)?) => {
        /// Type tag of a [`SyntaxNode`](super::SyntaxNode).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $($kind),+
        }

        impl NodeKind {
            /// Every known kind, in declaration order.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind),+];

            /// The ESTree `type` string for this kind.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind)),+
                }
            }
        }

        impl FromStr for NodeKind {
            type Err = UnknownNodeKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($kind) => Ok(NodeKind::$kind),)+
                    other => Err(UnknownNodeKind(other.to_string())),
                }
            }
        }
    };
}

node_kinds! {
    Program,
    Identifier,
    Literal,
    ThisExpression,
    ArrayExpression,
    ObjectExpression,
    Property,
    FunctionExpression,
    FunctionDeclaration,
    UnaryExpression,
    UpdateExpression,
    BinaryExpression,
    LogicalExpression,
    AssignmentExpression,
    ConditionalExpression,
    CallExpression,
    NewExpression,
    MemberExpression,
    SequenceExpression,
    ExpressionStatement,
    BlockStatement,
    EmptyStatement,
    DebuggerStatement,
    VariableDeclaration,
    VariableDeclarator,
    IfStatement,
    ForStatement,
    ForInStatement,
    WhileStatement,
    DoWhileStatement,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    SwitchStatement,
    SwitchCase,
    LabeledStatement,
    WithStatement,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `type` string outside the supported grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNodeKind(pub String);

impl fmt::Display for UnknownNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node type '{}'", self.0)
    }
}

impl std::error::Error for UnknownNodeKind {}
