//! Syntax tree for compiled placeholder expressions.

use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub(super) enum Expr {
    Literal(Value),
    Array(Vec<Expr>),
    /// A bare name; only meaningful as the target of a call.
    Name(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Member {
        target: Box<Expr>,
        key: String,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Composite nodes on the longest path from this node down to a leaf.
    pub(super) fn height(&self) -> usize {
        let tallest = match self {
            Self::Literal(_) | Self::Name(_) => return 0,
            Self::Array(items) | Self::Call { args: items, .. } => {
                items.iter().map(Self::height).max().unwrap_or(0)
            }
            Self::Unary { operand, .. } => operand.height(),
            Self::Binary { left, right, .. } => left.height().max(right.height()),
            Self::Conditional {
                condition,
                then,
                otherwise,
            } => condition
                .height()
                .max(then.height())
                .max(otherwise.height()),
            Self::Member { target, .. } => target.height(),
            Self::Index { target, index } => target.height().max(index.height()),
        };
        tallest + 1
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum UnaryOp {
    Not,
    Negate,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum BinaryOp {
    Or,
    And,
    Coalesce,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub(super) const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Coalesce => "??",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::In => "in",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }
}
