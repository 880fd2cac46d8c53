//! The placeholder expression language.
//!
//! Expressions are compiled once into a [`Program`] and evaluated against a
//! [`FactSnapshot`]. The language covers string, number, boolean, `nil` and
//! array literals, arithmetic, comparison and boolean operators, the
//! conditional `a ? b : c`, the nil-coalescing `a ?? b`, member and index
//! access, function calls and the pipe form `x | f(a)`, which calls
//! `f(x, a)`.
//!
//! `lookup(path[, default])` is the only way an expression can observe the
//! outside world. Bare names are rejected at evaluation time.

mod ast;
mod eval;
mod functions;
mod parser;
mod value;

use serde_json::Value;

pub use value::render;

use crate::HieraResult;
use crate::error::HieraError;
use crate::query::FactSnapshot;

/// A compiled placeholder expression.
#[derive(Clone, Debug)]
pub struct Program {
    source: String,
    ast: ast::Expr,
}

impl Program {
    /// Compile `source` into a reusable program.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::Eval`] when the source is not a valid
    /// expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use tiny_hiera::expr::Program;
    /// use tiny_hiera::query::FactSnapshot;
    ///
    /// let program = Program::compile("lookup('env') | upper()")?;
    /// let facts = json!({"env": "prod"});
    /// let snapshot = FactSnapshot::new(facts.as_object().expect("object"));
    /// assert_eq!(program.run(&snapshot)?, json!("PROD"));
    /// # Ok::<(), std::sync::Arc<tiny_hiera::HieraError>>(())
    /// ```
    pub fn compile(source: &str) -> HieraResult<Self> {
        let ast = parser::parse(source).map_err(|message| HieraError::eval_arc(source, message))?;
        Ok(Self {
            source: source.to_owned(),
            ast,
        })
    }

    /// Evaluate the program against `facts`.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::Eval`] for runtime failures such as type
    /// mismatches, unknown functions or division by zero.
    pub fn run(&self, facts: &FactSnapshot) -> HieraResult<Value> {
        eval::Evaluator::new(facts)
            .eval(&self.ast)
            .map_err(|message| HieraError::eval_arc(self.source.as_str(), message))
    }

    /// The source text the program was compiled from.
    #[must_use]
    pub const fn source(&self) -> &str {
        self.source.as_str()
    }
}

/// Compile and evaluate `source` in one step.
///
/// # Errors
///
/// Returns [`HieraError::Eval`] when compilation or evaluation fails.
pub fn evaluate(source: &str, facts: &FactSnapshot) -> HieraResult<Value> {
    Program::compile(source)?.run(facts)
}
