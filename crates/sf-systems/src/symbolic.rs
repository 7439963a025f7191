//! Symbolic right-hand sides.
//!
//! A small expression tree is enough to print the equations of the catalog
//! systems and to evaluate them against a state. Systems expose their
//! equations through [`SymbolicSystem`], which builds them on first access
//! and caches the result inside the instance.

use std::collections::BTreeMap;
use std::fmt;
use std::ops;
use std::sync::OnceLock;

use crate::error::{SystemsError, SystemsResult};

/// Symbol values used by [`Expr::eval`].
pub type Bindings<'a> = BTreeMap<&'a str, f64>;

/// Expression tree over real numbers.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Sym(String),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Sin(Box<Expr>),
}

impl Expr {
    pub fn num(value: f64) -> Self {
        Expr::Num(value)
    }

    pub fn sym(name: impl Into<String>) -> Self {
        Expr::Sym(name.into())
    }

    pub fn sin(self) -> Self {
        Expr::Sin(Box::new(self))
    }

    /// Evaluate with the given symbol values.
    pub fn eval(&self, bindings: &Bindings<'_>) -> SystemsResult<f64> {
        Ok(match self {
            Expr::Num(v) => *v,
            Expr::Sym(name) => {
                *bindings
                    .get(name.as_str())
                    .ok_or_else(|| SystemsError::UnboundSymbol { name: name.clone() })?
            }
            Expr::Add(a, b) => a.eval(bindings)? + b.eval(bindings)?,
            Expr::Sub(a, b) => a.eval(bindings)? - b.eval(bindings)?,
            Expr::Mul(a, b) => a.eval(bindings)? * b.eval(bindings)?,
            Expr::Neg(a) => -a.eval(bindings)?,
            Expr::Sin(a) => a.eval(bindings)?.sin(),
        })
    }

    /// Names of all symbols, sorted and deduplicated.
    pub fn symbols(&self) -> Vec<&str> {
        fn walk<'e>(e: &'e Expr, out: &mut Vec<&'e str>) {
            match e {
                Expr::Num(_) => {}
                Expr::Sym(name) => out.push(name),
                Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) => {
                    walk(a, out);
                    walk(b, out);
                }
                Expr::Neg(a) | Expr::Sin(a) => walk(a, out),
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out.sort_unstable();
        out.dedup();
        out
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) => 2,
            Expr::Neg(..) => 3,
            Expr::Num(v) if *v < 0.0 => 3,
            Expr::Num(_) | Expr::Sym(_) | Expr::Sin(_) => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        if self.precedence() < min_prec {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }

    /// Right operands also wrap a leading minus sign.
    fn fmt_right(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        let prec = self.precedence();
        if prec < min_prec || prec == 3 {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{v}"),
            Expr::Sym(name) => f.write_str(name),
            Expr::Add(a, b) => {
                a.fmt_operand(f, 1)?;
                f.write_str(" + ")?;
                b.fmt_right(f, 2)
            }
            // Right operand of '-' binds tighter so that a - (b - c) keeps its parens.
            Expr::Sub(a, b) => {
                a.fmt_operand(f, 1)?;
                f.write_str(" - ")?;
                b.fmt_right(f, 2)
            }
            Expr::Mul(a, b) => {
                a.fmt_operand(f, 2)?;
                f.write_str("*")?;
                b.fmt_right(f, 3)
            }
            Expr::Neg(a) => {
                f.write_str("-")?;
                a.fmt_operand(f, 4)
            }
            Expr::Sin(a) => write!(f, "sin({a})"),
        }
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

/// Derivative expressions keyed by state variable, in state order.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolicEquations {
    entries: Vec<(String, Expr)>,
}

impl SymbolicEquations {
    pub fn new(entries: Vec<(String, Expr)>) -> Self {
        Self { entries }
    }

    /// Expression for d(name)/dt.
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.entries
            .iter()
            .find(|(var, _)| var == name)
            .map(|(_, expr)| expr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.entries.iter().map(|(var, expr)| (var.as_str(), expr))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every derivative at `state`, binding state variables in order.
    pub fn evaluate(&self, state: &[f64]) -> SystemsResult<Vec<f64>> {
        if state.len() != self.entries.len() {
            return Err(SystemsError::InvalidArg {
                what: format!(
                    "state of length {} for {} equations",
                    state.len(),
                    self.entries.len()
                ),
            });
        }
        let bindings: Bindings<'_> = self
            .entries
            .iter()
            .zip(state)
            .map(|((var, _), v)| (var.as_str(), *v))
            .collect();
        self.entries
            .iter()
            .map(|(_, expr)| expr.eval(&bindings))
            .collect()
    }
}

/// Systems that can describe their right-hand side symbolically.
///
/// Implementors provide the variable names, a builder and the cache cell;
/// `symbolic_equations` runs the builder at most once per instance, even
/// under concurrent first access.
pub trait SymbolicSystem {
    /// State variable names, in state-vector order.
    fn state_variables(&self) -> &'static [&'static str];

    /// Build the equations from the current parameters.
    fn build_symbolic_equations(&self) -> SymbolicEquations;

    /// Per-instance cache cell.
    fn symbolic_cache(&self) -> &OnceLock<SymbolicEquations>;

    fn symbolic_equations(&self) -> &SymbolicEquations {
        self.symbolic_cache()
            .get_or_init(|| self.build_symbolic_equations())
    }
}
