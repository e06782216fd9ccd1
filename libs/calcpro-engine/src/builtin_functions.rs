//! Built-in scientific functions for the keypad
//!
//! Every function takes the single current value. Most compute a result and
//! a display label; `pi` and `e` replace the expression with a constant and
//! `pow` hands control back to the evaluator by appending an operator.

use crate::error::{CalcError, Result};
use crate::format::{display_number, format_result};
use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Largest accepted factorial argument. This is a product limit, kept
/// explicit rather than derived from `f64` overflow.
pub const MAX_FACTORIAL: u32 = 170;

/// Scientific keypad function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScientificFunction {
    Square,
    Cube,
    Sqrt,
    Cbrt,
    Percent,
    Factorial,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Log,
    Ln,
    Log2,
    Exp,
    Exp2,
    Pow10,
    Pi,
    E,
    Pow,
    Abs,
    Reciprocal,
    Negate,
    Random,
    Floor,
    Ceil,
    Round,
    Deg,
    Rad,
}

impl ScientificFunction {
    pub const ALL: [ScientificFunction; 33] = [
        Self::Square,
        Self::Cube,
        Self::Sqrt,
        Self::Cbrt,
        Self::Percent,
        Self::Factorial,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Asin,
        Self::Acos,
        Self::Atan,
        Self::Sinh,
        Self::Cosh,
        Self::Tanh,
        Self::Log,
        Self::Ln,
        Self::Log2,
        Self::Exp,
        Self::Exp2,
        Self::Pow10,
        Self::Pi,
        Self::E,
        Self::Pow,
        Self::Abs,
        Self::Reciprocal,
        Self::Negate,
        Self::Random,
        Self::Floor,
        Self::Ceil,
        Self::Round,
        Self::Deg,
        Self::Rad,
    ];

    /// Keypad identifier
    pub fn id(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Cube => "cube",
            Self::Sqrt => "sqrt",
            Self::Cbrt => "cbrt",
            Self::Percent => "percent",
            Self::Factorial => "factorial",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Log2 => "log2",
            Self::Exp => "exp",
            Self::Exp2 => "exp2",
            Self::Pow10 => "pow10",
            Self::Pi => "pi",
            Self::E => "e",
            Self::Pow => "pow",
            Self::Abs => "abs",
            Self::Reciprocal => "reciprocal",
            Self::Negate => "negate",
            Self::Random => "random",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
            Self::Deg => "deg",
            Self::Rad => "rad",
        }
    }

    /// Whether the function reads the current value
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::Pi | Self::E | Self::Random)
    }

    fn label(self, x: f64) -> String {
        let x = display_number(x);
        match self {
            Self::Square => format!("({})²", x),
            Self::Cube => format!("({})³", x),
            Self::Sqrt => format!("√({})", x),
            Self::Cbrt => format!("∛({})", x),
            Self::Percent => format!("{}%", x),
            Self::Factorial => format!("({})!", x),
            Self::Sin => format!("sin({})", x),
            Self::Cos => format!("cos({})", x),
            Self::Tan => format!("tan({})", x),
            Self::Asin => format!("sin⁻¹({})", x),
            Self::Acos => format!("cos⁻¹({})", x),
            Self::Atan => format!("tan⁻¹({})", x),
            Self::Sinh => format!("sinh({})", x),
            Self::Cosh => format!("cosh({})", x),
            Self::Tanh => format!("tanh({})", x),
            Self::Log => format!("log({})", x),
            Self::Ln => format!("ln({})", x),
            Self::Log2 => format!("log₂({})", x),
            Self::Exp => format!("e^({})", x),
            Self::Exp2 => format!("2^({})", x),
            Self::Pow10 => format!("10^({})", x),
            Self::Abs => format!("|{}|", x),
            Self::Reciprocal => format!("1/({})", x),
            Self::Negate => format!("-({})", x),
            Self::Random => "random()".to_string(),
            Self::Floor => format!("floor({})", x),
            Self::Ceil => format!("ceil({})", x),
            Self::Round => format!("round({})", x),
            Self::Deg => format!("{} rad to deg", x),
            Self::Rad => format!("{} deg to rad", x),
            Self::Pi => "π".to_string(),
            Self::E => "e".to_string(),
            Self::Pow => "^".to_string(),
        }
    }
}

impl fmt::Display for ScientificFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ScientificFunction {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|func| func.id() == s)
            .ok_or_else(|| CalcError::parse(format!("Unknown function '{}'", s)))
    }
}

/// Computed function application
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionResult {
    /// Unformatted result
    pub raw: f64,
    /// Display string from the shared formatter
    pub value: String,
    /// Human-readable sub-expression, e.g. `√(4)`
    pub label: String,
}

/// What a keypad function does to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Replace the expression with a formatted result and record history
    Computed(FunctionResult),
    /// Replace the expression with a constant, no history
    Constant(String),
    /// Append an operator and keep building the expression
    AppendOperator(&'static str),
}

/// Apply a keypad function to the current value
pub fn dispatch(func: ScientificFunction, value: f64) -> Result<Dispatch> {
    match func {
        ScientificFunction::Pi => Ok(Dispatch::Constant(PI.to_string())),
        ScientificFunction::E => Ok(Dispatch::Constant(E.to_string())),
        ScientificFunction::Pow => Ok(Dispatch::AppendOperator("^")),
        _ => apply(func, value).map(Dispatch::Computed),
    }
}

/// Compute a value-producing function
pub fn apply(func: ScientificFunction, x: f64) -> Result<FunctionResult> {
    use ScientificFunction as F;

    let raw = match func {
        F::Square => x * x,
        F::Cube => x * x * x,
        F::Sqrt => {
            if x < 0.0 {
                return Err(CalcError::domain(
                    "Cannot calculate square root of negative number",
                ));
            }
            x.sqrt()
        },
        F::Cbrt => x.cbrt(),
        F::Percent => x / 100.0,
        F::Factorial => factorial(x)?,
        F::Sin => x.sin(),
        F::Cos => x.cos(),
        F::Tan => x.tan(),
        F::Asin => {
            if !(-1.0..=1.0).contains(&x) {
                return Err(CalcError::domain("Invalid arcsine input"));
            }
            x.asin()
        },
        F::Acos => {
            if !(-1.0..=1.0).contains(&x) {
                return Err(CalcError::domain("Invalid arccosine input"));
            }
            x.acos()
        },
        F::Atan => x.atan(),
        F::Sinh => x.sinh(),
        F::Cosh => x.cosh(),
        F::Tanh => x.tanh(),
        F::Log => {
            if x <= 0.0 {
                return Err(CalcError::domain(
                    "Cannot calculate logarithm of non-positive number",
                ));
            }
            x.log10()
        },
        F::Ln => {
            if x <= 0.0 {
                return Err(CalcError::domain(
                    "Cannot calculate natural logarithm of non-positive number",
                ));
            }
            x.ln()
        },
        F::Log2 => {
            if x <= 0.0 {
                return Err(CalcError::domain(
                    "Cannot calculate log base 2 of non-positive number",
                ));
            }
            x.log2()
        },
        F::Exp => x.exp(),
        F::Exp2 => x.exp2(),
        F::Pow10 => 10f64.powf(x),
        F::Abs => x.abs(),
        F::Reciprocal => {
            if x == 0.0 {
                return Err(CalcError::domain("Cannot divide by zero"));
            }
            1.0 / x
        },
        F::Negate => -x,
        F::Random => rand::random::<f64>(),
        F::Floor => x.floor(),
        F::Ceil => x.ceil(),
        F::Round => round_half_up(x),
        F::Deg => x * (180.0 / PI),
        F::Rad => x * (PI / 180.0),
        F::Pi | F::E | F::Pow => {
            return Err(CalcError::parse(format!(
                "Function '{}' does not produce a value",
                func
            )));
        },
    };

    if !raw.is_finite() {
        return Err(CalcError::range(format!("Result of {} is out of range", func)));
    }

    let result = FunctionResult {
        raw,
        value: format_result(raw),
        label: func.label(x),
    };
    debug!(function = %func, input = x, result = %result.value, "applied function");
    Ok(result)
}

/// Factorial by iterative product
///
/// Negative or fractional input is a domain error; input above
/// [`MAX_FACTORIAL`] is a range error.
pub fn factorial(n: f64) -> Result<f64> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(CalcError::domain(
            "Factorial is only defined for non-negative integers",
        ));
    }
    if n > f64::from(MAX_FACTORIAL) {
        return Err(CalcError::range(format!(
            "Factorial result too large (maximum: {}!)",
            MAX_FACTORIAL
        )));
    }

    let mut result = 1.0;
    for i in 2..=(n as u32) {
        result *= f64::from(i);
    }
    Ok(result)
}

/// Round to the nearest integer, ties toward positive infinity
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}
