use num_complex::Complex64;

use crate::model::FunctionName;

/// Infix operators, lowest to highest precedence: `+ -`, `* /`, `^`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }

    /// The arithmetic behind the operator, as a plain function pointer so it
    /// can be moved into composed mappings.
    pub fn operation(self) -> fn(Complex64, Complex64) -> Complex64 {
        match self {
            BinaryOp::Add => |a, b| a + b,
            BinaryOp::Sub => |a, b| a - b,
            BinaryOp::Mul => |a, b| a * b,
            BinaryOp::Div => |a, b| a / b,
            BinaryOp::Pow => pow,
        }
    }
}

/// Prefix operators. They bind tighter than every infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Exp,
    Ln,
    Sin,
    Cos,
    Tan,
}

impl UnaryOp {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "exp" => Some(UnaryOp::Exp),
            "ln" => Some(UnaryOp::Ln),
            "sin" => Some(UnaryOp::Sin),
            "cos" => Some(UnaryOp::Cos),
            "tan" => Some(UnaryOp::Tan),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Exp => "exp",
            UnaryOp::Ln => "ln",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
        }
    }

    /// Display name of the operator applied to the argument: `-#`, `exp #`, ...
    pub fn name(self) -> FunctionName {
        match self {
            UnaryOp::Neg => FunctionName::wrap("-", ""),
            op => FunctionName::wrap(&format!("{} ", op.symbol()), ""),
        }
    }

    pub fn operation(self) -> fn(Complex64) -> Complex64 {
        match self {
            UnaryOp::Neg => |z| -z,
            UnaryOp::Exp => Complex64::exp,
            UnaryOp::Ln => Complex64::ln,
            UnaryOp::Sin => Complex64::sin,
            UnaryOp::Cos => Complex64::cos,
            UnaryOp::Tan => Complex64::tan,
        }
    }

    #[inline]
    pub fn apply(self, z: Complex64) -> Complex64 {
        (self.operation())(z)
    }
}

/// Principal power `base^exponent`.
///
/// `0^0 = 1` and `0^w = 0` otherwise; real exponents go through the polar form
/// so that e.g. `z^2` stays exact on the real axis.
#[allow(clippy::float_cmp)]
pub fn pow(base: Complex64, exponent: Complex64) -> Complex64 {
    if is_zero(exponent) {
        return Complex64::new(1.0, 0.0);
    }
    if is_zero(base) {
        return Complex64::new(0.0, 0.0);
    }
    if exponent.im == 0.0 {
        base.powf(exponent.re)
    } else {
        base.powc(exponent)
    }
}

#[allow(clippy::float_cmp)]
fn is_zero(c: Complex64) -> bool {
    c.re == 0.0 && c.im == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn binary_arithmetic() {
        let a = Complex64::new(1.0, 2.0);
        let b = Complex64::new(3.0, -1.0);
        let apply = |op: BinaryOp, x: Complex64, y: Complex64| (op.operation())(x, y);
        assert_eq!(apply(BinaryOp::Add, a, b), Complex64::new(4.0, 1.0));
        assert_eq!(apply(BinaryOp::Sub, a, b), Complex64::new(-2.0, 3.0));
        assert_eq!(apply(BinaryOp::Mul, a, b), Complex64::new(5.0, 5.0));
        assert!(close(apply(BinaryOp::Div, a * b, b), a));
    }

    #[test]
    fn power_edge_cases() {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        assert_eq!(pow(zero, zero), one);
        assert_eq!(pow(zero, Complex64::new(2.0, 1.0)), zero);
        assert!(close(pow(Complex64::new(2.0, 0.0), Complex64::new(2.0, 0.0)), Complex64::new(4.0, 0.0)));
        assert!(close(pow(Complex64::new(0.0, 1.0), Complex64::new(2.0, 0.0)), -one));
        // i^i = e^(-pi/2)
        let i = Complex64::new(0.0, 1.0);
        assert!(close(pow(i, i), Complex64::new((-std::f64::consts::FRAC_PI_2).exp(), 0.0)));
    }

    #[test]
    fn unary_words() {
        assert_eq!(UnaryOp::from_word("ln"), Some(UnaryOp::Ln));
        assert_eq!(UnaryOp::from_word("log"), None);
        assert_eq!(UnaryOp::Ln.name().value(), "ln z");
        assert_eq!(UnaryOp::Neg.name().value(), "-z");
        assert_eq!(UnaryOp::Neg.apply(Complex64::new(1.0, -1.0)), Complex64::new(-1.0, 1.0));
        assert!(close(UnaryOp::Exp.apply(Complex64::new(0.0, 0.0)), Complex64::new(1.0, 0.0)));
    }
}
