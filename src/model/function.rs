use std::fmt;
use std::sync::{Arc, LazyLock};

use num_complex::Complex64;

use crate::error::GraphError;

/// Standard name of the independent variable.
pub const VARIABLE_NAME: &str = "z";

/// The part of a name pattern that stands for the function argument.
pub const ARGUMENT_PLACEHOLDER: &str = "#";

/// Display name of a complex-valued function, kept as a pattern such as
/// `"sin #"` so that composition is plain substitution.
///
/// Every `#` in the pattern denotes the same argument: combining two functions
/// with an infix operator produces a pattern that mentions it twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionName {
    pattern: String,
}

impl FunctionName {
    /// Create a name from a pattern. Fails if the pattern has no placeholder.
    pub fn new(pattern: impl Into<String>) -> Result<Self, GraphError> {
        let pattern = pattern.into();
        if pattern.contains(ARGUMENT_PLACEHOLDER) {
            Ok(Self { pattern })
        } else {
            Err(GraphError::InvalidName { pattern })
        }
    }

    /// `prefix#suffix`. Always valid, so it cannot fail.
    pub fn wrap(prefix: &str, suffix: &str) -> Self {
        Self {
            pattern: format!("{prefix}{ARGUMENT_PLACEHOLDER}{suffix}"),
        }
    }

    /// The bare placeholder: the name of the identity function.
    pub fn identity() -> Self {
        Self {
            pattern: ARGUMENT_PLACEHOLDER.to_string(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The readable name, with the placeholder replaced by `z`.
    pub fn value(&self) -> String {
        self.pattern.replace(ARGUMENT_PLACEHOLDER, VARIABLE_NAME)
    }

    /// Name of `f(g)` where `self` names `f` and `inner` names `g`.
    pub fn compose(&self, inner: &FunctionName) -> FunctionName {
        FunctionName {
            pattern: self.pattern.replace(ARGUMENT_PLACEHOLDER, &inner.pattern),
        }
    }

    /// Name of `(f op g)`.
    pub fn combine(&self, symbol: &str, other: &FunctionName) -> FunctionName {
        FunctionName {
            pattern: format!("({}{symbol}{})", self.pattern, other.pattern),
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

/// Shared, thread-safe complex mapping.
pub type Mapping = Arc<dyn Fn(Complex64) -> Complex64 + Send + Sync>;

static IDENTITY: LazyLock<Function> = LazyLock::new(|| Function {
    name: FunctionName::identity(),
    mapping: Arc::new(|z| z),
});

/// A named, total complex function. Immutable: every composition returns a
/// new `Function` that shares the mappings it was built from.
#[derive(Clone)]
pub struct Function {
    name: FunctionName,
    mapping: Mapping,
}

impl Function {
    pub fn new<F>(name: FunctionName, mapping: F) -> Self
    where
        F: Fn(Complex64) -> Complex64 + Send + Sync + 'static,
    {
        Self {
            name,
            mapping: Arc::new(mapping),
        }
    }

    /// The argument pass-through `z ↦ z`, named `#`.
    pub fn identity() -> Self {
        IDENTITY.clone()
    }

    pub fn name(&self) -> &FunctionName {
        &self.name
    }

    #[inline]
    pub fn eval(&self, z: Complex64) -> Complex64 {
        (self.mapping)(z)
    }

    /// `z ↦ outer(self(z))`: apply `outer` after the current function.
    pub fn right_compose<F>(&self, name: &FunctionName, outer: F) -> Function
    where
        F: Fn(Complex64) -> Complex64 + Send + Sync + 'static,
    {
        let inner = Arc::clone(&self.mapping);
        Function {
            name: name.compose(&self.name),
            mapping: Arc::new(move |z| outer(inner(z))),
        }
    }

    /// Same as [`Function::right_compose`] with a whole function, name included.
    pub fn right_compose_fn(&self, outer: &Function) -> Function {
        let inner = Arc::clone(&self.mapping);
        let outer_map = Arc::clone(&outer.mapping);
        Function {
            name: outer.name.compose(&self.name),
            mapping: Arc::new(move |z| outer_map(inner(z))),
        }
    }

    /// `z ↦ self(inner(z))`: apply the current function after `inner`.
    pub fn left_compose<F>(&self, name: &FunctionName, inner: F) -> Function
    where
        F: Fn(Complex64) -> Complex64 + Send + Sync + 'static,
    {
        let outer = Arc::clone(&self.mapping);
        Function {
            name: self.name.compose(name),
            mapping: Arc::new(move |z| outer(inner(z))),
        }
    }

    /// Same as [`Function::left_compose`] with a whole function, name included.
    pub fn left_compose_fn(&self, inner: &Function) -> Function {
        let outer = Arc::clone(&self.mapping);
        let inner_map = Arc::clone(&inner.mapping);
        Function {
            name: self.name.compose(&inner.name),
            mapping: Arc::new(move |z| outer(inner_map(z))),
        }
    }

    /// Pointwise `z ↦ op(self(z), other(z))`, named `(f<symbol>g)`.
    pub fn combine(
        &self,
        symbol: &str,
        op: fn(Complex64, Complex64) -> Complex64,
        other: &Function,
    ) -> Function {
        let left = Arc::clone(&self.mapping);
        let right = Arc::clone(&other.mapping);
        Function {
            name: self.name.combine(symbol, &other.name),
            mapping: Arc::new(move |z| op(left(z), right(z))),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name.value())
            .finish_non_exhaustive()
    }
}
