use std::fmt;

/// Domain flags understood by the resolver and the witness builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    Integer,
    Noninteger,
    Rational,
    Irrational,
    Algebraic,
    Transcendental,
    Complex,
    Real,
    Imaginary,
    Positive,
    Negative,
    Nonnegative,
    Nonpositive,
    Zero,
    Nonzero,
}

impl Flag {
    /// Every flag, in declaration order
    pub const ALL: [Self; 15] = [
        Self::Integer,
        Self::Noninteger,
        Self::Rational,
        Self::Irrational,
        Self::Algebraic,
        Self::Transcendental,
        Self::Complex,
        Self::Real,
        Self::Imaginary,
        Self::Positive,
        Self::Negative,
        Self::Nonnegative,
        Self::Nonpositive,
        Self::Zero,
        Self::Nonzero,
    ];

    /// Declaration name of the flag
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Noninteger => "noninteger",
            Self::Rational => "rational",
            Self::Irrational => "irrational",
            Self::Algebraic => "algebraic",
            Self::Transcendental => "transcendental",
            Self::Complex => "complex",
            Self::Real => "real",
            Self::Imaginary => "imaginary",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Nonnegative => "nonnegative",
            Self::Nonpositive => "nonpositive",
            Self::Zero => "zero",
            Self::Nonzero => "nonzero",
        }
    }

    /// Parse a declaration name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
