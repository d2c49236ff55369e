use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use super::rules::{COMPOUND, IMPLICATIONS};
use super::{Assumptions, Flag, IMAGINARY_PART_PREFIX, REAL_PART_PREFIX};
use crate::error::AssumptionError;

/// Resolved domain facts of one variable (or of one part of a variable).
///
/// Flags absent from the record are unknown; the witness builder treats
/// unknown as "not excluded".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintRecord {
    facts: BTreeMap<Flag, bool>,
}

impl ConstraintRecord {
    /// Close `facts` under the implication rules
    ///
    /// # Errors
    /// `AssumptionError::Inconsistent` if some flag is forced both ways.
    pub fn close(facts: impl IntoIterator<Item = (Flag, bool)>) -> Result<Self, AssumptionError> {
        let mut record = Self::default();
        for (flag, value) in facts {
            record.set(flag, value)?;
        }

        let mut changed = true;
        while changed {
            changed = false;
            for &((premise, p_value), (flag, value)) in IMPLICATIONS {
                if record.get(premise) == Some(p_value) {
                    changed |= record.set(flag, value)?;
                }
                // contrapositive
                if record.get(flag) == Some(!value) {
                    changed |= record.set(premise, !p_value)?;
                }
            }
            for rule in COMPOUND {
                let holds = rule
                    .premises
                    .iter()
                    .all(|&(flag, value)| record.get(flag) == Some(value));
                if holds {
                    let (flag, value) = rule.conclusion;
                    changed |= record.set(flag, value)?;
                }
            }
        }
        Ok(record)
    }

    /// Insert a fact; returns whether it was new
    fn set(&mut self, flag: Flag, value: bool) -> Result<bool, AssumptionError> {
        match self.facts.get(&flag) {
            Some(&existing) if existing == value => Ok(false),
            Some(_) => Err(AssumptionError::Inconsistent { flag: flag.name() }),
            None => {
                self.facts.insert(flag, value);
                Ok(true)
            }
        }
    }

    /// The resolved value of `flag`, `None` if unknown
    #[inline]
    #[must_use]
    pub fn get(&self, flag: Flag) -> Option<bool> {
        self.facts.get(&flag).copied()
    }

    /// `flag` is known to hold
    #[inline]
    #[must_use]
    pub fn is(&self, flag: Flag) -> bool {
        self.get(flag) == Some(true)
    }

    /// `flag` is known not to hold
    #[inline]
    #[must_use]
    pub fn is_not(&self, flag: Flag) -> bool {
        self.get(flag) == Some(false)
    }

    /// Iterate over resolved facts
    pub fn iter(&self) -> impl Iterator<Item = (Flag, bool)> + '_ {
        self.facts.iter().map(|(f, v)| (*f, *v))
    }
}

impl fmt::Display for ConstraintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (flag, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{flag}: {value}")?;
        }
        f.write_str("}")
    }
}

/// Records for the two parts of a complex variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartConstraints {
    /// Constraints on the real part
    pub real: ConstraintRecord,
    /// Constraints on the imaginary part
    pub imaginary: ConstraintRecord,
}

/// Which witness construction a variable needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Domain {
    /// Purely real
    Real,
    /// Purely imaginary; witnesses are real `coefficient` values times `i`
    Imaginary {
        /// Constraints on the real coefficient of `i`
        coefficient: ConstraintRecord,
    },
    /// Neither; real and imaginary parts are built separately
    Complex(PartConstraints),
}

/// Everything the witness builder needs to know about one variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableConstraint {
    /// Closed record of the whole variable
    pub record: ConstraintRecord,
    /// Witness construction to use
    pub domain: Domain,
}

impl VariableConstraint {
    /// True when the variable is declared (or implied) purely real
    #[must_use]
    pub fn is_real(&self) -> bool {
        matches!(self.domain, Domain::Real)
    }
}

/// Split a declared name into part prefix and flag
fn parse_name(name: &str) -> Result<(Option<&'static str>, Flag), AssumptionError> {
    let unknown = || AssumptionError::UnknownFlag(name.to_string());
    for prefix in [REAL_PART_PREFIX, IMAGINARY_PART_PREFIX] {
        if let Some(rest) = name.strip_prefix(prefix) {
            return Flag::from_name(rest)
                .map(|f| (Some(prefix), f))
                .ok_or_else(unknown);
        }
    }
    Flag::from_name(name).map(|f| (None, f)).ok_or_else(unknown)
}

/// Facts of a derived real-valued record: inherited plain flags (minus
/// `real`/`imaginary`), then the part's own prefixed flags, then `real`.
fn derive_real_record(
    parsed: &[(Option<&'static str>, Flag, bool)],
    prefix: Option<&'static str>,
    extra: &[(Flag, bool)],
) -> Result<ConstraintRecord, AssumptionError> {
    let mut facts: BTreeMap<Flag, bool> = parsed
        .iter()
        .filter(|(p, flag, _)| p.is_none() && !matches!(flag, Flag::Real | Flag::Imaginary))
        .map(|&(_, flag, value)| (flag, value))
        .collect();
    if prefix.is_some() {
        for &(p, flag, value) in parsed {
            if p == prefix {
                facts.insert(flag, value);
            }
        }
    }
    for &(flag, value) in extra {
        if facts.get(&flag) == Some(&!value) {
            return Err(AssumptionError::Inconsistent { flag: flag.name() });
        }
        facts.insert(flag, value);
    }
    ConstraintRecord::close(facts)
}

/// Resolve a declaration into a closed record plus the records needed to
/// build witnesses for the variable's domain.
///
/// # Errors
/// `UnknownFlag` for names outside the vocabulary, `Inconsistent` for
/// contradictory declarations (of the variable or of one of its parts).
pub fn resolve(assumptions: &Assumptions) -> Result<VariableConstraint, AssumptionError> {
    let parsed = assumptions
        .iter()
        .map(|(name, value)| parse_name(name).map(|(prefix, flag)| (prefix, flag, value)))
        .collect::<Result<Vec<_>, _>>()?;

    let record = ConstraintRecord::close(
        parsed
            .iter()
            .filter(|(prefix, ..)| prefix.is_none())
            .map(|&(_, flag, value)| (flag, value)),
    )?;

    let domain = if record.is(Flag::Real) {
        Domain::Real
    } else if record.is(Flag::Imaginary) {
        Domain::Imaginary {
            coefficient: derive_real_record(&parsed, None, &[(Flag::Real, true), (Flag::Nonzero, true)])?,
        }
    } else {
        Domain::Complex(PartConstraints {
            real: derive_real_record(&parsed, Some(REAL_PART_PREFIX), &[(Flag::Real, true)])?,
            imaginary: derive_real_record(&parsed, Some(IMAGINARY_PART_PREFIX), &[(Flag::Real, true)])?,
        })
    };

    trace!(target: "symb_equiv::assumptions", declared = %assumptions, resolved = %record, "resolved assumptions");
    Ok(VariableConstraint { record, domain })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_closure() {
        let c = resolve(&Assumptions::positive()).unwrap();
        assert!(c.is_real());
        for flag in [Flag::Real, Flag::Nonnegative, Flag::Nonzero, Flag::Complex] {
            assert!(c.record.is(flag), "{flag} should hold");
        }
        assert!(c.record.is_not(Flag::Negative));
        assert!(c.record.is_not(Flag::Zero));
        assert_eq!(c.record.get(Flag::Integer), None);
    }

    #[test]
    fn test_integer_chain() {
        let c = resolve(&Assumptions::integer()).unwrap();
        assert!(c.record.is(Flag::Rational));
        assert!(c.record.is(Flag::Algebraic));
        assert!(c.record.is_not(Flag::Noninteger));
        assert!(c.record.is_not(Flag::Transcendental));
    }

    #[test]
    fn test_imaginary_excludes_real_and_zero() {
        let c = resolve(&Assumptions::imaginary()).unwrap();
        assert!(c.record.is_not(Flag::Real));
        assert!(c.record.is_not(Flag::Zero));
        match c.domain {
            Domain::Imaginary { coefficient } => {
                assert!(coefficient.is(Flag::Real));
                assert!(coefficient.is(Flag::Nonzero));
            }
            other => panic!("expected imaginary domain, got {other:?}"),
        }
    }

    #[test]
    fn test_complex_parts_inherit_and_override() {
        let decl = Assumptions::complex()
            .with("real_part_positive", true)
            .with("imaginary_part_integer", true);
        let c = resolve(&decl).unwrap();
        let Domain::Complex(parts) = c.domain else {
            panic!("expected complex domain");
        };
        assert!(parts.real.is(Flag::Positive));
        assert!(parts.real.is(Flag::Real));
        assert_eq!(parts.real.get(Flag::Integer), None);
        assert!(parts.imaginary.is(Flag::Integer));
        assert_eq!(parts.imaginary.get(Flag::Positive), None);
        // prefixed flags do not leak into the whole-variable record
        assert_eq!(c.record.get(Flag::Positive), None);
    }

    #[test]
    fn test_unknown_flag() {
        let err = resolve(&Assumptions::new().with("prime", true)).unwrap_err();
        assert_eq!(err, AssumptionError::UnknownFlag("prime".into()));
        let err = resolve(&Assumptions::new().with("real_part_odd", true)).unwrap_err();
        assert_eq!(err, AssumptionError::UnknownFlag("real_part_odd".into()));
    }

    #[test]
    fn test_contradiction() {
        let decl = Assumptions::positive().with("negative", true);
        assert!(matches!(
            resolve(&decl),
            Err(AssumptionError::Inconsistent { .. })
        ));
        let decl = Assumptions::integer().with("irrational", true);
        assert!(resolve(&decl).is_err());
    }

    #[test]
    fn test_real_and_not_integer_is_noninteger() {
        let decl = Assumptions::real().with("integer", false);
        let c = resolve(&decl).unwrap();
        assert!(c.record.is(Flag::Noninteger));
    }
}
