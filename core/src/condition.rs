//! Display condition evaluation.
//!
//! A condition is a whitespace-separated string of the form
//! `<property> <operator> <value...>`; the value may contain spaces.
//! The property is looked up in the runtime context by exact key.
//! Every malformed input fails closed: evaluation returns `false` and
//! emits a diagnostic rather than raising. A bad condition can hide an
//! announcement, never break the page.

use placard_types::RuntimeContext;
use std::str::FromStr;

/// Supported condition operators. Textual names are case-insensitive;
/// the comparison operators also accept their symbolic aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equals" | "==" => Ok(Self::Equals),
            "notequals" | "!=" => Ok(Self::NotEquals),
            "contains" => Ok(Self::Contains),
            "notcontains" => Ok(Self::NotContains),
            "startswith" => Ok(Self::StartsWith),
            "endswith" => Ok(Self::EndsWith),
            "greaterthan" | ">" => Ok(Self::GreaterThan),
            "lessthan" | "<" => Ok(Self::LessThan),
            "greaterthanorequal" | ">=" => Ok(Self::GreaterThanOrEqual),
            "lessthanorequal" | "<=" => Ok(Self::LessThanOrEqual),
            _ => Err(()),
        }
    }
}

impl Operator {
    fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::LessThan | Self::GreaterThanOrEqual | Self::LessThanOrEqual
        )
    }
}

/// Evaluate a condition against the runtime context. Fails closed.
pub fn evaluate(condition: &str, ctx: &RuntimeContext) -> bool {
    let tokens: Vec<&str> = condition.split_whitespace().collect();
    if tokens.len() < 3 {
        tracing::warn!(condition, "condition has fewer than three tokens");
        return false;
    }

    let property = tokens[0];
    let Ok(operator) = tokens[1].parse::<Operator>() else {
        tracing::warn!(condition, operator = tokens[1], "unknown condition operator");
        return false;
    };
    // Everything after the operator is the value, single-spaced
    let expected = tokens[2..].join(" ");

    let Some(actual) = ctx.get(property) else {
        tracing::warn!(condition, property, "condition property missing from context");
        return false;
    };

    if operator.is_numeric() {
        let (Some(lhs), Ok(rhs)) = (actual.as_f64(), expected.parse::<f64>()) else {
            tracing::warn!(condition, "numeric comparison on non-numeric values");
            return false;
        };
        return match operator {
            Operator::GreaterThan => lhs > rhs,
            Operator::LessThan => lhs < rhs,
            Operator::GreaterThanOrEqual => lhs >= rhs,
            Operator::LessThanOrEqual => lhs <= rhs,
            _ => unreachable!(),
        };
    }

    let actual = actual.to_display_string();
    match operator {
        Operator::Equals => actual == expected,
        Operator::NotEquals => actual != expected,
        Operator::Contains => actual.contains(&expected),
        Operator::NotContains => !actual.contains(&expected),
        Operator::StartsWith => actual.starts_with(&expected),
        Operator::EndsWith => actual.ends_with(&expected),
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> RuntimeContext {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_equals_and_aliases() {
        let c = ctx(&[("name", "Bob")]);
        assert!(evaluate("name equals Bob", &c));
        assert!(evaluate("name == Bob", &c));
        assert!(evaluate("name EQUALS Bob", &c));
        assert!(!evaluate("name equals Alice", &c));
        assert!(evaluate("name notequals Alice", &c));
        assert!(evaluate("name != Alice", &c));
    }

    #[test]
    fn test_numeric_comparisons() {
        let c = ctx(&[("count", "10")]);
        assert!(evaluate("count greaterthan 5", &c));
        assert!(evaluate("count > 5", &c));
        assert!(evaluate("count >= 10", &c));
        assert!(evaluate("count lessthanorequal 10", &c));
        assert!(!evaluate("count lessthan 10", &c));

        let c = ctx(&[("count", "3")]);
        assert!(!evaluate("count greaterthan 5", &c));
    }

    #[test]
    fn test_numeric_comparison_on_number_value() {
        let c: RuntimeContext = [("count", 10.0)].into_iter().collect();
        assert!(evaluate("count greaterthan 5", &c));
    }

    #[test]
    fn test_substring_operators() {
        let c = ctx(&[("plan", "pro-annual")]);
        assert!(evaluate("plan contains annual", &c));
        assert!(evaluate("plan notcontains trial", &c));
        assert!(evaluate("plan startswith pro", &c));
        assert!(evaluate("plan endswith annual", &c));
        assert!(!evaluate("plan startswith annual", &c));
    }

    #[test]
    fn test_value_may_contain_spaces() {
        let c = ctx(&[("region", "North America")]);
        assert!(evaluate("region equals North America", &c));
        // Extra whitespace between tokens collapses to single spaces
        assert!(evaluate("region   equals   North   America", &c));
    }

    #[test]
    fn test_missing_property_fails_closed() {
        let c = ctx(&[]);
        assert!(!evaluate("plan equals pro", &c));
    }

    #[test]
    fn test_malformed_conditions_fail_closed() {
        let c = ctx(&[("plan", "pro")]);
        assert!(!evaluate("", &c));
        assert!(!evaluate("plan equals", &c));
        assert!(!evaluate("plan resembles pro", &c));
        assert!(!evaluate("plan greaterthan pro", &c));
    }
}
