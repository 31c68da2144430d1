use super::{Heap, Val};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

const NUMBERS: &str = "Operands must be numbers";

/// Operand checks never consume; the runtime pops only after success.
pub struct Operation {}

impl Operation {
    fn numbers(lhs: &Val, rhs: &Val) -> Result<(f64, f64)> {
        match (lhs.as_number(), rhs.as_number()) {
            (Some(l), Some(r)) => Ok((l, r)),
            _ => Err(error!(TypeMismatch; NUMBERS)),
        }
    }

    pub fn negate(val: &Val) -> Result<Val> {
        match val {
            Val::Number(n) => Ok(Val::Number(-n)),
            _ => Err(error!(TypeMismatch; "Operand must be a number")),
        }
    }

    pub fn not(val: &Val) -> Val {
        Val::Bool(val.is_falsey())
    }

    pub fn equal(lhs: &Val, rhs: &Val) -> Val {
        Val::Bool(lhs == rhs)
    }

    pub fn greater(lhs: &Val, rhs: &Val) -> Result<Val> {
        let (l, r) = Operation::numbers(lhs, rhs)?;
        Ok(Val::Bool(l > r))
    }

    pub fn less(lhs: &Val, rhs: &Val) -> Result<Val> {
        let (l, r) = Operation::numbers(lhs, rhs)?;
        Ok(Val::Bool(l < r))
    }

    /// Concatenation allocates a fresh string; neither operand is touched.
    pub fn sum(heap: &mut Heap, lhs: &Val, rhs: &Val) -> Result<Val> {
        if let (Val::Number(l), Val::Number(r)) = (lhs, rhs) {
            return Ok(Val::Number(l + r));
        }
        if let (Some(l), Some(r)) = (lhs.as_str(), rhs.as_str()) {
            let mut s = String::with_capacity(l.len() + r.len());
            s.push_str(l);
            s.push_str(r);
            return Ok(heap.alloc_string(s));
        }
        Err(error!(TypeMismatch; "Operands must be two numbers or two strings"))
    }

    pub fn subtract(lhs: &Val, rhs: &Val) -> Result<Val> {
        let (l, r) = Operation::numbers(lhs, rhs)?;
        Ok(Val::Number(l - r))
    }

    pub fn multiply(lhs: &Val, rhs: &Val) -> Result<Val> {
        let (l, r) = Operation::numbers(lhs, rhs)?;
        Ok(Val::Number(l * r))
    }

    pub fn divide(lhs: &Val, rhs: &Val) -> Result<Val> {
        let (l, r) = Operation::numbers(lhs, rhs)?;
        Ok(Val::Number(l / r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_numbers_and_strings() {
        let mut heap = Heap::new();
        assert_eq!(
            Operation::sum(&mut heap, &Val::Number(1.0), &Val::Number(2.0)).unwrap(),
            Val::Number(3.0)
        );
        let a = heap.alloc_string("a".to_string());
        let b = heap.alloc_string("b".to_string());
        let ab = Operation::sum(&mut heap, &a, &b).unwrap();
        assert_eq!(ab.as_str(), Some("ab"));
        assert_eq!(a.as_str(), Some("a"));
        assert_eq!(b.as_str(), Some("b"));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_mixed_sum_is_mismatch() {
        let mut heap = Heap::new();
        let s = heap.alloc_string("s".to_string());
        let error = Operation::sum(&mut heap, &Val::Bool(true), &Val::Number(1.0)).unwrap_err();
        assert_eq!(error.text(), "Operands must be two numbers or two strings");
        assert!(Operation::sum(&mut heap, &s, &Val::Number(1.0)).is_err());
    }

    #[test]
    fn test_numeric_only() {
        assert_eq!(Operation::less(&Val::Number(1.0), &Val::Number(2.0)).unwrap(), Val::Bool(true));
        let error = Operation::greater(&Val::Nil, &Val::Number(2.0)).unwrap_err();
        assert_eq!(error.text(), "Operands must be numbers");
        assert_eq!(Operation::divide(&Val::Number(1.0), &Val::Number(0.0)).unwrap(), Val::Number(f64::INFINITY));
        assert_eq!(Operation::negate(&Val::Bool(true)).unwrap_err().text(), "Operand must be a number");
    }
}
