use super::Object;
use std::rc::Rc;

/// ## Runtime value
///
/// Cloning a `Val::Object` shares the heap payload; it never copies the string.
#[derive(Debug, Clone)]
pub enum Val {
    Nil,
    Bool(bool),
    Number(f64),
    Object(Rc<Object>),
}

impl Val {
    pub fn is_falsey(&self) -> bool {
        match self {
            Val::Nil => true,
            Val::Bool(b) => !b,
            Val::Number(_) | Val::Object(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Val::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Val::Object(obj) => match &**obj {
                Object::String(s) => Some(s.as_str()),
            },
            _ => None,
        }
    }
}

impl PartialEq for Val {
    fn eq(&self, other: &Val) -> bool {
        match (self, other) {
            (Val::Nil, Val::Nil) => true,
            (Val::Bool(l), Val::Bool(r)) => l == r,
            (Val::Number(l), Val::Number(r)) => l == r,
            (Val::Object(l), Val::Object(r)) => l == r,
            _ => false,
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Nil => write!(f, "nil"),
            Val::Bool(b) => write!(f, "{}", b),
            Val::Number(n) => write!(f, "{}", format_number(*n)),
            Val::Object(obj) => write!(f, "{}", obj),
        }
    }
}

const PRECISION: usize = 6;

/// Six significant digits in `%g` style: fixed notation for exponents in
/// `-4..6`, otherwise scientific with a signed two digit exponent.
/// Trailing zeros in the fraction are dropped.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let scientific = format!("{:.*e}", PRECISION - 1, n);
    let (mantissa, exp) = match scientific.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };
    if exp < -4 || exp >= PRECISION as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (PRECISION as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, n)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(s: &str) -> Val {
        Val::Object(Rc::new(Object::String(s.to_string())))
    }

    #[test]
    fn test_truthiness() {
        assert!(Val::Nil.is_falsey());
        assert!(Val::Bool(false).is_falsey());
        assert!(!Val::Bool(true).is_falsey());
        assert!(!Val::Number(0.0).is_falsey());
        assert!(!string("").is_falsey());
    }

    #[test]
    fn test_equality_is_kind_guarded() {
        assert_eq!(Val::Nil, Val::Nil);
        assert_ne!(Val::Number(1.0), string("1"));
        assert_ne!(Val::Bool(false), Val::Nil);
        assert_ne!(Val::Number(0.0), Val::Bool(false));
        assert_eq!(string("ab"), string("ab"));
        assert_ne!(Val::Number(f64::NAN), Val::Number(f64::NAN));
    }

    #[test]
    fn test_number_display_uses_six_significant_digits() {
        assert_eq!(Val::Number(0.1 + 0.2).to_string(), "0.3");
        assert_eq!(Val::Number(1.0 / 3.0).to_string(), "0.333333");
        assert_eq!(Val::Number(100000.0).to_string(), "100000");
        assert_eq!(Val::Number(123456.7).to_string(), "123457");
        assert_eq!(Val::Number(1234567.0).to_string(), "1.23457e+06");
        assert_eq!(Val::Number(999999.5).to_string(), "1e+06");
        assert_eq!(Val::Number(1e21).to_string(), "1e+21");
        assert_eq!(Val::Number(0.0001).to_string(), "0.0001");
        assert_eq!(Val::Number(0.00001).to_string(), "1e-05");
        assert_eq!(Val::Number(-2.5e-7).to_string(), "-2.5e-07");
        assert_eq!(Val::Number(0.0).to_string(), "0");
        assert_eq!(Val::Number(-0.0).to_string(), "-0");
        assert_eq!(Val::Number(f64::INFINITY).to_string(), "inf");
        assert_eq!(Val::Number(f64::NEG_INFINITY).to_string(), "-inf");
        assert_eq!(Val::Number(f64::NAN).to_string(), "nan");
    }

    #[test]
    fn test_numbers_only_from_number_vals() {
        assert_eq!(Val::Number(1.5).as_number(), Some(1.5));
        assert_eq!(Val::Bool(true).as_number(), None);
        assert_eq!(string("1").as_number(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Val::Number(3.0).to_string(), "3");
        assert_eq!(Val::Number(2.5).to_string(), "2.5");
        assert_eq!(Val::Number(-0.5).to_string(), "-0.5");
        assert_eq!(Val::Bool(true).to_string(), "true");
        assert_eq!(Val::Nil.to_string(), "nil");
        assert_eq!(string("hi").to_string(), "hi");
    }
}
