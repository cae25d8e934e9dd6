//! SI unit string resolution.
//!
//! Unit strings stored on dimensions, tags and properties are free text.
//! This module turns them into a canonical `(prefix, base)` pair and answers
//! the two questions structural validation needs:
//!
//! - **Atomicity**: is the string a single unit (`"ms"`), or a composition
//!   (`"m/s"`, `"V*A"`, `"m^2"`)? Axis units must be atomic.
//! - **Compatibility**: do two units measure the same quantity, regardless
//!   of scale (`"ms"` and `"s"` do, `"V"` and `"A"` do not)?
//!
//! Unknown base units are not a parse error. They produce a
//! [`CanonicalUnit`] with `recognized == false`, which is never compatible
//! with anything and never valid.

use std::fmt;

use thiserror::Error;

/// Decimal SI prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiPrefix {
    Yotta,
    Zetta,
    Exa,
    Peta,
    Tera,
    Giga,
    Mega,
    Kilo,
    Hecto,
    Deca,
    Deci,
    Centi,
    Milli,
    Micro,
    Nano,
    Pico,
    Femto,
    Atto,
    Zepto,
    Yocto,
}

/// Lookup order for prefix stripping. `da` must precede `d`.
const PREFIXES: [SiPrefix; 20] = [
    SiPrefix::Deca,
    SiPrefix::Yotta,
    SiPrefix::Zetta,
    SiPrefix::Exa,
    SiPrefix::Peta,
    SiPrefix::Tera,
    SiPrefix::Giga,
    SiPrefix::Mega,
    SiPrefix::Kilo,
    SiPrefix::Hecto,
    SiPrefix::Deci,
    SiPrefix::Centi,
    SiPrefix::Milli,
    SiPrefix::Micro,
    SiPrefix::Nano,
    SiPrefix::Pico,
    SiPrefix::Femto,
    SiPrefix::Atto,
    SiPrefix::Zepto,
    SiPrefix::Yocto,
];

impl SiPrefix {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Yotta => "Y",
            Self::Zetta => "Z",
            Self::Exa => "E",
            Self::Peta => "P",
            Self::Tera => "T",
            Self::Giga => "G",
            Self::Mega => "M",
            Self::Kilo => "k",
            Self::Hecto => "h",
            Self::Deca => "da",
            Self::Deci => "d",
            Self::Centi => "c",
            Self::Milli => "m",
            Self::Micro => "u",
            Self::Nano => "n",
            Self::Pico => "p",
            Self::Femto => "f",
            Self::Atto => "a",
            Self::Zepto => "z",
            Self::Yocto => "y",
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            Self::Yotta => 1e24,
            Self::Zetta => 1e21,
            Self::Exa => 1e18,
            Self::Peta => 1e15,
            Self::Tera => 1e12,
            Self::Giga => 1e9,
            Self::Mega => 1e6,
            Self::Kilo => 1e3,
            Self::Hecto => 1e2,
            Self::Deca => 1e1,
            Self::Deci => 1e-1,
            Self::Centi => 1e-2,
            Self::Milli => 1e-3,
            Self::Micro => 1e-6,
            Self::Nano => 1e-9,
            Self::Pico => 1e-12,
            Self::Femto => 1e-15,
            Self::Atto => 1e-18,
            Self::Zepto => 1e-21,
            Self::Yocto => 1e-24,
        }
    }

    pub fn all() -> &'static [SiPrefix] {
        &PREFIXES
    }
}

/// Known unit symbols: (symbol, canonical base, factor relative to the base).
///
/// Spelling variants and non-decimal multiples map onto one canonical base.
const BASE_UNITS: &[(&str, &str, f64)] = &[
    ("m", "m", 1.0),
    ("g", "g", 1.0),
    ("s", "s", 1.0),
    ("min", "s", 60.0),
    ("h", "s", 3600.0),
    ("d", "s", 86_400.0),
    ("A", "A", 1.0),
    ("K", "K", 1.0),
    ("mol", "mol", 1.0),
    ("cd", "cd", 1.0),
    ("Hz", "Hz", 1.0),
    ("N", "N", 1.0),
    ("Pa", "Pa", 1.0),
    ("J", "J", 1.0),
    ("eV", "eV", 1.0),
    ("W", "W", 1.0),
    ("C", "C", 1.0),
    ("V", "V", 1.0),
    ("F", "F", 1.0),
    ("S", "S", 1.0),
    ("Wb", "Wb", 1.0),
    ("T", "T", 1.0),
    ("H", "H", 1.0),
    ("l", "l", 1.0),
    ("L", "l", 1.0),
    ("Ohm", "Ohm", 1.0),
    ("ohm", "Ohm", 1.0),
    ("rad", "rad", 1.0),
    ("sr", "sr", 1.0),
    ("deg", "deg", 1.0),
    ("lx", "lx", 1.0),
    ("Bq", "Bq", 1.0),
    ("Gy", "Gy", 1.0),
    ("Sv", "Sv", 1.0),
    ("kat", "kat", 1.0),
    ("°C", "°C", 1.0),
    ("°F", "°F", 1.0),
    ("%", "%", 1.0),
    ("dB", "dB", 1.0),
];

fn lookup_base(symbol: &str) -> Option<(&'static str, f64)> {
    BASE_UNITS
        .iter()
        .find(|(sym, _, _)| *sym == symbol)
        .map(|&(_, base, factor)| (base, factor))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("unit string is empty")]
    Empty,

    #[error("unit '{unit}' is composite, expected a single unit")]
    Composite { unit: String },
}

/// A single unit resolved into prefix and base.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalUnit {
    pub prefix: Option<SiPrefix>,
    /// Canonical base symbol (`"L"` resolves to `"l"`, `"min"` to `"s"`).
    pub base: String,
    /// Factor converting a value in this unit to the bare base.
    pub scale: f64,
    pub recognized: bool,
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix {
            Some(prefix) => write!(f, "{}{}", prefix.symbol(), self.base),
            None => f.write_str(&self.base),
        }
    }
}

/// Normalise a raw unit string: trim, and spell micro as `u`.
pub fn sanitize(unit: &str) -> String {
    let trimmed = unit.trim().replace(['µ', 'μ'], "u");
    match trimmed.strip_prefix("mu") {
        Some(rest) if lookup_base(rest).is_some() => format!("u{rest}"),
        _ => trimmed,
    }
}

/// True if `unit` names exactly one unit, with no product, quotient or power.
pub fn is_atomic(unit: &str) -> bool {
    let unit = sanitize(unit);
    !unit.is_empty()
        && !unit.contains(['*', '/', '^', '·'])
        && !unit.contains(char::is_whitespace)
}

/// Resolve an atomic unit string into prefix and base.
pub fn parse(unit: &str) -> Result<CanonicalUnit, UnitError> {
    let unit = sanitize(unit);
    if unit.is_empty() {
        return Err(UnitError::Empty);
    }
    if !is_atomic(&unit) {
        return Err(UnitError::Composite { unit });
    }

    // A whole-string match wins, so "m", "Pa", "cd" and "T" are bases.
    if let Some((base, factor)) = lookup_base(&unit) {
        return Ok(CanonicalUnit {
            prefix: None,
            base: base.to_string(),
            scale: factor,
            recognized: true,
        });
    }

    for &prefix in SiPrefix::all() {
        let Some(rest) = unit.strip_prefix(prefix.symbol()) else {
            continue;
        };
        if let Some((base, factor)) = lookup_base(rest) {
            return Ok(CanonicalUnit {
                prefix: Some(prefix),
                base: base.to_string(),
                scale: prefix.factor() * factor,
                recognized: true,
            });
        }
    }

    Ok(CanonicalUnit {
        prefix: None,
        base: unit,
        scale: 1.0,
        recognized: false,
    })
}

/// True iff both units parse to the same recognized base, at any scale.
pub fn compatible(a: &str, b: &str) -> bool {
    match (parse(a), parse(b)) {
        (Ok(a), Ok(b)) => a.recognized && b.recognized && a.base == b.base,
        _ => false,
    }
}

/// Factor converting a value expressed in `from` into `to`.
pub fn scaling(from: &str, to: &str) -> Option<f64> {
    if !compatible(from, to) {
        return None;
    }
    let from = parse(from).ok()?;
    let to = parse(to).ok()?;
    Some(from.scale / to.scale)
}

/// True if `unit` is a recognized atomic unit or a product/quotient of them.
///
/// Each factor may carry an integer exponent (`"m^2"`, `"s^-1"`).
pub fn is_valid(unit: &str) -> bool {
    let unit = sanitize(unit);
    if unit.is_empty() {
        return false;
    }
    unit.split(['*', '/'])
        .all(|factor| match strip_power(factor.trim()) {
            Some(symbol) => parse(symbol).is_ok_and(|u| u.recognized),
            None => false,
        })
}

/// Split off a trailing `^n` exponent; `None` if the exponent is malformed.
fn strip_power(factor: &str) -> Option<&str> {
    match factor.split_once('^') {
        None => Some(factor),
        Some((symbol, power)) => {
            let digits = power.strip_prefix(['+', '-']).unwrap_or(power);
            let well_formed = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());
            well_formed.then_some(symbol)
        }
    }
}
