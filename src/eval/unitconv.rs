//! Unit conversion tables, supplemented from
//! `original_source/stm/src/unitconv.cpp`: each unit is a multiplicative
//! factor plus an additive offset against a category base unit (§4.3,
//! the `name -> name` conversion form). Only temperature uses a nonzero
//! offset; everything else is a pure scale factor.

use once_cell::sync::Lazy;

use crate::error::{EvalError, EvalResult};
use crate::numerical::Numerical;

pub struct Unit {
    pub symbol: &'static str,
    pub factor: f64,
    pub offset: f64,
}

macro_rules! units {
    ($($sym:expr => ($f:expr, $o:expr)),* $(,)?) => {
        &[$(Unit { symbol: $sym, factor: $f, offset: $o }),*]
    };
}

static DISTANCE: Lazy<&'static [Unit]> = Lazy::new(|| {
    units! {
        "km" => (1000.0, 0.0), "m" => (1.0, 0.0), "dm" => (0.1, 0.0),
        "cm" => (0.01, 0.0), "mm" => (1e-3, 0.0), "um" => (1e-6, 0.0), "nm" => (1e-9, 0.0),
        "in" => (0.0254, 0.0), "ft" => (0.3048, 0.0), "yd" => (0.9144, 0.0), "mi" => (1609.344, 0.0),
    }
});

static MASS: Lazy<&'static [Unit]> = Lazy::new(|| {
    units! {
        "kg" => (1.0, 0.0), "g" => (1e-3, 0.0), "mg" => (1e-6, 0.0),
        "lb" => (0.45359237, 0.0), "oz" => (0.028349523125, 0.0), "t" => (1000.0, 0.0),
    }
});

static TIME: Lazy<&'static [Unit]> = Lazy::new(|| {
    units! {
        "s" => (1.0, 0.0), "ms" => (1e-3, 0.0), "min" => (60.0, 0.0),
        "hr" => (3600.0, 0.0), "day" => (86400.0, 0.0),
    }
});

static TEMPERATURE: Lazy<&'static [Unit]> = Lazy::new(|| {
    units! {
        "C" => (1.0, 0.0), "K" => (1.0, -273.15), "F" => (5.0 / 9.0, -32.0 * 5.0 / 9.0),
    }
});

static AREA: Lazy<&'static [Unit]> = Lazy::new(|| {
    units! {
        "km2" => (1e6, 0.0), "m2" => (1.0, 0.0), "dm2" => (0.01, 0.0),
        "cm2" => (1e-4, 0.0), "ha" => (1e4, 0.0),
    }
});

static VOLUME: Lazy<&'static [Unit]> = Lazy::new(|| {
    units! {
        "L" => (1e-3, 0.0), "mL" => (1e-6, 0.0), "m3" => (1.0, 0.0), "gal" => (0.00378541, 0.0),
    }
});

const CATEGORIES: &[Lazy<&'static [Unit]>; 6] = &[DISTANCE, MASS, TIME, TEMPERATURE, AREA, VOLUME];

fn find(symbol: &str) -> Option<(&'static [Unit], &'static Unit)> {
    for cat in CATEGORIES {
        if let Some(u) = cat.iter().find(|u| u.symbol == symbol) {
            // SAFETY-free: return category slice and matched unit by value copy via reference.
            return Some((*cat, u));
        }
    }
    None
}

/// Converts `value` expressed in `from` units into `to` units. Both units
/// must belong to the same category (temperature converts via a shared
/// affine base of Celsius; everything else via a multiplicative base).
pub fn convert(value: Numerical, from: &str, to: &str) -> EvalResult<Numerical> {
    let (cat_from, uf) = find(from).ok_or(EvalError::Syntax)?;
    let (cat_to, ut) = find(to).ok_or(EvalError::Syntax)?;
    if !std::ptr::eq(cat_from, cat_to) {
        return Err(EvalError::Syntax);
    }
    let base = value.as_f64() * uf.factor + uf.offset;
    let out = (base - ut.offset) / ut.factor;
    Ok(Numerical::Float(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn km_to_m() {
        let r = convert(Numerical::int(2), "km", "m").unwrap();
        assert_eq!(r.as_f64(), 2000.0);
    }

    #[test]
    fn celsius_to_fahrenheit() {
        let r = convert(Numerical::int(0), "C", "F").unwrap();
        assert!((r.as_f64() - 32.0).abs() < 1e-9);
    }

    #[test]
    fn mismatched_categories_are_syntax_errors() {
        assert_eq!(convert(Numerical::int(1), "km", "kg"), Err(EvalError::Syntax));
    }
}
