//! Rational aspect-ratio helpers.

use crate::foundation::error::{PhotofitError, PhotofitResult};

/// Greatest common divisor (Euclid). `gcd(a, 0) == a`.
pub fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Reduce `width:height` to lowest terms, e.g. `(300, 400) -> "3:4"`.
///
/// Zero dimensions have no ratio and are rejected.
pub fn reduce_ratio(width: u32, height: u32) -> PhotofitResult<String> {
    if width == 0 || height == 0 {
        return Err(PhotofitError::validation(format!(
            "cannot reduce ratio with a zero dimension ({width}:{height})"
        )));
    }
    let g = gcd(width, height);
    Ok(format!("{}:{}", width / g, height / g))
}

/// Parse a `"W:H"` ratio string into its integer terms.
pub fn parse_ratio(s: &str) -> PhotofitResult<(u32, u32)> {
    let (w, h) = s
        .split_once(':')
        .ok_or_else(|| PhotofitError::validation(format!("ratio \"{s}\" must look like W:H")))?;
    let term = |t: &str| {
        t.trim()
            .parse::<u32>()
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| PhotofitError::validation(format!("invalid ratio term \"{t}\"")))
    };
    Ok((term(w)?, term(h)?))
}

/// Reduce an already formatted `"W:H"` string. Reducing twice yields the same string.
pub fn reduce_ratio_str(s: &str) -> PhotofitResult<String> {
    let (w, h) = parse_ratio(s)?;
    reduce_ratio(w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/ratio.rs"]
mod tests;
