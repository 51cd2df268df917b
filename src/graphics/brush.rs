use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{ScenetteError, ScenetteResult};

/// A resolved paint.
///
/// Background fills and mask painting consume brushes, never raw specs; hex
/// strings are resolved up front by [`Brush::fill`] so the per-frame path
/// does no parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Brush {
    /// Flat premultiplied color.
    Solid(Rgba8Premul),
}

impl Brush {
    /// Resolve a fill spec: `#RRGGBB` or `#RRGGBBAA`, case-insensitive,
    /// leading `#` optional.
    pub fn fill(spec: &str) -> ScenetteResult<Brush> {
        parse_hex(spec).map(Brush::Solid)
    }

    /// Solid brush from an already premultiplied color.
    pub fn solid(color: Rgba8Premul) -> Brush {
        Brush::Solid(color)
    }

    /// The brush color.
    pub fn color(&self) -> Rgba8Premul {
        match *self {
            Brush::Solid(c) => c,
        }
    }
}

impl From<Rgba8Premul> for Brush {
    fn from(color: Rgba8Premul) -> Self {
        Brush::Solid(color)
    }
}

fn parse_hex(s: &str) -> ScenetteResult<Rgba8Premul> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> ScenetteResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| ScenetteError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    let (r, g, b, a) = match s.len() {
        6 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            (r, g, b, 255)
        }
        8 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            let a = hex_byte(&s[6..8])?;
            (r, g, b, a)
        }
        _ => {
            return Err(ScenetteError::validation(
                "fill spec must be #RRGGBB or #RRGGBBAA (case-insensitive)",
            ));
        }
    };

    Ok(Rgba8Premul::from_straight_rgba(r, g, b, a))
}
