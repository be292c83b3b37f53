//! CIE L*a*b* color space.

use crate::array::Array;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::object::Object;

/// `[/Lab << /WhitePoint [...] /BlackPoint [...] /Range [...] >>]`.
///
/// Arguments are checked when the color space is built, never at output.
#[derive(Debug, Clone, PartialEq)]
pub struct CieLabColorSpace {
    white_point: [f64; 3],
    black_point: Option<[f64; 3]>,
}

impl CieLabColorSpace {
    /// Create the color space.
    ///
    /// The white point must have three components and a Y component of 1.0.
    /// The optional black point must have three components.
    pub fn new(white_point: &[f64], black_point: Option<&[f64]>) -> Result<Self> {
        let white_point = three_components("white point", white_point)?;
        if white_point[1] != 1.0 {
            return Err(Error::illegal_argument(format!(
                "The white point's Y coordinate must be 1.0, got {}",
                white_point[1]
            )));
        }
        let black_point = black_point
            .map(|bp| three_components("black point", bp))
            .transpose()?;
        Ok(Self {
            white_point,
            black_point,
        })
    }

    /// The D50 white point used by most print workflows.
    pub fn d50() -> Self {
        Self {
            white_point: [0.9642, 1.0, 0.8249],
            black_point: None,
        }
    }

    /// The white point.
    pub fn white_point(&self) -> [f64; 3] {
        self.white_point
    }

    /// The color space array.
    pub fn to_array(&self) -> Array {
        let mut params = Dictionary::new();
        params.put("WhitePoint", to_array(&self.white_point));
        if let Some(black) = &self.black_point {
            params.put("BlackPoint", to_array(black));
        }
        params.put(
            "Range",
            Array::from(vec![
                Object::Integer(-128),
                Object::Integer(128),
                Object::Integer(-128),
                Object::Integer(128),
            ]),
        );
        Array::from(vec![Object::name("Lab"), Object::Dictionary(params)])
    }
}

impl From<CieLabColorSpace> for Object {
    fn from(cs: CieLabColorSpace) -> Self {
        Object::Array(cs.to_array())
    }
}

fn three_components(what: &str, values: &[f64]) -> Result<[f64; 3]> {
    match values {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(Error::illegal_argument(format!(
            "The {} must have exactly 3 components, got {}",
            what,
            values.len()
        ))),
    }
}

fn to_array(values: &[f64; 3]) -> Array {
    values.iter().map(|v| Object::Real(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ObjectSerializer;

    #[test]
    fn test_rejects_bad_white_point() {
        assert!(matches!(
            CieLabColorSpace::new(&[0.9, 1.0], None),
            Err(Error::IllegalArgument(_))
        ));
        assert!(matches!(
            CieLabColorSpace::new(&[0.9, 0.8, 0.8], None),
            Err(Error::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_rejects_bad_black_point() {
        let result = CieLabColorSpace::new(&[0.9642, 1.0, 0.8249], Some(&[0.0, 0.0]));
        assert!(matches!(result, Err(Error::IllegalArgument(_))));
    }

    #[test]
    fn test_serialization() {
        let cs = CieLabColorSpace::new(&[0.5, 1.0, 0.5], Some(&[0.0, 0.0, 0.0])).unwrap();
        let text = ObjectSerializer::with_precision(1)
            .serialize_to_string(&cs.into())
            .unwrap();
        assert_eq!(
            text,
            "[/Lab <<\n  /WhitePoint [0.5 1.0 0.5]\n  /BlackPoint [0.0 0.0 0.0]\n  /Range [-128 128 -128 128]\n>>]"
        );
    }

    #[test]
    fn test_d50() {
        assert_eq!(CieLabColorSpace::d50().white_point()[1], 1.0);
    }
}
