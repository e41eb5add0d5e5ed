//! Parser for the hOCR `title` property micro-grammar.
//!
//! hOCR stores geometry and confidence inside the generic `title`
//! attribute as semicolon-separated clauses, each a key followed by
//! whitespace-separated arguments:
//!
//! ```text
//! bbox 36 92 618 184; x_wconf 95
//! image "/scans/0001.png"; bbox 0 0 2480 3508; ppageno 0
//! ```
//!
//! Splitting into clauses never fails. Typed accessors such as
//! [`Properties::bbox`] and [`Properties::confidence`] validate arity and
//! numeric form when called, so a bad clause only affects the operation
//! that needed it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Clause key holding a bounding box.
pub const BBOX: &str = "bbox";
/// Clause key holding a word confidence percentage.
pub const WORD_CONFIDENCE: &str = "x_wconf";
/// Clause key holding the source image reference of a page.
pub const IMAGE: &str = "image";
/// Clause key holding the physical page number.
pub const PAGE_NUMBER: &str = "ppageno";

/// Errors raised while reading a typed value out of a `title` attribute.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttributeError {
    /// The clause is not present at all.
    #[error("missing '{0}' clause")]
    MissingClause(&'static str),

    /// The clause has the wrong number of arguments.
    #[error("'{key}' expects {expected} argument(s), found {found}")]
    Arity {
        /// Clause key
        key: &'static str,
        /// Expected argument count
        expected: usize,
        /// Actual argument count
        found: usize,
    },

    /// An argument that must be a number is not one.
    #[error("'{key}' argument '{token}' is not a number")]
    NotNumeric {
        /// Clause key
        key: &'static str,
        /// Offending token
        token: String,
    },

    /// A numeric argument lies outside its allowed range.
    #[error("'{key}' value {value} is outside {min}..={max}")]
    OutOfRange {
        /// Clause key
        key: &'static str,
        /// Parsed value
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
}

/// A bounding box in page pixel coordinates.
///
/// `x0`/`y0` is the top-left corner (inclusive) and `x1`/`y1` the
/// bottom-right corner (exclusive). The parser keeps whatever order the
/// document states; cropping rejects degenerate boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: i32,
    /// Top edge
    pub y0: i32,
    /// Right edge
    pub x1: i32,
    /// Bottom edge
    pub y1: i32,
}

impl BBox {
    /// Create a bounding box from its four corner coordinates.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width in pixels, zero for inverted boxes.
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0).max(0) as u32
    }

    /// Height in pixels, zero for inverted boxes.
    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0).max(0) as u32
    }

    /// True when the box encloses no pixels.
    pub fn is_degenerate(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// True when the box lies entirely within a `width` x `height` canvas.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x0 >= 0
            && self.y0 >= 0
            && i64::from(self.x1) <= i64::from(width)
            && i64::from(self.y1) <= i64::from(height)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bbox {} {} {} {}", self.x0, self.y0, self.x1, self.y1)
    }
}

/// One `key args...` clause of a `title` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// First token of the clause
    pub key: String,
    /// Everything after the key, trimmed
    pub args: String,
}

/// The parsed clauses of a `title` attribute, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    clauses: Vec<Clause>,
}

impl Properties {
    /// Split a `title` attribute into clauses. Never fails.
    pub fn parse(title: &str) -> Self {
        let clauses = title
            .split(';')
            .filter_map(|clause| {
                let clause = clause.trim();
                let (key, args) = match clause.find(char::is_whitespace) {
                    Some(pos) => (&clause[..pos], clause[pos..].trim()),
                    None => (clause, ""),
                };
                if key.is_empty() {
                    return None;
                }
                Some(Clause {
                    key: key.to_string(),
                    args: args.to_string(),
                })
            })
            .collect();
        Self { clauses }
    }

    /// Check if no clauses were found.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// All clauses in order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Raw argument string of the first clause with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.clauses
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.args.as_str())
    }

    /// Whitespace-separated arguments of the first clause with `key`.
    pub fn args(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key).map(|args| args.split_whitespace().collect())
    }

    /// The `bbox x0 y0 x1 y1` clause.
    pub fn bbox(&self) -> Result<BBox, AttributeError> {
        let args = self
            .args(BBOX)
            .ok_or(AttributeError::MissingClause(BBOX))?;
        if args.len() != 4 {
            return Err(AttributeError::Arity {
                key: BBOX,
                expected: 4,
                found: args.len(),
            });
        }

        let mut coords = [0i32; 4];
        for (slot, token) in coords.iter_mut().zip(&args) {
            *slot = token.parse().map_err(|_| AttributeError::NotNumeric {
                key: BBOX,
                token: token.to_string(),
            })?;
        }
        Ok(BBox::new(coords[0], coords[1], coords[2], coords[3]))
    }

    /// The `x_wconf` clause as a percentage in `0..=100`.
    pub fn confidence(&self) -> Result<f64, AttributeError> {
        let args = self
            .args(WORD_CONFIDENCE)
            .ok_or(AttributeError::MissingClause(WORD_CONFIDENCE))?;
        let [token] = args.as_slice() else {
            return Err(AttributeError::Arity {
                key: WORD_CONFIDENCE,
                expected: 1,
                found: args.len(),
            });
        };

        let value: f64 = token.parse().map_err(|_| AttributeError::NotNumeric {
            key: WORD_CONFIDENCE,
            token: token.to_string(),
        })?;
        if !(0.0..=100.0).contains(&value) {
            return Err(AttributeError::OutOfRange {
                key: WORD_CONFIDENCE,
                value,
                min: 0.0,
                max: 100.0,
            });
        }
        Ok(value)
    }

    /// The `image` clause, with surrounding double quotes removed.
    ///
    /// Image paths may contain spaces, so the whole argument string is used.
    pub fn image(&self) -> Option<String> {
        let raw = self.get(IMAGE)?;
        let path = raw
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(raw);
        if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        }
    }

    /// The `ppageno` clause, if present and numeric.
    pub fn page_number(&self) -> Option<u32> {
        self.get(PAGE_NUMBER)?.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clauses() {
        let props = Properties::parse("bbox 36 92 618 184; x_wconf 95");
        assert_eq!(props.clauses().len(), 2);
        assert_eq!(props.get("bbox"), Some("36 92 618 184"));
        assert_eq!(props.get("x_wconf"), Some("95"));
        assert_eq!(props.get("baseline"), None);
    }

    #[test]
    fn test_parse_skips_empty_clauses() {
        let props = Properties::parse(" ; bbox 1 2 3 4;;  ");
        assert_eq!(props.clauses().len(), 1);
        assert!(Properties::parse("").is_empty());
    }

    #[test]
    fn test_bbox_preserves_order() {
        let props = Properties::parse("bbox 10 20 30 40");
        assert_eq!(props.bbox().unwrap(), BBox::new(10, 20, 30, 40));

        // Inverted boxes are not rejected here.
        let props = Properties::parse("bbox 20 10 10 20");
        let bbox = props.bbox().unwrap();
        assert_eq!(bbox, BBox::new(20, 10, 10, 20));
        assert!(bbox.is_degenerate());
        assert_eq!(bbox.width(), 0);
    }

    #[test]
    fn test_bbox_errors() {
        assert_eq!(
            Properties::parse("x_wconf 90").bbox(),
            Err(AttributeError::MissingClause(BBOX))
        );
        assert_eq!(
            Properties::parse("bbox 1 2 3").bbox(),
            Err(AttributeError::Arity {
                key: BBOX,
                expected: 4,
                found: 3
            })
        );
        assert!(matches!(
            Properties::parse("bbox 1 2 three 4").bbox(),
            Err(AttributeError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_confidence() {
        let props = Properties::parse("bbox 1 2 3 4; x_wconf 87");
        assert_eq!(props.confidence().unwrap(), 87.0);

        let props = Properties::parse("x_wconf 62.5");
        assert_eq!(props.confidence().unwrap(), 62.5);
    }

    #[test]
    fn test_confidence_errors() {
        assert_eq!(
            Properties::parse("bbox 1 2 3 4").confidence(),
            Err(AttributeError::MissingClause(WORD_CONFIDENCE))
        );
        assert!(matches!(
            Properties::parse("x_wconf").confidence(),
            Err(AttributeError::Arity { found: 0, .. })
        ));
        assert!(matches!(
            Properties::parse("x_wconf 9 1").confidence(),
            Err(AttributeError::Arity { found: 2, .. })
        ));
        assert!(matches!(
            Properties::parse("x_wconf high").confidence(),
            Err(AttributeError::NotNumeric { .. })
        ));
        assert!(matches!(
            Properties::parse("x_wconf 140").confidence(),
            Err(AttributeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_image_clause() {
        let props = Properties::parse("image \"/scans/book 1/0001.png\"; bbox 0 0 10 10");
        assert_eq!(props.image().as_deref(), Some("/scans/book 1/0001.png"));

        let props = Properties::parse("image 0001.png");
        assert_eq!(props.image().as_deref(), Some("0001.png"));

        assert_eq!(Properties::parse("bbox 0 0 1 1").image(), None);
        assert_eq!(Properties::parse("image \"\"").image(), None);
    }

    #[test]
    fn test_page_number() {
        assert_eq!(Properties::parse("ppageno 3").page_number(), Some(3));
        assert_eq!(Properties::parse("ppageno x").page_number(), None);
    }

    #[test]
    fn test_bbox_fits_within() {
        assert!(BBox::new(0, 0, 100, 100).fits_within(100, 100));
        assert!(!BBox::new(0, 0, 101, 100).fits_within(100, 100));
        assert!(!BBox::new(-1, 0, 10, 10).fits_within(100, 100));
    }
}
