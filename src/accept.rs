//! `Accept-Encoding` parsing and preference ordering.
//!
//! Turns one or more raw header values into a list of
//! [`EncodingPreference`] records sorted by descending quality value. The
//! sort is stable: tokens sharing a weight keep the order in which they
//! appeared across the inputs.
//!
//! The parser is deliberately literal about the header:
//!
//! - tokens split at the **last** `;q=` marker, so an algorithm name that
//!   itself contains the marker is kept intact;
//! - a token whose weight does not parse as a float is dropped, not
//!   defaulted;
//! - weights are passed through unclamped (`gzip;q=2` keeps 2.0);
//! - `*` is an ordinary token — interpreting the wildcard is the caller's
//!   business.
//!
//! # Examples
//!
//! ```
//! use prestatic::AcceptEncoding;
//!
//! let accept = AcceptEncoding::parse("gzip;q=0.8, deflate;q=1.0, br;q=0.5");
//! let order: Vec<&str> = accept
//!     .preferences
//!     .iter()
//!     .map(|p| p.algorithm.as_str())
//!     .collect();
//! assert_eq!(order, ["deflate", "gzip", "br"]);
//! ```

use std::cmp::Ordering;

const QUALITY_MARKER: &str = ";q=";

/// A single client encoding preference.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingPreference {
    /// Algorithm token as sent by the client: `gzip`, `deflate`, `br`,
    /// `identity`, `*`, ...
    pub algorithm: String,
    /// Quality value; 1.0 when the token carries no `;q=` parameter.
    pub weight: f64,
}

/// A parsed `Accept-Encoding` header: preferences in descending weight order.
#[derive(Debug, Clone, Default)]
pub struct AcceptEncoding {
    pub preferences: Vec<EncodingPreference>,
}

impl AcceptEncoding {
    /// Parse a single header value.
    pub fn parse(header: &str) -> Self {
        Self::parse_all([header])
    }

    /// Parse several raw header values (a client may send the header more
    /// than once) into one preference order.
    pub fn parse_all<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut preferences = Vec::new();

        for value in values {
            for token in value.split(',') {
                match token.rfind(QUALITY_MARKER) {
                    // A marker at position 0 leaves no algorithm name; such a
                    // token is treated as markerless.
                    Some(at) if at > 0 => {
                        let Ok(weight) = token[at + QUALITY_MARKER.len()..].trim().parse::<f64>()
                        else {
                            continue;
                        };
                        preferences.push(EncodingPreference {
                            algorithm: token[..at].trim().to_string(),
                            weight,
                        });
                    }
                    _ => preferences.push(EncodingPreference {
                        algorithm: token.trim().to_string(),
                        weight: 1.0,
                    }),
                }
            }
        }

        // Vec::sort_by is stable, so equal weights retain collection order.
        preferences.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));

        Self { preferences }
    }
}
