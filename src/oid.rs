//! Object Identifier (OID) type.
//!
//! OIDs are stored inline for the common case (up to 16 arcs) and compare
//! arc-by-arc as unsigned integers, so `.1.3.6.1.2` < `.1.3.6.1.2.1` < `.1.3.6.1.3`.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::{Error, OidErrorKind, Result};

/// Maximum number of arcs accepted when parsing (RFC 2578 limit).
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// `Display` uses the net-snmp style where every sub-identifier carries a
/// leading dot:
///
/// ```rust
/// use snmp_subagent::oid;
///
/// let oid = oid!(1, 3, 6, 1, 4, 1, 50000);
/// assert_eq!(oid.to_string(), ".1.3.6.1.4.1.50000");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an OID from any sequence of arcs.
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse dotted notation, with or without a leading dot.
    ///
    /// ```rust
    /// use snmp_subagent::{Oid, oid};
    ///
    /// assert_eq!(Oid::parse(".1.3.6.1").unwrap(), oid!(1, 3, 6, 1));
    /// assert_eq!(Oid::parse("1.3.6.1").unwrap(), oid!(1, 3, 6, 1));
    /// assert!(Oid::parse("1.3.x").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if body.is_empty() {
            return Err(Error::invalid_oid_with_input(OidErrorKind::Empty, s));
        }

        let mut arcs = SmallVec::new();
        for part in body.split('.') {
            let arc = part
                .parse::<u32>()
                .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))?;
            arcs.push(arc);
        }

        if arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid_with_input(
                OidErrorKind::TooManyArcs {
                    count: arcs.len(),
                    max: MAX_OID_LEN,
                },
                s,
            ));
        }

        Ok(Self { arcs })
    }

    /// The sub-identifiers of this OID.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of sub-identifiers.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Whether the OID has no arcs.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Whether `prefix` is a (non-strict) prefix of this OID.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.arcs.starts_with(&prefix.arcs)
    }

    /// The arcs below `root`, or `None` if `root` is not a prefix.
    ///
    /// ```rust
    /// use snmp_subagent::oid;
    ///
    /// let full = oid!(1, 3, 6, 1, 4, 1, 50000, 1, 0);
    /// let root = oid!(1, 3, 6, 1, 4, 1, 50000);
    /// assert_eq!(full.strip_prefix(&root), Some(&[1, 0][..]));
    /// assert_eq!(root.strip_prefix(&full), None);
    /// ```
    pub fn strip_prefix(&self, root: &Oid) -> Option<&[u32]> {
        self.arcs.strip_prefix(root.arcs.as_slice())
    }

    /// A new OID with `arc` appended, e.g. the `.0` instance of a scalar.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Self { arcs }
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arc in &self.arcs {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::from_slice(&arcs)
    }
}

/// Build an [`Oid`] from literal arcs.
///
/// ```rust
/// use snmp_subagent::oid;
///
/// let temperature = oid!(1, 3, 6, 1, 4, 1, 50000, 1);
/// assert_eq!(temperature.len(), 8);
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::Oid::from_slice(&[$($arc),*])
    };
}
