//! Endpoint dialect classification.
//!
//! FOLIO has two families of collection endpoints. Most take a single CQL
//! `query` string; the ERM modules take repeated `filters` and a `sort`
//! parameter instead. An input may pin one family or leave both open.

/// Whether a query input can be sent to one dialect's endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compatibility {
    /// Nothing in the input decides it; emit this dialect's parameters
    #[default]
    Unknown,
    /// The input is written for this dialect
    Compatible,
    /// The input is written for the other dialect
    Incompatible,
}

impl Compatibility {
    /// True unless the input has ruled this dialect out.
    pub fn is_possible(self) -> bool {
        self != Compatibility::Incompatible
    }

    pub fn is_affirmed(self) -> bool {
        self == Compatibility::Compatible
    }
}

/// Compatibility of an input with both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dialects {
    pub cql: Compatibility,
    pub erm: Compatibility,
}

impl Dialects {
    pub fn cql_only() -> Self {
        Self {
            cql: Compatibility::Compatible,
            erm: Compatibility::Incompatible,
        }
    }

    pub fn erm_only() -> Self {
        Self {
            cql: Compatibility::Incompatible,
            erm: Compatibility::Compatible,
        }
    }

    /// Neither dialect has been decided.
    pub fn is_unresolved(self) -> bool {
        self.cql == Compatibility::Unknown && self.erm == Compatibility::Unknown
    }
}
