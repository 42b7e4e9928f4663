use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Indicates an attempt to access an account id that exceeds the graph size (N).
    NodeIndexOutOfBounds(usize),

    /// A transaction whose sender and receiver are the same account.
    SelfTransaction(usize),

    /// A cycle with fewer than three accounts; carries the offending length.
    CycleTooShort(usize),

    /// A cycle that visits the same account more than once.
    RepeatedNode(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NodeIndexOutOfBounds(n) => write!(f, "Account index {} is out of bounds.", n),

            Error::SelfTransaction(n) => {
                write!(f, "Account {} cannot send a transaction to itself.", n)
            }

            Error::CycleTooShort(len) => write!(
                f,
                "Cycle of length {} is too short; at least 3 accounts are required.",
                len
            ),

            Error::RepeatedNode(n) => write!(f, "Cycle visits account {} more than once.", n),
        }
    }
}

impl std::error::Error for Error {}
