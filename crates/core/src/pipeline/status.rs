use std::fmt;

use crate::classification::domain::attributes::Attributes;

/// What the status line shows. Overwritten on every tick and on stop.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Ready,
    Stopped,
    NoFace,
    /// Attributes of the last face processed in the most recent frame.
    Detected(Attributes),
    OpenFailed(String),
    Faulted(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => write!(f, "Status: Ready"),
            Status::Stopped => write!(f, "Status: Stopped"),
            Status::NoFace => write!(f, "Status: No face detected"),
            Status::Detected(attrs) => write!(f, "Detected: {}, Age: {}", attrs.gender, attrs.age),
            Status::OpenFailed(reason) => write!(f, "Status: {reason}"),
            Status::Faulted(reason) => write!(f, "Status: Error: {reason}"),
        }
    }
}
