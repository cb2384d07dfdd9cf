use std::error::Error;
use std::fmt;
use std::io;

/// Errors surfaced by the simulation core.
#[derive(Debug)]
pub enum SimError {
    /// Growing the node arena or the particle buffers failed.
    Allocation {
        /// Number of elements that could not be reserved.
        requested: usize,
    },
    /// Opening angle must be finite and non-negative.
    InvalidTheta(f64),
    /// Time step must be finite.
    InvalidTimeStep(f64),
    /// Writing a tree dump failed.
    Io(io::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::Allocation { requested } => {
                write!(f, "Allocation failed while reserving {} elements", requested)
            }
            SimError::InvalidTheta(theta) => write!(f, "Invalid opening angle: {}", theta),
            SimError::InvalidTimeStep(dt) => write!(f, "Invalid time step: {}", dt),
            SimError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SimError {
    fn from(e: io::Error) -> Self {
        SimError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::SimError;
    use std::error::Error;

    #[test]
    fn display_messages() {
        assert_eq!(
            SimError::Allocation { requested: 12 }.to_string(),
            "Allocation failed while reserving 12 elements"
        );
        assert_eq!(SimError::InvalidTheta(-1.0).to_string(), "Invalid opening angle: -1");
        assert_eq!(SimError::InvalidTimeStep(f64::INFINITY).to_string(), "Invalid time step: inf");
    }

    #[test]
    fn io_source_is_kept() {
        let err: SimError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("disk full"));
        assert!(SimError::InvalidTheta(0.0).source().is_none());
    }
}
