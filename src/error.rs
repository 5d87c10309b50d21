use std::fmt;

/// Failures of the interning bridge.
///
/// Every variant except `PrimitiveUnavailable` belongs to the diagnostic echo
/// and is absorbed before delegation. The `String` payload carries the cause
/// reported by the host runtime.
#[derive(Debug)]
pub enum InternErr {
    ClassNotFound(String),
    MethodNotFound(String),
    NullByteArray(String),
    ArrayLength(String),
    PinFailed(String),
    AllocFailed(usize),
    PrimitiveUnavailable(String),
}

impl InternErr {
    pub fn detail(&self) -> String {
        return match self {
            InternErr::ClassNotFound(detail)
            | InternErr::MethodNotFound(detail)
            | InternErr::NullByteArray(detail)
            | InternErr::ArrayLength(detail)
            | InternErr::PinFailed(detail)
            | InternErr::PrimitiveUnavailable(detail) => detail.clone(),
            InternErr::AllocFailed(size) => format!("{} bytes requested", size),
        };
    }
}

impl fmt::Display for InternErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternErr::ClassNotFound(_) => write!(f, "Error: Could not get object class"),
            InternErr::MethodNotFound(_) => write!(f, "Error: Could not find method 'getBytes'"),
            InternErr::NullByteArray(_) => write!(f, "Error: Could not get byte array"),
            InternErr::ArrayLength(_) => write!(f, "Error: Could not get byte array length"),
            InternErr::PinFailed(_) => write!(f, "Error: Could not get byte array elements"),
            InternErr::AllocFailed(_) => write!(f, "Error: Memory allocation failed"),
            InternErr::PrimitiveUnavailable(_) => {
                write!(f, "Error: Could not resolve JVM_InternString")
            }
        }
    }
}

impl std::error::Error for InternErr {}
