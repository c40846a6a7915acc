use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    DriverError(String),
    SessionError(String),
    DeviceNotFound(String),
    InvalidArgument(String),
    WorkerError(String),
    ConfigError(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CameraError::DriverError(msg) => write!(f, "Driver error: {}", msg),
            CameraError::SessionError(msg) => write!(f, "Session error: {}", msg),
            CameraError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            CameraError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CameraError::WorkerError(msg) => write!(f, "Worker error: {}", msg),
            CameraError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
