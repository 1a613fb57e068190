use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

/// An error raised by the host runtime through its own non-local mechanism.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HostFault {
    message: String,
}

impl HostFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Abandon the current host operation with this fault.
    ///
    /// Unwinds to the nearest [`contain`] without running the panic hook.
    /// Only host implementations call this.
    pub fn raise(self) -> ! {
        resume_unwind(Box::new(self))
    }

    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<HostFault>() {
            Ok(fault) => return *fault,
            Err(payload) => payload,
        };
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "host runtime failed without a message".to_string());
        HostFault { message }
    }
}

/// Run one host interaction, converting an escaping fault into `Err`.
///
/// Wrap each host call individually, at the call site. Native state touched
/// inside `op` must not be relied upon after a fault.
///
/// Containment relies on unwinding: with `panic = "abort"` a host fault ends
/// the process instead.
pub fn contain<T>(op: impl FnOnce() -> T) -> Result<T, HostFault> {
    catch_unwind(AssertUnwindSafe(op)).map_err(HostFault::from_payload)
}
