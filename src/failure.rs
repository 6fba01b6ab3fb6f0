use std::{
    any::Any,
    fmt::{self, Debug, Display},
};

/// Payload of a captured unwinding panic.
///
/// The raw payload is kept as it was raised, so a caught panic can be
/// inspected (`payload`) or raised again (`resume`) without losing anything.
pub struct Panic {
    payload: Box<dyn Any + Send>,
}

impl Panic {
    pub fn new(payload: Box<dyn Any + Send>) -> Self {
        Self { payload }
    }

    /// Returns the panic message when the payload is a `&'static str` or a
    /// `String`, which covers every `panic!` invocation with a format string.
    pub fn message(&self) -> Option<&str> {
        if let Some(message) = self.payload.downcast_ref::<&'static str>() {
            return Some(message);
        }

        self.payload.downcast_ref::<String>().map(String::as_str)
    }

    pub fn payload(&self) -> &(dyn Any + Send) {
        &*self.payload
    }

    pub fn into_payload(self) -> Box<dyn Any + Send> {
        self.payload
    }

    /// Continues unwinding with the original payload.
    pub fn resume(self) -> ! {
        std::panic::resume_unwind(self.payload)
    }
}

impl Debug for Panic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.debug_tuple("Panic").field(&message).finish(),
            None => f.write_str("Panic(<non-string payload>)"),
        }
    }
}

impl Display for Panic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "panicked: {}", message),
            None => f.write_str("panicked with a non-string payload"),
        }
    }
}

/// A failure captured by the try wrapper.
///
/// Either an error value (the rejection reason of a deferred computation, or
/// anything convertible into `anyhow::Error`) or a captured panic.
///
/// Like `anyhow::Error`, `Failure` does not implement `std::error::Error`.
/// Use `into_anyhow` to hand it to anyhow-based code.
pub enum Failure {
    Error(anyhow::Error),
    Panic(Panic),
}

impl Failure {
    /// Creates a failure from a plain message.
    ///
    /// ```rust
    /// let failure = tryf::Failure::msg("dummy");
    /// assert_eq!(failure.to_string(), "dummy");
    /// ```
    pub fn msg<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Failure::Error(anyhow::Error::msg(message))
    }

    pub fn new<E>(error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Failure::Error(error.into())
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Failure::Panic(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Failure::Error(_))
    }

    pub fn as_error(&self) -> Option<&anyhow::Error> {
        match self {
            Failure::Error(error) => Some(error),
            Failure::Panic(_) => None,
        }
    }

    pub fn as_panic(&self) -> Option<&Panic> {
        match self {
            Failure::Error(_) => None,
            Failure::Panic(panic) => Some(panic),
        }
    }

    /// Message of a captured panic, `None` for error failures.
    pub fn panic_message(&self) -> Option<&str> {
        self.as_panic().and_then(Panic::message)
    }

    /// Attempts to downcast the wrapped error to a concrete type.
    /// Captured panics never downcast; inspect `as_panic` instead.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.as_error().and_then(anyhow::Error::downcast_ref::<E>)
    }

    /// Short name of the failure kind, used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::Error(_) => "error",
            Failure::Panic(_) => "panic",
        }
    }

    /// Converts into `anyhow::Error`. A panic payload is not `Sync`, so only
    /// its message survives the conversion.
    pub fn into_anyhow(self) -> anyhow::Error {
        match self {
            Failure::Error(error) => error,
            Failure::Panic(panic) => anyhow::anyhow!("{}", panic),
        }
    }

    /// Raises the failure again: a panic resumes unwinding with its original
    /// payload, an error is raised as a panic carrying the `anyhow::Error`.
    pub fn resume(self) -> ! {
        match self {
            Failure::Error(error) => std::panic::panic_any(error),
            Failure::Panic(panic) => panic.resume(),
        }
    }
}

impl<E> From<E> for Failure
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        Failure::Error(error.into())
    }
}

impl Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Error(error) => f.debug_tuple("Error").field(error).finish(),
            Failure::Panic(panic) => Debug::fmt(panic, f),
        }
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Error(error) => Display::fmt(error, f),
            Failure::Panic(panic) => Display::fmt(panic, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn panic_message_from_str_and_string() {
        let panic = Panic::new(Box::new("static"));
        assert_eq!(panic.message(), Some("static"));
        assert_eq!(panic.to_string(), "panicked: static");

        let panic = Panic::new(Box::new(String::from("owned")));
        assert_eq!(panic.message(), Some("owned"));
    }

    #[test]
    fn panic_with_other_payload_has_no_message() {
        let panic = Panic::new(Box::new(7_u8));

        assert!(panic.message().is_none());
        assert_eq!(panic.payload().downcast_ref::<u8>(), Some(&7));
        assert_eq!(format!("{:?}", panic), "Panic(<non-string payload>)");
    }

    #[test]
    fn error_conversions() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let failure = Failure::from(io);

        assert!(failure.is_error());
        assert_eq!(failure.kind(), "error");
        assert!(failure.downcast_ref::<std::io::Error>().is_some());
        assert_eq!(failure.to_string(), "disk on fire");

        let failure: Failure = anyhow::anyhow!("from anyhow").into();
        assert_eq!(failure.into_anyhow().to_string(), "from anyhow");
    }

    #[test]
    fn alternate_display_shows_context_chain() {
        let error = Err::<(), _>(std::fmt::Error)
            .context("rendering")
            .expect_err("context wraps the error");
        let failure = Failure::new(error);

        assert_eq!(failure.to_string(), "rendering");
        assert_eq!(
            format!("{:#}", failure),
            "rendering: an error occurred when formatting an argument"
        );
    }

    #[test]
    fn panic_failure_into_anyhow_keeps_message() {
        let failure = Failure::Panic(Panic::new(Box::new("boom")));

        assert!(failure.is_panic());
        assert_eq!(failure.panic_message(), Some("boom"));
        assert!(failure.downcast_ref::<String>().is_none());
        assert_eq!(failure.into_anyhow().to_string(), "panicked: boom");
    }
}
