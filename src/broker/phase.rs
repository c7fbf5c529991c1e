use std::fmt;

/// Discrete state of a login attempt's challenge flow.
///
/// `NoSession` and `ExistSession` are response-only markers synthesized by the
/// flow orchestrator when no session exists or a fresh start is debounced;
/// they are never stored on a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Init,
    NeedSlideCode,
    NeedSendPhoneCode,
    NeedPhoneCode,
    NeedJumpVerify,
    Success,
    Failure,
    NoSession,
    ExistSession,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::NeedSlideCode => "NEED_SLIDE_CODE",
            Self::NeedSendPhoneCode => "NEED_SEND_PHONE_CODE",
            Self::NeedPhoneCode => "NEED_PHONE_CODE",
            Self::NeedJumpVerify => "NEED_JUMP_VERIFY",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::NoSession => "NO_SESSION",
            Self::ExistSession => "EXIST_SESSION",
        }
    }

    /// Terminal phases end the attempt; the session stays queryable until the
    /// sweeper reclaims it.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }

    /// Marker phases appear only in responses, never on a stored session.
    #[must_use]
    pub const fn is_marker(self) -> bool {
        matches!(self, Self::NoSession | Self::ExistSession)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
