use derive_more::Display;

/// Cellular connection state of a modem, as reported by `modem.generic.state`.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    #[display("failed")]
    Failed,
    #[display("unknown")]
    Unknown,
    #[display("initializing")]
    Initializing,
    #[display("locked")]
    Locked,
    #[display("disabled")]
    Disabled,
    #[display("disabling")]
    Disabling,
    #[display("enabling")]
    Enabling,
    #[display("enabled")]
    Enabled,
    #[display("searching")]
    Searching,
    #[display("registered")]
    Registered,
    #[display("disconnecting")]
    Disconnecting,
    #[display("connecting")]
    Connecting,
    #[display("connected")]
    Connected,
}

impl<T> From<T> for ConnectionState
where
    T: AsRef<str>,
{
    fn from(value: T) -> Self {
        match value.as_ref().trim().to_lowercase().as_str() {
            "failed" => ConnectionState::Failed,
            "initializing" => ConnectionState::Initializing,
            "locked" => ConnectionState::Locked,
            "disabled" => ConnectionState::Disabled,
            "disabling" => ConnectionState::Disabling,
            "enabling" => ConnectionState::Enabling,
            "enabled" => ConnectionState::Enabled,
            "searching" => ConnectionState::Searching,
            "registered" => ConnectionState::Registered,
            "disconnecting" => ConnectionState::Disconnecting,
            "connecting" => ConnectionState::Connecting,
            "connected" => ConnectionState::Connected,
            _ => ConnectionState::Unknown,
        }
    }
}
