use derive_more::Display;

/// Power state of a modem, as reported by `modem.generic.power-state`.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    #[display("unknown")]
    Unknown,
    #[display("off")]
    Off,
    #[display("low")]
    Low,
    #[display("on")]
    On,
}

impl<T> From<T> for PowerState
where
    T: AsRef<str>,
{
    fn from(value: T) -> Self {
        match value.as_ref().trim().to_lowercase().as_str() {
            "off" => PowerState::Off,
            "low" => PowerState::Low,
            "on" => PowerState::On,
            _ => PowerState::Unknown,
        }
    }
}
