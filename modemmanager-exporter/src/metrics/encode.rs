use crate::modem_manager::{
    Port, PortType, connection_state::ConnectionState, power_state::PowerState,
};

/// A closed set of states that is exported as one sample per member.
pub trait OneHot: Copy + PartialEq + 'static {
    /// Every exported member with its `state` label, in emission order.
    const DOMAIN: &'static [(&'static str, Self)];
}

impl OneHot for PowerState {
    const DOMAIN: &'static [(&'static str, Self)] = &[
        ("unknown", PowerState::Unknown),
        ("off", PowerState::Off),
        ("low", PowerState::Low),
        ("on", PowerState::On),
    ];
}

impl OneHot for ConnectionState {
    // Initializing is transient and intentionally not exported.
    const DOMAIN: &'static [(&'static str, Self)] = &[
        ("failed", ConnectionState::Failed),
        ("unknown", ConnectionState::Unknown),
        ("locked", ConnectionState::Locked),
        ("disabled", ConnectionState::Disabled),
        ("disabling", ConnectionState::Disabling),
        ("enabling", ConnectionState::Enabling),
        ("enabled", ConnectionState::Enabled),
        ("searching", ConnectionState::Searching),
        ("registered", ConnectionState::Registered),
        ("disconnecting", ConnectionState::Disconnecting),
        ("connecting", ConnectionState::Connecting),
        ("connected", ConnectionState::Connected),
    ];
}

/// Emits every member of `S::DOMAIN` for `device_id`, with `1.0` for `active`
/// and `0.0` for the rest. An `active` value outside the domain yields all zeros.
pub fn one_hot<S: OneHot>(device_id: &str, active: S, mut emit: impl FnMut(f64, &[&str])) {
    for (label, state) in S::DOMAIN {
        let value = if *state == active { 1.0 } else { 0.0 };
        emit(value, &[device_id, *label]);
    }
}

/// Emits `1.0` for each network interface port. Other port types (AT, QMI, ...)
/// produce no sample at all.
pub fn network_ports(device_id: &str, ports: &[Port], mut emit: impl FnMut(f64, &[&str])) {
    ports
        .iter()
        .filter(|p| p.kind == PortType::Net)
        .for_each(|p| emit(1.0, &[device_id, p.name.as_str()]));
}

#[cfg(test)]
mod tests {
    use super::{OneHot, network_ports, one_hot};
    use crate::modem_manager::{
        Port, PortType, connection_state::ConnectionState, power_state::PowerState,
    };

    fn collect<S: OneHot>(active: S) -> Vec<(String, f64)> {
        let mut out = vec![];
        one_hot("foo", active, |v, labels| {
            assert_eq!(labels[0], "foo");
            out.push((labels[1].to_string(), v));
        });

        out
    }

    #[test]
    fn every_power_state_is_exported_once() {
        for (label, state) in PowerState::DOMAIN {
            let samples = collect(*state);

            assert_eq!(samples.len(), 4);
            let hot: Vec<_> = samples.iter().filter(|(_, v)| *v == 1.0).collect();
            assert_eq!(hot, vec![&(label.to_string(), 1.0)]);
        }
    }

    #[test]
    fn every_connection_state_is_exported_once() {
        for (label, state) in ConnectionState::DOMAIN {
            let samples = collect(*state);

            assert_eq!(samples.len(), 12);
            assert_eq!(samples.iter().filter(|(_, v)| *v == 0.0).count(), 11);
            assert!(samples.contains(&(label.to_string(), 1.0)));
        }
    }

    #[test]
    fn state_outside_the_domain_is_all_zeros() {
        let samples = collect(ConnectionState::Initializing);

        assert_eq!(samples.len(), 12);
        assert!(samples.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn only_net_ports_are_exported() {
        let port = |name: &str, kind| Port {
            name: name.to_string(),
            kind,
        };
        let ports = [
            port("ttyUSB0", PortType::At),
            port("wwan0", PortType::Net),
            port("cdc-wdm0", PortType::Qmi),
            port("wwan1", PortType::Net),
        ];

        let mut out = vec![];
        network_ports("foo", &ports, |v, labels| {
            out.push((labels.join(","), v));
        });

        assert_eq!(
            out,
            vec![("foo,wwan0".to_string(), 1.0), ("foo,wwan1".to_string(), 1.0)]
        );
    }
}
