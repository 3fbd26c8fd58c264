/// Fixed client universe with per-client Minimum Transfer Amounts.
/// MTA is a contractual constant per client. It is never derived from other
/// fields, and the persisted encoding table must cover exactly this set.
pub struct ClientProfile {
    pub name: &'static str,
    pub mta: f64,
}

pub const KNOWN_CLIENTS: &[ClientProfile] = &[
    ClientProfile {
        name: "ClientA",
        mta: 100_000.0,
    },
    ClientProfile {
        name: "ClientB",
        mta: 200_000.0,
    },
    ClientProfile {
        name: "ClientC",
        mta: 150_000.0,
    },
    ClientProfile {
        name: "ClientD",
        mta: 80_000.0,
    },
    ClientProfile {
        name: "ClientE",
        mta: 1_200_000.0,
    },
    ClientProfile {
        name: "ClientF",
        mta: 2_500_000.0,
    },
];

pub fn is_known(client: &str) -> bool {
    KNOWN_CLIENTS.iter().any(|c| c.name == client)
}

pub fn mta_for(client: &str) -> Option<f64> {
    KNOWN_CLIENTS
        .iter()
        .find(|c| c.name == client)
        .map(|c| c.mta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_client_lookup() {
        assert!(is_known("ClientA"));
        assert!(!is_known("ClientZ"));
        assert_eq!(mta_for("ClientE"), Some(1_200_000.0));
        assert_eq!(mta_for("ClientZ"), None);
    }

    #[test]
    fn test_client_names_are_unique() {
        for (i, a) in KNOWN_CLIENTS.iter().enumerate() {
            for b in &KNOWN_CLIENTS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
