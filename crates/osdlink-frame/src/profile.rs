//! Known-good configuration payloads.
//!
//! Payloads are carried verbatim; the field annotations below are for humans
//! and nothing here validates them.

/// A named configuration payload for one device setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Name used on the command line.
    pub name: &'static str,
    /// Short human description.
    pub description: &'static str,
    /// The payload placed between the preamble and the checksum.
    pub payload: &'static str,
}

impl Profile {
    /// Look up a profile by name (case-insensitive).
    pub fn find(name: &str) -> Option<&'static Profile> {
        PROFILES.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Write command for an ArduPilot flight controller at 115200 baud.
///
/// Fields: `p` (write), unknown, baud=115200, input=ArduPlane, battery=FC,
/// display on, video=PAL, x=120, unknown, id=15.
pub const ARDUPILOT_115200: Profile = Profile {
    name: "ardupilot-115200",
    description: "ArduPilot input at 115200 baud, FC battery, PAL, x=120, id 15",
    payload: "p,00,03,03,01,01,00,78,00,0F",
};

/// Every built-in profile.
pub const PROFILES: &[Profile] = &[ARDUPILOT_115200];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(Profile::find("ArduPilot-115200"), Some(&ARDUPILOT_115200));
        assert!(Profile::find("betaflight").is_none());
    }

    #[test]
    fn profile_names_are_unique() {
        for (i, a) in PROFILES.iter().enumerate() {
            for b in &PROFILES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
