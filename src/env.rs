// Continuous-integration detection

/// Short-form CI indicator set by most CI providers
pub const ENV_CI: &str = "CI";

/// Long-form CI indicator kept for older setups
pub const ENV_CONTINUOUS_INTEGRATION: &str = "CONTINUOUS_INTEGRATION";

/// Snapshot of whether the process runs under a CI system.
///
/// Both variables are checked with the same rule: only the exact value `"true"`
/// marks the environment as CI. Unset, empty, `"false"` and anything else (including
/// `"1"` or `"TRUE"`) do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CiEnvironment {
    detected: bool,
}

impl CiEnvironment {
    /// Detect CI from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Detect CI using a custom variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let detected = [ENV_CI, ENV_CONTINUOUS_INTEGRATION]
            .iter()
            .any(|name| is_truthy(lookup(name).as_deref()));

        Self { detected }
    }

    /// Build a snapshot with a fixed answer
    pub fn detected(detected: bool) -> Self {
        Self { detected }
    }

    pub fn is_ci(&self) -> bool {
        self.detected
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    value == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_no_variables_is_not_ci() {
        let env = CiEnvironment::from_lookup(lookup_from(&[]));
        assert!(!env.is_ci());
    }

    #[test]
    fn test_short_form_true_is_ci() {
        let env = CiEnvironment::from_lookup(lookup_from(&[("CI", "true")]));
        assert!(env.is_ci());
    }

    #[test]
    fn test_long_form_true_is_ci() {
        let env = CiEnvironment::from_lookup(lookup_from(&[("CONTINUOUS_INTEGRATION", "true")]));
        assert!(env.is_ci());
    }

    #[test]
    fn test_non_true_values_are_not_ci() {
        for value in ["", "false", "1", "TRUE", "yes"] {
            let env = CiEnvironment::from_lookup(lookup_from(&[
                ("CI", value),
                ("CONTINUOUS_INTEGRATION", value),
            ]));
            assert!(!env.is_ci(), "value {:?} should not count as CI", value);
        }
    }

    #[test]
    fn test_either_variable_is_enough() {
        let env = CiEnvironment::from_lookup(lookup_from(&[
            ("CI", "false"),
            ("CONTINUOUS_INTEGRATION", "true"),
        ]));
        assert!(env.is_ci());
    }
}
