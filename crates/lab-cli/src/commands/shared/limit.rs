use lab_config::GeneralConfig;

/// Resolve a listing limit: the command's `--limit`, then the global flag, then
/// `general.default_limit`. A zero limit counts as unset.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, general: &GeneralConfig) -> u32 {
    let set = |limit: Option<u32>| limit.filter(|value| *value > 0);
    set(local).or(set(global)).unwrap_or(general.default_limit)
}

#[cfg(test)]
mod tests {
    use super::effective_limit;
    use lab_config::GeneralConfig;

    fn general(default_limit: u32) -> GeneralConfig {
        GeneralConfig { default_limit }
    }

    #[test]
    fn command_limit_wins_over_global_flag() {
        assert_eq!(effective_limit(Some(5), Some(10), &general(20)), 5);
    }

    #[test]
    fn global_flag_applies_to_every_listing() {
        assert_eq!(effective_limit(None, Some(10), &general(20)), 10);
    }

    #[test]
    fn configured_default_is_the_fallback() {
        assert_eq!(effective_limit(None, None, &general(7)), 7);
    }

    #[test]
    fn zero_is_ignored() {
        assert_eq!(effective_limit(Some(0), Some(3), &general(20)), 3);
        assert_eq!(effective_limit(Some(0), Some(0), &general(20)), 20);
    }
}
