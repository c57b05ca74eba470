//! The three "libvar" config knobs the engine consults.

/// Snapshot of the external config-variable store consulted by
/// [`crate::cooldown::CooldownGovernor::event_allowed`].
///
/// Each field mirrors one `LibVarValue` lookup in the source engine; there
/// is no generic key-value lookup because these three variables are the
/// entire surface the core consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatConfig {
    /// `nochat`: nonzero forbids every chat operation.
    pub nochat: bool,
    /// `fastchat`: nonzero disables the per-client 25s interval and
    /// enables queuing load-failure diagnostics onto the console.
    pub fastchat: bool,
    /// `maxclients`: upper bound (exclusive) on client index; `0` means
    /// unbounded. Defaults to `4`, matching the source's default libvar.
    pub maxclients: i32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            nochat: false,
            fastchat: false,
            maxclients: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_source_libvar_defaults() {
        let config = ChatConfig::default();
        assert!(!config.nochat);
        assert!(!config.fastchat);
        assert_eq!(config.maxclients, 4);
    }
}
