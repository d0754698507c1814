//! Configuration for profile evaluation.

/// How a check reacts to a structural error or a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record a reason and keep checking siblings.
    #[default]
    Accumulate,
    /// Record a reason and stop the enclosing check immediately.
    Abort,
}

/// Profile evaluation configuration.
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    /// Stream filters that must not appear on content or XObject streams.
    pub filter_denylist: Vec<String>,

    /// Policy for the independent Level B checks.
    pub failure_policy: FailurePolicy,

    /// Policy for the per-font loop of the Level A Unicode check.
    pub font_failure_policy: FailurePolicy,

    /// Maximum nesting for recursive walks (form fields, outlines,
    /// action chains, form XObject resources).
    pub max_depth: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            filter_denylist: vec!["LZWDecode".to_string()],
            failure_policy: FailurePolicy::Accumulate,
            font_failure_policy: FailurePolicy::Accumulate,
            max_depth: 64,
        }
    }

    /// Replace the filter denylist.
    pub fn with_filter_denylist<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_denylist = filters.into_iter().map(Into::into).collect();
        self
    }

    /// Set the policy for independent checks.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the policy for the Level A font loop.
    pub fn with_font_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.font_failure_policy = policy;
        self
    }

    /// Set the recursion limit.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProfileConfig::default();
        assert_eq!(config.filter_denylist, vec!["LZWDecode"]);
        assert_eq!(config.failure_policy, FailurePolicy::Accumulate);
        assert_eq!(config.font_failure_policy, FailurePolicy::Accumulate);
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn test_builder() {
        let config = ProfileConfig::new()
            .with_filter_denylist(["LZWDecode", "JBIG2Decode"])
            .with_font_failure_policy(FailurePolicy::Abort)
            .with_max_depth(8);
        assert_eq!(config.filter_denylist.len(), 2);
        assert_eq!(config.font_failure_policy, FailurePolicy::Abort);
        assert_eq!(config.max_depth, 8);
    }
}
