//! Runtime configuration for reporting and discovery.

/// How diagnostics for failing points are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticStyle {
    /// One `# ` comment line per message line.
    #[default]
    Comment,
    /// A TAP 14 YAML diagnostics block (`---` ... `...`) indented under the result line.
    Yaml,
}

/// Reporter configuration
#[derive(Debug, Clone, Default)]
pub struct ReporterConfig {
    /// Rendering of failure diagnostics
    pub diagnostics: DiagnosticStyle,
    /// Emit a `# <plan>` comment before each plan's points
    pub plan_comments: bool,
    /// Emit a `# ...` totals comment after the last result line
    pub summary_comment: bool,
}

impl ReporterConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diagnostics style
    pub fn with_diagnostics(mut self, style: DiagnosticStyle) -> Self {
        self.diagnostics = style;
        self
    }

    /// Enable or disable per-plan comments
    pub fn with_plan_comments(mut self, enabled: bool) -> Self {
        self.plan_comments = enabled;
        self
    }

    /// Enable or disable the trailing summary comment
    pub fn with_summary_comment(mut self, enabled: bool) -> Self {
        self.summary_comment = enabled;
        self
    }
}

/// File name prefix a test file must carry to be considered by discovery.
pub const DEFAULT_TEST_PREFIX: &str = "test_";

/// Discovery configuration
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Required file name prefix
    pub prefix: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_TEST_PREFIX.to_string(),
        }
    }
}

impl DiscoveryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the required file name prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reporter_config() {
        let config = ReporterConfig::default();
        assert_eq!(config.diagnostics, DiagnosticStyle::Comment);
        assert!(!config.plan_comments);
        assert!(!config.summary_comment);
    }

    #[test]
    fn test_reporter_config_builder() {
        let config = ReporterConfig::new()
            .with_diagnostics(DiagnosticStyle::Yaml)
            .with_plan_comments(true)
            .with_summary_comment(true);
        assert_eq!(config.diagnostics, DiagnosticStyle::Yaml);
        assert!(config.plan_comments);
        assert!(config.summary_comment);
    }

    #[test]
    fn test_discovery_config_prefix() {
        assert_eq!(DiscoveryConfig::default().prefix, "test_");
        assert_eq!(DiscoveryConfig::new().with_prefix("check_").prefix, "check_");
    }
}
