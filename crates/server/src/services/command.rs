//! Terraform subcommands accepted by the orchestrator.

use std::fmt;

/// The subcommands the orchestrator will run. Anything else is rejected
/// before any side effect occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerraformCommand {
    Init,
    Plan,
    Apply,
    Destroy,
}

impl TerraformCommand {
    /// Parse a request's command string; `None` for unknown commands.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "init" => Some(TerraformCommand::Init),
            "plan" => Some(TerraformCommand::Plan),
            "apply" => Some(TerraformCommand::Apply),
            "destroy" => Some(TerraformCommand::Destroy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TerraformCommand::Init => "init",
            TerraformCommand::Plan => "plan",
            TerraformCommand::Apply => "apply",
            TerraformCommand::Destroy => "destroy",
        }
    }

    /// `init` produces no state file worth persisting.
    pub fn persists_state(&self) -> bool {
        !matches!(self, TerraformCommand::Init)
    }
}

impl fmt::Display for TerraformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(TerraformCommand::parse("init"), Some(TerraformCommand::Init));
        assert_eq!(TerraformCommand::parse("plan"), Some(TerraformCommand::Plan));
        assert_eq!(
            TerraformCommand::parse("apply"),
            Some(TerraformCommand::Apply)
        );
        assert_eq!(
            TerraformCommand::parse("destroy"),
            Some(TerraformCommand::Destroy)
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(TerraformCommand::parse("fmt"), None);
        assert_eq!(TerraformCommand::parse("Apply"), None);
        assert_eq!(TerraformCommand::parse(""), None);
    }

    #[test]
    fn test_state_persistence() {
        assert!(!TerraformCommand::Init.persists_state());
        assert!(TerraformCommand::Plan.persists_state());
        assert!(TerraformCommand::Apply.persists_state());
        assert!(TerraformCommand::Destroy.persists_state());
    }
}
