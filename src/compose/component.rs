use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::utils::DeployError;

/// The fixed set of deployable compose projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Keycloak + PostgreSQL
    IdentityProvider,
    /// Single Kong instance
    Gateway,
    /// Everything in one compose project
    FullStack,
    /// Several Kong instances side by side
    MultiGateway,
}

impl Component {
    /// Order used when acting on every component at once
    pub const ALL: [Component; 4] = [
        Component::FullStack,
        Component::MultiGateway,
        Component::Gateway,
        Component::IdentityProvider,
    ];

    /// Compose file location relative to the project root
    pub fn compose_path(self) -> &'static str {
        match self {
            Component::IdentityProvider => "infrastructure/keycloak/docker-compose.yml",
            Component::Gateway => "infrastructure/kong/docker-compose.yml",
            Component::FullStack => "compose/docker-compose.full.yml",
            Component::MultiGateway => "compose/docker-compose.multi-kong.yml",
        }
    }

    pub fn compose_file(self, project_root: &Path) -> PathBuf {
        project_root.join(self.compose_path())
    }

    /// Name the operator types on the command line
    pub fn cli_name(self) -> &'static str {
        match self {
            Component::IdentityProvider => "keycloak",
            Component::Gateway => "kong",
            Component::FullStack => "full",
            Component::MultiGateway => "multi-kong",
        }
    }

    /// Name used in progress output
    pub fn display_name(self) -> &'static str {
        match self {
            Component::IdentityProvider => "Keycloak",
            Component::Gateway => "Kong",
            Component::FullStack => "full stack",
            Component::MultiGateway => "multi-Kong",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for Component {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keycloak" | "identity-provider" => Ok(Component::IdentityProvider),
            "kong" | "gateway" => Ok(Component::Gateway),
            "full" | "full-stack" => Ok(Component::FullStack),
            "multi-kong" | "multi-gateway" => Ok(Component::MultiGateway),
            other => Err(DeployError::UnknownComponent(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("keycloak".parse::<Component>().unwrap(), Component::IdentityProvider);
        assert_eq!("identity-provider".parse::<Component>().unwrap(), Component::IdentityProvider);
        assert_eq!("gateway".parse::<Component>().unwrap(), Component::Gateway);
        assert_eq!("full-stack".parse::<Component>().unwrap(), Component::FullStack);
        assert_eq!("multi-kong".parse::<Component>().unwrap(), Component::MultiGateway);
    }

    #[test]
    fn test_unknown_component() {
        let err = "backend".parse::<Component>().unwrap_err();
        assert!(matches!(err, DeployError::UnknownComponent(ref c) if c == "backend"));
        assert_eq!(err.to_string(), "unknown component: backend");
    }

    #[test]
    fn test_compose_file_is_under_root() {
        let file = Component::MultiGateway.compose_file(Path::new("/srv/kc"));
        assert_eq!(file, PathBuf::from("/srv/kc/compose/docker-compose.multi-kong.yml"));
    }

    #[test]
    fn test_cli_name_round_trips() {
        for component in Component::ALL {
            assert_eq!(component.cli_name().parse::<Component>().unwrap(), component);
        }
    }
}
