use crate::domain::model::UserProfile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    #[default]
    Dashboard,
    Portfolio,
    Intelligence,
    Network,
    Analysis,
    Trends,
    Comparison,
    Compliance,
    Education,
    Advisor,
    Notifications,
    Profile,
}

impl Panel {
    pub const ALL: [Panel; 12] = [
        Panel::Dashboard,
        Panel::Portfolio,
        Panel::Intelligence,
        Panel::Network,
        Panel::Analysis,
        Panel::Trends,
        Panel::Comparison,
        Panel::Compliance,
        Panel::Education,
        Panel::Advisor,
        Panel::Notifications,
        Panel::Profile,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Panel::Dashboard => "dashboard",
            Panel::Portfolio => "portfolio",
            Panel::Intelligence => "intelligence",
            Panel::Network => "network",
            Panel::Analysis => "analysis",
            Panel::Trends => "trends",
            Panel::Comparison => "comparison",
            Panel::Compliance => "compliance",
            Panel::Education => "education",
            Panel::Advisor => "advisor",
            Panel::Notifications => "notifications",
            Panel::Profile => "profile",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Panel::ALL
            .into_iter()
            .find(|p| p.id() == s.trim())
            .ok_or_else(|| format!("unknown panel '{}'", s))
    }
}

/// Top-level view state. Each update consumes the session and returns the
/// next one; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    authenticated: bool,
    active_panel: Panel,
    profile: UserProfile,
}

impl Session {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            authenticated: false,
            active_panel: Panel::Dashboard,
            profile,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn active_panel(&self) -> Panel {
        self.active_panel
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn sign_in(self) -> Self {
        tracing::info!("session signed in for {}", self.profile.name);
        Self {
            authenticated: true,
            ..self
        }
    }

    pub fn sign_out(self) -> Self {
        Self {
            authenticated: false,
            active_panel: Panel::Dashboard,
            ..self
        }
    }

    pub fn open(self, panel: Panel) -> Self {
        Self {
            active_panel: panel,
            ..self
        }
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        Self { profile, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;
    use crate::domain::model::RiskTolerance;

    #[test]
    fn test_session_lifecycle() {
        let session = Session::new(fixtures::demo_profile());
        assert!(!session.is_authenticated());

        let session = session.sign_in().open(Panel::Compliance);
        assert!(session.is_authenticated());
        assert_eq!(session.active_panel(), Panel::Compliance);

        let session = session.sign_out();
        assert!(!session.is_authenticated());
        assert_eq!(session.active_panel(), Panel::Dashboard);
    }

    #[test]
    fn test_profile_update_leaves_previous_value_intact() {
        let before = Session::new(fixtures::demo_profile()).sign_in();
        let mut profile = before.profile().clone();
        profile.risk_tolerance = RiskTolerance::Aggressive;

        let after = before.clone().with_profile(profile);

        assert_eq!(before.profile().risk_tolerance, RiskTolerance::Moderate);
        assert_eq!(after.profile().risk_tolerance, RiskTolerance::Aggressive);
        assert!(after.is_authenticated());
    }

    #[test]
    fn test_panel_ids_round_trip() {
        for panel in Panel::ALL {
            assert_eq!(panel.id().parse::<Panel>().unwrap(), panel);
        }
        assert!("settings".parse::<Panel>().is_err());
    }
}
