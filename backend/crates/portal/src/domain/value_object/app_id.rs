//! Application Identifiers
//!
//! The ecosystem's applications are compiled in. They are not persisted;
//! the `app_access` table refers to them by their string code.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::environment::Environment;

/// Known application in the ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppId {
    /// This portal. Never shown in the catalog or the admin grid.
    AuthPortal,
    BiblicalMinds,
    EximiaOs,
    PsycheDashboard,
}

/// Static description of one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub id: AppId,
    pub name: &'static str,
    pub description: &'static str,
    production_url: &'static str,
    development_url: &'static str,
}

impl AppDescriptor {
    pub fn base_url(&self, environment: Environment) -> &'static str {
        match environment {
            Environment::Production => self.production_url,
            Environment::Development => self.development_url,
        }
    }
}

const DESCRIPTORS: [AppDescriptor; 4] = [
    AppDescriptor {
        id: AppId::AuthPortal,
        name: "eximIA Auth",
        description: "Central authentication for the eximIA ecosystem",
        production_url: "",
        development_url: "",
    },
    AppDescriptor {
        id: AppId::BiblicalMinds,
        name: "Biblical Minds",
        description: "Conversations with biblical figures grounded in scripture",
        production_url: "https://biblical.eximiaventures.com.br",
        development_url: "http://localhost:3000",
    },
    AppDescriptor {
        id: AppId::EximiaOs,
        name: "eximIA OS",
        description: "Operating system for the eximIA ventures",
        production_url: "https://jarvis.eximiaventures.com.br",
        development_url: "http://localhost:3000",
    },
    AppDescriptor {
        id: AppId::PsycheDashboard,
        name: "Psyche Dashboard",
        description: "Psychometric profiles and behavioural insights",
        production_url: "https://psique.eximiaventures.com.br",
        development_url: "http://localhost:3200",
    },
];

impl AppId {
    pub const ALL: [AppId; 4] = [
        AppId::AuthPortal,
        AppId::BiblicalMinds,
        AppId::EximiaOs,
        AppId::PsycheDashboard,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AppId::AuthPortal => "auth-portal",
            AppId::BiblicalMinds => "biblical-minds",
            AppId::EximiaOs => "eximia-os",
            AppId::PsycheDashboard => "psyche-dashboard",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.code() == code)
    }

    pub fn descriptor(&self) -> &'static AppDescriptor {
        // DESCRIPTORS is declared in the same order as ALL
        &DESCRIPTORS[*self as usize]
    }

    /// Applications shown to users: everything except the portal itself.
    pub fn catalog() -> impl Iterator<Item = AppId> {
        Self::ALL.into_iter().filter(|id| *id != AppId::AuthPortal)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_table_matches_ids() {
        for id in AppId::ALL {
            assert_eq!(id.descriptor().id, id);
        }
    }

    #[test]
    fn test_catalog_excludes_portal() {
        let catalog: Vec<AppId> = AppId::catalog().collect();
        assert_eq!(
            catalog,
            vec![AppId::BiblicalMinds, AppId::EximiaOs, AppId::PsycheDashboard]
        );
    }

    #[test]
    fn test_base_url_depends_on_environment() {
        let psyche = AppId::PsycheDashboard.descriptor();
        assert_eq!(
            psyche.base_url(Environment::Production),
            "https://psique.eximiaventures.com.br"
        );
        assert_eq!(psyche.base_url(Environment::Development), "http://localhost:3200");
    }

    #[test]
    fn test_code_and_serde_agree() {
        for id in AppId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.code()));
            assert_eq!(AppId::from_code(id.code()), Some(id));
        }
        assert_eq!(AppId::from_code("unknown-app"), None);
    }
}
