use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Political party record / 政党记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    #[serde(alias = "nom")]
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Observation kind: "force" (strength) or "faiblesse" (weakness) / 观察类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Force,
    Faiblesse,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Force => "force",
            Kind::Faiblesse => "faiblesse",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dated strength/weakness attributed to a party / 政党优劣势记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthWeakness {
    pub id: String,
    pub party_id: String,
    #[serde(alias = "type")]
    pub kind: Kind,
    #[serde(alias = "contenu")]
    pub content: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, alias = "auteur")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePartyRequest {
    #[serde(alias = "nom")]
    pub name: String,
    pub description: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePartyRequest {
    #[serde(alias = "nom")]
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

impl UpdatePartyRequest {
    /// Fields set in `other` take precedence / 以 other 中的字段为准
    pub fn merge(self, other: UpdatePartyRequest) -> Self {
        Self {
            name: other.name.or(self.name),
            description: other.description.or(self.description),
            logo_url: other.logo_url.or(self.logo_url),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStrengthWeaknessRequest {
    pub party_id: String,
    #[serde(alias = "type")]
    pub kind: Kind,
    #[serde(alias = "contenu")]
    pub content: String,
    #[serde(alias = "date_")]
    pub date: NaiveDate,
    pub source: Option<String>,
    #[serde(alias = "auteur")]
    pub author: Option<String>,
}

/// Dashboard overview / 仪表盘概览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_parties: usize,
    pub recent_sw: Vec<StrengthWeakness>,
}
