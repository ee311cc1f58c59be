use serde::{Deserialize, Serialize};

/// The seven self-modification proposal categories. Every proposal is
/// tagged with exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Documentation,
    TestAddition,
    SkillEnhancement,
    ConfigChange,
    NewSkill,
    Infrastructure,
    Security,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Documentation,
        Category::TestAddition,
        Category::SkillEnhancement,
        Category::ConfigChange,
        Category::NewSkill,
        Category::Infrastructure,
        Category::Security,
    ];

    /// Risk tier derived from category. `Infrastructure` and `Security`
    /// touch the agent's own execution environment and never graduate;
    /// `SkillEnhancement`/`ConfigChange`/`NewSkill` sit in between.
    pub fn risk_tier(&self) -> RiskTier {
        match self {
            Category::Documentation | Category::TestAddition => RiskTier::Low,
            Category::SkillEnhancement | Category::ConfigChange | Category::NewSkill => {
                RiskTier::Medium
            }
            Category::Infrastructure | Category::Security => RiskTier::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Documentation => "documentation",
            Category::TestAddition => "test-addition",
            Category::SkillEnhancement => "skill-enhancement",
            Category::ConfigChange => "config-change",
            Category::NewSkill => "new-skill",
            Category::Infrastructure => "infrastructure",
            Category::Security => "security",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn is_high(&self) -> bool {
        matches!(self, RiskTier::High)
    }
}
