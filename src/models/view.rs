use serde::{Deserialize, Serialize};

use super::job::QuarterRevenue;

/// 指标卡趋势方向。注意：净利润从不标记为恶化，
/// 只有"上行"和"改善中"两种正向口径（有意的表述选择）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "stable")]
    Stable,
    #[serde(rename = "improving")]
    Improving,
}

impl Trend {
    pub fn is_positive(&self) -> bool {
        matches!(self, Trend::Up | Trend::Improving)
    }
}

/// 现金跑道风险档位。派生逻辑只会产生 Low/Medium，
/// High 仅为展示层保留。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunwayRisk {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
}

impl RunwayRisk {
    pub fn label(&self) -> &'static str {
        match self {
            RunwayRisk::Low => "✓ 低风险",
            RunwayRisk::Medium => "中等风险",
            RunwayRisk::High => "高风险",
        }
    }
}

/// 现实差距评分三档分级，同时用于配色与文字标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapBand {
    /// score >= 7
    NeedsVigilance,
    /// 4 <= score < 7
    ModerateAttention,
    /// score < 4
    BroadlyConsistent,
}

impl GapBand {
    pub fn label(&self) -> &'static str {
        match self {
            GapBand::NeedsVigilance => "需要警惕",
            GapBand::ModerateAttention => "适度关注",
            GapBand::BroadlyConsistent => "基本一致",
        }
    }
}

/// 管线阶段标记（配色档位）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageBadge {
    Marketed,
    Phase3,
    Phase2,
    Other,
}

impl StageBadge {
    pub fn from_stage(stage: &str) -> Self {
        match stage {
            "已上市" => StageBadge::Marketed,
            "III期" => StageBadge::Phase3,
            "II期" => StageBadge::Phase2,
            _ => StageBadge::Other,
        }
    }
}

/// 公司页头展示数据
#[derive(Debug, Clone)]
pub struct CompanyHeader {
    pub ticker: String,
    pub name: String,
    pub name_cn: String,
    pub focus: String,
    pub key_products: Vec<String>,
    pub therapeutic_areas: Vec<String>,
    pub narrative_identity: String,
    pub economic_identity: String,
    pub key_insight: String,
    /// 如 "2025-Q3"，无财报日期时为 "最新"
    pub last_updated: String,
}

/// 财务指标卡
#[derive(Debug, Clone)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub change: Option<String>,
    pub trend: Option<Trend>,
    pub description: Option<String>,
    pub risk: Option<RunwayRisk>,
}

/// 管线表一行
#[derive(Debug, Clone)]
pub struct PipelineRow {
    pub name: String,
    pub stage: String,
    pub badge: StageBadge,
    pub indication: String,
    pub milestone: String,
    pub partner: String,
}

/// AI 深度洞察卡片。三个板块结构各不相同，
/// 用带标签的变体建模，新增板块时由编译器保证穷尽处理。
#[derive(Debug, Clone)]
pub enum Insight {
    Reality { content: String, score: f64, label: String },
    Survival { content: String, score: f64, label: String },
    Competition { content: String, score: f64, label: String },
}

impl Insight {
    pub fn title(&self) -> &'static str {
        match self {
            Insight::Reality { .. } => "业务实质还原",
            Insight::Survival { .. } => "财务生存透视",
            Insight::Competition { .. } => "竞争格局分析",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Insight::Reality { content, .. }
            | Insight::Survival { content, .. }
            | Insight::Competition { content, .. } => content,
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            Insight::Reality { score, .. }
            | Insight::Survival { score, .. }
            | Insight::Competition { score, .. } => *score,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Insight::Reality { label, .. }
            | Insight::Survival { label, .. }
            | Insight::Competition { label, .. } => label,
        }
    }
}

/// 一次分析的完整展示模型，由 Presenter 纯派生，渲染层只读
#[derive(Debug, Clone)]
pub struct AnalysisView {
    pub header: CompanyHeader,
    pub gap_score: f64,
    pub gap_band: GapBand,
    pub revenue: MetricCard,
    pub net_income: MetricCard,
    pub cash_position: MetricCard,
    pub runway: MetricCard,
    pub revenue_history: Vec<QuarterRevenue>,
    pub pipeline: Vec<PipelineRow>,
    pub insights: Vec<Insight>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_badge_mapping() {
        assert_eq!(StageBadge::from_stage("已上市"), StageBadge::Marketed);
        assert_eq!(StageBadge::from_stage("III期"), StageBadge::Phase3);
        assert_eq!(StageBadge::from_stage("II期"), StageBadge::Phase2);
        assert_eq!(StageBadge::from_stage("临床前"), StageBadge::Other);
    }

    #[test]
    fn test_gap_band_labels() {
        assert_eq!(GapBand::NeedsVigilance.label(), "需要警惕");
        assert_eq!(GapBand::ModerateAttention.label(), "适度关注");
        assert_eq!(GapBand::BroadlyConsistent.label(), "基本一致");
    }

    #[test]
    fn test_trend_positive() {
        assert!(Trend::Up.is_positive());
        assert!(Trend::Improving.is_positive());
        assert!(!Trend::Stable.is_positive());
    }
}
