use chrono::{Datelike, NaiveDate};

use crate::models::job::{AnalysisPayload, Survival};
use crate::models::view::{
    AnalysisView, CompanyHeader, GapBand, Insight, MetricCard, PipelineRow, RunwayRisk,
    StageBadge, Trend,
};

/// 数值缺失时的占位文本
const NA: &str = "N/A";
/// 洞察卡标签截断长度（按字符数）
const LABEL_MAX_CHARS: usize = 30;
/// 风险摘要最多并入的条数
const MAX_SUMMARY_RISKS: usize = 3;

// ============================================================
// 基础派生（与页面展示逐项对齐）
// ============================================================

/// 财报日期 → 季度标签："{年}-Q{ceil(月/3)}"，无日期时为 "最新"。
/// 接受 ISO 日期时间或纯日期，只取前 10 位解析。
pub fn quarter_label(filed_at: Option<&str>) -> String {
    let parsed = filed_at
        .and_then(|s| s.get(..10))
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
    match parsed {
        Some(date) => {
            let quarter = (date.month() + 2) / 3;
            format!("{}-Q{}", date.year(), quarter)
        }
        None => "最新".to_string(),
    }
}

/// 营收趋势：同比变化以 "+" 开头即为上行，否则视为平稳
pub fn revenue_trend(change_yoy: Option<&str>) -> Trend {
    match change_yoy {
        Some(s) if s.starts_with('+') => Trend::Up,
        _ => Trend::Stable,
    }
}

/// 净利润趋势：为正即上行，否则一律"改善中"——
/// 刻意不出现恶化口径，属于需要保留的表述选择。
pub fn net_income_trend(net_income: Option<f64>) -> Trend {
    match net_income {
        Some(v) if v > 0.0 => Trend::Up,
        _ => Trend::Improving,
    }
}

/// 现金跑道风险：有数值且不足 24 个月为中风险，其余（含缺失）为低风险
pub fn runway_risk(runway_months: Option<i64>) -> RunwayRisk {
    match runway_months {
        Some(m) if m < 24 => RunwayRisk::Medium,
        _ => RunwayRisk::Low,
    }
}

/// 现实差距评分三档分级
pub fn gap_band(score: f64) -> GapBand {
    if score >= 7.0 {
        GapBand::NeedsVigilance
    } else if score >= 4.0 {
        GapBand::ModerateAttention
    } else {
        GapBand::BroadlyConsistent
    }
}

/// 百万美元金额格式化："$150.5M"，负值为 "-$89.2M"，缺失为 "N/A"
pub fn fmt_millions(amount: Option<f64>) -> String {
    match amount {
        Some(v) if v < 0.0 => format!("-${:.1}M", v.abs()),
        Some(v) => format!("${:.1}M", v),
        None => NA.to_string(),
    }
}

/// 现金跑道展示值：有月数显示月数，null 表示盈利公司、现金充裕
pub fn runway_value(runway_months: Option<i64>) -> String {
    match runway_months {
        Some(m) => format!("{}个月", m),
        None => "充裕".to_string(),
    }
}

/// 风险摘要：只取前三条，顿号连接，多余条目忽略
pub fn summarize_risks(key_risks: &[String]) -> String {
    key_risks
        .iter()
        .take(MAX_SUMMARY_RISKS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("、")
}

/// 洞察卡标签：截到 30 个字符并补省略号（与原文案一致，短文本也补）
fn truncate_label(text: &str) -> String {
    let truncated: String = text.chars().take(LABEL_MAX_CHARS).collect();
    format!("{}...", truncated)
}

// ============================================================
// 洞察卡派生
// ============================================================

fn reality_insight(payload: &AnalysisPayload) -> Insight {
    let reality = &payload.analysis.reality;
    let content = format!(
        "{} 的叙事身份是“{}”，但经济实质是“{}”。现实差距评分为 {}/10。",
        payload.company_name, reality.narrative_label, reality.economic_label,
        reality.reality_gap_score
    );
    Insight::Reality {
        content,
        score: reality.reality_gap_score,
        label: gap_band(reality.reality_gap_score).label().to_string(),
    }
}

fn survival_insight(survival: &Survival) -> Insight {
    let rd = survival
        .rd_intensity
        .as_deref()
        .map(|v| format!("研发投入强度：{}。", v))
        .unwrap_or_default();
    let tail = format!(
        "{}{}。关键风险包括：{}。",
        rd,
        survival.financial_health,
        summarize_risks(&survival.key_risks)
    );
    let content = match survival.runway_months {
        Some(months) => format!("公司拥有约 {} 个月的现金跑道。{}", months, tail),
        None => tail,
    };
    // 跑道充足(>=18月)记 6 分，紧张记 8 分，盈利公司记 4 分
    let score = match survival.runway_months {
        Some(m) if m >= 18 => 6.0,
        Some(_) => 8.0,
        None => 4.0,
    };
    Insight::Survival {
        content,
        score,
        label: truncate_label(&survival.financial_health),
    }
}

fn competition_insight(payload: &AnalysisPayload) -> Insight {
    let competition = &payload.analysis.competition;
    let advantage = competition
        .competitive_advantage
        .as_deref()
        .map(|v| format!("核心优势：{}。", v))
        .unwrap_or_default();
    let content = format!(
        "直接竞争对手：{}。{}Kill Switch：{}。",
        competition.competitors.join("、"),
        advantage,
        competition.kill_switch
    );
    Insight::Competition {
        content,
        score: 7.0,
        label: truncate_label(&competition.kill_switch),
    }
}

// ============================================================
// 完整展示模型
// ============================================================

/// 从已解析的分析结果派生完整展示模型。纯函数：无 I/O、不修改入参，
/// 任何可选字段缺失都逐字段降级为占位值。
pub fn build_view(payload: &AnalysisPayload) -> AnalysisView {
    let survival = &payload.analysis.survival;
    let gap_score = payload.analysis.reality.reality_gap_score;

    let header = CompanyHeader {
        ticker: payload.ticker.clone(),
        name: payload.company_name.clone(),
        name_cn: payload.company_name_cn.clone().unwrap_or_default(),
        focus: payload.focus.clone().unwrap_or_default(),
        key_products: payload.key_products.clone(),
        therapeutic_areas: payload.therapeutic_areas.clone(),
        narrative_identity: payload.analysis.reality.narrative_label.clone(),
        economic_identity: payload.analysis.reality.economic_label.clone(),
        key_insight: payload
            .analysis
            .reality
            .key_insight
            .clone()
            .unwrap_or_default(),
        last_updated: quarter_label(payload.latest_filing_date()),
    };

    let revenue = MetricCard {
        label: "季度营收",
        value: fmt_millions(survival.quarterly_revenue),
        change: Some(
            survival
                .revenue_change_yoy
                .clone()
                .unwrap_or_else(|| NA.to_string()),
        ),
        trend: Some(revenue_trend(survival.revenue_change_yoy.as_deref())),
        description: None,
        risk: None,
    };

    let net_income = MetricCard {
        label: "净利润",
        value: fmt_millions(survival.net_income),
        change: Some(
            survival
                .net_income_change
                .clone()
                .unwrap_or_else(|| NA.to_string()),
        ),
        trend: Some(net_income_trend(survival.net_income)),
        description: None,
        risk: None,
    };

    let cash_position = MetricCard {
        label: "现金储备",
        value: fmt_millions(survival.cash_position),
        change: Some(
            survival
                .cash_change
                .clone()
                .unwrap_or_else(|| NA.to_string()),
        ),
        trend: Some(Trend::Stable),
        description: None,
        risk: None,
    };

    let runway = MetricCard {
        label: "现金跑道",
        value: runway_value(survival.runway_months),
        change: None,
        trend: None,
        description: Some(survival.financial_health.clone()),
        risk: Some(runway_risk(survival.runway_months)),
    };

    let revenue_history = payload
        .analysis
        .history
        .as_ref()
        .map(|h| h.revenue_history.clone())
        .unwrap_or_default();

    let pipeline = payload
        .analysis
        .pipeline
        .as_ref()
        .map(|p| {
            p.pipeline
                .iter()
                .map(|drug| PipelineRow {
                    name: drug.name.clone(),
                    badge: StageBadge::from_stage(&drug.stage),
                    stage: drug.stage.clone(),
                    indication: drug.indication.clone(),
                    milestone: drug.milestone.clone().unwrap_or_else(|| "-".to_string()),
                    partner: drug.partner.clone().unwrap_or_else(|| "-".to_string()),
                })
                .collect()
        })
        .unwrap_or_default();

    let insights = vec![
        reality_insight(payload),
        survival_insight(survival),
        competition_insight(payload),
    ];

    AnalysisView {
        header,
        gap_score,
        gap_band: gap_band(gap_score),
        revenue,
        net_income,
        cash_position,
        runway,
        revenue_history,
        pipeline,
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{AnalysisSections, Competition, Reality};

    fn sample_payload() -> AnalysisPayload {
        AnalysisPayload {
            company_name: "Legend Biotech Corporation".to_string(),
            ticker: "LEGN".to_string(),
            company_name_cn: Some("传奇生物".to_string()),
            focus: Some("CAR-T细胞疗法".to_string()),
            key_products: vec!["Carvykti".to_string()],
            therapeutic_areas: vec!["多发性骨髓瘤".to_string()],
            sec_data: None,
            analysis: AnalysisSections {
                reality: Reality {
                    narrative_label: "创新型 CAR-T 细胞疗法生物技术公司".to_string(),
                    economic_label: "单一产品商业化阶段的生物制药企业".to_string(),
                    reality_gap_score: 7.0,
                    key_insight: None,
                },
                survival: Survival {
                    quarterly_revenue: Some(150.5),
                    revenue_change_yoy: Some("+156%".to_string()),
                    net_income: Some(-89.2),
                    net_income_change: None,
                    cash_position: Some(520.0),
                    cash_change: Some("-8%".to_string()),
                    runway_months: Some(18),
                    rd_intensity: Some("65%".to_string()),
                    financial_health: "中等风险 - 需密切监控现金流".to_string(),
                    key_risks: vec![
                        "A".to_string(),
                        "B".to_string(),
                        "C".to_string(),
                        "D".to_string(),
                    ],
                },
                competition: Competition {
                    competitors: vec!["BMS (Abecma)".to_string(), "J&J (Tecvayli)".to_string()],
                    kill_switch: "FDA 对二线治疗的批准进度".to_string(),
                    market_dynamics: "竞争加剧".to_string(),
                    competitive_advantage: None,
                },
                history: None,
                pipeline: None,
            },
        }
    }

    #[test]
    fn test_quarter_label_month_boundaries() {
        assert_eq!(quarter_label(Some("2025-01-15T10:00:00-05:00")), "2025-Q1");
        assert_eq!(quarter_label(Some("2025-03-31")), "2025-Q1");
        assert_eq!(quarter_label(Some("2025-04-01")), "2025-Q2");
        assert_eq!(quarter_label(Some("2025-08-20T16:30:00-04:00")), "2025-Q3");
        assert_eq!(quarter_label(Some("2024-12-31")), "2024-Q4");
    }

    #[test]
    fn test_quarter_label_fallback() {
        assert_eq!(quarter_label(None), "最新");
        assert_eq!(quarter_label(Some("")), "最新");
        assert_eq!(quarter_label(Some("not-a-date!!")), "最新");
    }

    #[test]
    fn test_revenue_trend_plus_prefix_only() {
        assert_eq!(revenue_trend(Some("+156%")), Trend::Up);
        assert_eq!(revenue_trend(Some("-12%")), Trend::Stable);
        assert_eq!(revenue_trend(Some("156%")), Trend::Stable);
        assert_eq!(revenue_trend(None), Trend::Stable);
    }

    #[test]
    fn test_net_income_trend_never_down() {
        assert_eq!(net_income_trend(Some(12.3)), Trend::Up);
        assert_eq!(net_income_trend(Some(-89.2)), Trend::Improving);
        assert_eq!(net_income_trend(Some(0.0)), Trend::Improving);
        assert_eq!(net_income_trend(None), Trend::Improving);
    }

    #[test]
    fn test_runway_risk_buckets() {
        assert_eq!(runway_risk(Some(18)), RunwayRisk::Medium);
        assert_eq!(runway_risk(Some(23)), RunwayRisk::Medium);
        assert_eq!(runway_risk(Some(24)), RunwayRisk::Low);
        assert_eq!(runway_risk(Some(36)), RunwayRisk::Low);
        assert_eq!(runway_risk(None), RunwayRisk::Low);
        // 0 也是数字，按不足 24 个月处理
        assert_eq!(runway_risk(Some(0)), RunwayRisk::Medium);
    }

    #[test]
    fn test_gap_band_three_bands() {
        assert_eq!(gap_band(7.0), GapBand::NeedsVigilance);
        assert_eq!(gap_band(9.5), GapBand::NeedsVigilance);
        assert_eq!(gap_band(5.0), GapBand::ModerateAttention);
        assert_eq!(gap_band(4.0), GapBand::ModerateAttention);
        assert_eq!(gap_band(3.9), GapBand::BroadlyConsistent);
        assert_eq!(gap_band(2.0), GapBand::BroadlyConsistent);
    }

    #[test]
    fn test_fmt_millions() {
        assert_eq!(fmt_millions(Some(150.5)), "$150.5M");
        assert_eq!(fmt_millions(Some(-89.2)), "-$89.2M");
        assert_eq!(fmt_millions(Some(0.0)), "$0.0M");
        assert_eq!(fmt_millions(None), "N/A");
    }

    #[test]
    fn test_runway_value() {
        assert_eq!(runway_value(Some(18)), "18个月");
        assert_eq!(runway_value(None), "充裕");
    }

    #[test]
    fn test_summarize_risks_truncates_to_three() {
        let risks: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        assert_eq!(summarize_risks(&risks), "A、B、C");
        assert_eq!(summarize_risks(&risks[..2]), "A、B");
        assert_eq!(summarize_risks(&[]), "");
    }

    #[test]
    fn test_truncate_label_by_chars() {
        let long = "这是一段很长很长的财务健康状况描述文本需要被截断到三十个字符以内才能当作标签展示";
        let label = truncate_label(long);
        assert!(label.ends_with("..."));
        assert_eq!(label.chars().count(), 33);
        // 短文本也补省略号，与原文案保持一致
        assert_eq!(truncate_label("稳健"), "稳健...");
    }

    #[test]
    fn test_build_view_sample() {
        let view = build_view(&sample_payload());
        assert_eq!(view.header.name_cn, "传奇生物");
        assert_eq!(view.header.last_updated, "最新");
        assert_eq!(view.gap_band, GapBand::NeedsVigilance);

        assert_eq!(view.revenue.value, "$150.5M");
        assert_eq!(view.revenue.trend, Some(Trend::Up));

        // 场景：净利润为负且无变化字符串
        assert_eq!(view.net_income.value, "-$89.2M");
        assert_eq!(view.net_income.change.as_deref(), Some("N/A"));
        assert_eq!(view.net_income.trend, Some(Trend::Improving));

        assert_eq!(view.runway.value, "18个月");
        assert_eq!(view.runway.risk, Some(RunwayRisk::Medium));

        assert!(view.revenue_history.is_empty());
        assert!(view.pipeline.is_empty());
        assert_eq!(view.insights.len(), 3);
    }

    #[test]
    fn test_survival_insight_composition() {
        let payload = sample_payload();
        let insight = survival_insight(&payload.analysis.survival);
        let content = insight.content();
        assert!(content.starts_with("公司拥有约 18 个月的现金跑道。"));
        assert!(content.contains("研发投入强度：65%。"));
        assert!(content.contains("关键风险包括：A、B、C。"));
        assert!(!content.contains("D"));
        // 18 个月及以上记 6 分
        assert_eq!(insight.score(), 6.0);
    }

    #[test]
    fn test_survival_insight_without_runway() {
        let mut payload = sample_payload();
        payload.analysis.survival.runway_months = None;
        payload.analysis.survival.rd_intensity = None;
        let insight = survival_insight(&payload.analysis.survival);
        assert!(!insight.content().contains("现金跑道"));
        assert!(!insight.content().contains("研发投入强度"));
        assert_eq!(insight.score(), 4.0);
    }

    #[test]
    fn test_survival_insight_tight_runway_score() {
        let mut payload = sample_payload();
        payload.analysis.survival.runway_months = Some(12);
        assert_eq!(survival_insight(&payload.analysis.survival).score(), 8.0);
    }

    #[test]
    fn test_competition_insight_composition() {
        let mut payload = sample_payload();
        let insight = competition_insight(&payload);
        assert!(insight
            .content()
            .starts_with("直接竞争对手：BMS (Abecma)、J&J (Tecvayli)。"));
        assert!(insight.content().contains("Kill Switch：FDA 对二线治疗的批准进度。"));
        assert!(!insight.content().contains("核心优势"));
        assert_eq!(insight.score(), 7.0);

        payload.analysis.competition.competitive_advantage = Some("疗效数据领先".to_string());
        let insight = competition_insight(&payload);
        assert!(insight.content().contains("核心优势：疗效数据领先。"));
    }

    #[test]
    fn test_reality_insight_composition() {
        let insight = reality_insight(&sample_payload());
        assert_eq!(
            insight.content(),
            "Legend Biotech Corporation 的叙事身份是“创新型 CAR-T 细胞疗法生物技术公司”，\
             但经济实质是“单一产品商业化阶段的生物制药企业”。现实差距评分为 7/10。"
        );
        assert_eq!(insight.label(), "需要警惕");
        assert_eq!(insight.title(), "业务实质还原");
    }

    #[test]
    fn test_build_view_degrades_on_empty_payload() {
        let payload = AnalysisPayload {
            company_name: "Summit Therapeutics Inc.".to_string(),
            ticker: "SMMT".to_string(),
            company_name_cn: None,
            focus: None,
            key_products: vec![],
            therapeutic_areas: vec![],
            sec_data: None,
            analysis: AnalysisSections::default(),
        };
        let view = build_view(&payload);
        assert_eq!(view.revenue.value, "N/A");
        assert_eq!(view.net_income.value, "N/A");
        assert_eq!(view.cash_position.value, "N/A");
        assert_eq!(view.runway.value, "充裕");
        assert_eq!(view.runway.risk, Some(RunwayRisk::Low));
        assert_eq!(view.header.focus, "");
        assert_eq!(view.gap_band, GapBand::BroadlyConsistent);
    }
}
