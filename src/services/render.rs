use std::fmt::Write;

use crate::models::view::{AnalysisView, MetricCard, StageBadge, Trend};

/// 展示模型 → 终端文本报告。纯函数，无 I/O。
pub fn render(view: &AnalysisView) -> String {
    let mut out = String::new();

    render_header(&mut out, view);
    render_metrics(&mut out, view);
    render_revenue_history(&mut out, view);
    render_pipeline(&mut out, view);
    render_insights(&mut out, view);

    out
}

fn render_header(out: &mut String, view: &AnalysisView) {
    let header = &view.header;
    let display_name = if header.name_cn.is_empty() {
        header.name.clone()
    } else {
        header.name_cn.clone()
    };

    let _ = writeln!(out, "════════════════════════════════════════");
    let _ = writeln!(out, "  {} [{}] {}", display_name, header.ticker, header.last_updated);
    if !header.name_cn.is_empty() {
        let _ = writeln!(out, "  {}", header.name);
    }
    if !header.focus.is_empty() {
        let _ = writeln!(out, "  领域: {}", header.focus);
    }
    if !header.therapeutic_areas.is_empty() {
        let _ = writeln!(out, "  适应症: {}", header.therapeutic_areas.join(" / "));
    }
    if !header.key_products.is_empty() {
        let _ = writeln!(out, "  核心产品: {}", header.key_products.join(" / "));
    }
    let _ = writeln!(out, "════════════════════════════════════════");
    let _ = writeln!(out, "  叙事身份: {}", header.narrative_identity);
    let _ = writeln!(out, "  经济身份: {}", header.economic_identity);
    if !header.key_insight.is_empty() {
        let _ = writeln!(out, "  ※ {}", header.key_insight);
    }
    let _ = writeln!(
        out,
        "  现实差距评分: {}/10 （{}）",
        view.gap_score,
        view.gap_band.label()
    );
    let _ = writeln!(out);
}

fn trend_marker(trend: Trend) -> &'static str {
    if trend.is_positive() {
        "↑"
    } else {
        "→"
    }
}

fn render_metric(out: &mut String, card: &MetricCard) {
    let _ = write!(out, "  {:<10} {}", card.label, card.value);
    if let (Some(change), Some(trend)) = (&card.change, card.trend) {
        let _ = write!(out, "  {} {}", trend_marker(trend), change);
    }
    if let Some(risk) = card.risk {
        let _ = write!(out, "  {}", risk.label());
    }
    let _ = writeln!(out);
    if let Some(description) = &card.description {
        if !description.is_empty() {
            let _ = writeln!(out, "             {}", description);
        }
    }
}

fn render_metrics(out: &mut String, view: &AnalysisView) {
    let _ = writeln!(out, "── 财务指标 ──");
    render_metric(out, &view.revenue);
    render_metric(out, &view.net_income);
    render_metric(out, &view.cash_position);
    render_metric(out, &view.runway);
    let _ = writeln!(out);
}

fn render_revenue_history(out: &mut String, view: &AnalysisView) {
    if view.revenue_history.is_empty() {
        return;
    }
    let _ = writeln!(out, "── 营收增长轨迹 ──");
    for point in &view.revenue_history {
        let _ = writeln!(out, "  {}  ${:.1}M", point.quarter, point.revenue);
    }
    let _ = writeln!(out);
}

fn stage_marker(badge: StageBadge) -> &'static str {
    match badge {
        StageBadge::Marketed => "●",
        StageBadge::Phase3 => "◆",
        StageBadge::Phase2 => "◇",
        StageBadge::Other => "·",
    }
}

fn render_pipeline(out: &mut String, view: &AnalysisView) {
    if view.pipeline.is_empty() {
        return;
    }
    let _ = writeln!(out, "── 研发管线 ──");
    for row in &view.pipeline {
        let _ = writeln!(
            out,
            "  {} {} [{}] {} | 里程碑: {} | 伙伴: {}",
            stage_marker(row.badge),
            row.name,
            row.stage,
            row.indication,
            row.milestone,
            row.partner
        );
    }
    let _ = writeln!(out);
}

fn render_insights(out: &mut String, view: &AnalysisView) {
    let _ = writeln!(out, "── AI 深度洞察 ──");
    for insight in &view.insights {
        let _ = writeln!(out, "◈ {} ({}/10)", insight.title(), insight.score());
        let _ = writeln!(out, "  {}", insight.content());
        let _ = writeln!(out, "  > {}", insight.label());
        let _ = writeln!(out);
    }
}
