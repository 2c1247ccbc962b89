use serde::{Deserialize, Serialize};

/// 后端分析任务状态（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "failed")]
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// 一次分析请求对应的后端任务。
/// 客户端只读：按 job_id 反复查询直到状态终结，从不修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub status: JobStatus,
    pub ticker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 提交接口附带的提示文本（查询接口不返回）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 分析结果主体。status = completed 时才有意义。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub company_name: String,
    pub ticker: String,
    #[serde(default)]
    pub company_name_cn: Option<String>,
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default)]
    pub key_products: Vec<String>,
    #[serde(default)]
    pub therapeutic_areas: Vec<String>,
    #[serde(default)]
    pub sec_data: Option<SecData>,
    #[serde(default)]
    pub analysis: AnalysisSections,
}

/// 固定的分析板块，各自独立可缺失/不完整
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSections {
    #[serde(default)]
    pub reality: Reality,
    #[serde(default)]
    pub survival: Survival,
    #[serde(default)]
    pub competition: Competition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<RevenueHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<PipelineAnalysis>,
}

/// 业务实质还原：叙事身份 vs 经济身份
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reality {
    #[serde(default)]
    pub narrative_label: String,
    #[serde(default)]
    pub economic_label: String,
    /// 0-10，越高叙事与现实差距越大
    #[serde(default)]
    pub reality_gap_score: f64,
    #[serde(default)]
    pub key_insight: Option<String>,
}

/// 财务生存透视（金额单位：百万美元）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Survival {
    #[serde(default)]
    pub quarterly_revenue: Option<f64>,
    #[serde(default)]
    pub revenue_change_yoy: Option<String>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub net_income_change: Option<String>,
    #[serde(default)]
    pub cash_position: Option<f64>,
    #[serde(default)]
    pub cash_change: Option<String>,
    /// 现金跑道月数，盈利公司为 null
    #[serde(default)]
    pub runway_months: Option<i64>,
    /// 研发投入占营收比例，如 "65%"
    #[serde(default)]
    pub rd_intensity: Option<String>,
    #[serde(default)]
    pub financial_health: String,
    #[serde(default)]
    pub key_risks: Vec<String>,
}

/// 竞争格局分析
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub competitors: Vec<String>,
    #[serde(default)]
    pub kill_switch: String,
    #[serde(default)]
    pub market_dynamics: String,
    #[serde(default)]
    pub competitive_advantage: Option<String>,
}

/// 历史营收序列，按时间升序，直接用于图表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevenueHistory {
    #[serde(default)]
    pub revenue_history: Vec<QuarterRevenue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterRevenue {
    pub quarter: String,
    pub revenue: f64,
}

/// 研发管线
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineAnalysis {
    #[serde(default)]
    pub pipeline: Vec<DrugCandidate>,
    #[serde(default)]
    pub pipeline_strength: Option<String>,
    #[serde(default)]
    pub near_term_catalysts: Vec<String>,
    #[serde(default)]
    pub pipeline_risks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugCandidate {
    pub name: String,
    /// "已上市" / "III期" / "II期" / 其他
    pub stage: String,
    pub indication: String,
    #[serde(default)]
    pub milestone: Option<String>,
    #[serde(default)]
    pub partner: Option<String>,
}

/// SEC 原始数据。本层只读取最新财报日期，其余字段不解析。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecData {
    #[serde(default)]
    pub latest_filing: Option<SecFiling>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecFiling {
    #[serde(default, rename = "formType")]
    pub form_type: Option<String>,
    #[serde(default, rename = "filedAt")]
    pub filed_at: Option<String>,
    #[serde(default, rename = "companyName")]
    pub company_name: Option<String>,
}

impl AnalysisPayload {
    /// 最新财报日期（ISO 字符串），缺失时为 None
    pub fn latest_filing_date(&self) -> Option<&str> {
        self.sec_data
            .as_ref()
            .and_then(|s| s.latest_filing.as_ref())
            .and_then(|f| f.filed_at.as_deref())
    }
}
