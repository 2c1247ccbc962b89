use serde::{Deserialize, Serialize};

/// 后端公司信息接口返回的记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub ticker: String,
    pub company_name: String,
    #[serde(default)]
    pub cik: String,
    #[serde(default)]
    pub sic: String,
    #[serde(default)]
    pub sector: String,
}

/// 界面层内置的公司名录条目
#[derive(Debug, Clone, Copy)]
pub struct CompanyProfile {
    pub ticker: &'static str,
    pub name_cn: &'static str,
    pub name_en: &'static str,
    pub focus: &'static str,
}

/// 支持的美股生物医药公司（输入校验与选择列表都以此为准）
pub const SUPPORTED_COMPANIES: [CompanyProfile; 8] = [
    CompanyProfile { ticker: "LEGN", name_cn: "传奇生物", name_en: "Legend Biotech", focus: "CAR-T细胞疗法" },
    CompanyProfile { ticker: "SMMT", name_cn: "Summit", name_en: "Summit Therapeutics", focus: "PD-1/VEGF双抗" },
    CompanyProfile { ticker: "LLY", name_cn: "礼来", name_en: "Eli Lilly", focus: "GLP-1/糖尿病" },
    CompanyProfile { ticker: "MRNA", name_cn: "Moderna", name_en: "Moderna", focus: "mRNA技术" },
    CompanyProfile { ticker: "REGN", name_cn: "再生元", name_en: "Regeneron", focus: "单克隆抗体" },
    CompanyProfile { ticker: "VRTX", name_cn: "福泰制药", name_en: "Vertex", focus: "基因疗法" },
    CompanyProfile { ticker: "BMRN", name_cn: "BioMarin", name_en: "BioMarin", focus: "罕见病" },
    CompanyProfile { ticker: "ALNY", name_cn: "Alnylam", name_en: "Alnylam", focus: "RNAi疗法" },
];

/// 按代码查名录（不区分大小写）
pub fn find_company(ticker: &str) -> Option<&'static CompanyProfile> {
    let upper = ticker.to_uppercase();
    SUPPORTED_COMPANIES.iter().find(|c| c.ticker == upper)
}
