use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::{sleep, Instant};

use crate::error::ApiError;
use crate::models::company::CompanyInfo;
use crate::models::job::Job;
use crate::utils::http::build_api_client;

/// 生产环境后端地址（部署在 Railway）
pub const PRODUCTION_API_URL: &str = "https://zooming-hope-production-efcc.up.railway.app";
/// 本地开发后端默认地址
pub const DEFAULT_LOCAL_API_URL: &str = "http://localhost:8000";
/// 分析固定使用年报
pub const FILING_TYPE: &str = "10-K";

/// 提交请求硬超时：120 秒
const SUBMIT_TIMEOUT_SECS: u64 = 120;
/// 结果查询单次超时（提交步的加固镜像，避免无限阻塞）
const FETCH_TIMEOUT_SECS: u64 = 30;

/// 轮询策略：指数退避 + 总时限
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// 含首次查询在内的总时限，超出映射为 Timeout
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
            deadline: Duration::from_secs(180),
        }
    }
}

/// 客户端配置。地址在进程启动时解析一次注入，
/// 客户端本身不做任何运行环境探测。
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub submit_timeout: Duration,
    pub fetch_timeout: Duration,
    pub poll: PollPolicy,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            submit_timeout: Duration::from_secs(SUBMIT_TIMEOUT_SECS),
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            poll: PollPolicy::default(),
        }
    }

    pub fn production() -> Self {
        Self::new(PRODUCTION_API_URL)
    }

    /// 本地开发配置：VERITAS_API_URL 优先，缺省回落到本地默认地址
    pub fn from_env() -> Self {
        let base_url = std::env::var("VERITAS_API_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCAL_API_URL.to_string());
        Self::new(base_url)
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    ticker: &'a str,
    filing_type: &'a str,
}

/// 后端访问面。页面控制层只依赖这个 trait，便于用桩后端测试状态机。
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// 创建分析任务
    async fn submit(&self, ticker: &str) -> Result<Job, ApiError>;
    /// 单次查询任务状态（非轮询循环）
    async fn fetch_result(&self, job_id: &str) -> Result<Job, ApiError>;
    /// 查询公司基本信息
    async fn get_company(&self, ticker: &str) -> Result<CompanyInfo, ApiError>;
}

/// 分析后端 HTTP 客户端
pub struct AnalysisClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl AnalysisClient {
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let http = build_api_client()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// 轮询直到任务终结或超出总时限
    pub async fn resolve(&self, job_id: &str) -> Result<Job, ApiError> {
        poll_until_terminal(self, &self.config.poll, job_id).await
    }
}

#[async_trait]
impl AnalysisBackend for AnalysisClient {
    async fn submit(&self, ticker: &str) -> Result<Job, ApiError> {
        let url = self.url("/api/analyze");
        log::info!("提交分析任务: {} ({})", ticker, url);

        let resp = self
            .http
            .post(&url)
            .timeout(self.config.submit_timeout)
            .json(&AnalyzeRequest {
                ticker,
                filing_type: FILING_TYPE,
            })
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::RequestFailed(status.to_string()));
        }

        resp.json::<Job>().await.map_err(ApiError::from_transport)
    }

    async fn fetch_result(&self, job_id: &str) -> Result<Job, ApiError> {
        let url = self.url(&format!("/api/analyze/{}", job_id));

        let resp = self
            .http
            .get(&url)
            .timeout(self.config.fetch_timeout)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::RequestFailed(status.to_string()));
        }

        resp.json::<Job>().await.map_err(ApiError::from_transport)
    }

    async fn get_company(&self, ticker: &str) -> Result<CompanyInfo, ApiError> {
        let url = self.url(&format!("/api/companies/{}", ticker));

        let resp = self
            .http
            .get(&url)
            .timeout(self.config.fetch_timeout)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::RequestFailed(status.to_string()));
        }

        resp.json::<CompanyInfo>()
            .await
            .map_err(ApiError::from_transport)
    }
}

/// 有界轮询：反复查询任务状态，直到终结或总时限耗尽。
/// 退避序列从 initial_delay 起按 2 倍增长，封顶 max_delay。
pub async fn poll_until_terminal(
    backend: &dyn AnalysisBackend,
    policy: &PollPolicy,
    job_id: &str,
) -> Result<Job, ApiError> {
    let deadline = Instant::now() + policy.deadline;
    let mut delay = policy.initial_delay;

    loop {
        let job = backend.fetch_result(job_id).await?;
        if job.status.is_terminal() {
            return Ok(job);
        }

        if Instant::now() + delay > deadline {
            log::warn!("任务 {} 轮询超出总时限，放弃等待", job_id);
            return Err(ApiError::Timeout);
        }

        log::debug!("任务 {} 仍在处理，{}s 后重查", job_id, delay.as_secs());
        sleep(delay).await;
        delay = (delay * 2).min(policy.max_delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_fallback() {
        std::env::remove_var("VERITAS_API_URL");
        let config = ApiConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_LOCAL_API_URL);
        assert_eq!(config.submit_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client =
            AnalysisClient::new(ApiConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(
            client.url("/api/analyze/J1"),
            "http://localhost:8000/api/analyze/J1"
        );
    }

    #[test]
    fn test_production_config() {
        let config = ApiConfig::production();
        assert!(config.base_url.starts_with("https://"));
    }
}
