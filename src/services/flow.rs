use std::sync::Arc;

use crate::error::ApiError;
use crate::models::job::{Job, JobStatus};
use crate::models::view::AnalysisView;
use crate::services::api_client::{poll_until_terminal, AnalysisBackend, PollPolicy};
use crate::services::presenter::build_view;

/// 页面级分析流程状态机：
/// Idle → Submitting → Polling(job_id) → Resolved | Failed。
/// Failed 不会自动重试，新一轮分析从头开始。
#[derive(Debug)]
pub enum FlowState {
    Idle,
    Submitting,
    Polling { job_id: String },
    Resolved(Box<AnalysisView>),
    Failed { message: String },
}

impl FlowState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, FlowState::Resolved(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FlowState::Failed { .. })
    }
}

/// 一次代码（ticker）分析会话。每次 run 独占自身状态；
/// 并发会话之间不做去重与协调（后完成者覆盖展示属于已知风险）。
pub struct AnalysisSession {
    backend: Arc<dyn AnalysisBackend>,
    poll: PollPolicy,
    session_id: String,
    state: FlowState,
}

impl AnalysisSession {
    pub fn new(backend: Arc<dyn AnalysisBackend>, poll: PollPolicy) -> Self {
        Self {
            backend,
            poll,
            session_id: uuid::Uuid::new_v4().to_string(),
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// 执行完整两步流程：提交任务，然后轮询到终态。
    /// 任何一步失败都整体进入 Failed，不渲染部分结果。
    pub async fn run(&mut self, ticker: &str) -> &FlowState {
        self.state = FlowState::Submitting;
        log::info!("[{}] 提交分析: {}", self.session_id, ticker);

        let backend = self.backend.clone();
        let poll = self.poll.clone();

        let submitted = backend.submit(ticker).await;
        let job = match submitted {
            Ok(job) => job,
            Err(e) => return self.fail(e),
        };

        // 提交返回即进入轮询，即使任务已经终结也照常查询一次
        self.state = FlowState::Polling {
            job_id: job.job_id.clone(),
        };
        log::info!("[{}] 任务已创建: {}", self.session_id, job.job_id);

        let polled = poll_until_terminal(&*backend, &poll, &job.job_id).await;
        let job = match polled {
            Ok(job) => job,
            Err(e) => return self.fail(e),
        };

        self.settle(job)
    }

    fn settle(&mut self, job: Job) -> &FlowState {
        match job.status {
            JobStatus::Failed => {
                let message = job.error.unwrap_or_else(|| "分析失败".to_string());
                self.fail(ApiError::BackendFailure(message))
            }
            JobStatus::Completed => match job.result {
                Some(payload) => {
                    log::info!("[{}] 分析完成: {}", self.session_id, payload.ticker);
                    self.state = FlowState::Resolved(Box::new(build_view(&payload)));
                    &self.state
                }
                // completed 但无结果，按加载失败处理
                None => self.fail(ApiError::MissingResult),
            },
            JobStatus::Processing => self.fail(ApiError::Timeout),
        }
    }

    fn fail(&mut self, err: ApiError) -> &FlowState {
        log::warn!("[{}] 分析失败: {}", self.session_id, err);
        self.state = FlowState::Failed {
            message: err.user_message(),
        };
        &self.state
    }
}
