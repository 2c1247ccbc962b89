use thiserror::Error;

/// 分析客户端统一失败面。
/// 所有失败在页面控制层被收敛为一条用户可见的错误信息。
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP 非 2xx 响应，携带状态行文本
    #[error("请求失败: {0}")]
    RequestFailed(String),

    /// 提交或轮询超出时限
    #[error("分析请求超时，请稍后重试")]
    Timeout,

    /// HTTP 层之下的网络/响应解析故障
    #[error("网络请求异常: {0}")]
    Transport(#[source] reqwest::Error),

    /// 任务状态为 failed，后端给出的错误原样透出
    #[error("{0}")]
    BackendFailure(String),

    /// 任务 completed 但 result 缺失（防御性检查）
    #[error("无法获取分析数据")]
    MissingResult,
}

impl ApiError {
    /// reqwest 错误归类：超时独立成类，其余视为传输故障
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err)
        }
    }

    /// 用户可见文案。超时有专属提示，传输/HTTP 故障统一为加载失败；
    /// 后端明确报错时原文透出。
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout => "分析请求超时，请稍后重试".to_string(),
            ApiError::BackendFailure(msg) => msg.clone(),
            ApiError::MissingResult => "无法获取分析数据".to_string(),
            ApiError::RequestFailed(_) | ApiError::Transport(_) => "加载数据失败".to_string(),
        }
    }
}
