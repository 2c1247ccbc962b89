pub mod database;

use anyhow::Result;

use crate::models::prefs::UiPreferences;

/// 界面偏好持久化适配层，存储介质可替换（sqlite / 内存桩）
pub trait PrefStore: Send + Sync {
    fn load(&self) -> Result<UiPreferences>;
    fn save(&self, prefs: &UiPreferences) -> Result<()>;
}

pub use database::Database;
