use anyhow::Result;
use tokio::sync::watch;

use crate::db::PrefStore;
use crate::models::prefs::{Theme, UiPreferences};

/// 进程级主题偏好管理。
/// 生命周期：启动时从存储加载一次；set 是唯一写入口，写穿到存储
/// 并通过 watch 通道广播；其余位置只读。
pub struct ThemeManager {
    store: Box<dyn PrefStore>,
    prefs: UiPreferences,
    tx: watch::Sender<Theme>,
}

impl ThemeManager {
    pub fn load(store: Box<dyn PrefStore>) -> Result<Self> {
        let prefs = store.load()?;
        let (tx, _) = watch::channel(prefs.theme);
        Ok(Self { store, prefs, tx })
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    /// 变更通知订阅（渲染层据此切换配色）
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.tx.subscribe()
    }

    pub fn set(&mut self, theme: Theme) -> Result<()> {
        if self.prefs.theme == theme {
            return Ok(());
        }
        self.prefs.theme = theme;
        self.store.save(&self.prefs)?;
        let _ = self.tx.send(theme);
        log::info!("主题已切换为 {}", theme.as_str());
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<Theme> {
        let next = self.prefs.theme.toggled();
        self.set(next)?;
        Ok(next)
    }
}
