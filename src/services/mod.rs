pub mod selector;

pub use selector::BannerSelector;

/// 程序启动时间，健康检查用
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
