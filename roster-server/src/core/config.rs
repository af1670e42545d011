use crate::auth::JwtConfig;
use crate::scheduling::SchedulePolicy;

/// 服务器配置 - roster 节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/roster | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | {WORK_DIR}/roster.db | SQLite 数据库路径 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TZ_OFFSET_MINUTES | 0 | 业务时区 (UTC 偏移分钟) |
/// | MIN_GAP_MINUTES | 60 | 两个班次之间的最小休息时间 |
/// | BOOKING_HORIZON_DAYS | 14 | 可预订班次的浏览范围 |
/// | NOTIFY_WEBHOOK_URL | (无) | 通知投递 webhook，未设置时仅写日志 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/roster HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库路径
    pub database_path: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 排班规则配置 ===
    /// 业务时区 (固定 UTC 偏移，分钟)
    pub tz_offset_minutes: i32,
    /// 两个班次之间的最小休息时间 (分钟)
    pub min_gap_minutes: i64,
    /// 可预订班次的浏览范围 (天)
    pub booking_horizon_days: i64,

    /// 通知投递 webhook (未设置时仅写日志)
    pub notify_webhook_url: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/roster".into());
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| format!("{}/roster.db", work_dir));
        Self {
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path,
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            tz_offset_minutes: std::env::var("TZ_OFFSET_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(0),
            min_gap_minutes: std::env::var("MIN_GAP_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            booking_horizon_days: std::env::var("BOOKING_HORIZON_DAYS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(14),
            notify_webhook_url: std::env::var("NOTIFY_WEBHOOK_URL").ok(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = format!("{}/roster.db", config.work_dir);
        config.http_port = http_port;
        config
    }

    /// 排班规则 (传给 scheduling 核心)
    pub fn policy(&self) -> SchedulePolicy {
        SchedulePolicy {
            min_gap_minutes: self.min_gap_minutes,
            horizon_days: self.booking_horizon_days,
            tz_offset_minutes: self.tz_offset_minutes,
        }
    }

    /// 确保工作目录存在
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
