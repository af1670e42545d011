use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{self, JwtService};
use crate::bot::SessionStore;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::staff;
use crate::scheduling::SchedulePolicy;
use crate::services::{LogSink, Notifier, NotifySink, WebhookSink};
use shared::models::StaffRole;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | notifier | Notifier | 后台通知队列 |
/// | sessions | Arc<SessionStore> | bot 对话会话 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 后台通知队列
    pub notifier: Notifier,
    /// bot 对话会话存储
    pub sessions: Arc<SessionStore>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 数据库 (迁移自动执行)
    /// 3. JWT / 通知队列 / bot 会话
    /// 4. 管理员账号种子 (仅当不存在管理员时)
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir()?;

        let db = DbService::new(&config.database_path).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let sink: Arc<dyn NotifySink> = match &config.notify_webhook_url {
            Some(url) => {
                tracing::info!(url = %url, "Notifications delivered via webhook");
                Arc::new(WebhookSink::new(url.clone()))
            }
            None => {
                tracing::info!("NOTIFY_WEBHOOK_URL not set, notifications go to the log");
                Arc::new(LogSink)
            }
        };
        let notifier = Notifier::start(sink);

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
            notifier,
            sessions: Arc::new(SessionStore::new()),
        };

        state.ensure_admin().await?;

        Ok(state)
    }

    /// 数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 排班规则
    pub fn policy(&self) -> SchedulePolicy {
        self.config.policy()
    }

    /// 管理员账号种子
    ///
    /// 首次启动时从 ADMIN_CHAT_ID / ADMIN_NAME / ADMIN_PASSWORD
    /// 环境变量创建管理员；已存在管理员时跳过。
    async fn ensure_admin(&self) -> anyhow::Result<()> {
        let mut conn = self.pool().acquire().await?;
        if staff::count_by_role(&mut conn, StaffRole::Admin).await? > 0 {
            return Ok(());
        }

        let (Ok(chat_id), Ok(password)) = (
            std::env::var("ADMIN_CHAT_ID"),
            std::env::var("ADMIN_PASSWORD"),
        ) else {
            tracing::warn!(
                "No admin account exists and ADMIN_CHAT_ID/ADMIN_PASSWORD are not set; \
                 staff management endpoints will be unreachable"
            );
            return Ok(());
        };

        let chat_id: i64 = chat_id
            .parse()
            .map_err(|_| anyhow::anyhow!("ADMIN_CHAT_ID must be an integer"))?;
        let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into());
        let phone = std::env::var("ADMIN_PHONE").unwrap_or_else(|_| "+10000000000".into());
        let hash = auth::hash_password(&password)
            .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?;

        let admin = staff::create(
            &mut conn,
            &name,
            &phone,
            chat_id,
            StaffRole::Admin,
            Some(hash),
            None,
        )
        .await?;
        tracing::info!(staff_id = admin.id, "Seeded initial admin account");
        Ok(())
    }
}
