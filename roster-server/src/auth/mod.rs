//! 认证模块 - JWT 认证与角色检查
//!
//! - [`jwt`] - JWT 令牌服务
//! - [`middleware`] - Axum 认证/角色中间件
//! - [`password`] - Argon2 密码哈希

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_manager};
pub use password::{hash_password, verify_password};
