//! 认证模块
//!
//! - [`JwtService`] - JWT 令牌的生成和验证
//! - [`CurrentUser`] - 已认证用户，经中间件注入请求扩展
//! - [`require_auth`] - 认证中间件

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;

/// 已认证用户 - 从 JWT Claims 构造，注入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID ("user:xxx")
    pub id: String,
    pub username: String,
    /// 显示名称
    pub name: String,
    /// 角色: user | admin | host
    pub role: String,
    /// 宿主档案 ID ("host:xxx")，仅 host 角色拥有
    pub host_id: Option<String>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn is_host(&self) -> bool {
        self.host_id.is_some()
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            name: claims.name,
            role: claims.role,
            host_id: claims.host,
        }
    }
}
