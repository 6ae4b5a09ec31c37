//! Stay Server - 民宿市集后端
//!
//! # 架构概述
//!
//! - **HTTP API** (`api`): 民宿、附件、预订、餐单、会话等 RESTful 接口
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储，models + repository 分层
//! - **Blob 存储** (`storage`): 图片对象桶
//! - **认证** (`auth`): JWT + Argon2 认证体系
//!
//! # 模块结构
//!
//! ```text
//! stay-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (models + repository)
//! ├── storage/       # 图片 blob 桶
//! └── utils/         # 错误、日志、验证
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use storage::BlobStorage;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_____ ___  __
  \__ \/ __/ __ `/ / / /
 ___/ / /_/ /_/ / /_/ /
/____/\__/\__,_/\__, /
               /____/
    "#
    );
}
