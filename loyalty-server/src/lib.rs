//! Loyalty Server - 积分、代金券与联盟佣金后端
//!
//! # 架构概述
//!
//! - **积分账本** (`db/repository`): 积分入账、兑换、调整，全部走事务
//! - **代金券目录** (`api/vouchers`): 目录管理与兑换码核销
//! - **联盟计划** (`api/affiliate`, `api/payouts`): 归因订单、佣金与提现
//! - **领域逻辑** (`loyalty`): 等级解析、积分/佣金算术、折扣、生成码
//!
//! # 模块结构
//!
//! ```text
//! loyalty-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池与仓储层
//! ├── loyalty/       # 纯领域函数
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod loyalty;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv, 工作目录, 日志)
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = std::path::Path::new(&config.work_dir).join("logs");
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.to_str());

    Ok(())
}
