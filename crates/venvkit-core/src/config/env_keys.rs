//! 环境变量 key 常量与别名定义
//!
//! 主变量优先使用 `VENVKIT_*`，兼容历史上的 `SERVICES_ROOT`。

/// 环境根目录
pub mod roots {
    /// Standard / Lightweight 策略的默认根目录
    pub const VENVKIT_SERVICES_ROOT: &str = "VENVKIT_SERVICES_ROOT";
    pub const SERVICES_ROOT_ALIASES: &[&str] = &["SERVICES_ROOT"];

    /// Delegated (tox) 策略的默认根目录
    pub const VENVKIT_TOX_ROOT: &str = "VENVKIT_TOX_ROOT";
}

/// 解释器
pub mod interpreter {
    /// 用于运行 virtualenv / venv / tox 的 Python，未设置时在 PATH 中查找
    pub const VENVKIT_PYTHON: &str = "VENVKIT_PYTHON";
}

/// 可观测性与日志
pub mod observability {
    pub const VENVKIT_QUIET: &str = "VENVKIT_QUIET";
    pub const VENVKIT_LOG_LEVEL: &str = "VENVKIT_LOG_LEVEL";
    pub const VENVKIT_LOG_JSON: &str = "VENVKIT_LOG_JSON";
}
