//! 按领域分组的配置结构体
//!
//! 从环境变量加载，统一 fallback 逻辑。

use super::env_keys::{interpreter, observability as obv_keys, roots};
use super::loader::{env_bool, env_optional, env_or, warn_deprecated_env_vars};
use std::path::PathBuf;

/// Standard / Lightweight 策略的默认根目录（相对当前目录）
pub const DEFAULT_SERVICES_ROOT: &str = ".cache/services";

/// Delegated 策略的默认根目录，与 tox 自身的工作区布局一致
pub const DEFAULT_TOX_ROOT: &str = ".tox";

/// 环境根目录与解释器配置
///
/// 在进程启动时计算一次，然后显式传给 `EnvironmentHandle` 构造函数；
/// 测试直接构造该结构体，无需修改进程环境变量。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvsConfig {
    /// Standard / Lightweight 环境的根目录
    pub services_root: PathBuf,
    /// Delegated (tox) 环境的根目录
    pub tox_root: PathBuf,
    /// 运行 virtualenv / venv / tox 的解释器；None 表示在 PATH 中查找
    pub python: Option<PathBuf>,
}

impl Default for EnvsConfig {
    fn default() -> Self {
        Self {
            services_root: PathBuf::from(DEFAULT_SERVICES_ROOT),
            tox_root: PathBuf::from(DEFAULT_TOX_ROOT),
            python: None,
        }
    }
}

impl EnvsConfig {
    /// 从环境变量加载，空值使用默认（会自动加载 .env）
    ///
    /// 废弃变量提示在此发出，调用方应先初始化 tracing。
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        warn_deprecated_env_vars();
        Self {
            services_root: PathBuf::from(env_or(
                roots::VENVKIT_SERVICES_ROOT,
                roots::SERVICES_ROOT_ALIASES,
                || DEFAULT_SERVICES_ROOT.to_string(),
            )),
            tox_root: PathBuf::from(env_or(roots::VENVKIT_TOX_ROOT, &[], || {
                DEFAULT_TOX_ROOT.to_string()
            })),
            python: env_optional(interpreter::VENVKIT_PYTHON, &[]).map(PathBuf::from),
        }
    }

    /// 以 `root` 作为两类根目录，便于测试和一次性环境
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            services_root: root.clone(),
            tox_root: root,
            python: None,
        }
    }
}

/// 可观测性配置：quiet、log_level、log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::VENVKIT_QUIET, &[], false),
                log_level: env_or(obv_keys::VENVKIT_LOG_LEVEL, &[], || {
                    "venvkit=info".to_string()
                }),
                log_json: env_bool(obv_keys::VENVKIT_LOG_JSON, &[], false),
            }
        })
    }
}
