//! 统一环境变量加载逻辑
//!
//! 集中维护 fallback 链，避免在业务代码中重复 `or_else` 调用。

use std::env;
use std::path::Path;

/// 废弃变量 → 推荐变量映射（用于检测并提示迁移）
const DEPRECATED_PAIRS: &[(&str, &str)] = &[("SERVICES_ROOT", "VENVKIT_SERVICES_ROOT")];

/// 检测废弃变量：若使用了废弃变量且未设置推荐变量，打印一次迁移提示
///
/// 需在 tracing subscriber 初始化之后调用，否则提示会丢失。
pub fn warn_deprecated_env_vars() {
    use std::sync::Once;
    static WARNED: Once = Once::new();
    WARNED.call_once(emit_deprecation_hints);
}

fn emit_deprecation_hints() {
    let mut hints = Vec::new();
    for (deprecated, recommended) in DEPRECATED_PAIRS {
        if non_empty_var(deprecated).is_some() && non_empty_var(recommended).is_none() {
            hints.push(format!("{} → {}", deprecated, recommended));
        }
    }
    if !hints.is_empty() {
        tracing::warn!(
            "[DEPRECATED] 以下环境变量已废弃，建议迁移：\n   {}",
            hints.join("\n   ")
        );
    }
}

/// 加载当前目录下的 `.env` 到环境变量（不覆盖已存在的变量），进程内只执行一次
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        load_dotenv_from_dir(&dir);
    });
}

/// 加载指定目录下的 `.env`（不覆盖已存在的变量）
pub fn load_dotenv_from_dir(dir: &Path) {
    let Ok(content) = std::fs::read_to_string(dir.join(".env")) else {
        return;
    };
    for (key, value) in parse_dotenv(&content) {
        if env::var(&key).is_err() {
            #[allow(unsafe_code)]
            unsafe {
                env::set_var(&key, &value);
            }
        }
    }
}

/// 解析 `.env` 内容为 (key, value) 列表
fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let mut value = line[eq_pos + 1..].trim();
            // Strip inline comment (# not inside quotes)
            if let Some(hash_pos) = value.find('#') {
                let before_hash = value[..hash_pos].trim_end();
                if !before_hash.contains('"') && !before_hash.contains('\'') {
                    value = before_hash;
                }
            }
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }
            if !key.is_empty() {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
    }
    pairs
}

/// 读取单个变量，空白值视为未设置
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 从主变量或别名链读取环境变量，失败时使用默认值
///
/// 主变量为空时继续尝试别名，而不是直接落到默认值。
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env_optional(primary, aliases).unwrap_or_else(default)
}

/// 从主变量或别名链读取，返回 Option（空值视为未设置）
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    non_empty_var(primary).or_else(|| aliases.iter().find_map(|a| non_empty_var(a)))
}

/// 解析布尔型环境变量：1/true/yes 为 true，0/false/no/off 为 false
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    let v = env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()));
    match v.as_deref() {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}
