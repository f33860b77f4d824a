use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// 管理接口 Bearer Token
    pub api_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// 关掉后只能手动触发开奖
    pub enabled: bool,
    /// 纳入定时开奖的群列表
    #[serde(default)]
    pub chat_ids: Vec<i64>,
    /// 未建立设置行的群的默认开奖时间 "HH:MM"
    pub default_weekly_draw_at: String,
    /// 签到记录保留天数，更早的由清理任务删除
    pub checkin_retention_days: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chat_ids: Vec::new(),
            default_weekly_draw_at: "00:00".to_string(),
            checkin_retention_days: 90,
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件：先解析再用环境变量覆盖
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件：使用环境变量与默认值构建
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("缺少 DATABASE_URL 环境变量，且未找到配置文件 config.toml")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    admin: AdminConfig {
                        api_token: get_env("ADMIN_API_TOKEN")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                    },
                    scheduler: SchedulerConfig {
                        enabled: get_env("SCHEDULER_ENABLED")
                            .map(|v| v.to_lowercase() != "false")
                            .unwrap_or(true),
                        chat_ids: get_env("SCHEDULER_CHAT_IDS")
                            .map(|v| {
                                v.split(',')
                                    .filter_map(|s| s.trim().parse().ok())
                                    .collect()
                            })
                            .unwrap_or_default(),
                        default_weekly_draw_at: get_env("WEEKLY_DRAW_AT")
                            .unwrap_or_else(|| "00:00".to_string()),
                        checkin_retention_days: get_env_parse("CHECKIN_RETENTION_DAYS", 90i64),
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT") {
            if let Ok(p) = v.parse() {
                config.server.port = p;
            }
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS") {
            if let Ok(mc) = v.parse() {
                config.database.max_connections = mc;
            }
        }
        if let Ok(v) = env::var("ADMIN_API_TOKEN") {
            config.admin.api_token = v;
        }
        if let Ok(v) = env::var("SCHEDULER_ENABLED") {
            config.scheduler.enabled = v.to_lowercase() != "false";
        }
        if let Ok(v) = env::var("SCHEDULER_CHAT_IDS") {
            config.scheduler.chat_ids = v
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
        }
        if let Ok(v) = env::var("WEEKLY_DRAW_AT") {
            config.scheduler.default_weekly_draw_at = v;
        }
        if let Ok(v) = env::var("CHECKIN_RETENTION_DAYS") {
            if let Ok(n) = v.parse() {
                config.scheduler.checkin_retention_days = n;
            }
        }

        Ok(config)
    }
}
