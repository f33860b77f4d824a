use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use qiandao_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{create_cors, AdminAuthMiddleware},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::time_utils,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 服务间共享同一连接（mock 特性下 DatabaseConnection 不是 Clone）
    let pool = std::sync::Arc::new(pool);

    // 创建服务
    let default_draw_at = time_utils::parse_hhmm(&config.scheduler.default_weekly_draw_at);
    let checkin_service = CheckinService::new(pool.clone());
    let settings_service = SettingsService::new(pool.clone(), default_draw_at);
    let prize_service = PrizeService::new(pool.clone());
    let lottery_service = LotteryService::new(
        pool.clone(),
        checkin_service.clone(),
        settings_service.clone(),
        prize_service.clone(),
    );
    let stats_service = StatsService::new(checkin_service.clone());

    // 启动后台任务（周一开奖 + 签到保留期清理）
    tasks::spawn_all(
        config.scheduler.clone(),
        lottery_service.clone(),
        settings_service.clone(),
        checkin_service.clone(),
    );

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let admin_token = config.admin.api_token.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AdminAuthMiddleware::new(admin_token.clone()))
            .app_data(web::Data::new(checkin_service.clone()))
            .app_data(web::Data::new(settings_service.clone()))
            .app_data(web::Data::new(prize_service.clone()))
            .app_data(web::Data::new(lottery_service.clone()))
            .app_data(web::Data::new(stats_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::checkin_config)
                    .configure(handlers::lottery_config)
                    .configure(handlers::prize_config)
                    .configure(handlers::settings_config)
                    .configure(handlers::stats_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
