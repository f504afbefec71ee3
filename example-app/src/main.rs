//! # 示例应用程序
//!
//! 演示对象管理器的偏好替换、共享实例与瞬时实例

mod catalog;

use anyhow::Context;
use catalog::{EventCollectionFactory, EventLogger, EventRepository};
use clap::Parser;
use di_abstractions::{Arguments, DiConfiguration, ObjectManager, ObjectManagerExt};
use di_config::ConfigLoader;
use di_impl::ObjectManagerImpl;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "对象管理器示例应用")]
struct Args {
    /// 配置文件路径，不存在时使用默认配置
    #[arg(short, long, default_value = "config/app.toml")]
    config: PathBuf,

    /// 覆盖 EventLogger 的实现
    #[arg(long)]
    logger: Option<String>,

    /// 读取的页号
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("启动对象管理器示例应用");

    let manager = build_manager(&args)?;
    run(&manager, args.page)?;

    let stats = manager.stats();
    println!(
        "统计: 共享构造 {} 次, 共享命中 {} 次, 瞬时构造 {} 次, 命中率 {:.0}%",
        stats.shared_creations,
        stats.shared_hits,
        stats.transient_creations,
        stats.shared_hit_rate() * 100.0
    );
    for entry in manager.shared_instances() {
        println!(
            "  共享实例 {:<24} 创建于 {}{}",
            entry.type_id.as_str(),
            entry.created_at.format("%H:%M:%S%.3f"),
            if entry.self_reference { " (自身)" } else { "" }
        );
    }

    manager.clear_shared_instances();
    info!("应用已退出");
    Ok(())
}

/// 加载配置并构建对象管理器
fn build_manager(args: &Args) -> anyhow::Result<Arc<ObjectManagerImpl>> {
    let mut loader = ConfigLoader::new();
    if args.config.exists() {
        loader = loader.with_file(&args.config);
    } else {
        info!("配置文件 {} 不存在，使用默认配置和环境变量", args.config.display());
    }

    let mut settings = loader
        .load()
        .with_context(|| format!("加载配置失败: {}", args.config.display()))?;
    if settings.di.preferences.is_empty() {
        settings.di = settings.di.preference("EventLogger", "MemoryEventLogger");
    }

    let manager = settings.apply(catalog::register(ObjectManagerImpl::builder())).build();

    if let Some(logger) = &args.logger {
        manager.configure(DiConfiguration::new().preference("EventLogger", logger.as_str()));
    }

    Ok(manager)
}

fn run(manager: &Arc<ObjectManagerImpl>, page: usize) -> anyhow::Result<()> {
    println!(
        "EventLogger 解析为 {}",
        manager.resolve("EventLogger").context("解析 EventLogger 失败")?
    );

    let repository = manager.get_as::<EventRepository>("EventRepository")?;
    let logger = manager.get_service::<dyn EventLogger>("EventLogger")?;
    println!(
        "仓库使用 {}，与 get(EventLogger) {}",
        repository.logger().kind(),
        if Arc::ptr_eq(repository.logger(), &logger) {
            "共享同一实例"
        } else {
            "不是同一实例"
        }
    );

    let again = manager.get_as::<EventRepository>("EventRepository")?;
    println!("两次 get(EventRepository) 共享: {}", Arc::ptr_eq(&repository, &again));

    let factory = manager.get_as::<EventCollectionFactory>("EventCollectionFactory")?;
    let first = factory.create(Arguments::new())?;
    let second = factory.create(Arguments::new().with_literal("page_size", 2))?;
    println!(
        "两次创建事件集合共享: {} (页大小 {} / {})",
        Arc::ptr_eq(&first, &second),
        first.page_size,
        second.page_size
    );

    let collection = repository.page(page)?;
    println!("{}", serde_json::to_string_pretty(&collection)?);

    for line in logger.history() {
        println!("日志: {line}");
    }

    Ok(())
}
