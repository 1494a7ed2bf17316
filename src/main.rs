use clap::Parser;
use indicatif::ProgressBar;
use tracing::info;
use visitor_report_rust::{cache, cli, config, error, export, logging, normalizer, workbook};

use cache::{HttpFetcher, ImageCache};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use workbook::SheetData;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    let config = Config::load()?;

    match cli.command {
        Commands::Generate {
            input,
            output,
            shape,
            image_dir,
            width_mm,
            title,
        } => {
            println!("📋 visitor-report - 访客登记报表生成\n");

            let image_dir = image_dir.unwrap_or_else(|| config.image_dir.clone());
            let width_mm = width_mm.unwrap_or(config.image_width_mm);

            // 1. 读取登记表并归一化
            println!("[1/3] 读取登记表... (格式: {})", shape);
            let sheet = SheetData::open(&input)?;
            let source = normalizer::source_for(shape);
            let mut records = source.records(&sheet)?;
            info!("从 {} 读取 {} 条记录", input.display(), records.len());
            println!("✔ 读取 {} 条登记记录\n", records.len());

            // 2. 解析证明图片（缓存命中跳过下载）
            println!("[2/3] 获取证明图片... (缓存目录: {})", image_dir.display());
            let fetcher = HttpFetcher::new(config.timeout_seconds)?;
            let mut image_cache = ImageCache::new(&image_dir, fetcher)?;
            let pb = ProgressBar::new(records.len() as u64);
            cache::resolve_records(&mut records, &mut image_cache, width_mm, || pb.inc(1))?;
            pb.finish_and_clear();
            let stats = image_cache.stats();
            println!(
                "✔ 图片处理完成: 命中 {} / 下载 {} / 失败 {} / 跳过 {}\n",
                stats.hits, stats.downloads, stats.failures, stats.skipped
            );

            // 3. 生成报表
            println!("[3/3] 生成报表文档...");
            let output_path = export::report_output_path(&output, &title);
            export::generate_report(&records, &output_path, &title)?;
            info!("报表已保存: {}", output_path.display());
            println!("✔ 输出: {}", output_path.display());

            println!("\n✅ 完成");
            if stats.failures > 0 {
                println!(
                    "⚠ {} 张图片获取失败，详见 {}",
                    stats.failures,
                    logging::LOG_FILE_NAME
                );
            }
        }

        Commands::Cache { clear, info, dir } => {
            let target = dir.unwrap_or_else(|| config.image_dir.clone());

            if info || !clear {
                // 默认或--info: 显示信息
                let (count, bytes) = cache::cache_info(&target)?;
                println!("缓存信息:");
                println!("  目录: {}", target.display());
                println!("  文件数: {}", count);
                println!("  大小: {} bytes", bytes);
            }

            if clear {
                let removed = cache::clear(&target)?;
                println!("✔ 已清空缓存: 删除 {} 个文件", removed);
            }
        }

        Commands::Config {
            show,
            set_image_dir,
            set_timeout,
        } => {
            let mut config = config;

            if let Some(dir) = set_image_dir {
                config.set_image_dir(dir)?;
                println!("✔ 已设置图片缓存目录");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ 已设置下载超时");
            }

            if show {
                println!("配置:");
                println!("  图片缓存目录: {}", config.image_dir.display());
                println!("  下载超时: {}秒", config.timeout_seconds);
                println!("  图片显示宽度: {}毫米", config.image_width_mm);
            }
        }
    }

    Ok(())
}
