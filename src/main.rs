// ==========================================
// 工作室空间分配系统 - 命令行主入口
// ==========================================
// 技术栈: Rust + CSV 数据源
// 系统定位: 决策支持系统
// ==========================================
// 用法:
//   studio-space-aps <space_division.csv> <combined_spaces.csv> <request.json>
//       [--out <allocation.csv>] [--seed <n>] [--rotate <n>] [--config <settings.json>]
// ==========================================

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use studio_space_aps::engine::AllocationPayload;
use studio_space_aps::{export, logging, AllocationOrchestrator, AppSettings, SpaceImporter};

struct CliArgs {
    space_csv: PathBuf,
    combined_csv: PathBuf,
    request_json: PathBuf,
    out: Option<PathBuf>,
    seed: Option<u32>,
    rotate: u32,
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 决策支持系统", studio_space_aps::APP_NAME);
    tracing::info!("系统版本: {}", studio_space_aps::VERSION);
    tracing::info!("==================================================");

    let args = parse_args()?;

    // 配置: 显式路径 > 用户配置目录 > 内置缺省
    let config_path = args.config.clone().or_else(default_config_path);
    let settings = AppSettings::load_or_default(config_path.as_deref())
        .context("加载配置失败")?;

    // 导入空间数据
    let importer = SpaceImporter::new(&settings.allocation);
    let dataset = importer
        .load_dataset(&args.space_csv, &args.combined_csv)
        .context("导入空间数据失败")?;
    tracing::info!(
        rooms = dataset.rooms.len(),
        floors = dataset.floors.len(),
        "空间数据就绪"
    );

    // 读取分配请求
    let request_text = std::fs::read_to_string(&args.request_json)
        .with_context(|| format!("读取请求文件失败: {}", args.request_json.display()))?;
    let payload: AllocationPayload =
        serde_json::from_str(&request_text).context("解析分配请求失败")?;

    // 执行分配(可选 --rotate 连续换一换)
    let mut orchestrator = AllocationOrchestrator::new(&settings);
    let mut run = orchestrator.run(&dataset.rooms, &dataset.floors, payload, args.seed);
    for _ in 0..args.rotate {
        match orchestrator.rotate(&dataset.rooms, &dataset.floors) {
            Some(next) => run = next,
            None => break,
        }
    }

    print_run_summary(&run);

    // 可选导出
    if let Some(out) = &args.out {
        let Some(allocation) = &run.allocation else {
            bail!("没有可导出的分配结果(未生成任何工作室)");
        };
        export::write_allocation_csv(allocation, out).context("导出 CSV 失败")?;
        println!("导出完成: {}", out.display());
    }

    Ok(())
}

fn print_run_summary(run: &studio_space_aps::AllocationRun) {
    println!("运行 ID: {}  (seed={})", run.run_id, run.seed);
    println!(
        "学生总数: {}  工作室: {}  剩余未分组: {}",
        run.studio_summary.total_students,
        run.studio_summary.total_studios,
        run.studio_summary.remainder
    );

    match &run.allocation {
        Some(allocation) => {
            println!(
                "已放置: {}  未放置: {}",
                allocation.assigned_count(),
                allocation.unassigned_studios.len()
            );
            for assignment in &allocation.assignments {
                let used: i64 = assignment.studios.iter().map(|s| s.size).sum();
                println!(
                    "  {} [{} {}] {}/{} (+{})",
                    assignment.room_name,
                    assignment.building,
                    assignment.floor,
                    used,
                    assignment.base_capacity,
                    assignment.extra_capacity_used
                );
            }
            for diagnostic in &allocation.diagnostics {
                println!("  ! {}", diagnostic);
            }
        }
        None => println!("未生成任何工作室,跳过放置"),
    }

    println!(
        "经费估算: 年度总成本 {:.2} (建议 TA 人数 {})",
        run.finance.total_annual_cost, run.finance.suggested_ta_count
    );
}

fn parse_args() -> Result<CliArgs> {
    let mut positional: Vec<String> = Vec::new();
    let mut out = None;
    let mut seed = None;
    let mut rotate = 0u32;
    let mut config = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" => out = Some(PathBuf::from(next_value(&mut iter, "--out")?)),
            "--seed" => {
                seed = Some(
                    next_value(&mut iter, "--seed")?
                        .parse()
                        .context("--seed 需要非负整数")?,
                )
            }
            "--rotate" => {
                rotate = next_value(&mut iter, "--rotate")?
                    .parse()
                    .context("--rotate 需要非负整数")?
            }
            "--config" => config = Some(PathBuf::from(next_value(&mut iter, "--config")?)),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            _ => positional.push(arg),
        }
    }

    if positional.len() != 3 {
        print_usage();
        bail!("需要 3 个位置参数,实际 {}", positional.len());
    }

    let mut positional = positional.into_iter();
    Ok(CliArgs {
        space_csv: PathBuf::from(positional.next().unwrap()),
        combined_csv: PathBuf::from(positional.next().unwrap()),
        request_json: PathBuf::from(positional.next().unwrap()),
        out,
        seed,
        rotate,
        config,
    })
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    iter.next()
        .with_context(|| format!("{} 缺少取值", flag))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("studio-space-aps").join("settings.json"))
}

fn print_usage() {
    println!(
        "用法: studio-space-aps <space_division.csv> <combined_spaces.csv> <request.json> \
         [--out <allocation.csv>] [--seed <n>] [--rotate <n>] [--config <settings.json>]"
    );
}
