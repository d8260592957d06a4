//! CLI pgarray
//!
//! Перекодирование массивов между текстовой и бинарной формой и просмотр
//! их структуры.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pgarray::{
    logging::{init_logging, LogFormat, LoggingConfig},
    AclItem, Array, CodecContext, CodecSettings, Date, Dimension, Element, Int4, Macaddr,
    ScalarCodec, StackError, Status, Text,
};
use serde::Serialize;
use pgarray_error::LogLevel;
use tracing::{debug, error, info, trace, warn};

/// Аргументы командной строки.
#[derive(Parser)]
#[command(name = "pgarray")]
#[command(version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT"),
    " ",
    env!("BUILD_DATE"),
    ")"
))]
#[command(about = "Transcode array values between text and binary wire forms", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Файл настроек кодека (toml)
    #[arg(long, global = true, env = "PGARRAY_CONFIG", help = "Файл настроек кодека (toml)")]
    config: Option<PathBuf>,
    /// Уровень логирования
    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Уровень логирования (trace, debug, info, warn, error, off)"
    )]
    log_level: String,
    /// Формат логов
    #[arg(long, global = true, value_enum, default_value = "compact")]
    log_format: LogFormatArg,
    /// Подробный вывод (debug)
    #[arg(short, long, global = true, help = "Включить подробный вывод для отладки")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Формат логов для CLI.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormatArg {
    Compact,
    Pretty,
    Json,
}

/// Поддерживаемые типы элементов.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ElementType {
    Int4,
    Text,
    Aclitem,
    Macaddr,
    Date,
}

#[derive(Subcommand)]
enum Commands {
    /// Текстовая форма -> hex бинарной формы
    ToBinary {
        #[arg(short = 't', long = "type", value_enum)]
        element_type: ElementType,
        /// Массив в текстовой форме, например '{1,2,3}'
        text: String,
    },
    /// Hex бинарной формы -> текстовая форма
    ToText {
        #[arg(short = 't', long = "type", value_enum)]
        element_type: ElementType,
        /// Бинарная форма в hex
        hex: String,
    },
    /// Текстовая форма -> JSON список элементов
    ToJson {
        #[arg(short = 't', long = "type", value_enum)]
        element_type: ElementType,
        /// Массив в текстовой форме
        text: String,
    },
    /// Размерности, флаг NULL и элементы массива
    Inspect {
        #[arg(short = 't', long = "type", value_enum)]
        element_type: ElementType,
        /// Массив в текстовой форме
        text: String,
        /// Вывод в JSON
        #[arg(long)]
        json: bool,
    },
}

/// Результат `inspect`.
#[derive(Debug, Serialize)]
struct Inspection {
    element_type: &'static str,
    status: Status,
    dimensions: Vec<Dimension>,
    contains_null: bool,
    elements: Vec<Option<String>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        cli.log_level.clone()
    };
    let logging = LoggingConfig {
        level,
        format: match cli.log_format {
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        },
        ..Default::default()
    };
    let handle = init_logging(logging)
        .map_err(|e| anyhow::anyhow!("Ошибка инициализации логирования: {e}"))?;

    let settings = CodecSettings::load(cli.config.as_deref()).context("loading codec settings")?;
    debug!(?settings, "codec settings loaded");
    let ctx = CodecContext::default().with_settings(settings);

    match run(&cli.command, &ctx) {
        Ok(out) => {
            println!("{out}");
            handle.shutdown();
            Ok(())
        }
        Err(e) => {
            report_failure(&e);
            eprintln!("Error: {e:#}");
            handle.shutdown();
            std::process::exit(1);
        }
    }
}

fn run(
    command: &Commands,
    ctx: &CodecContext,
) -> Result<String> {
    let element_type = match command {
        Commands::ToBinary { element_type, .. }
        | Commands::ToText { element_type, .. }
        | Commands::ToJson { element_type, .. }
        | Commands::Inspect { element_type, .. } => *element_type,
    };
    match element_type {
        ElementType::Int4 => run_typed::<Int4>(command, ctx),
        ElementType::Text => run_typed::<Text>(command, ctx),
        ElementType::Aclitem => run_typed::<AclItem>(command, ctx),
        ElementType::Macaddr => run_typed::<Macaddr>(command, ctx),
        ElementType::Date => run_typed::<Date>(command, ctx),
    }
}

fn run_typed<S>(
    command: &Commands,
    ctx: &CodecContext,
) -> Result<String>
where
    S: ScalarCodec,
    S::Value: Serialize,
{
    match command {
        Commands::ToBinary { text, .. } => {
            let array = Array::<S>::decode_text(ctx, Some(text.as_bytes()))
                .with_context(|| format!("parsing {}[] text", S::TYPE_NAME))?;
            let mut buf = Vec::new();
            array
                .encode_binary(ctx, &mut buf)
                .with_context(|| format!("encoding {}[] binary", S::TYPE_NAME))?;
            Ok(hex::encode(buf))
        }
        Commands::ToText { hex: input, .. } => {
            let bytes = hex::decode(input.trim()).context("invalid hex input")?;
            let array = Array::<S>::decode_binary(ctx, Some(&bytes))
                .with_context(|| format!("decoding {}[] binary", S::TYPE_NAME))?;
            let mut buf = Vec::new();
            array.encode_text(ctx, &mut buf)?;
            Ok(String::from_utf8(buf)?)
        }
        Commands::ToJson { text, .. } => {
            let array = Array::<S>::decode_text(ctx, Some(text.as_bytes()))
                .with_context(|| format!("parsing {}[] text", S::TYPE_NAME))?;
            Ok(serde_json::to_string(&array)?)
        }
        Commands::Inspect { text, json, .. } => {
            let array = Array::<S>::decode_text(ctx, Some(text.as_bytes()))
                .with_context(|| format!("parsing {}[] text", S::TYPE_NAME))?;
            let inspection = inspect(&array)?;
            if *json {
                Ok(serde_json::to_string_pretty(&inspection)?)
            } else {
                Ok(render(&inspection))
            }
        }
    }
}

/// Пишет ошибку команды в лог с уровнем, который соответствует её коду.
fn report_failure(e: &anyhow::Error) {
    let Some(stack) = e.downcast_ref::<StackError>() else {
        error!(error = %e, "command failed");
        return;
    };
    let status = stack.status_code();
    let defect = stack.is_defect();
    match stack.log_level() {
        LogLevel::Trace => trace!(%status, defect, error = %e, "command failed"),
        LogLevel::Debug => debug!(%status, defect, error = %e, "command failed"),
        LogLevel::Info => info!(%status, defect, error = %e, "command failed"),
        LogLevel::Warn => warn!(%status, defect, error = %e, "command failed"),
        LogLevel::Error => error!(%status, defect, error = %e, "command failed"),
    }
}

fn inspect<S: ScalarCodec>(array: &Array<S>) -> Result<Inspection> {
    let mut elements = Vec::with_capacity(array.elements.len());
    for (i, elem) in array.elements.iter().enumerate() {
        let text = match elem {
            Element::Null => None,
            _ => {
                let mut buf = Vec::new();
                S::encode_text(elem, &mut buf).with_context(|| format!("element {i}"))?;
                Some(String::from_utf8_lossy(&buf).into_owned())
            }
        };
        elements.push(text);
    }
    Ok(Inspection {
        element_type: S::TYPE_NAME,
        status: array.status,
        dimensions: array.dimensions.clone(),
        contains_null: array.contains_null(),
        elements,
    })
}

fn render(inspection: &Inspection) -> String {
    let dims = if inspection.dimensions.is_empty() {
        "none".to_string()
    } else {
        inspection
            .dimensions
            .iter()
            .map(|d| format!("[{}:{}]", d.lower_bound, d.upper_bound()))
            .collect::<Vec<_>>()
            .join("")
    };

    let mut out = format!(
        "type: {}[]\ndimensions: {dims}\ncontains null: {}\nelements: {}",
        inspection.element_type,
        inspection.contains_null,
        inspection.elements.len()
    );
    for (i, e) in inspection.elements.iter().enumerate() {
        out.push_str(&format!("\n  {i}: {}", e.as_deref().unwrap_or("NULL")));
    }
    out
}
