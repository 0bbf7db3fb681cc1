// SPDX-License-Identifier: MPL-2.0
use chrono::Local;
use pico_args::Arguments;
use pocket_suite::animation::{AnimationController, AnimationRenderer, RepeatCount};
use pocket_suite::app::{AppContext, Flags};
use pocket_suite::converter::LengthUnit;
use pocket_suite::gallery::{self, GalleryList, ImageDetails, ImageItem, ListingState};
use pocket_suite::notice::Notice;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
pocket_suite

USAGE:
  pocket_suite [OPTIONS] <COMMAND> [ARGS]

OPTIONS:
  --lang <LOCALE>        Interface language (en-US, fr)
  --data-dir <DIR>       Directory for application state
  --config-dir <DIR>     Directory for settings.toml
  --log-level <FILTER>   Log filter, overrides RUST_LOG
  -h, --help             Print this help

COMMANDS:
  convert <VALUE> [--from <UNIT>] [--to <UNIT>]
  theme [show | set <on|off>]
  folder [show | set <DIR>]
  gallery
  detail <FILE>
  capture <FILE>
  delete <FILE>
  animate <play | pause | repeat [COUNT]>
";

fn main() -> ExitCode {
    let mut args = Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }

    let (flags, log_level) = match parse_flags(&mut args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };
    init_tracing(log_level.as_deref());

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: cannot start async runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut ctx = AppContext::new(flags);
    let outcome = runtime.block_on(run(&mut ctx, args, runtime.handle().clone()));

    for text in ctx.take_notice_texts() {
        eprintln!("{text}");
    }

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            ExitCode::from(2)
        }
    }
}

fn parse_flags(args: &mut Arguments) -> Result<(Flags, Option<String>), pico_args::Error> {
    let flags = Flags {
        lang: args.opt_value_from_str("--lang")?,
        data_dir: args.opt_value_from_str("--data-dir")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
    };
    let log_level = args.opt_value_from_str("--log-level")?;
    Ok((flags, log_level))
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command; `Ok(false)` means it failed and a notice says why.
async fn run(ctx: &mut AppContext, mut args: Arguments, runtime: Handle) -> Result<bool, pico_args::Error> {
    let command = args.subcommand()?;
    let succeeded = match command.as_deref() {
        Some("convert") => {
            let (default_from, default_to) = ctx.config.default_units();
            let from: Option<LengthUnit> = args.opt_value_from_str("--from")?;
            let to: Option<LengthUnit> = args.opt_value_from_str("--to")?;
            let value: String = args.opt_free_from_str()?.unwrap_or_default();
            match ctx.convert(&value, from.unwrap_or(default_from), to.unwrap_or(default_to)) {
                Some(conversion) => {
                    println!("{conversion}");
                    true
                }
                None => false,
            }
        }
        Some("theme") => theme_command(ctx, &mut args)?,
        Some("folder") => folder_command(ctx, &mut args)?,
        Some("gallery") => {
            println!("{}", ctx.location_label());
            show_gallery(ctx, runtime).await
        }
        Some("detail") => {
            let file: PathBuf = args.free_from_str()?;
            show_detail(ctx, &file)
        }
        Some("capture") => {
            let file: PathBuf = args.free_from_str()?;
            capture(ctx, &file)
        }
        Some("delete") => {
            let file: PathBuf = args.free_from_str()?;
            let outcome = ctx.delete_image(&file);
            if outcome.requires_refresh() {
                refresh_after_delete(ctx, runtime).await;
            }
            matches!(outcome, gallery::DeleteOutcome::Deleted)
        }
        Some("animate") => animate_command(ctx, &mut args)?,
        Some(other) => {
            return Err(pico_args::Error::ArgumentParsingFailed {
                cause: format!("unknown command '{other}'"),
            })
        }
        None => {
            print!("{HELP}");
            true
        }
    };

    let rest = args.finish();
    if !rest.is_empty() {
        tracing::warn!(?rest, "ignoring unused arguments");
    }
    Ok(succeeded)
}

fn theme_command(ctx: &mut AppContext, args: &mut Arguments) -> Result<bool, pico_args::Error> {
    let action: Option<String> = args.opt_free_from_str()?;
    match action.as_deref() {
        None | Some("show") => {
            let label = ctx.i18n.tr(ctx.theme_mode().i18n_key());
            println!("{}", ctx.i18n.tr_with_args("theme-current", &[("mode", label.as_str())]));
            Ok(true)
        }
        Some("set") => {
            let value: String = args.free_from_str()?;
            let dark = match value.as_str() {
                "on" | "dark" | "true" => true,
                "off" | "light" | "false" => false,
                other => {
                    return Err(pico_args::Error::ArgumentParsingFailed {
                        cause: format!("expected on or off, got '{other}'"),
                    })
                }
            };
            ctx.save_theme(dark);
            Ok(true)
        }
        Some(other) => Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unknown theme action '{other}'"),
        }),
    }
}

fn folder_command(ctx: &mut AppContext, args: &mut Arguments) -> Result<bool, pico_args::Error> {
    let action: Option<String> = args.opt_free_from_str()?;
    match action.as_deref() {
        None | Some("show") => {
            println!("{}", ctx.location_label());
            if let Some(folder) = ctx.folders().folder() {
                println!("{}", folder.path().display());
            }
            Ok(true)
        }
        Some("set") => {
            let dir: PathBuf = args.free_from_str()?;
            Ok(ctx.set_folder(dir))
        }
        Some(other) => Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unknown folder action '{other}'"),
        }),
    }
}

async fn scan(ctx: &mut AppContext, runtime: Handle, after_delete: bool) -> Option<GalleryList> {
    let folder = match ctx.folders().require_folder() {
        Ok(folder) => folder.clone(),
        Err(err) => {
            ctx.notices.push(Notice::from_error(&err));
            return None;
        }
    };
    let mut list = GalleryList::new(runtime);
    if after_delete {
        list.refresh_after_delete(folder, ctx.sort_order());
    } else {
        list.request_scan(folder, ctx.sort_order());
    }
    if let Some(notice) = list.next_update().await.and_then(|u| u.refresh_notice()) {
        ctx.notices.push(notice);
    }
    Some(list)
}

async fn show_gallery(ctx: &mut AppContext, runtime: Handle) -> bool {
    let Some(list) = scan(ctx, runtime, false).await else {
        return false;
    };
    print_listing(ctx, &list);
    !matches!(list.state(), ListingState::Inaccessible(_))
}

async fn refresh_after_delete(ctx: &mut AppContext, runtime: Handle) {
    if let Some(list) = scan(ctx, runtime, true).await {
        print_listing(ctx, &list);
    }
}

fn print_listing(ctx: &AppContext, list: &GalleryList) {
    if let Some(key) = list.state().empty_message_key() {
        println!("{}", ctx.i18n.tr(key));
        return;
    }
    for item in list.items() {
        let details = ImageDetails::from_item(item, &Local);
        println!("{:<40} {:>10}  {}", details.name, details.size, details.date);
    }
    let count = list.items().len().to_string();
    println!("{}", ctx.i18n.tr_with_args("gallery-count", &[("count", count.as_str())]));
}

fn show_detail(ctx: &mut AppContext, file: &std::path::Path) -> bool {
    let folder = match ctx.folders().require_folder() {
        Ok(folder) => folder.path().to_path_buf(),
        Err(err) => {
            ctx.notices.push(Notice::from_error(&err));
            return false;
        }
    };
    let Some(name) = file.file_name() else {
        ctx.notices.push(Notice::warning("delete-not-found"));
        return false;
    };
    match ImageItem::from_path(folder.join(name)) {
        Ok(item) => {
            let details = ImageDetails::from_item(&item, &Local);
            for (key, arg, value) in details.lines() {
                println!("{}", ctx.i18n.tr_with_args(key, &[(arg, value)]));
            }
            true
        }
        Err(_) => {
            ctx.notices.push(Notice::warning("delete-not-found"));
            false
        }
    }
}

/// Stages `file` as if the camera had just written it, then saves it.
fn capture(ctx: &mut AppContext, file: &std::path::Path) -> bool {
    if let Err(err) = ctx.folders().require_folder() {
        ctx.notices.push(Notice::from_error(&err));
        return false;
    }
    let Some(staging_dir) = ctx.capture_staging_dir() else {
        ctx.notices.push(Notice::error("notification-state-path-error"));
        return false;
    };

    let staged = gallery::new_capture_path(&staging_dir, &Local::now())
        .and_then(|path| std::fs::copy(file, &path).map(|_| path).map_err(Into::into));
    match staged {
        Ok(path) => match ctx.save_capture(&path) {
            Some(item) => {
                println!("{}", item.path().display());
                true
            }
            None => false,
        },
        Err(err) => {
            ctx.notices.push(Notice::from_error(&err));
            false
        }
    }
}

/// Renderer that reports commands on the terminal.
#[derive(Debug, Default)]
struct TerminalRenderer {
    animating: bool,
}

impl AnimationRenderer for TerminalRenderer {
    fn is_animating(&self) -> bool {
        self.animating
    }

    fn play_animation(&mut self) {
        self.animating = true;
    }

    fn pause_animation(&mut self) {
        self.animating = false;
    }

    fn set_repeat_count(&mut self, count: RepeatCount) {
        tracing::debug!(%count, "renderer repeat count");
    }

    fn set_speed(&mut self, speed: f32) {
        tracing::debug!(speed, "renderer speed");
    }
}

fn animate_command(ctx: &mut AppContext, args: &mut Arguments) -> Result<bool, pico_args::Error> {
    let action: String = args.free_from_str()?;
    let mut controller = AnimationController::open(TerminalRenderer::default(), &ctx.config);
    match action.as_str() {
        "play" => controller.play(),
        "pause" => {
            controller.play();
            controller.pause();
        }
        "repeat" => {
            let count: Option<RepeatCount> = args.opt_free_from_str()?;
            let count = count.unwrap_or(RepeatCount::Times(ctx.config.repeat_count()));
            controller.repeat(count);
            let text = count.to_string();
            println!("{}", ctx.i18n.tr_with_args("animation-repeat", &[("count", text.as_str())]));
        }
        other => {
            return Err(pico_args::Error::ArgumentParsingFailed {
                cause: format!("unknown animation action '{other}'"),
            })
        }
    }
    let key = if controller.renderer().is_animating() {
        "animation-playing"
    } else {
        "animation-paused"
    };
    println!("{}", ctx.i18n.tr(key));
    Ok(true)
}
