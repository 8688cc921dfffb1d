use std::{
    env, fs,
    io::{self, Read},
    path::PathBuf,
    process,
};

use formhub_display::{
    config::ConfigManager,
    display::classify::classify_custom_form,
    init, parse_ticket,
    render::{render_display, RenderOptions},
    utils::build_info,
    DisplayEngine, DisplayResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Render,
    Json,
    Summary,
    Classify,
}

struct Options {
    mode: Mode,
    plain: bool,
    config: Option<PathBuf>,
    input: Option<PathBuf>,
}

fn main() {
    init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(message) => {
            eprintln!("Error: {message}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(err) = run(options) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

/// `Ok(None)` when the invocation was fully handled (`--version`, `--help`).
fn parse_args(args: impl Iterator<Item = String>) -> Result<Option<Options>, String> {
    let mut options = Options {
        mode: Mode::Render,
        plain: false,
        config: None,
        input: None,
    };
    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => options.mode = Mode::Json,
            "--summary" => options.mode = Mode::Summary,
            "--classify" => options.mode = Mode::Classify,
            "--plain" => options.plain = true,
            "--config" => {
                let path = args.next().ok_or("--config requires a path")?;
                options.config = Some(PathBuf::from(path));
            }
            "--version" => {
                println!("{}", build_info::current().describe());
                return Ok(None);
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option `{flag}`")),
            path => {
                if options.input.is_some() {
                    return Err("only one input file may be given".to_string());
                }
                options.input = Some(PathBuf::from(path));
            }
        }
    }
    Ok(Some(options))
}

fn run(options: Options) -> DisplayResult<()> {
    let manager = match &options.config {
        Some(path) => ConfigManager::at_path(path.clone()),
        None => ConfigManager::new(),
    };
    let engine = DisplayEngine::new(manager.load()?);

    let text = match &options.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let ticket = parse_ticket(&text)?;

    match options.mode {
        Mode::Render => {
            let render_options = RenderOptions {
                plain: options.plain,
            };
            let model = engine.build_display(&ticket);
            println!("{}", render_display(&model, &engine, render_options));
        }
        Mode::Json => {
            let model = engine.build_display(&ticket);
            println!("{}", serde_json::to_string_pretty(&model)?);
        }
        Mode::Summary => println!("{}", engine.adaptive_summary(&ticket)),
        Mode::Classify => {
            let structure = classify_custom_form(ticket.custom_form_data.as_ref());
            println!("{}", serde_json::to_string_pretty(&structure)?);
        }
    }

    Ok(())
}

fn print_usage() {
    eprintln!(
        "Usage: formhub_display_cli [options] [FILE]\n\
         Reads a ticket (or workflow task) as JSON from FILE or stdin.\n\
         Options:\n  \
         --json          print the display model as JSON\n  \
         --summary       print the one-line list summary\n  \
         --classify      print the detected form structure as JSON\n  \
         --plain         disable colours\n  \
         --config PATH   read display settings from PATH\n  \
         --version       print build information"
    );
}
