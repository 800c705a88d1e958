// treeform: syntax tree printer and explorer

use std::fs;
use std::io;
use std::process;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};

use treeform::config::{DEMO_PROGRAM, Mode, Options, SourceInput, USAGE, UsageError};
use treeform::parser::parse;
use treeform::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let options = match Options::from_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(UsageError::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let source = match &options.input {
        SourceInput::File(path) => match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Error: cannot read '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        SourceInput::Demo => DEMO_PROGRAM.to_string(),
    };

    info!("Parsing {:?} in {:?} mode", options.input, options.mode);
    let parsed = parse(&source);

    match options.mode {
        Mode::Print => match parsed {
            Ok(program) => {
                println!("{}", program.render_text());
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", e);
                if !e.remainder.is_empty() {
                    eprintln!("  {:4} | {}", e.location.line, e.remainder);
                }
                process::exit(1);
            }
        },
        Mode::Tui => run_tui(source, parsed),
    }
}

fn run_tui(
    source: String,
    parsed: Result<treeform::parser::ast::StmtList, treeform::parser::ParseError>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, parsed);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
