use calcplot::{
    command::Command,
    config::{Config, DEFAULT_CONFIG},
    logging,
    Calculator,
};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{
    fs,
    io::{self, IsTerminal, Read},
    path::PathBuf,
    process::ExitCode,
};

/// Parses and serves one line, printing the result or the error.
fn process(line: &str, calculator: &Calculator) {
    let result = Command::parse(line).and_then(|command| match command {
        Command::Calculate(expr) => calculator.calculate(&expr).map(|calculation| {
            println!("{}", calculation.engine_output);
        }),
        Command::Plot(request) => calculator.handle(&request).map(|artifact| {
            println!("{} ({})", artifact.path.display(), artifact.url);
        }),
    });

    if let Err(err) = result {
        if let Err(io_err) = err.report_to_stderr() {
            eprintln!("error: {} ({})", err, io_err);
        }
    }
}

/// Serves every non-empty line of the input.
fn process_all(input: &str, calculator: &Calculator) {
    input.lines()
        .filter(|line| !line.trim().is_empty())
        .for_each(|line| process(line, calculator));
}

/// Splits the command line into the configuration path and the optional input file.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(PathBuf, Option<PathBuf>), String> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut file = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = args.next()
                    .map(PathBuf::from)
                    .ok_or_else(|| "--config needs a path".to_string())?;
            },
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument `{}`", arg)),
        }
    }

    Ok((config, file))
}

fn main() -> ExitCode {
    let mut args = std::env::args();
    args.next();

    let (config_path, file) = match parse_args(args) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {}", err);
            eprintln!("usage: calcplot [--config <path>] [file]");
            return ExitCode::FAILURE;
        },
    };

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        },
    };

    if let Err(err) = logging::init(&config.log) {
        eprintln!("warning: logging is disabled: {}", err);
    }

    let calculator = match Calculator::from_config(&config) {
        Ok(calculator) => calculator,
        Err(err) => {
            eprintln!("error: could not open {}: {}", config.plots.dir.display(), err);
            return ExitCode::FAILURE;
        },
    };

    if let Some(file) = file {
        // run source file
        match fs::read_to_string(&file) {
            Ok(input) => process_all(&input, &calculator),
            Err(err) => {
                eprintln!("error: could not read {}: {}", file.display(), err);
                return ExitCode::FAILURE;
            },
        }
    } else if !io::stdin().is_terminal() {
        // read input from stdin
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            eprintln!("error: could not read stdin: {}", err);
            return ExitCode::FAILURE;
        }
        process_all(&input, &calculator);
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("error: {}", err);
                return ExitCode::FAILURE;
            },
        };

        fn process_line(rl: &mut DefaultEditor, calculator: &Calculator) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            process(&input, calculator);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &calculator) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn args(args: &[&str]) -> impl Iterator<Item = String> {
        args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn command_line() {
        assert_eq!(parse_args(args(&[])).unwrap(), (PathBuf::from("calcplot.toml"), None));
        assert_eq!(
            parse_args(args(&["--config", "my.toml", "input.txt"])).unwrap(),
            (PathBuf::from("my.toml"), Some(PathBuf::from("input.txt"))),
        );
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["a", "b"])).is_err());
    }
}
