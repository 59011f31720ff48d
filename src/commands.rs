//! Notebook command lines (`%solve diet --result=r`, `%%model diet` + cell)
//! parsed into [`Command`]s and executed against a [`Session`].

use std::path::Path;

use crate::domain::solve::{solve, solve_inline};
use crate::domain::solver::Solver;
use crate::domain::validate::validate_result_name;
use crate::error::CommandError;
use crate::models::{CommandResponse, SolveOptions, SolveRequest};
use crate::session::Session;

const MODEL_USAGE: &str = "Usage: %%model <name of model>";
const DATA_USAGE: &str = "Usage: %%data <name of data>";
const SOLVE_USAGE: &str = "Usage: %solve [options] <name of model> [name of data]\n\
                           \x20 Options:\n\
                           \x20   --nolog\n\
                           \x20   --result=<name of result variable>\n\
                           \x20   --presolve";
const GMPL_USAGE: &str = "Usage: %%gmpl [options]\n\
                          \x20 Options:\n\
                          \x20   --nolog\n\
                          \x20   --result=<name of result variable>\n\
                          \x20   --presolve";
const HELP: &str = "Commands:\n\
                    \x20 %%model <name>        store the cell as a model\n\
                    \x20 %%data <name>         store the cell as data\n\
                    \x20 %%gmpl [options]      solve the cell directly\n\
                    \x20 %solve [options] <model> [data]\n\
                    \x20 %listmodels, %listdata\n\
                    \x20 %clearmodels, %cleardata\n\
                    \x20 %showmodel <name>, %showdata <name>\n\
                    \x20 %result <name>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StoreModel { name: String, text: String },
    StoreData { name: String, text: String },
    Inline { text: String, options: SolveOptions },
    Solve(SolveRequest),
    ListModels,
    ListData,
    ClearModels,
    ClearData,
    ShowModel(String),
    ShowData(String),
    ShowResult(String),
}

impl Command {
    /// Parse a command line; `cell` is the body for `%%` cell commands.
    pub fn parse(line: &str, cell: Option<&str>) -> Result<Command, CommandError> {
        let line = line.trim_start().trim_start_matches('%');
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or_else(|| usage(HELP))?;
        let args: Vec<&str> = tokens.collect();

        match name {
            "model" | "store-model" => {
                let name = single_arg(&args, MODEL_USAGE)?;
                let text = cell.ok_or_else(|| usage(MODEL_USAGE))?;
                Ok(Command::StoreModel {
                    name: name.to_string(),
                    text: text.to_string(),
                })
            }
            "data" | "store-data" => {
                let name = single_arg(&args, DATA_USAGE)?;
                let text = cell.ok_or_else(|| usage(DATA_USAGE))?;
                Ok(Command::StoreData {
                    name: name.to_string(),
                    text: text.to_string(),
                })
            }
            "gmpl" => {
                let (options, positional) = parse_solve_args(&args, GMPL_USAGE)?;
                if !positional.is_empty() {
                    return Err(usage(GMPL_USAGE));
                }
                let text = cell.ok_or_else(|| usage(GMPL_USAGE))?;
                Ok(Command::Inline {
                    text: text.to_string(),
                    options,
                })
            }
            "solve" => {
                let (options, positional) = parse_solve_args(&args, SOLVE_USAGE)?;
                let (model, data) = match positional.as_slice() {
                    [model] => (*model, None),
                    [model, data] => (*model, Some(*data)),
                    _ => return Err(usage(SOLVE_USAGE)),
                };
                Ok(Command::Solve(SolveRequest {
                    model: model.to_string(),
                    data: data.map(str::to_string),
                    options,
                }))
            }
            "listmodels" | "list-models" => no_args(&args, "%listmodels", Command::ListModels),
            "listdata" | "list-data" => no_args(&args, "%listdata", Command::ListData),
            "clearmodels" | "clear-models" => no_args(&args, "%clearmodels", Command::ClearModels),
            "cleardata" | "clear-data" => no_args(&args, "%cleardata", Command::ClearData),
            "showmodel" | "show-model" => {
                let name = single_arg(&args, "Usage: %showmodel <name of model>")?;
                Ok(Command::ShowModel(name.to_string()))
            }
            "showdata" | "show-data" => {
                let name = single_arg(&args, "Usage: %showdata <name of data>")?;
                Ok(Command::ShowData(name.to_string()))
            }
            "result" | "show-result" => {
                let name = single_arg(&args, "Usage: %result <name of result variable>")?;
                Ok(Command::ShowResult(name.to_string()))
            }
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

/// What command handlers need besides the session.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub solver: &'a dyn Solver,
    /// Parent directory of the per-solve scratch directories.
    pub scratch_root: &'a Path,
}

pub fn execute(
    ctx: &CommandContext<'_>,
    session: &mut Session,
    command: Command,
) -> Result<String, CommandError> {
    match command {
        Command::StoreModel { name, text } => {
            session.store_or_init().add_model(name.as_str(), &text);
            Ok(format!("Model '{}' stored.", name))
        }
        Command::StoreData { name, text } => {
            session.store_or_init().add_data(name.as_str(), &text);
            Ok(format!("Data '{}' stored.", name))
        }
        Command::Inline { text, options } => Ok(solve_inline(
            ctx.solver,
            session,
            &text,
            &options,
            ctx.scratch_root,
        )?),
        Command::Solve(request) => Ok(solve(ctx.solver, session, &request, ctx.scratch_root)?),
        Command::ListModels => Ok(session
            .store()?
            .list_models()
            .map_or_else(|| "No models stored.".to_string(), |names| names.join("\n"))),
        Command::ListData => Ok(session
            .store()?
            .list_data()
            .map_or_else(|| "No data stored.".to_string(), |names| names.join("\n"))),
        Command::ClearModels => {
            session.store_mut()?.clear_models();
            Ok("Models cleared.".to_string())
        }
        Command::ClearData => {
            session.store_mut()?.clear_data();
            Ok("Data cleared.".to_string())
        }
        Command::ShowModel(name) => Ok(session.store()?.show_model(&name)?.to_string()),
        Command::ShowData(name) => Ok(session.store()?.show_data(&name)?.to_string()),
        Command::ShowResult(name) => session
            .result(&name)
            .map(ToString::to_string)
            .ok_or(CommandError::ResultNotFound(name)),
    }
}

/// Parse and execute one command line. Failures become output text with
/// `success = false`; nothing is propagated to the caller.
pub fn run_command(
    ctx: &CommandContext<'_>,
    session: &mut Session,
    line: &str,
    cell: Option<&str>,
) -> CommandResponse {
    match Command::parse(line, cell).and_then(|command| execute(ctx, session, command)) {
        Ok(output) => CommandResponse {
            output,
            success: true,
        },
        Err(err) => {
            log::debug!("Command '{}' failed: {:?}", line.trim(), err);
            CommandResponse {
                output: err.to_string(),
                success: false,
            }
        }
    }
}

fn parse_solve_args<'a>(
    args: &[&'a str],
    usage_text: &str,
) -> Result<(SolveOptions, Vec<&'a str>), CommandError> {
    let mut options = SolveOptions::default();
    let mut positional = Vec::new();
    let mut iter = args.iter();

    while let Some(&arg) = iter.next() {
        match arg {
            "--nolog" => options.nolog = true,
            "--presolve" | "--simplexpresolve" => options.presolve = true,
            "--result" => {
                let name = iter.next().ok_or_else(|| usage(usage_text))?;
                options.result = Some(name.to_string());
            }
            _ if arg.starts_with("--result=") => {
                options.result = arg.strip_prefix("--result=").map(str::to_string);
            }
            _ if arg.starts_with('-') => return Err(usage(usage_text)),
            _ => positional.push(arg),
        }
    }

    if let Some(name) = &options.result {
        validate_result_name(name)?;
    }
    Ok((options, positional))
}

fn single_arg<'a>(args: &[&'a str], usage_text: &str) -> Result<&'a str, CommandError> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(usage(usage_text)),
    }
}

fn no_args(args: &[&str], name: &str, command: Command) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(usage(&format!("Usage: {}", name)))
    }
}

fn usage(text: &str) -> CommandError {
    CommandError::Usage(text.to_string())
}
