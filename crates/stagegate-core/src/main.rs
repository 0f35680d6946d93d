use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use stagegate_core::{AccessError, Catalog, ClientRegistry, Session, UserDirectory};
use stagegate_model::{panels_for, ClientId, Role, TaskId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_arg = Arg::new("config")
        .long("config")
        .global(true)
        .value_parser(value_parser!(PathBuf))
        .help("Catalog file (.yaml, .yml, .toml or .json); built-in catalog when omitted");
    let user_arg = Arg::new("user")
        .long("user")
        .required(true)
        .help("Username to sign in as");
    let client_arg = Arg::new("client")
        .long("client")
        .default_value("1")
        .help("Client whose matrix to open");

    let cli = Command::new("stagegate")
        .version(stagegate_core::VERSION)
        .about("Role-gated stage matrix and task dependency engine")
        .arg(config_arg)
        .subcommand_required(true)
        .subcommand(Command::new("validate").about("Load and validate a catalog, then print a summary"))
        .subcommand(
            Command::new("matrix")
                .about("Render the stage matrix as seen by a user")
                .arg(user_arg.clone())
                .arg(client_arg.clone())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("replay")
                .about("Apply a script of completion toggles as a user")
                .arg(user_arg)
                .arg(client_arg)
                .arg(
                    Arg::new("script")
                        .long("script")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("One `<task> <role> <on|off>` per line; `#` starts a comment"),
                ),
        )
        .subcommand(
            Command::new("permissions")
                .about("Print a role's permissions and dashboard panels")
                .arg(Arg::new("role").long("role").required(true).help("Role id, e.g. alpha-sales")),
        );

    let matches = cli.get_matches();
    let catalog = load_catalog(matches.get_one::<PathBuf>("config"))?;

    match matches.subcommand() {
        Some(("validate", _)) => validate(&catalog),
        Some(("matrix", args)) => matrix(catalog, args),
        Some(("replay", args)) => replay(catalog, args),
        Some(("permissions", args)) => permissions(&catalog, args),
        _ => Ok(()),
    }
}

fn load_catalog(path: Option<&PathBuf>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("loading catalog {}", path.display())),
        None => Catalog::builtin().context("loading built-in catalog"),
    }
}

fn validate(catalog: &Catalog) -> anyhow::Result<()> {
    println!("Catalog OK");
    println!("  Roles:        {}", catalog.permissions().len());
    println!("  Rows:         {}", catalog.stages().len());
    println!("  Tasks:        {}", catalog.graph().task_count());
    println!("  Dependencies: {}", catalog.graph().dependency_count());
    println!("  Cells:        {}", catalog.layout().len());
    println!("  Unlock:       {:?}", catalog.unlock_policy());
    Ok(())
}

fn open_session(catalog: Catalog, args: &ArgMatches) -> anyhow::Result<Session> {
    let username = args.get_one::<String>("user").map_or("", String::as_str);
    let client = args.get_one::<String>("client").map_or("1", String::as_str);

    let user = UserDirectory::demo().sign_in(username)?;
    let mut session = Session::start(Arc::new(catalog), user);
    session.select_client(&ClientRegistry::demo(), &ClientId::from(client))?;
    Ok(session)
}

fn matrix(catalog: Catalog, args: &ArgMatches) -> anyhow::Result<()> {
    let mut session = open_session(catalog, args)?;
    let snapshot = session.matrix()?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", snapshot.render_text());
    }
    Ok(())
}

fn replay(catalog: Catalog, args: &ArgMatches) -> anyhow::Result<()> {
    let script_path = args
        .get_one::<PathBuf>("script")
        .context("--script is required")?;
    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("reading script {}", script_path.display()))?;

    let mut session = open_session(catalog, args)?;
    let mut rejected = 0usize;

    for (number, line) in script.lines().enumerate() {
        let line = strip_comment(line);
        if line.is_empty() {
            continue;
        }
        let (task, role, completed) =
            parse_step(line).with_context(|| format!("script line {}", number + 1))?;

        match session.toggle(task, role, completed) {
            Ok(outcome) => println!("ok      {task} {role} {} ({:?})", on_off(completed), outcome.change),
            Err(err) => {
                rejected += 1;
                println!("{:<7} {task} {role} {}: {err}", label(&err), on_off(completed));
            }
        }
    }

    println!();
    print!("{}", session.matrix()?.render_text());

    if rejected > 0 {
        println!();
        println!("{rejected} toggle(s) rejected");
        std::process::exit(1);
    }
    Ok(())
}

/// Text before any `#`, trimmed
fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or_default().trim()
}

fn parse_step(line: &str) -> anyhow::Result<(TaskId, Role, bool)> {
    let mut fields = line.split_whitespace();
    let (Some(task), Some(role), Some(state), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        bail!("expected `<task> <role> <on|off>`, got `{line}`");
    };

    let completed = match state {
        "on" => true,
        "off" => false,
        other => bail!("expected `on` or `off`, got `{other}`"),
    };
    Ok((task.parse()?, role.parse()?, completed))
}

fn on_off(completed: bool) -> &'static str {
    if completed {
        "on"
    } else {
        "off"
    }
}

fn label(err: &AccessError) -> &'static str {
    if err.is_denial() {
        "denied"
    } else {
        "invalid"
    }
}

fn permissions(catalog: &Catalog, args: &ArgMatches) -> anyhow::Result<()> {
    let role: Role = args
        .get_one::<String>("role")
        .context("--role is required")?
        .parse()?;
    let table = catalog.permissions();

    println!("{role} ({})", role.label());
    if let Some(description) = table.description(role).filter(|d| !d.is_empty()) {
        println!("  {description}");
    }
    println!();
    println!("Permissions:");
    for permission in table.permissions_of(role).into_iter().flatten() {
        println!("  {permission}");
    }
    println!();
    println!("Stages:");
    for stage in catalog.stages().stages_for(role) {
        println!("  {stage} ({})", stage.label());
    }
    println!();
    println!("Panels:");
    for access in panels_for(table, Some(role)) {
        let mut actions = Vec::new();
        if access.can_create {
            actions.push("create");
        }
        if access.can_edit {
            actions.push("edit");
        }
        if access.can_delete {
            actions.push("delete");
        }
        println!("  {:?} [{}]", access.panel, actions.join(", "));
    }
    Ok(())
}
