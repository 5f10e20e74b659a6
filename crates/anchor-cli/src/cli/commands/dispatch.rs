use super::super::args::*;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let global = cli.global;
    match cli.cmd {
        Command::Init => super::init::run(&global),
        Command::Submit(args) => super::submit::run(&global, args).await,
        Command::Get(args) => super::query::cmd_get(&global, args),
        Command::Lookup(args) => super::query::cmd_lookup(&global, args),
        Command::Count => super::query::cmd_count(&global),
        Command::List => super::query::cmd_list(&global),
        Command::Events => super::events::run(&global),
        Command::Verify => super::verify::run(&global),
    }
}
