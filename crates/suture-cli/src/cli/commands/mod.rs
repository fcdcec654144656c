use super::args::*;

pub(crate) mod evaluate;
pub(crate) mod output;
pub(crate) mod score;

use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Evaluate(args) => evaluate::run(args).await,
        Command::Score(args) => score::run(args),
        Command::Version => {
            println!("suture {}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
