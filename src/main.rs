use clap::Parser;
use relay::cli::{
    ask, handle_completions, handle_config_init, health, probe, Cli, Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => relay::cli::serve::run_serve(args).await,
        Commands::Ask(args) => ask::handle_ask(&args).await.map(|out| println!("{}", out)),
        Commands::Route(args) => ask::handle_route(&args).await.map(|out| println!("{}", out)),
        Commands::Health(args) => health::handle_health(&args)
            .await
            .map(|out| println!("{}", out)),
        Commands::Probe(args) => probe::handle_probe(&args)
            .await
            .map(|out| println!("{}", out)),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
