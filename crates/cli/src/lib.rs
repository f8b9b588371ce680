pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use registry_core::config::LoadOptions;

use commands::customers::{RegisterArgs, ShowArgs, UpdateArgs};

#[derive(Debug, Parser)]
#[command(
    name = "registry",
    about = "Customer registry operator CLI",
    long_about = "Manage the customer registry database: migrations, demo data, config inspection, and customer records.",
    after_help = "Examples:\n  registry migrate\n  registry register --tax-id 111 --name \"Jane Roe\"\n  registry show --tax-id 111"
)]
pub struct Cli {
    #[arg(
        long = "config",
        global = true,
        value_name = "PATH",
        help = "Config file to load instead of registry.toml / config/registry.toml; must exist"
    )]
    config_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Register the deterministic demo customers, skipping ones already present")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Register a new customer; rejected when the tax id is already stored")]
    Register(RegisterArgs),
    #[command(about = "List every stored customer in id order")]
    List,
    #[command(about = "Show one customer by tax id or by id")]
    Show(ShowArgs),
    #[command(about = "Replace name and birth date and merge address fields of a customer")]
    Update(UpdateArgs),
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions { config_path: cli.config_file, ..LoadOptions::default() };

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(&options),
        Command::Seed => commands::seed::run(&options),
        Command::Config => commands::config::run(&options),
        Command::Register(args) => commands::customers::register(&options, args),
        Command::List => commands::customers::list(&options),
        Command::Show(args) => commands::customers::show(&options, args),
        Command::Update(args) => commands::customers::update(&options, args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
