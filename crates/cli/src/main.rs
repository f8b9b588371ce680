use std::process::ExitCode;

fn main() -> ExitCode {
    registry_cli::run()
}
