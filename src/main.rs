use std::process::ExitCode;

fn main() -> ExitCode {
    dotnet_reflect::run_cli()
}
